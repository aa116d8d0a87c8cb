//! Comment thread under an activity or accommodation

use crate::models::{Comment, CommentTarget, CreateCommentRequest};
use crate::screens::{ScreenLifetime, SubmitState};
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::validation::{validate_required, ValidationError};

#[derive(Debug, Clone)]
pub struct CommentThread {
    trip_id: String,
    entity_id: String,
    entity_type: CommentTarget,
    comments: Vec<Comment>,
    pub draft: String,
    pub submit: SubmitState,
}

impl CommentThread {
    pub fn new(trip_id: &str, entity_id: &str, entity_type: CommentTarget) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            entity_id: entity_id.to_string(),
            entity_type,
            comments: Vec::new(),
            draft: String::new(),
            submit: SubmitState::default(),
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Oldest first
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub async fn load(&mut self, ctx: &AppContext, lifetime: &ScreenLifetime) -> Result<()> {
        let user = ctx.session.require_user()?;
        self.comments = lifetime
            .guard(
                ctx.services
                    .itinerary_service
                    .list_comments(&user.id, &self.trip_id, &self.entity_id),
            )
            .await?;
        Ok(())
    }

    /// Post the draft; the draft is kept when posting fails
    pub async fn post(&mut self, ctx: &AppContext, lifetime: &ScreenLifetime) -> Result<Comment> {
        let user = ctx.session.require_user()?;
        self.submit.begin()?;
        if let Err(e) = validate_required(&self.draft, ValidationError::EmptyComment) {
            return Err(self.submit.reject(e));
        }

        let request = CreateCommentRequest {
            entity_id: self.entity_id.clone(),
            entity_type: self.entity_type,
            text: self.draft.clone(),
        };
        let result = lifetime
            .guard(
                ctx.services
                    .itinerary_service
                    .add_comment(&user.id, &self.trip_id, request),
            )
            .await;
        self.submit.record("add_comment", &result);
        let comment = result?;

        self.submit.succeed(None);
        self.draft.clear();
        self.comments.push(comment.clone());
        Ok(comment)
    }

    pub async fn delete(&mut self, ctx: &AppContext, lifetime: &ScreenLifetime, comment_id: &str) -> Result<()> {
        let user = ctx.session.require_user()?;
        self.submit.begin()?;
        let result = lifetime
            .guard(ctx.services.itinerary_service.delete_comment(&user.id, comment_id))
            .await;
        self.submit.record("delete_comment", &result);
        result?;

        self.submit.succeed(None);
        self.comments.retain(|c| c.id != comment_id);
        Ok(())
    }

    /// Whether the signed-in user may delete this comment in the UI
    pub fn can_delete(&self, comment: &Comment, user_id: &str, is_trip_owner: bool) -> bool {
        comment.user_id == user_id || is_trip_owner
    }

    /// Take the thread from the store after a change elsewhere
    pub async fn refresh_from_store(&mut self, ctx: &AppContext) {
        self.comments = ctx.store.comments_for(&self.entity_id).await;
    }
}
