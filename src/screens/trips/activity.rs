//! Add activity and activity details screens

use super::comments::CommentThread;
use super::item_form::ItemForm;
use crate::models::{Activity, CommentTarget};
use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{LoadState, ScreenLifetime, StoreSubscription, SubmitState};
use crate::state::{AppContext, StoreEvent};
use crate::utils::errors::{Result, TripPlannerError};

#[derive(Debug)]
pub struct AddActivityScreen {
    ctx: AppContext,
    trip_id: String,
    day_index: u32,
    lifetime: ScreenLifetime,
    pub form: ItemForm,
    pub submit: SubmitState,
}

impl AddActivityScreen {
    pub fn new(ctx: AppContext, trip_id: &str, day_index: u32) -> Self {
        Self {
            ctx,
            trip_id: trip_id.to_string(),
            day_index,
            lifetime: ScreenLifetime::new(),
            form: ItemForm::default(),
            submit: SubmitState::default(),
        }
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    /// Add the activity and return to the day
    pub async fn submit(&mut self) -> Result<NavAction<TripsRoute>> {
        self.submit.begin()?;
        let request = match self.form.to_activity_request() {
            Ok(request) => request,
            Err(e) => return Err(self.submit.reject(e)),
        };
        let user = match self.ctx.session.require_user() {
            Ok(user) => user,
            Err(e) => {
                self.submit.fail(e.user_message());
                return Err(e);
            }
        };

        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.add_activity(
                &user.id,
                &self.trip_id,
                self.day_index,
                request,
            ))
            .await;
        self.submit.record("add_activity", &result);
        result?;

        self.submit.succeed(None);
        Ok(NavAction::GoBack)
    }

    pub fn cancel(&self) -> NavAction<TripsRoute> {
        NavAction::GoBack
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}

#[derive(Debug)]
pub struct ActivityDetailsScreen {
    ctx: AppContext,
    trip_id: String,
    day_index: u32,
    activity_id: String,
    lifetime: ScreenLifetime,
    subscription: StoreSubscription,
    activity: LoadState<Activity>,
    pub comments: CommentThread,
    /// Edit form, open while editing
    pub editing: Option<ItemForm>,
    pub action: SubmitState,
}

impl ActivityDetailsScreen {
    pub fn new(ctx: AppContext, trip_id: &str, day_index: u32, activity_id: &str) -> Self {
        let subscription = StoreSubscription::new(&ctx.store);
        Self {
            ctx,
            trip_id: trip_id.to_string(),
            day_index,
            activity_id: activity_id.to_string(),
            lifetime: ScreenLifetime::new(),
            subscription,
            activity: LoadState::Idle,
            comments: CommentThread::new(trip_id, activity_id, CommentTarget::Activity),
            editing: None,
            action: SubmitState::default(),
        }
    }

    pub fn state(&self) -> &LoadState<Activity> {
        &self.activity
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.activity = LoadState::Loading;
        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.get_activity(&user.id, &self.activity_id))
            .await;
        let result = match result {
            Ok(activity) if activity.trip_id != self.trip_id || activity.day_index != self.day_index => {
                Err(TripPlannerError::ActivityNotFound {
                    activity_id: self.activity_id.clone(),
                })
            }
            other => other,
        };
        self.activity.settle("get_activity", result)?;
        self.comments.load(&self.ctx, &self.lifetime).await
    }

    pub fn has_voted(&self) -> bool {
        match (self.activity.data(), self.ctx.session.current_user()) {
            (Some(activity), Some(user)) => activity.has_vote_from(&user.id),
            _ => false,
        }
    }

    pub fn vote_count(&self) -> usize {
        self.activity.data().map_or(0, Activity::vote_count)
    }

    pub async fn toggle_vote(&mut self) -> Result<bool> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;
        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.toggle_vote(&user.id, &self.activity_id))
            .await;
        self.action.record("toggle_vote", &result);
        let activity = result?;

        self.action.succeed(None);
        let voted = activity.has_vote_from(&user.id);
        self.activity = LoadState::Loaded(activity);
        Ok(voted)
    }

    pub fn start_editing(&mut self) {
        self.editing = self.activity.data().map(ItemForm::from_activity);
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    pub async fn save_changes(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;
        let Some(form) = self.editing.as_ref() else {
            self.action.succeed(None);
            return Ok(());
        };
        let request = match form.to_activity_request() {
            Ok(request) => request,
            Err(e) => return Err(self.action.reject(e)),
        };

        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.update_activity(
                &user.id,
                &self.activity_id,
                request,
            ))
            .await;
        self.action.record("update_activity", &result);
        let activity = result?;

        self.action.succeed(None);
        self.activity = LoadState::Loaded(activity);
        self.editing = None;
        Ok(())
    }

    /// Delete the activity with its comments and go back to the day
    pub async fn delete(&mut self) -> Result<NavAction<TripsRoute>> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;
        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.delete_activity(&user.id, &self.activity_id))
            .await;
        self.action.record("delete_activity", &result);
        result?;

        self.action.succeed(None);
        Ok(NavAction::GoBack)
    }

    pub async fn post_comment(&mut self) -> Result<()> {
        self.comments.post(&self.ctx, &self.lifetime).await.map(|_| ())
    }

    pub async fn delete_comment(&mut self, comment_id: &str) -> Result<()> {
        self.comments.delete(&self.ctx, &self.lifetime, comment_id).await
    }

    /// Pick up votes, edits and comments made elsewhere
    pub async fn sync_with_store(&mut self) -> bool {
        let (trip_id, day_index, activity_id) = (self.trip_id.clone(), self.day_index, self.activity_id.clone());
        let changed = self.subscription.drain(|e| match e {
            StoreEvent::CommentsChanged { entity_id, .. } => entity_id == &activity_id,
            other => other.affects_day(&trip_id, day_index),
        });
        if !changed {
            return false;
        }
        match self.ctx.store.activity(&self.activity_id).await {
            Some(activity) => {
                self.activity = LoadState::Loaded(activity);
                self.comments.refresh_from_store(&self.ctx).await;
            }
            None => {
                self.activity = LoadState::Error(
                    TripPlannerError::ActivityNotFound {
                        activity_id: self.activity_id.clone(),
                    }
                    .user_message(),
                );
            }
        }
        true
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
