//! Manage collaborators screen
//!
//! Lists the owner and collaborators of a trip. Only the owner can invite or
//! remove people; a collaborator can leave the trip.

use tracing::debug;

use crate::models::User;
use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{LoadState, ScreenLifetime, SubmitState};
use crate::services::access::TripRole;
use crate::services::trip::TripMember;
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::validation::validate_email;

#[derive(Debug)]
pub struct ManageCollaboratorsScreen {
    ctx: AppContext,
    trip_id: String,
    lifetime: ScreenLifetime,
    members: LoadState<Vec<TripMember>>,
    pub invite_email: String,
    pub submit: SubmitState,
}

impl ManageCollaboratorsScreen {
    pub fn new(ctx: AppContext, trip_id: &str) -> Self {
        Self {
            ctx,
            trip_id: trip_id.to_string(),
            lifetime: ScreenLifetime::new(),
            members: LoadState::Idle,
            invite_email: String::new(),
            submit: SubmitState::default(),
        }
    }

    pub fn state(&self) -> &LoadState<Vec<TripMember>> {
        &self.members
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub fn members(&self) -> &[TripMember] {
        self.members.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_owner(&self) -> bool {
        let Some(user) = self.ctx.session.current_user() else {
            return false;
        };
        self.members()
            .iter()
            .any(|m| m.role == TripRole::Owner && m.user.id == user.id)
    }

    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.members = LoadState::Loading;
        let result = self
            .lifetime
            .guard(self.ctx.services.trip_service.list_members(&user.id, &self.trip_id))
            .await;
        self.members.settle("list_members", result)
    }

    /// Invite the account behind `invite_email` and refresh the member list
    pub async fn invite(&mut self) -> Result<User> {
        let user = self.ctx.session.require_user()?;
        self.submit.begin()?;
        if let Err(e) = validate_email(&self.invite_email) {
            return Err(self.submit.reject(e));
        }

        let result = self
            .lifetime
            .guard(self.ctx.services.trip_service.add_collaborator(
                &user.id,
                &self.trip_id,
                self.invite_email.trim(),
            ))
            .await;
        self.submit.record("add_collaborator", &result);
        let invitee = result?;

        let message = format!("{} can now plan this trip with you", invitee.name);
        self.submit.succeed(Some(message.as_str()));
        self.invite_email.clear();
        self.load().await?;
        Ok(invitee)
    }

    pub async fn remove(&mut self, collaborator_id: &str) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.submit.begin()?;
        let result = self
            .lifetime
            .guard(self.ctx.services.trip_service.remove_collaborator(
                &user.id,
                &self.trip_id,
                collaborator_id,
            ))
            .await;
        self.submit.record("remove_collaborator", &result);
        result?;

        self.submit.succeed(None);
        if let LoadState::Loaded(members) = &mut self.members {
            members.retain(|m| m.user.id != collaborator_id);
        }
        Ok(())
    }

    /// Leave the trip; the trip is gone from this user's stack afterwards
    pub async fn leave(&mut self) -> Result<NavAction<TripsRoute>> {
        let user = self.ctx.session.require_user()?;
        self.submit.begin()?;
        let result = self
            .lifetime
            .guard(self.ctx.services.trip_service.remove_collaborator(
                &user.id,
                &self.trip_id,
                &user.id,
            ))
            .await;
        self.submit.record("leave_trip", &result);
        result?;

        debug!(trip_id = %self.trip_id, user_id = %user.id, "Left trip");
        self.submit.succeed(None);
        Ok(NavAction::PopToRoot)
    }

    pub fn done(&self) -> NavAction<TripsRoute> {
        NavAction::GoBack
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
