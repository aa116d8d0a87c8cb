//! Add accommodation and accommodation details screens

use super::comments::CommentThread;
use super::item_form::ItemForm;
use crate::models::{Accommodation, CommentTarget};
use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{LoadState, ScreenLifetime, StoreSubscription, SubmitState};
use crate::state::{AppContext, StoreEvent};
use crate::utils::errors::{Result, TripPlannerError};

#[derive(Debug)]
pub struct AddAccommodationScreen {
    ctx: AppContext,
    trip_id: String,
    day_index: u32,
    lifetime: ScreenLifetime,
    pub form: ItemForm,
    pub submit: SubmitState,
}

impl AddAccommodationScreen {
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

    /// Add the option and return to the day
    pub async fn submit(&mut self) -> Result<NavAction<TripsRoute>> {
        let user = self.ctx.session.require_user()?;
        self.submit.begin()?;
        let request = match self.form.to_accommodation_request() {
            Ok(request) => request,
            Err(e) => return Err(self.submit.reject(e)),
        };

        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.add_accommodation(
                &user.id,
                &self.trip_id,
                self.day_index,
                request,
            ))
            .await;
        self.submit.record("add_accommodation", &result);
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
pub struct AccommodationDetailsScreen {
    ctx: AppContext,
    trip_id: String,
    day_index: u32,
    accommodation_id: String,
    lifetime: ScreenLifetime,
    subscription: StoreSubscription,
    accommodation: LoadState<Accommodation>,
    pub comments: CommentThread,
    pub editing: Option<ItemForm>,
    pub action: SubmitState,
}

impl AccommodationDetailsScreen {
    pub fn new(ctx: AppContext, trip_id: &str, day_index: u32, accommodation_id: &str) -> Self {
        let subscription = StoreSubscription::new(&ctx.store);
        Self {
            ctx,
            trip_id: trip_id.to_string(),
            day_index,
            accommodation_id: accommodation_id.to_string(),
            lifetime: ScreenLifetime::new(),
            subscription,
            accommodation: LoadState::Idle,
            comments: CommentThread::new(trip_id, accommodation_id, CommentTarget::Accommodation),
            editing: None,
            action: SubmitState::default(),
        }
    }

    pub fn state(&self) -> &LoadState<Accommodation> {
        &self.accommodation
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    fn not_found(&self) -> TripPlannerError {
        TripPlannerError::AccommodationNotFound {
            accommodation_id: self.accommodation_id.clone(),
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.accommodation = LoadState::Loading;
        let result = self
            .lifetime
            .guard(
                self.ctx
                    .services
                    .itinerary_service
                    .get_accommodation(&user.id, &self.accommodation_id),
            )
            .await;
        let result = match result {
            Ok(found) if found.trip_id != self.trip_id || found.day_index != self.day_index => {
                Err(self.not_found())
            }
            other => other,
        };
        self.accommodation.settle("get_accommodation", result)?;
        self.comments.load(&self.ctx, &self.lifetime).await
    }

    pub fn is_selected(&self) -> bool {
        self.accommodation.data().map_or(false, |a| a.is_selected)
    }

    /// Select the option, or clear the selection when it is already selected
    pub async fn toggle_selection(&mut self) -> Result<bool> {
        let user = self.ctx.session.require_user()?;
        let selected = self.is_selected();
        self.action.begin()?;

        let service = &self.ctx.services.itinerary_service;
        let result = if selected {
            self.lifetime
                .guard(service.deselect_accommodation(&user.id, &self.accommodation_id))
                .await
        } else {
            self.lifetime
                .guard(service.select_accommodation(&user.id, &self.accommodation_id))
                .await
        };
        self.action.record("toggle_accommodation_selection", &result);
        let accommodation = result?;

        self.action.succeed(None);
        let now_selected = accommodation.is_selected;
        self.accommodation = LoadState::Loaded(accommodation);
        Ok(now_selected)
    }

    pub fn start_editing(&mut self) {
        self.editing = self.accommodation.data().map(ItemForm::from_accommodation);
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
        let request = match form.to_accommodation_request() {
            Ok(request) => request,
            Err(e) => return Err(self.action.reject(e)),
        };

        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.update_accommodation(
                &user.id,
                &self.accommodation_id,
                request,
            ))
            .await;
        self.action.record("update_accommodation", &result);
        let accommodation = result?;

        self.action.succeed(None);
        self.accommodation = LoadState::Loaded(accommodation);
        self.editing = None;
        Ok(())
    }

    /// Delete the option with its comments and go back to the day
    pub async fn delete(&mut self) -> Result<NavAction<TripsRoute>> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;
        let result = self
            .lifetime
            .guard(
                self.ctx
                    .services
                    .itinerary_service
                    .delete_accommodation(&user.id, &self.accommodation_id),
            )
            .await;
        self.action.record("delete_accommodation", &result);
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

    /// Pick up selection changes and comments made elsewhere
    pub async fn sync_with_store(&mut self) -> bool {
        let (trip_id, day_index, accommodation_id) =
            (self.trip_id.clone(), self.day_index, self.accommodation_id.clone());
        let changed = self.subscription.drain(|e| match e {
            StoreEvent::CommentsChanged { entity_id, .. } => entity_id == &accommodation_id,
            other => other.affects_day(&trip_id, day_index),
        });
        if !changed {
            return false;
        }
        match self.ctx.store.accommodation(&self.accommodation_id).await {
            Some(accommodation) => {
                self.accommodation = LoadState::Loaded(accommodation);
                self.comments.refresh_from_store(&self.ctx).await;
            }
            None => self.accommodation = LoadState::Error(self.not_found().user_message()),
        }
        true
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
