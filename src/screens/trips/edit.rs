//! Edit trip screen

use super::form::TripForm;
use crate::models::Trip;
use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{LoadState, ScreenLifetime, SubmitState};
use crate::state::AppContext;
use crate::utils::errors::{Result, TripPlannerError};

#[derive(Debug)]
pub struct EditTripScreen {
    ctx: AppContext,
    trip_id: String,
    lifetime: ScreenLifetime,
    trip: LoadState<Trip>,
    /// Present once the trip is loaded
    pub form: Option<TripForm>,
    pub submit: SubmitState,
}

impl EditTripScreen {
    pub fn new(ctx: AppContext, trip_id: &str) -> Self {
        Self {
            ctx,
            trip_id: trip_id.to_string(),
            lifetime: ScreenLifetime::new(),
            trip: LoadState::Idle,
            form: None,
            submit: SubmitState::default(),
        }
    }

    pub fn state(&self) -> &LoadState<Trip> {
        &self.trip
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    /// Fetch the trip and fill the form from it
    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.trip = LoadState::Loading;
        let result = self
            .lifetime
            .guard(self.ctx.services.trip_service.get_trip(&user.id, &self.trip_id))
            .await;
        self.trip.settle("get_trip", result)?;
        self.form = self.trip.data().map(TripForm::from_trip);
        Ok(())
    }

    /// Save the changes and return to the trip
    pub async fn submit(&mut self) -> Result<NavAction<TripsRoute>> {
        self.submit.begin()?;
        let Some(form) = self.form.as_ref() else {
            let e = TripPlannerError::InvalidInput("The trip is still loading".to_string());
            self.submit.fail(e.user_message());
            return Err(e);
        };
        let request = match form.to_update_request() {
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
            .guard(
                self.ctx
                    .services
                    .trip_service
                    .update_trip(&user.id, &self.trip_id, request),
            )
            .await;
        self.submit.record("update_trip", &result);
        let trip = result?;

        self.submit.succeed(None);
        self.trip = LoadState::Loaded(trip);
        Ok(NavAction::Navigate(TripsRoute::TripDetails {
            trip_id: self.trip_id.clone(),
        }))
    }

    pub fn cancel(&self) -> NavAction<TripsRoute> {
        NavAction::GoBack
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
