//! Create trip screen

use chrono::{NaiveDate, Utc};

use super::form::TripForm;
use crate::models::Trip;
use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{ScreenLifetime, SubmitState};
use crate::state::AppContext;
use crate::utils::errors::Result;

#[derive(Debug)]
pub struct CreateTripScreen {
    ctx: AppContext,
    lifetime: ScreenLifetime,
    pub form: TripForm,
    pub submit: SubmitState,
    created: Option<Trip>,
}

impl CreateTripScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self::starting_on(ctx, Utc::now().date_naive())
    }

    /// Form pre-filled for a trip starting on `today`
    pub fn starting_on(ctx: AppContext, today: NaiveDate) -> Self {
        Self {
            ctx,
            lifetime: ScreenLifetime::new(),
            form: TripForm::new(today),
            submit: SubmitState::default(),
            created: None,
        }
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub fn created(&self) -> Option<&Trip> {
        self.created.as_ref()
    }

    /// Create the trip and show it in place of the form
    pub async fn submit(&mut self) -> Result<NavAction<TripsRoute>> {
        self.submit.begin()?;
        let request = match self.form.to_create_request() {
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
            .guard(self.ctx.services.trip_service.create_trip(&user.id, request))
            .await;
        self.submit.record("create_trip", &result);
        let trip = result?;

        self.submit.succeed(None);
        let route = TripsRoute::TripDetails {
            trip_id: trip.id.clone(),
        };
        self.created = Some(trip);
        Ok(NavAction::Replace(route))
    }

    pub fn cancel(&self) -> NavAction<TripsRoute> {
        NavAction::GoBack
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
