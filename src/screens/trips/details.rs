//! Trip details screen
//!
//! Header, one card per day, an overflow menu (edit, share, manage
//! collaborators, delete) and the delete confirmation dialog.

use tracing::debug;

use crate::models::{Day, FullTrip, Trip, TripState};
use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{LoadState, ScreenLifetime, StoreSubscription, SubmitState};
use crate::state::AppContext;
use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::helpers::format_date;

/// Summary card of one day
#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub index: u32,
    pub label: String,
    pub date: String,
    pub activity_count: usize,
    pub has_accommodation: bool,
}

impl DayCard {
    pub fn activity_summary(&self) -> String {
        match self.activity_count {
            0 => "No activities planned yet".to_string(),
            1 => "1 activity planned".to_string(),
            n => format!("{} activities planned", n),
        }
    }

    pub fn accommodation_summary(&self) -> &'static str {
        if self.has_accommodation {
            "Accommodation selected"
        } else {
            "No accommodation selected"
        }
    }
}

impl From<&Day> for DayCard {
    fn from(day: &Day) -> Self {
        Self {
            index: day.index,
            label: day.label(),
            date: format_date(day.date),
            activity_count: day.activities.len(),
            has_accommodation: day.has_selected_accommodation(),
        }
    }
}

#[derive(Debug)]
pub struct TripDetailsScreen {
    ctx: AppContext,
    trip_id: String,
    lifetime: ScreenLifetime,
    subscription: StoreSubscription,
    trip: LoadState<FullTrip>,
    menu_visible: bool,
    delete_dialog_visible: bool,
    pub action: SubmitState,
}

impl TripDetailsScreen {
    pub fn new(ctx: AppContext, trip_id: &str) -> Self {
        let subscription = StoreSubscription::new(&ctx.store);
        Self {
            ctx,
            trip_id: trip_id.to_string(),
            lifetime: ScreenLifetime::new(),
            subscription,
            trip: LoadState::Idle,
            menu_visible: false,
            delete_dialog_visible: false,
            action: SubmitState::default(),
        }
    }

    pub fn trip_id(&self) -> &str {
        &self.trip_id
    }

    pub fn state(&self) -> &LoadState<FullTrip> {
        &self.trip
    }

    pub fn trip(&self) -> Option<&Trip> {
        self.trip.data().map(|full| &full.trip)
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.trip = LoadState::Loading;
        let result = self
            .lifetime
            .guard(
                self.ctx
                    .services
                    .trip_service
                    .get_full_trip(&user.id, &self.trip_id),
            )
            .await;
        self.trip.settle("get_full_trip", result)
    }

    pub fn day_cards(&self) -> Vec<DayCard> {
        self.trip
            .data()
            .map(|full| full.days.iter().map(DayCard::from).collect())
            .unwrap_or_default()
    }

    /// Whether the signed-in user owns the trip; only owners see delete
    pub fn is_owner(&self) -> bool {
        match (self.trip(), self.ctx.session.current_user()) {
            (Some(trip), Some(user)) => trip.is_owner(&user.id),
            _ => false,
        }
    }

    pub fn menu_visible(&self) -> bool {
        self.menu_visible
    }

    pub fn open_menu(&mut self) {
        self.menu_visible = true;
    }

    pub fn close_menu(&mut self) {
        self.menu_visible = false;
    }

    fn menu_choice(&mut self, route: TripsRoute) -> NavAction<TripsRoute> {
        self.menu_visible = false;
        NavAction::Navigate(route)
    }

    pub fn edit(&mut self) -> NavAction<TripsRoute> {
        let trip_id = self.trip_id.clone();
        self.menu_choice(TripsRoute::EditTrip { trip_id })
    }

    pub fn share(&mut self) -> NavAction<TripsRoute> {
        let trip_id = self.trip_id.clone();
        self.menu_choice(TripsRoute::ShareTrip { trip_id })
    }

    pub fn manage_collaborators(&mut self) -> NavAction<TripsRoute> {
        let trip_id = self.trip_id.clone();
        self.menu_choice(TripsRoute::ManageCollaborators { trip_id })
    }

    pub fn open_day(&self, day_index: u32) -> NavAction<TripsRoute> {
        NavAction::Navigate(TripsRoute::DayDetails {
            trip_id: self.trip_id.clone(),
            day_index,
        })
    }

    pub fn delete_dialog_visible(&self) -> bool {
        self.delete_dialog_visible
    }

    pub fn request_delete(&mut self) {
        self.menu_visible = false;
        self.delete_dialog_visible = true;
    }

    pub fn cancel_delete(&mut self) {
        self.delete_dialog_visible = false;
    }

    /// Delete the trip and leave the screen
    pub async fn confirm_delete(&mut self) -> Result<NavAction<TripsRoute>> {
        self.delete_dialog_visible = false;
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;

        let result = self
            .lifetime
            .guard(
                self.ctx
                    .services
                    .trip_service
                    .delete_trip(&user.id, &self.trip_id),
            )
            .await;
        self.action.record("delete_trip", &result);
        result?;

        self.action.succeed(None);
        Ok(NavAction::GoBack)
    }

    /// Move the trip to the next lifecycle stage
    pub async fn advance_state(&mut self) -> Result<TripState> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;

        let result = self
            .lifetime
            .guard(
                self.ctx
                    .services
                    .trip_service
                    .advance_state(&user.id, &self.trip_id),
            )
            .await;
        self.action.record("advance_state", &result);
        let trip = result?;

        self.action.succeed(None);
        if let LoadState::Loaded(full) = &mut self.trip {
            full.trip = trip.clone();
        }
        Ok(trip.state)
    }

    /// Re-derive the trip from the store when it changed elsewhere
    pub async fn sync_with_store(&mut self) -> bool {
        let trip_id = self.trip_id.clone();
        if !self.subscription.drain(|e| e.affects_trip(&trip_id)) {
            return false;
        }
        match self.ctx.store.full_trip(&self.trip_id).await {
            Some(full) => self.trip = LoadState::Loaded(full),
            None => {
                debug!(trip_id = %trip_id, "Trip left the store");
                self.trip = LoadState::Error(TripPlannerError::TripNotFound { trip_id }.user_message());
            }
        }
        true
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
