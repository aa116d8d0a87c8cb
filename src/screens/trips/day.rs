//! Day details screen
//!
//! Activities in start-time order, accommodation options with the selected
//! one marked, and the day's transportation.

use crate::models::{Accommodation, Activity, DailyTransportation, Day, TransportationRequest};
use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{LoadState, ScreenLifetime, StoreSubscription, SubmitState};
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::helpers::{format_long_date, format_time};

pub const NO_ACTIVITIES: &str = "No activities planned for this day yet.";
pub const NO_ACCOMMODATIONS: &str = "No accommodations added for this day yet.";
pub const NO_TRANSPORTATION: &str = "No transportation details added for this day yet.";

/// Counters in the day header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayStats {
    pub activities: usize,
    pub accommodations: usize,
    pub has_transportation: bool,
}

/// "9:00 AM - 12:00 PM", "9:00 AM", or nothing for untimed activities
pub fn activity_time_label(activity: &Activity) -> Option<String> {
    match (activity.start_time, activity.end_time) {
        (Some(start), Some(end)) => Some(format!("{} - {}", format_time(start), format_time(end))),
        (Some(start), None) => Some(format_time(start)),
        _ => None,
    }
}

/// "$150/night" for an accommodation, "$25" for an activity
pub fn price_label(price: Option<f64>, per_night: bool) -> Option<String> {
    price.map(|p| {
        if per_night {
            format!("${}/night", p)
        } else {
            format!("${}", p)
        }
    })
}

#[derive(Debug)]
pub struct DayDetailsScreen {
    ctx: AppContext,
    trip_id: String,
    day_index: u32,
    lifetime: ScreenLifetime,
    subscription: StoreSubscription,
    day: LoadState<Day>,
    pub transport_kind: String,
    pub transport_details: String,
    pub action: SubmitState,
}

impl DayDetailsScreen {
    pub fn new(ctx: AppContext, trip_id: &str, day_index: u32) -> Self {
        let subscription = StoreSubscription::new(&ctx.store);
        Self {
            ctx,
            trip_id: trip_id.to_string(),
            day_index,
            lifetime: ScreenLifetime::new(),
            subscription,
            day: LoadState::Idle,
            transport_kind: String::new(),
            transport_details: String::new(),
            action: SubmitState::default(),
        }
    }

    /// "Day 1" for the first day
    pub fn title(&self) -> String {
        format!("Day {}", self.day_index + 1)
    }

    pub fn date_label(&self) -> Option<String> {
        self.day.data().map(|d| format_long_date(d.date))
    }

    pub fn state(&self) -> &LoadState<Day> {
        &self.day
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    fn fill_transport_fields(&mut self) {
        let transportation = self.day.data().and_then(|d| d.transportation.clone());
        self.transport_kind = transportation.as_ref().map(|t| t.kind.clone()).unwrap_or_default();
        self.transport_details = transportation.and_then(|t| t.details).unwrap_or_default();
    }

    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.day = LoadState::Loading;
        let result = self
            .lifetime
            .guard(
                self.ctx
                    .services
                    .itinerary_service
                    .get_day(&user.id, &self.trip_id, self.day_index),
            )
            .await;
        self.day.settle("get_day", result)?;
        self.fill_transport_fields();
        Ok(())
    }

    pub fn activities(&self) -> Vec<&Activity> {
        self.day.data().map(Day::sorted_activities).unwrap_or_default()
    }

    pub fn accommodations(&self) -> &[Accommodation] {
        self.day.data().map(|d| d.accommodations.as_slice()).unwrap_or(&[])
    }

    pub fn transportation(&self) -> Option<&DailyTransportation> {
        self.day.data().and_then(|d| d.transportation.as_ref())
    }

    pub fn stats(&self) -> DayStats {
        DayStats {
            activities: self.day.data().map_or(0, |d| d.activities.len()),
            accommodations: self.accommodations().len(),
            has_transportation: self.transportation().is_some(),
        }
    }

    pub fn add_activity(&self) -> NavAction<TripsRoute> {
        NavAction::Navigate(TripsRoute::AddActivity {
            trip_id: self.trip_id.clone(),
            day_index: self.day_index,
        })
    }

    pub fn add_accommodation(&self) -> NavAction<TripsRoute> {
        NavAction::Navigate(TripsRoute::AddAccommodation {
            trip_id: self.trip_id.clone(),
            day_index: self.day_index,
        })
    }

    pub fn open_activity(&self, activity_id: &str) -> NavAction<TripsRoute> {
        NavAction::Navigate(TripsRoute::ActivityDetails {
            trip_id: self.trip_id.clone(),
            day_index: self.day_index,
            activity_id: activity_id.to_string(),
        })
    }

    pub fn open_accommodation(&self, accommodation_id: &str) -> NavAction<TripsRoute> {
        NavAction::Navigate(TripsRoute::AccommodationDetails {
            trip_id: self.trip_id.clone(),
            day_index: self.day_index,
            accommodation_id: accommodation_id.to_string(),
        })
    }

    /// Vote for an activity straight from the day list
    pub async fn toggle_vote(&mut self, activity_id: &str) -> Result<Activity> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;
        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.toggle_vote(&user.id, activity_id))
            .await;
        self.action.record("toggle_vote", &result);
        let activity = result?;
        self.action.succeed(None);
        self.sync_with_store().await;
        Ok(activity)
    }

    pub async fn select_accommodation(&mut self, accommodation_id: &str) -> Result<Accommodation> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;
        let result = self
            .lifetime
            .guard(
                self.ctx
                    .services
                    .itinerary_service
                    .select_accommodation(&user.id, accommodation_id),
            )
            .await;
        self.action.record("select_accommodation", &result);
        let accommodation = result?;
        self.action.succeed(None);
        self.sync_with_store().await;
        Ok(accommodation)
    }

    /// Save the transportation fields
    pub async fn save_transportation(&mut self) -> Result<DailyTransportation> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;
        let request = TransportationRequest {
            kind: self.transport_kind.clone(),
            details: Some(self.transport_details.clone()),
        };
        let result = self
            .lifetime
            .guard(self.ctx.services.itinerary_service.set_transportation(
                &user.id,
                &self.trip_id,
                self.day_index,
                request,
            ))
            .await;
        self.action.record("set_transportation", &result);
        let transportation = result?;
        self.action.succeed(None);
        self.sync_with_store().await;
        Ok(transportation)
    }

    pub async fn clear_transportation(&mut self) -> Result<bool> {
        let user = self.ctx.session.require_user()?;
        self.action.begin()?;
        let result = self
            .lifetime
            .guard(
                self.ctx
                    .services
                    .itinerary_service
                    .clear_transportation(&user.id, &self.trip_id, self.day_index),
            )
            .await;
        self.action.record("clear_transportation", &result);
        let removed = result?;
        self.action.succeed(None);
        self.sync_with_store().await;
        Ok(removed)
    }

    /// Re-derive the day from the store when it changed elsewhere
    pub async fn sync_with_store(&mut self) -> bool {
        let (trip_id, day_index) = (self.trip_id.clone(), self.day_index);
        if !self.subscription.drain(|e| e.affects_day(&trip_id, day_index)) {
            return false;
        }
        if let Some(day) = self.ctx.store.day(&self.trip_id, self.day_index).await {
            self.day = LoadState::Loaded(day);
            self.fill_transport_fields();
        }
        true
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_labels() {
        assert_eq!(price_label(Some(150.0), true).as_deref(), Some("$150/night"));
        assert_eq!(price_label(Some(12.5), false).as_deref(), Some("$12.5"));
        assert_eq!(price_label(None, false), None);
    }
}
