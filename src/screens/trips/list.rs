//! Trips list screen
//!
//! All trips of the signed-in user, filtered live by a search query.
//! The filter runs on every keystroke against title and destination.

use crate::models::{Trip, TripState};
use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{LoadState, ScreenLifetime, StoreSubscription};
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::helpers::truncate_text;

pub const EMPTY_TITLE: &str = "No Trips Found";
pub const EMPTY_SEARCH_HINT: &str = "Try a different search query";
pub const EMPTY_LIST_HINT: &str = "Create your first trip to get started";

const PREVIEW_CHARS: usize = 80;

/// What a list card shows
#[derive(Debug, Clone, PartialEq)]
pub struct TripCard {
    pub id: String,
    pub title: String,
    pub destination: String,
    pub date_range: String,
    pub state: TripState,
    pub collaborators: String,
    pub cover_image: Option<String>,
    /// First line of the description, shortened for the card
    pub preview: Option<String>,
}

impl From<&Trip> for TripCard {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            title: trip.title.clone(),
            destination: trip.destination_region.clone(),
            date_range: trip.date_range_label(),
            state: trip.state,
            collaborators: trip.collaborator_summary(),
            cover_image: trip.cover_image.clone(),
            preview: trip
                .description
                .as_deref()
                .and_then(|d| d.lines().next())
                .map(|line| truncate_text(line, PREVIEW_CHARS)),
        }
    }
}

/// Trips matching `query`, in their original order
pub fn filter_trips<'a>(trips: &'a [Trip], query: &str) -> Vec<&'a Trip> {
    trips.iter().filter(|t| t.matches_search(query)).collect()
}

#[derive(Debug)]
pub struct TripsListScreen {
    ctx: AppContext,
    lifetime: ScreenLifetime,
    subscription: StoreSubscription,
    trips: LoadState<Vec<Trip>>,
    search_query: String,
}

impl TripsListScreen {
    pub fn new(ctx: AppContext) -> Self {
        let subscription = StoreSubscription::new(&ctx.store);
        Self {
            ctx,
            lifetime: ScreenLifetime::new(),
            subscription,
            trips: LoadState::Idle,
            search_query: String::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        "My Trips"
    }

    pub fn state(&self) -> &LoadState<Vec<Trip>> {
        &self.trips
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.trips = LoadState::Loading;
        let result = self
            .lifetime
            .guard(self.ctx.services.trip_service.list_trips(&user.id))
            .await;
        self.trips.settle("list_trips", result)
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    pub fn visible_trips(&self) -> Vec<&Trip> {
        match self.trips.data() {
            Some(trips) => filter_trips(trips, &self.search_query),
            None => Vec::new(),
        }
    }

    pub fn cards(&self) -> Vec<TripCard> {
        self.visible_trips().into_iter().map(TripCard::from).collect()
    }

    /// Hint under the empty-list title; `None` while there is something to show
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.trips.data().is_none() || !self.visible_trips().is_empty() {
            return None;
        }
        if self.search_query.is_empty() {
            Some(EMPTY_LIST_HINT)
        } else {
            Some(EMPTY_SEARCH_HINT)
        }
    }

    /// Re-derive the list from the store after changes made elsewhere.
    /// Returns whether the list was refreshed.
    pub async fn sync_with_store(&mut self) -> bool {
        if !self.subscription.drain(|_| true) || self.trips.data().is_none() {
            return false;
        }
        let Some(user) = self.ctx.session.current_user() else {
            return false;
        };
        self.trips = LoadState::Loaded(self.ctx.store.trips_for_member(&user.id).await);
        true
    }

    pub fn open_trip(&self, trip_id: &str) -> NavAction<TripsRoute> {
        NavAction::Navigate(TripsRoute::TripDetails {
            trip_id: trip_id.to_string(),
        })
    }

    pub fn create_trip(&self) -> NavAction<TripsRoute> {
        NavAction::Navigate(TripsRoute::CreateTrip)
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn trip(id: &str, title: &str, destination: &str) -> Trip {
        let now = Utc::now();
        Trip {
            id: id.to_string(),
            title: title.to_string(),
            destination_region: destination.to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 7, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 7, 25).unwrap(),
            budget: None,
            description: None,
            cover_image: None,
            state: TripState::InCreation,
            general_transportation: None,
            owner_id: "u1".to_string(),
            collaborators: vec!["u2".to_string(), "u3".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_filter_matches_title_case_insensitively() {
        let trips = vec![
            trip("1", "Summer in Rome", "Rome, Italy"),
            trip("2", "Barcelona Weekend", "Barcelona, Spain"),
        ];
        let found = filter_trips(&trips, "rom");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");

        assert_eq!(filter_trips(&trips, "SPAIN").len(), 1);
        assert_eq!(filter_trips(&trips, "").len(), 2);
        assert!(filter_trips(&trips, " ").is_empty());
        assert!(filter_trips(&trips, "tokyo").is_empty());
    }

    #[test]
    fn test_card_fields() {
        let card = TripCard::from(&trip("1", "Summer in Rome", "Rome, Italy"));
        assert_eq!(card.date_range, "7/15/2023 - 7/25/2023");
        assert_eq!(card.collaborators, "You and 2 others");
        assert_eq!(card.preview, None);
    }

    #[test]
    fn test_card_preview_uses_first_line() {
        let mut long = trip("1", "Summer in Rome", "Rome, Italy");
        long.description = Some(format!("{}\nsecond line", "x".repeat(100)));
        let preview = TripCard::from(&long).preview.unwrap();
        assert_eq!(preview.chars().count(), 80);
        assert!(preview.ends_with("..."));
    }
}
