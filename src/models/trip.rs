//! Trip model

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::helpers::format_date_range;

/// Lifecycle stage of a trip. Declaration order is lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripState {
    InCreation,
    WaitingToStart,
    InProgress,
    Completed,
}

impl TripState {
    pub const ALL: [TripState; 4] = [
        TripState::InCreation,
        TripState::WaitingToStart,
        TripState::InProgress,
        TripState::Completed,
    ];

    /// The following stage, `None` once completed
    pub fn next(self) -> Option<TripState> {
        match self {
            TripState::InCreation => Some(TripState::WaitingToStart),
            TripState::WaitingToStart => Some(TripState::InProgress),
            TripState::InProgress => Some(TripState::Completed),
            TripState::Completed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TripState::InCreation => "IN_CREATION",
            TripState::WaitingToStart => "WAITING_TO_START",
            TripState::InProgress => "IN_PROGRESS",
            TripState::Completed => "COMPLETED",
        }
    }

    /// Forward moves (including skips) are allowed, staying put is a no-op,
    /// moving backward is rejected.
    pub fn check_transition(self, target: TripState) -> Result<()> {
        if target < self {
            return Err(TripPlannerError::InvalidStateTransition {
                from: self.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for TripState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub title: String,
    pub destination_region: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub state: TripState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_transportation: Option<String>,
    pub owner_id: String,
    pub collaborators: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Number of calendar days covered, both ends inclusive
    pub fn day_count(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days();
        if days < 0 {
            0
        } else {
            days as u32 + 1
        }
    }

    pub fn contains_day(&self, day_index: u32) -> bool {
        day_index < self.day_count()
    }

    /// Calendar date of the zero-based day offset
    pub fn date_of_day(&self, day_index: u32) -> Option<NaiveDate> {
        if !self.contains_day(day_index) {
            return None;
        }
        self.start_date
            .checked_add_signed(Duration::days(i64::from(day_index)))
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    pub fn is_collaborator(&self, user_id: &str) -> bool {
        self.collaborators.iter().any(|id| id == user_id)
    }

    /// Owner or collaborator
    pub fn is_member(&self, user_id: &str) -> bool {
        self.is_owner(user_id) || self.is_collaborator(user_id)
    }

    /// "Just you" / "You and N others"
    pub fn collaborator_summary(&self) -> String {
        if self.collaborators.is_empty() {
            "Just you".to_string()
        } else {
            format!("You and {} others", self.collaborators.len())
        }
    }

    pub fn date_range_label(&self) -> String {
        format_date_range(self.start_date, self.end_date)
    }

    /// Case-insensitive substring match on title or destination. The query
    /// is taken as typed; only an empty one matches every trip.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.destination_region.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripRequest {
    pub title: String,
    pub destination_region: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<f64>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub general_transportation: Option<String>,
}

impl CreateTripRequest {
    pub fn new(title: &str, destination_region: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            destination_region: destination_region.to_string(),
            start_date,
            end_date,
            budget: None,
            description: None,
            cover_image: None,
            general_transportation: None,
        }
    }
}

/// Replacement values for every user-editable trip field.
/// A `None` optional field clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTripRequest {
    pub title: String,
    pub destination_region: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<f64>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub general_transportation: Option<String>,
}

impl From<&Trip> for UpdateTripRequest {
    fn from(trip: &Trip) -> Self {
        Self {
            title: trip.title.clone(),
            destination_region: trip.destination_region.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            budget: trip.budget,
            description: trip.description.clone(),
            cover_image: trip.cover_image.clone(),
            general_transportation: trip.general_transportation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(start: (i32, u32, u32), end: (i32, u32, u32)) -> Trip {
        let now = Utc::now();
        Trip {
            id: "t1".to_string(),
            title: "Summer in Rome".to_string(),
            destination_region: "Rome, Italy".to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            budget: None,
            description: None,
            cover_image: None,
            state: TripState::InCreation,
            general_transportation: None,
            owner_id: "owner".to_string(),
            collaborators: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_state_order_is_lifecycle_order() {
        assert!(TripState::InCreation < TripState::WaitingToStart);
        assert!(TripState::WaitingToStart < TripState::InProgress);
        assert!(TripState::InProgress < TripState::Completed);
        assert_eq!(TripState::Completed.next(), None);
        assert_eq!(TripState::InCreation.next(), Some(TripState::WaitingToStart));
    }

    #[test]
    fn test_state_rejects_regression() {
        assert!(TripState::InProgress.check_transition(TripState::WaitingToStart).is_err());
        assert!(TripState::InProgress.check_transition(TripState::InProgress).is_ok());
        assert!(TripState::InCreation.check_transition(TripState::Completed).is_ok());
    }

    #[test]
    fn test_state_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&TripState::WaitingToStart).unwrap();
        assert_eq!(json, "\"WAITING_TO_START\"");
        assert_eq!(TripState::InCreation.to_string(), "IN_CREATION");
    }

    #[test]
    fn test_day_count_is_inclusive() {
        let t = trip((2023, 7, 15), (2023, 7, 20));
        assert_eq!(t.day_count(), 6);
        assert_eq!(t.date_of_day(0), NaiveDate::from_ymd_opt(2023, 7, 15));
        assert_eq!(t.date_of_day(5), NaiveDate::from_ymd_opt(2023, 7, 20));
        assert_eq!(t.date_of_day(6), None);

        let single = trip((2023, 7, 15), (2023, 7, 15));
        assert_eq!(single.day_count(), 1);
    }

    #[test]
    fn test_collaborator_summary() {
        let mut t = trip((2023, 7, 15), (2023, 7, 20));
        assert_eq!(t.collaborator_summary(), "Just you");
        t.collaborators = vec!["2".to_string(), "3".to_string()];
        assert_eq!(t.collaborator_summary(), "You and 2 others");
        assert!(t.is_member("2"));
        assert!(t.is_member("owner"));
        assert!(!t.is_member("9"));
    }

    #[test]
    fn test_search_matches_title_or_destination() {
        let mut rome = trip((2023, 7, 15), (2023, 7, 25));
        assert!(rome.matches_search("rom"));
        assert!(rome.matches_search("ITALY"));
        assert!(rome.matches_search(""));
        assert!(rome.matches_search("in rome"));
        assert!(!rome.matches_search("  "));
        assert!(!rome.matches_search("Rome "));
        assert!(!rome.matches_search("barcelona"));

        rome.title = "Barcelona Weekend".to_string();
        rome.destination_region = "Barcelona, Spain".to_string();
        assert!(!rome.matches_search("rom"));
    }

    #[test]
    fn test_trip_serializes_camel_case_and_skips_absent_optionals() {
        let t = trip((2023, 7, 15), (2023, 7, 20));
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["destinationRegion"], "Rome, Italy");
        assert_eq!(value["state"], "IN_CREATION");
        assert!(value.get("budget").is_none());
    }
}
