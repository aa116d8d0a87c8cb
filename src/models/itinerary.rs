//! Itinerary models: everything scheduled on a day of a trip

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::comment::Comment;
use super::trip::Trip;

/// Embedded geographic position, no identity of its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
            name: None,
        }
    }

    /// Best human-readable label: name, then address, then coordinates
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.address.clone())
            .unwrap_or_else(|| format!("{:.4}, {:.4}", self.latitude, self.longitude))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub trip_id: String,
    pub day_index: u32,
    pub name: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    /// Users who voted for this activity; membership is what counts
    pub votes: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    pub fn has_vote_from(&self, user_id: &str) -> bool {
        self.votes.contains(user_id)
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub id: String,
    pub trip_id: String,
    pub day_index: u32,
    pub name: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    pub is_selected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTransportation {
    pub id: String,
    pub trip_id: String,
    pub day_index: u32,
    /// Free-form mode, e.g. "car", "train", "Public Transportation"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One calendar day of a trip, assembled on demand from the trip's range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub index: u32,
    pub date: NaiveDate,
    pub accommodations: Vec<Accommodation>,
    pub activities: Vec<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation: Option<DailyTransportation>,
}

impl Day {
    /// "Day 1" for index 0
    pub fn label(&self) -> String {
        format!("Day {}", self.index + 1)
    }

    pub fn selected_accommodations(&self) -> impl Iterator<Item = &Accommodation> {
        self.accommodations.iter().filter(|a| a.is_selected)
    }

    pub fn has_selected_accommodation(&self) -> bool {
        self.selected_accommodations().next().is_some()
    }

    /// Activities ordered by start time; untimed activities keep their
    /// relative order after the timed ones.
    pub fn sorted_activities(&self) -> Vec<&Activity> {
        let mut activities: Vec<&Activity> = self.activities.iter().collect();
        activities.sort_by_key(|a| (a.start_time.is_none(), a.start_time));
        activities
    }
}

/// A trip together with all of its days and comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullTrip {
    #[serde(flatten)]
    pub trip: Trip,
    pub days: Vec<Day>,
    pub comments: Vec<Comment>,
}

impl FullTrip {
    pub fn day(&self, index: u32) -> Option<&Day> {
        self.days.iter().find(|d| d.index == index)
    }
}

/// Fields a user fills in when adding or editing an activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRequest {
    pub name: String,
    pub location: Location,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub url: Option<String>,
    pub photos: Option<Vec<String>>,
}

/// Fields a user fills in when adding or editing an accommodation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccommodationRequest {
    pub name: String,
    pub location: Location,
    pub price: Option<f64>,
    pub url: Option<String>,
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportationRequest {
    pub kind: String,
    pub details: Option<String>,
}
