//! Normalized entity tables
//!
//! Trips and their itinerary items indexed by id. Used both by the in-memory
//! backend and by the client-side [`TripStore`](crate::state::TripStore).
//! Days are never stored; they are assembled from the trip's date range.

use std::collections::HashMap;

use chrono::Utc;
use tracing::warn;

use crate::models::{
    Accommodation, Activity, Comment, DailyTransportation, Day, FullTrip, Trip, TripState, UpdateTripRequest,
};
use crate::utils::errors::{Result, TripPlannerError};

/// A change to a stored trip, checked against the current record and
/// applied in one step
#[derive(Debug, Clone)]
pub enum TripChange {
    /// Replace the editable fields. Refused when plans exist on days the
    /// new range drops.
    Edit(UpdateTripRequest),
    /// Move forward in the lifecycle. Leaving creation needs at most one
    /// selected accommodation per day.
    Transition(TripState),
    AddCollaborator(String),
    RemoveCollaborator(String),
}

#[derive(Debug, Default, Clone)]
pub struct TripTables {
    trips: HashMap<String, Trip>,
    activities: HashMap<String, Activity>,
    accommodations: HashMap<String, Accommodation>,
    transportation: HashMap<(String, u32), DailyTransportation>,
    comments: HashMap<String, Comment>,
}

impl TripTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self, trip_id: &str) -> Option<&Trip> {
        self.trips.get(trip_id)
    }

    /// Trips the user owns or collaborates on, earliest start first
    pub fn trips_for_member(&self, user_id: &str) -> Vec<Trip> {
        let mut trips: Vec<Trip> = self
            .trips
            .values()
            .filter(|t| t.is_member(user_id))
            .cloned()
            .collect();
        trips.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
        trips
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn upsert_trip(&mut self, trip: Trip) {
        self.trips.insert(trip.id.clone(), trip);
    }

    /// Remove a trip and everything scheduled on its days
    pub fn remove_trip(&mut self, trip_id: &str) -> Option<Trip> {
        let removed = self.trips.remove(trip_id)?;
        self.remove_items_of_trip(trip_id);
        Some(removed)
    }

    fn remove_items_of_trip(&mut self, trip_id: &str) {
        self.activities.retain(|_, a| a.trip_id != trip_id);
        self.accommodations.retain(|_, a| a.trip_id != trip_id);
        self.transportation.retain(|(t, _), _| t != trip_id);
        self.comments.retain(|_, c| c.trip_id != trip_id);
    }

    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities.get(activity_id)
    }

    pub fn upsert_activity(&mut self, activity: Activity) {
        self.activities.insert(activity.id.clone(), activity);
    }

    /// Remove an activity together with its comments
    pub fn remove_activity(&mut self, activity_id: &str) -> Option<Activity> {
        let removed = self.activities.remove(activity_id)?;
        self.comments.retain(|_, c| c.entity_id != activity_id);
        Some(removed)
    }

    pub fn accommodation(&self, accommodation_id: &str) -> Option<&Accommodation> {
        self.accommodations.get(accommodation_id)
    }

    pub fn upsert_accommodation(&mut self, accommodation: Accommodation) {
        self.accommodations
            .insert(accommodation.id.clone(), accommodation);
    }

    /// Remove an accommodation together with its comments
    pub fn remove_accommodation(&mut self, accommodation_id: &str) -> Option<Accommodation> {
        let removed = self.accommodations.remove(accommodation_id)?;
        self.comments.retain(|_, c| c.entity_id != accommodation_id);
        Some(removed)
    }

    pub fn transportation(&self, trip_id: &str, day_index: u32) -> Option<&DailyTransportation> {
        self.transportation.get(&(trip_id.to_string(), day_index))
    }

    /// At most one per day: replaces whatever was set before
    pub fn upsert_transportation(&mut self, transportation: DailyTransportation) {
        let key = (transportation.trip_id.clone(), transportation.day_index);
        self.transportation.insert(key, transportation);
    }

    pub fn remove_transportation(&mut self, trip_id: &str, day_index: u32) -> Option<DailyTransportation> {
        self.transportation.remove(&(trip_id.to_string(), day_index))
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.get(comment_id)
    }

    pub fn upsert_comment(&mut self, comment: Comment) {
        self.comments.insert(comment.id.clone(), comment);
    }

    pub fn remove_comment(&mut self, comment_id: &str) -> Option<Comment> {
        self.comments.remove(comment_id)
    }

    /// Comments on one activity or accommodation, oldest first
    pub fn comments_for(&self, entity_id: &str) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .values()
            .filter(|c| c.entity_id == entity_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        comments
    }

    fn comments_for_trip(&self, trip_id: &str) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .values()
            .filter(|c| c.trip_id == trip_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        comments
    }

    /// Assemble one day of a trip; `None` when the trip is unknown or the
    /// index is outside its date range
    pub fn day(&self, trip_id: &str, day_index: u32) -> Option<Day> {
        let trip = self.trips.get(trip_id)?;
        let date = trip.date_of_day(day_index)?;

        let mut activities: Vec<Activity> = self
            .activities
            .values()
            .filter(|a| a.trip_id == trip_id && a.day_index == day_index)
            .cloned()
            .collect();
        activities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut accommodations: Vec<Accommodation> = self
            .accommodations
            .values()
            .filter(|a| a.trip_id == trip_id && a.day_index == day_index)
            .cloned()
            .collect();
        accommodations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Some(Day {
            index: day_index,
            date,
            accommodations,
            activities,
            transportation: self.transportation(trip_id, day_index).cloned(),
        })
    }

    pub fn full_trip(&self, trip_id: &str) -> Option<FullTrip> {
        let trip = self.trips.get(trip_id)?.clone();
        let days = (0..trip.day_count())
            .filter_map(|index| self.day(trip_id, index))
            .collect();
        Some(FullTrip {
            comments: self.comments_for_trip(trip_id),
            trip,
            days,
        })
    }

    /// Replace everything known about one trip with a freshly fetched copy
    pub fn replace_full_trip(&mut self, full: FullTrip) {
        let trip_id = full.trip.id.clone();
        self.remove_items_of_trip(&trip_id);
        for day in full.days {
            for activity in day.activities {
                self.upsert_activity(activity);
            }
            for accommodation in day.accommodations {
                self.upsert_accommodation(accommodation);
            }
            if let Some(transportation) = day.transportation {
                self.upsert_transportation(transportation);
            }
        }
        for comment in full.comments {
            self.upsert_comment(comment);
        }
        self.upsert_trip(full.trip);
    }

    /// Replace everything scheduled on one day with a freshly fetched copy
    pub fn replace_day(&mut self, trip_id: &str, day: Day) {
        let index = day.index;
        self.activities
            .retain(|_, a| !(a.trip_id == trip_id && a.day_index == index));
        self.accommodations
            .retain(|_, a| !(a.trip_id == trip_id && a.day_index == index));
        self.transportation.remove(&(trip_id.to_string(), index));

        for activity in day.activities {
            self.upsert_activity(activity);
        }
        for accommodation in day.accommodations {
            self.upsert_accommodation(accommodation);
        }
        if let Some(transportation) = day.transportation {
            self.upsert_transportation(transportation);
        }
    }

    /// Whether any item of the trip is scheduled at or after `day_count`
    pub fn has_items_beyond(&self, trip_id: &str, day_count: u32) -> bool {
        self.activities
            .values()
            .any(|a| a.trip_id == trip_id && a.day_index >= day_count)
            || self
                .accommodations
                .values()
                .any(|a| a.trip_id == trip_id && a.day_index >= day_count)
            || self
                .transportation
                .keys()
                .any(|(t, day)| t == trip_id && *day >= day_count)
    }

    /// First day that has more than one selected accommodation
    pub fn first_selection_conflict(&self, trip_id: &str) -> Option<u32> {
        let mut selected_per_day: HashMap<u32, usize> = HashMap::new();
        for accommodation in self.accommodations.values() {
            if accommodation.trip_id == trip_id && accommodation.is_selected {
                *selected_per_day.entry(accommodation.day_index).or_default() += 1;
            }
        }
        selected_per_day
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(day, _)| day)
            .min()
    }

    fn require_day(&self, trip_id: &str, day_index: u32) -> Result<()> {
        let trip = self.trips.get(trip_id).ok_or_else(|| TripPlannerError::TripNotFound {
            trip_id: trip_id.to_string(),
        })?;
        if !trip.contains_day(day_index) {
            return Err(TripPlannerError::DayOutOfRange {
                trip_id: trip_id.to_string(),
                day_index,
            });
        }
        Ok(())
    }

    /// Apply `change` to the stored trip. Nothing is written when a check fails.
    pub fn change_trip(&mut self, trip_id: &str, change: TripChange) -> Result<Trip> {
        let mut trip = self
            .trips
            .get(trip_id)
            .cloned()
            .ok_or_else(|| TripPlannerError::TripNotFound {
                trip_id: trip_id.to_string(),
            })?;

        match change {
            TripChange::Edit(edit) => {
                trip.title = edit.title;
                trip.destination_region = edit.destination_region;
                trip.start_date = edit.start_date;
                trip.end_date = edit.end_date;
                trip.budget = edit.budget;
                trip.description = edit.description;
                trip.cover_image = edit.cover_image;
                trip.general_transportation = edit.general_transportation;
                if self.has_items_beyond(trip_id, trip.day_count()) {
                    warn!(trip_id = trip_id, "Refusing to drop days that still have plans");
                    return Err(TripPlannerError::InvalidInput(
                        "Remove the plans on the dropped days before shortening the trip".to_string(),
                    ));
                }
            }
            TripChange::Transition(target) => {
                trip.state.check_transition(target)?;
                if trip.state == target {
                    return Ok(trip);
                }
                if trip.state == TripState::InCreation {
                    if let Some(day_index) = self.first_selection_conflict(trip_id) {
                        warn!(trip_id = trip_id, day_index = day_index, "Selection conflict blocks transition");
                        return Err(TripPlannerError::SelectionConflict { day_index });
                    }
                }
                trip.state = target;
            }
            TripChange::AddCollaborator(user_id) => {
                if trip.is_owner(&user_id) {
                    return Err(TripPlannerError::InvalidInput(
                        "The trip owner is already a member".to_string(),
                    ));
                }
                if trip.is_collaborator(&user_id) {
                    return Err(TripPlannerError::Duplicate("This collaborator".to_string()));
                }
                trip.collaborators.push(user_id);
            }
            TripChange::RemoveCollaborator(user_id) => {
                if !trip.is_collaborator(&user_id) {
                    return Err(TripPlannerError::UserNotFound { user_id });
                }
                trip.collaborators.retain(|id| *id != user_id);
            }
        }

        trip.updated_at = Utc::now();
        self.upsert_trip(trip.clone());
        Ok(trip)
    }

    /// Store an activity on a day inside its trip's date range
    pub fn schedule_activity(&mut self, activity: Activity) -> Result<()> {
        self.require_day(&activity.trip_id, activity.day_index)?;
        self.upsert_activity(activity);
        Ok(())
    }

    /// Store an accommodation on a day inside its trip's date range. An
    /// existing record keeps its selection flag; only
    /// [`select_accommodation`](Self::select_accommodation) and
    /// [`deselect_accommodation`](Self::deselect_accommodation) change it.
    pub fn schedule_accommodation(&mut self, mut accommodation: Accommodation) -> Result<Accommodation> {
        self.require_day(&accommodation.trip_id, accommodation.day_index)?;
        if let Some(stored) = self.accommodations.get(&accommodation.id) {
            accommodation.is_selected = stored.is_selected;
        }
        self.upsert_accommodation(accommodation.clone());
        Ok(accommodation)
    }

    pub fn schedule_transportation(&mut self, transportation: DailyTransportation) -> Result<()> {
        self.require_day(&transportation.trip_id, transportation.day_index)?;
        self.upsert_transportation(transportation);
        Ok(())
    }

    /// Mark an accommodation as booked. Once the trip has left creation the
    /// other options of that day are deselected; they are returned after the
    /// selected one.
    pub fn select_accommodation(&mut self, accommodation_id: &str) -> Result<(Accommodation, Vec<Accommodation>)> {
        let mut selected = self
            .accommodations
            .get(accommodation_id)
            .cloned()
            .ok_or_else(|| TripPlannerError::AccommodationNotFound {
                accommodation_id: accommodation_id.to_string(),
            })?;
        let state = self
            .trips
            .get(&selected.trip_id)
            .map(|t| t.state)
            .ok_or_else(|| TripPlannerError::TripNotFound {
                trip_id: selected.trip_id.clone(),
            })?;

        let now = Utc::now();
        let mut displaced = Vec::new();
        if state != TripState::InCreation {
            for other in self.accommodations.values_mut() {
                if other.trip_id == selected.trip_id
                    && other.day_index == selected.day_index
                    && other.id != selected.id
                    && other.is_selected
                {
                    other.is_selected = false;
                    other.updated_at = now;
                    displaced.push(other.clone());
                }
            }
        }

        selected.is_selected = true;
        selected.updated_at = now;
        self.upsert_accommodation(selected.clone());
        Ok((selected, displaced))
    }

    pub fn deselect_accommodation(&mut self, accommodation_id: &str) -> Result<Accommodation> {
        let accommodation = self
            .accommodations
            .get_mut(accommodation_id)
            .ok_or_else(|| TripPlannerError::AccommodationNotFound {
                accommodation_id: accommodation_id.to_string(),
            })?;
        accommodation.is_selected = false;
        accommodation.updated_at = Utc::now();
        Ok(accommodation.clone())
    }

    pub fn clear(&mut self) {
        self.trips.clear();
        self.activities.clear();
        self.accommodations.clear();
        self.transportation.clear();
        self.comments.clear();
    }
}
