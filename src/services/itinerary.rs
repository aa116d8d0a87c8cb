//! Itinerary service implementation
//!
//! Everything scheduled on a day of a trip: activities and their votes,
//! accommodations and which one is booked, daily transportation, and the
//! comments attached to activities and accommodations.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{debug, info};

use super::access::{self, TripAccess, TripPermission};
use crate::database::DatabaseService;
use crate::models::{
    Accommodation, AccommodationRequest, Activity, ActivityRequest, Comment, CommentTarget,
    CreateCommentRequest, DailyTransportation, Day, Location, TransportationRequest, Trip,
};
use crate::state::store::TripStore;
use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::helpers::generate_uuid;
use crate::utils::logging::log_trip_action;
use crate::utils::validation::{
    parse_optional_url, validate_coordinates, validate_required, validate_time_range, ValidationError,
};

fn validate_price(price: Option<f64>) -> std::result::Result<(), ValidationError> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(ValidationError::InvalidPrice),
        _ => Ok(()),
    }
}

fn validate_location(location: &Location) -> std::result::Result<(), ValidationError> {
    validate_coordinates(location.latitude, location.longitude)
}

fn normalize_url(url: Option<String>) -> std::result::Result<Option<String>, ValidationError> {
    match url {
        Some(url) => parse_optional_url(&url),
        None => Ok(None),
    }
}

/// Checks for the add/edit activity form; returns the normalized link
pub fn validate_activity(request: &ActivityRequest) -> std::result::Result<Option<String>, ValidationError> {
    validate_required(&request.name, ValidationError::MissingItemName)?;
    validate_location(&request.location)?;
    validate_time_range(request.start_time, request.end_time)?;
    validate_price(request.price)?;
    normalize_url(request.url.clone())
}

/// Checks for the add/edit accommodation form; returns the normalized link
pub fn validate_accommodation(
    request: &AccommodationRequest,
) -> std::result::Result<Option<String>, ValidationError> {
    validate_required(&request.name, ValidationError::MissingItemName)?;
    validate_location(&request.location)?;
    validate_price(request.price)?;
    normalize_url(request.url.clone())
}

#[derive(Clone, Debug)]
pub struct ItineraryService {
    db: DatabaseService,
    store: TripStore,
}

impl ItineraryService {
    pub fn new(db: DatabaseService, store: TripStore) -> Self {
        Self { db, store }
    }

    async fn authorize(&self, user_id: &str, trip_id: &str, permission: TripPermission) -> Result<(Trip, TripAccess)> {
        let trip = self
            .db
            .trips
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| TripPlannerError::TripNotFound {
                trip_id: trip_id.to_string(),
            })?;
        let access = access::require(&trip, user_id, permission)?;
        Ok((trip, access))
    }

    fn ensure_day(trip: &Trip, day_index: u32) -> Result<()> {
        if !trip.contains_day(day_index) {
            return Err(TripPlannerError::DayOutOfRange {
                trip_id: trip.id.clone(),
                day_index,
            });
        }
        Ok(())
    }

    async fn load_activity(&self, activity_id: &str) -> Result<Activity> {
        self.db
            .trips
            .find_activity(activity_id)
            .await?
            .ok_or_else(|| TripPlannerError::ActivityNotFound {
                activity_id: activity_id.to_string(),
            })
    }

    async fn load_accommodation(&self, accommodation_id: &str) -> Result<Accommodation> {
        self.db
            .trips
            .find_accommodation(accommodation_id)
            .await?
            .ok_or_else(|| TripPlannerError::AccommodationNotFound {
                accommodation_id: accommodation_id.to_string(),
            })
    }

    /// One day of a trip with everything planned on it
    pub async fn get_day(&self, user_id: &str, trip_id: &str, day_index: u32) -> Result<Day> {
        let (trip, _) = self.authorize(user_id, trip_id, TripPermission::View).await?;
        Self::ensure_day(&trip, day_index)?;

        let day = self
            .db
            .trips
            .find_day(trip_id, day_index)
            .await?
            .ok_or_else(|| TripPlannerError::DayOutOfRange {
                trip_id: trip_id.to_string(),
                day_index,
            })?;
        self.store.put_trip(trip).await;
        self.store.put_day(trip_id, day.clone()).await;
        Ok(day)
    }

    pub async fn get_activity(&self, user_id: &str, activity_id: &str) -> Result<Activity> {
        let activity = self.load_activity(activity_id).await?;
        self.authorize(user_id, &activity.trip_id, TripPermission::View).await?;
        self.store.put_activity(activity.clone()).await;
        Ok(activity)
    }

    pub async fn add_activity(
        &self,
        user_id: &str,
        trip_id: &str,
        day_index: u32,
        request: ActivityRequest,
    ) -> Result<Activity> {
        let url = validate_activity(&request)?;
        let (trip, _) = self.authorize(user_id, trip_id, TripPermission::Edit).await?;
        Self::ensure_day(&trip, day_index)?;

        let now = Utc::now();
        let activity = Activity {
            id: generate_uuid(),
            trip_id: trip_id.to_string(),
            day_index,
            name: request.name.trim().to_string(),
            location: request.location,
            start_time: request.start_time,
            end_time: request.end_time,
            price: request.price,
            url,
            photos: request.photos,
            votes: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        };

        self.db.trips.save_activity(&activity).await?;
        self.store.put_activity(activity.clone()).await;
        log_trip_action(trip_id, "add_activity", user_id, Some(activity.name.as_str()));
        Ok(activity)
    }

    /// Replace the editable fields; votes are kept
    pub async fn update_activity(&self, user_id: &str, activity_id: &str, request: ActivityRequest) -> Result<Activity> {
        let url = validate_activity(&request)?;
        let mut activity = self.load_activity(activity_id).await?;
        self.authorize(user_id, &activity.trip_id, TripPermission::Edit).await?;

        activity.name = request.name.trim().to_string();
        activity.location = request.location;
        activity.start_time = request.start_time;
        activity.end_time = request.end_time;
        activity.price = request.price;
        activity.url = url;
        activity.photos = request.photos;
        activity.updated_at = Utc::now();

        self.db.trips.save_activity(&activity).await?;
        self.store.put_activity(activity.clone()).await;
        Ok(activity)
    }

    /// Removes the activity and its comments
    pub async fn delete_activity(&self, user_id: &str, activity_id: &str) -> Result<()> {
        let activity = self.load_activity(activity_id).await?;
        self.authorize(user_id, &activity.trip_id, TripPermission::Edit).await?;

        self.db.trips.delete_activity(activity_id).await?;
        self.store.remove_activity(activity_id).await;
        log_trip_action(&activity.trip_id, "delete_activity", user_id, Some(activity.name.as_str()));
        Ok(())
    }

    /// Add the user's vote, or take it back if already cast
    pub async fn toggle_vote(&self, user_id: &str, activity_id: &str) -> Result<Activity> {
        let mut activity = self.load_activity(activity_id).await?;
        self.authorize(user_id, &activity.trip_id, TripPermission::Vote).await?;

        let voted = if activity.votes.remove(user_id) {
            false
        } else {
            activity.votes.insert(user_id.to_string());
            true
        };
        activity.updated_at = Utc::now();

        self.db.trips.save_activity(&activity).await?;
        self.store.put_activity(activity.clone()).await;
        debug!(activity_id = activity_id, user_id = user_id, voted = voted, "Vote toggled");
        Ok(activity)
    }

    pub async fn get_accommodation(&self, user_id: &str, accommodation_id: &str) -> Result<Accommodation> {
        let accommodation = self.load_accommodation(accommodation_id).await?;
        self.authorize(user_id, &accommodation.trip_id, TripPermission::View)
            .await?;
        self.store
            .put_accommodations(vec![accommodation.clone()])
            .await;
        Ok(accommodation)
    }

    /// New options are never selected
    pub async fn add_accommodation(
        &self,
        user_id: &str,
        trip_id: &str,
        day_index: u32,
        request: AccommodationRequest,
    ) -> Result<Accommodation> {
        let url = validate_accommodation(&request)?;
        let (trip, _) = self.authorize(user_id, trip_id, TripPermission::Edit).await?;
        Self::ensure_day(&trip, day_index)?;

        let now = Utc::now();
        let accommodation = Accommodation {
            id: generate_uuid(),
            trip_id: trip_id.to_string(),
            day_index,
            name: request.name.trim().to_string(),
            location: request.location,
            price: request.price,
            url,
            photos: request.photos,
            is_selected: false,
            created_at: now,
            updated_at: now,
        };

        let accommodation = self.db.trips.save_accommodation(&accommodation).await?;
        self.store
            .put_accommodations(vec![accommodation.clone()])
            .await;
        log_trip_action(trip_id, "add_accommodation", user_id, Some(accommodation.name.as_str()));
        Ok(accommodation)
    }

    /// Replace the editable fields; the selection flag is kept
    pub async fn update_accommodation(
        &self,
        user_id: &str,
        accommodation_id: &str,
        request: AccommodationRequest,
    ) -> Result<Accommodation> {
        let url = validate_accommodation(&request)?;
        let mut accommodation = self.load_accommodation(accommodation_id).await?;
        self.authorize(user_id, &accommodation.trip_id, TripPermission::Edit)
            .await?;

        accommodation.name = request.name.trim().to_string();
        accommodation.location = request.location;
        accommodation.price = request.price;
        accommodation.url = url;
        accommodation.photos = request.photos;
        accommodation.updated_at = Utc::now();

        let accommodation = self.db.trips.save_accommodation(&accommodation).await?;
        self.store
            .put_accommodations(vec![accommodation.clone()])
            .await;
        Ok(accommodation)
    }

    pub async fn delete_accommodation(&self, user_id: &str, accommodation_id: &str) -> Result<()> {
        let accommodation = self.load_accommodation(accommodation_id).await?;
        self.authorize(user_id, &accommodation.trip_id, TripPermission::Edit)
            .await?;

        self.db.trips.delete_accommodation(accommodation_id).await?;
        self.store.remove_accommodation(accommodation_id).await;
        log_trip_action(
            &accommodation.trip_id,
            "delete_accommodation",
            user_id,
            Some(accommodation.name.as_str()),
        );
        Ok(())
    }

    /// Mark an accommodation as booked. While the trip is being created,
    /// several options per day may be shortlisted; afterwards selecting one
    /// deselects the rest of that day.
    pub async fn select_accommodation(&self, user_id: &str, accommodation_id: &str) -> Result<Accommodation> {
        let accommodation = self.load_accommodation(accommodation_id).await?;
        self.authorize(user_id, &accommodation.trip_id, TripPermission::Edit)
            .await?;

        let (selected, mut changed) = self.db.trips.select_accommodation(accommodation_id).await?;
        changed.push(selected.clone());
        self.store.put_accommodations(changed).await;

        info!(
            trip_id = %selected.trip_id,
            day_index = selected.day_index,
            accommodation_id = accommodation_id,
            "Accommodation selected"
        );
        Ok(selected)
    }

    pub async fn deselect_accommodation(&self, user_id: &str, accommodation_id: &str) -> Result<Accommodation> {
        let accommodation = self.load_accommodation(accommodation_id).await?;
        self.authorize(user_id, &accommodation.trip_id, TripPermission::Edit)
            .await?;

        let accommodation = self.db.trips.deselect_accommodation(accommodation_id).await?;
        self.store
            .put_accommodations(vec![accommodation.clone()])
            .await;
        Ok(accommodation)
    }

    /// Set or replace the day's transportation
    pub async fn set_transportation(
        &self,
        user_id: &str,
        trip_id: &str,
        day_index: u32,
        request: TransportationRequest,
    ) -> Result<DailyTransportation> {
        validate_required(&request.kind, ValidationError::MissingTransportationType)?;
        let (trip, _) = self.authorize(user_id, trip_id, TripPermission::Edit).await?;
        Self::ensure_day(&trip, day_index)?;

        let existing = self
            .db
            .trips
            .find_day(trip_id, day_index)
            .await?
            .and_then(|d| d.transportation);
        let now = Utc::now();
        let transportation = DailyTransportation {
            id: existing
                .as_ref()
                .map(|t| t.id.clone())
                .unwrap_or_else(generate_uuid),
            trip_id: trip_id.to_string(),
            day_index,
            kind: request.kind.trim().to_string(),
            details: request
                .details
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_at: existing.map(|t| t.created_at).unwrap_or(now),
            updated_at: now,
        };

        self.db.trips.save_transportation(&transportation).await?;
        self.store.put_transportation(transportation.clone()).await;
        Ok(transportation)
    }

    /// Returns whether anything was removed
    pub async fn clear_transportation(&self, user_id: &str, trip_id: &str, day_index: u32) -> Result<bool> {
        let (trip, _) = self.authorize(user_id, trip_id, TripPermission::Edit).await?;
        Self::ensure_day(&trip, day_index)?;

        let removed = self.db.trips.delete_transportation(trip_id, day_index).await?;
        if removed {
            self.store.remove_transportation(trip_id, day_index).await;
        }
        Ok(removed)
    }

    /// Comments on an activity or accommodation, oldest first
    pub async fn list_comments(&self, user_id: &str, trip_id: &str, entity_id: &str) -> Result<Vec<Comment>> {
        self.authorize(user_id, trip_id, TripPermission::View).await?;
        let full = self
            .db
            .trips
            .find_full_trip(trip_id)
            .await?
            .ok_or_else(|| TripPlannerError::TripNotFound {
                trip_id: trip_id.to_string(),
            })?;

        let comments: Vec<Comment> = full
            .comments
            .into_iter()
            .filter(|c| c.entity_id == entity_id)
            .collect();
        for comment in &comments {
            self.store.put_comment(comment.clone()).await;
        }
        Ok(comments)
    }

    pub async fn add_comment(&self, user_id: &str, trip_id: &str, request: CreateCommentRequest) -> Result<Comment> {
        validate_required(&request.text, ValidationError::EmptyComment)?;
        self.authorize(user_id, trip_id, TripPermission::Comment).await?;

        let belongs_to_trip = match request.entity_type {
            CommentTarget::Activity => self
                .load_activity(&request.entity_id)
                .await?
                .trip_id
                == trip_id,
            CommentTarget::Accommodation => self
                .load_accommodation(&request.entity_id)
                .await?
                .trip_id
                == trip_id,
        };
        if !belongs_to_trip {
            return Err(TripPlannerError::InvalidInput(format!(
                "This {} belongs to another trip",
                request.entity_type
            )));
        }

        let now = Utc::now();
        let comment = Comment {
            id: generate_uuid(),
            trip_id: trip_id.to_string(),
            entity_id: request.entity_id,
            entity_type: request.entity_type,
            text: request.text.trim().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.db.trips.save_comment(&comment).await?;
        self.store.put_comment(comment.clone()).await;
        debug!(trip_id = trip_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    /// The author or the trip owner may delete a comment
    pub async fn delete_comment(&self, user_id: &str, comment_id: &str) -> Result<()> {
        let comment = self
            .db
            .trips
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| TripPlannerError::CommentNotFound {
                comment_id: comment_id.to_string(),
            })?;
        let (_, access) = self
            .authorize(user_id, &comment.trip_id, TripPermission::Comment)
            .await?;

        if comment.user_id != user_id && !access.is_owner() {
            return Err(TripPlannerError::PermissionDenied(format!(
                "User {} cannot delete comment {}",
                user_id, comment_id
            )));
        }

        self.db.trips.delete_comment(comment_id).await?;
        self.store.remove_comment(comment_id).await;
        Ok(())
    }
}
