//! Trip service implementation
//!
//! Trip CRUD, lifecycle transitions, collaborator management, sharing and
//! profile statistics. Every change is written to the repository first and
//! then mirrored into the [`TripStore`].

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::access::{self, TripPermission, TripRole};
use crate::config::settings::Settings;
use crate::database::{DatabaseService, TripChange};
use crate::models::{CreateTripRequest, FullTrip, Trip, TripState, UpdateTripRequest, User};
use crate::navigation::routes::TripsRoute;
use crate::state::store::TripStore;
use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::helpers::{country_of, format_numeric_date, generate_uuid, normalize_email};
use crate::utils::logging::log_trip_action;
use crate::utils::validation::{validate_date_range, validate_email, validate_required, ValidationError};

/// Checks shared by the create and edit forms
pub fn validate_trip_details(
    title: &str,
    destination_region: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: Option<f64>,
) -> std::result::Result<(), ValidationError> {
    validate_required(title, ValidationError::MissingTitle)?;
    validate_required(destination_region, ValidationError::MissingDestination)?;
    validate_date_range(start_date, end_date)?;
    if let Some(budget) = budget {
        if !budget.is_finite() || budget < 0.0 {
            return Err(ValidationError::InvalidBudget);
        }
    }
    Ok(())
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Text handed to the platform share sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub message: String,
    pub url: String,
}

/// A member of a trip as listed on the collaborators screen
#[derive(Debug, Clone, PartialEq)]
pub struct TripMember {
    pub user: User,
    pub role: TripRole,
}

/// Numbers shown on the profile screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub trips_created: usize,
    pub collaborations: usize,
    pub countries_visited: usize,
}

#[derive(Clone, Debug)]
pub struct TripService {
    db: DatabaseService,
    store: TripStore,
    settings: Settings,
}

impl TripService {
    pub fn new(db: DatabaseService, store: TripStore, settings: Settings) -> Self {
        Self { db, store, settings }
    }

    async fn load_trip(&self, trip_id: &str) -> Result<Trip> {
        self.db
            .trips
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| TripPlannerError::TripNotFound {
                trip_id: trip_id.to_string(),
            })
    }

    /// Re-read the trip with all of its days and put it in the store
    async fn refresh_full_trip(&self, trip_id: &str) -> Result<FullTrip> {
        let full = self
            .db
            .trips
            .find_full_trip(trip_id)
            .await?
            .ok_or_else(|| TripPlannerError::TripNotFound {
                trip_id: trip_id.to_string(),
            })?;
        self.store.put_full_trip(full.clone()).await;
        Ok(full)
    }

    /// Trips the user owns or collaborates on, earliest first
    pub async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>> {
        debug!(user_id = user_id, "Listing trips");
        let trips = self.db.trips.list_for_member(user_id).await?;
        self.store.put_trips(trips.clone()).await;
        Ok(trips)
    }

    pub async fn get_trip(&self, user_id: &str, trip_id: &str) -> Result<Trip> {
        let trip = self.load_trip(trip_id).await?;
        access::require(&trip, user_id, TripPermission::View)?;
        self.store.put_trip(trip.clone()).await;
        Ok(trip)
    }

    pub async fn get_full_trip(&self, user_id: &str, trip_id: &str) -> Result<FullTrip> {
        debug!(user_id = user_id, trip_id = trip_id, "Loading full trip");
        let trip = self.load_trip(trip_id).await?;
        access::require(&trip, user_id, TripPermission::View)?;
        self.refresh_full_trip(trip_id).await
    }

    /// New trips start in creation with no collaborators
    pub async fn create_trip(&self, user_id: &str, request: CreateTripRequest) -> Result<Trip> {
        validate_trip_details(
            &request.title,
            &request.destination_region,
            request.start_date,
            request.end_date,
            request.budget,
        )?;

        let now = Utc::now();
        let trip = Trip {
            id: generate_uuid(),
            title: request.title.trim().to_string(),
            destination_region: request.destination_region.trim().to_string(),
            start_date: request.start_date,
            end_date: request.end_date,
            budget: request.budget,
            description: trim_optional(request.description),
            cover_image: trim_optional(request.cover_image),
            state: TripState::InCreation,
            general_transportation: trim_optional(request.general_transportation),
            owner_id: user_id.to_string(),
            collaborators: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.db.trips.save_trip(&trip).await?;
        self.store.put_trip(trip.clone()).await;
        log_trip_action(&trip.id, "create", user_id, Some(trip.title.as_str()));
        Ok(trip)
    }

    /// Replace the editable fields of a trip. Shortening the date range is
    /// refused while plans exist on the days that would disappear.
    pub async fn update_trip(&self, user_id: &str, trip_id: &str, request: UpdateTripRequest) -> Result<Trip> {
        validate_trip_details(
            &request.title,
            &request.destination_region,
            request.start_date,
            request.end_date,
            request.budget,
        )?;

        let trip = self.load_trip(trip_id).await?;
        access::require(&trip, user_id, TripPermission::Edit)?;

        let edit = UpdateTripRequest {
            title: request.title.trim().to_string(),
            destination_region: request.destination_region.trim().to_string(),
            start_date: request.start_date,
            end_date: request.end_date,
            budget: request.budget,
            description: trim_optional(request.description),
            cover_image: trim_optional(request.cover_image),
            general_transportation: trim_optional(request.general_transportation),
        };
        let trip = self.db.trips.change_trip(trip_id, TripChange::Edit(edit)).await?;
        self.refresh_full_trip(trip_id).await?;
        log_trip_action(trip_id, "update", user_id, None);
        Ok(trip)
    }

    /// Owner only; removes every day's plans and comments too
    pub async fn delete_trip(&self, user_id: &str, trip_id: &str) -> Result<()> {
        let trip = self.load_trip(trip_id).await?;
        access::require(&trip, user_id, TripPermission::Delete)?;

        self.db.trips.delete_trip(trip_id).await?;
        self.store.remove_trip(trip_id).await;
        log_trip_action(trip_id, "delete", user_id, Some(trip.title.as_str()));
        Ok(())
    }

    /// Move the trip forward in its lifecycle. Same state is a no-op,
    /// going back is rejected, and leaving creation needs at most one
    /// selected accommodation per day.
    pub async fn transition_state(&self, user_id: &str, trip_id: &str, target: TripState) -> Result<Trip> {
        let trip = self.load_trip(trip_id).await?;
        access::require(&trip, user_id, TripPermission::Edit)?;

        trip.state.check_transition(target)?;
        if trip.state == target {
            return Ok(trip);
        }

        let from = trip.state;
        let trip = self
            .db
            .trips
            .change_trip(trip_id, TripChange::Transition(target))
            .await?;
        self.store.put_trip(trip.clone()).await;

        info!(
            trip_id = trip_id,
            user_id = user_id,
            from = %from,
            to = %target,
            "Trip state changed"
        );
        Ok(trip)
    }

    /// Step to the next lifecycle state
    pub async fn advance_state(&self, user_id: &str, trip_id: &str) -> Result<Trip> {
        let trip = self.load_trip(trip_id).await?;
        let next = trip.state.next().ok_or_else(|| {
            TripPlannerError::InvalidInput("This trip is already completed".to_string())
        })?;
        self.transition_state(user_id, trip_id, next).await
    }

    /// Owner first, then collaborators in the order they were added
    pub async fn list_members(&self, user_id: &str, trip_id: &str) -> Result<Vec<TripMember>> {
        let trip = self.load_trip(trip_id).await?;
        access::require(&trip, user_id, TripPermission::View)?;

        let mut members = Vec::with_capacity(trip.collaborators.len() + 1);
        if let Some(owner) = self.db.auth.find_by_id(&trip.owner_id).await? {
            members.push(TripMember {
                user: owner,
                role: TripRole::Owner,
            });
        }
        for collaborator_id in &trip.collaborators {
            match self.db.auth.find_by_id(collaborator_id).await? {
                Some(user) => members.push(TripMember {
                    user,
                    role: TripRole::Collaborator,
                }),
                None => warn!(trip_id = trip_id, user_id = %collaborator_id, "Collaborator account missing"),
            }
        }
        Ok(members)
    }

    /// Invite an existing account by email
    pub async fn add_collaborator(&self, user_id: &str, trip_id: &str, email: &str) -> Result<User> {
        validate_email(email)?;
        let trip = self.load_trip(trip_id).await?;
        access::require(&trip, user_id, TripPermission::ManageCollaborators)?;

        let invitee = self
            .db
            .auth
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| TripPlannerError::InvalidInput("No user found with that email".to_string()))?;

        let trip = self
            .db
            .trips
            .change_trip(trip_id, TripChange::AddCollaborator(invitee.id.clone()))
            .await?;
        self.store.put_trip(trip).await;

        log_trip_action(trip_id, "add_collaborator", user_id, Some(invitee.id.as_str()));
        Ok(invitee)
    }

    /// The owner can remove anyone; a collaborator can only leave
    pub async fn remove_collaborator(&self, user_id: &str, trip_id: &str, collaborator_id: &str) -> Result<()> {
        let trip = self.load_trip(trip_id).await?;
        if user_id == collaborator_id {
            access::require(&trip, user_id, TripPermission::View)?;
        } else {
            access::require(&trip, user_id, TripPermission::ManageCollaborators)?;
        }

        let trip = self
            .db
            .trips
            .change_trip(trip_id, TripChange::RemoveCollaborator(collaborator_id.to_string()))
            .await?;

        if user_id == collaborator_id {
            // The trip is no longer visible to the one who left
            self.store.remove_trip(trip_id).await;
        } else {
            self.store.put_trip(trip).await;
        }

        log_trip_action(trip_id, "remove_collaborator", user_id, Some(collaborator_id));
        Ok(())
    }

    /// Message, title and deep link for the share sheet
    pub async fn share_payload(&self, user_id: &str, trip_id: &str) -> Result<SharePayload> {
        let trip = self.load_trip(trip_id).await?;
        access::require(&trip, user_id, TripPermission::View)?;

        let url = TripsRoute::TripDetails {
            trip_id: trip.id.clone(),
        }
        .deep_link(&self.settings.app.deep_link_scheme)?;

        Ok(SharePayload {
            message: format!(
                "Check out my trip to {} from {} to {}!",
                trip.destination_region,
                format_numeric_date(trip.start_date),
                format_numeric_date(trip.end_date)
            ),
            title: trip.title,
            url,
        })
    }

    /// Trips created, collaborations, and distinct countries of completed trips
    pub async fn profile_stats(&self, user_id: &str) -> Result<ProfileStats> {
        let trips = self.db.trips.list_for_member(user_id).await?;

        let trips_created = trips.iter().filter(|t| t.is_owner(user_id)).count();
        let collaborations = trips.iter().filter(|t| t.is_collaborator(user_id)).count();
        let countries: BTreeSet<String> = trips
            .iter()
            .filter(|t| t.state == TripState::Completed)
            .filter_map(|t| country_of(&t.destination_region))
            .map(|c| c.to_lowercase())
            .collect();

        Ok(ProfileStats {
            trips_created,
            collaborations,
            countries_visited: countries.len(),
        })
    }
}
