//! Trip access control
//!
//! Owners can do everything. Collaborators can view, edit the itinerary, vote
//! and comment, but cannot delete the trip or change who it is shared with
//! (apart from leaving it themselves).

use std::collections::HashSet;

use crate::models::Trip;
use crate::utils::errors::{Result, TripPlannerError};

/// Operations that need a membership check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripPermission {
    View,
    Edit,
    Vote,
    Comment,
    ManageCollaborators,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripRole {
    Owner,
    Collaborator,
}

/// A user's standing on one trip
#[derive(Debug, Clone)]
pub struct TripAccess {
    pub user_id: String,
    pub trip_id: String,
    pub role: TripRole,
    pub permissions: HashSet<TripPermission>,
}

impl TripAccess {
    /// `None` when the user is not a member of the trip
    pub fn resolve(trip: &Trip, user_id: &str) -> Option<Self> {
        let role = if trip.is_owner(user_id) {
            TripRole::Owner
        } else if trip.is_collaborator(user_id) {
            TripRole::Collaborator
        } else {
            return None;
        };

        let mut permissions: HashSet<TripPermission> = [
            TripPermission::View,
            TripPermission::Edit,
            TripPermission::Vote,
            TripPermission::Comment,
        ]
        .into_iter()
        .collect();
        if role == TripRole::Owner {
            permissions.insert(TripPermission::ManageCollaborators);
            permissions.insert(TripPermission::Delete);
        }

        Some(Self {
            user_id: user_id.to_string(),
            trip_id: trip.id.clone(),
            role,
            permissions,
        })
    }

    pub fn can(&self, permission: TripPermission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_owner(&self) -> bool {
        self.role == TripRole::Owner
    }
}

/// Require a permission or fail with `PermissionDenied`.
/// Non-members get `TripNotFound` so trip ids don't leak.
pub fn require(trip: &Trip, user_id: &str, permission: TripPermission) -> Result<TripAccess> {
    let access = TripAccess::resolve(trip, user_id).ok_or_else(|| TripPlannerError::TripNotFound {
        trip_id: trip.id.clone(),
    })?;

    if !access.can(permission) {
        return Err(TripPlannerError::PermissionDenied(format!(
            "User {} lacks {:?} on trip {}",
            user_id, permission, trip.id
        )));
    }

    Ok(access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TripState;
    use chrono::{NaiveDate, Utc};

    fn trip() -> Trip {
        let now = Utc::now();
        Trip {
            id: "t1".to_string(),
            title: "Summer in Rome".to_string(),
            destination_region: "Rome, Italy".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 7, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 7, 25).unwrap(),
            budget: None,
            description: None,
            cover_image: None,
            state: TripState::InCreation,
            general_transportation: None,
            owner_id: "owner".to_string(),
            collaborators: vec!["friend".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_has_every_permission() {
        let access = require(&trip(), "owner", TripPermission::Delete).unwrap();
        assert!(access.is_owner());
        assert!(access.can(TripPermission::ManageCollaborators));
    }

    #[test]
    fn test_collaborator_cannot_delete() {
        let trip = trip();
        assert!(require(&trip, "friend", TripPermission::Edit).is_ok());
        assert!(require(&trip, "friend", TripPermission::Vote).is_ok());
        assert!(matches!(
            require(&trip, "friend", TripPermission::Delete),
            Err(TripPlannerError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_stranger_sees_not_found() {
        assert!(matches!(
            require(&trip(), "stranger", TripPermission::View),
            Err(TripPlannerError::TripNotFound { .. })
        ));
    }
}
