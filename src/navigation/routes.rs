//! Typed routes and their parameters
//!
//! Every screen is a variant carrying exactly the identifiers it needs.
//! Trip routes can also be written as and parsed from deep links of the
//! form `{scheme}://trips/{tripId}/days/{dayIndex}/activities/{activityId}`.

use url::Url;

use crate::utils::errors::{Result, TripPlannerError};

/// A screen that can sit on a navigation stack
pub trait Route: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Stable screen name used in logs
    fn name(&self) -> &'static str;

    /// Header title
    fn title(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRoute {
    Welcome,
    Login,
    Register,
    ForgotPassword,
}

impl Route for AuthRoute {
    fn name(&self) -> &'static str {
        match self {
            AuthRoute::Welcome => "Welcome",
            AuthRoute::Login => "Login",
            AuthRoute::Register => "Register",
            AuthRoute::ForgotPassword => "ForgotPassword",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AuthRoute::Welcome => "Welcome",
            AuthRoute::Login => "Sign In",
            AuthRoute::Register => "Create Account",
            AuthRoute::ForgotPassword => "Reset Password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripsRoute {
    TripsList,
    TripDetails { trip_id: String },
    CreateTrip,
    EditTrip { trip_id: String },
    DayDetails { trip_id: String, day_index: u32 },
    AddActivity { trip_id: String, day_index: u32 },
    AddAccommodation { trip_id: String, day_index: u32 },
    ActivityDetails { trip_id: String, day_index: u32, activity_id: String },
    AccommodationDetails { trip_id: String, day_index: u32, accommodation_id: String },
    ShareTrip { trip_id: String },
    ManageCollaborators { trip_id: String },
}

impl Route for TripsRoute {
    fn name(&self) -> &'static str {
        match self {
            TripsRoute::TripsList => "TripsList",
            TripsRoute::TripDetails { .. } => "TripDetails",
            TripsRoute::CreateTrip => "CreateTrip",
            TripsRoute::EditTrip { .. } => "EditTrip",
            TripsRoute::DayDetails { .. } => "DayDetails",
            TripsRoute::AddActivity { .. } => "AddActivity",
            TripsRoute::AddAccommodation { .. } => "AddAccommodation",
            TripsRoute::ActivityDetails { .. } => "ActivityDetails",
            TripsRoute::AccommodationDetails { .. } => "AccommodationDetails",
            TripsRoute::ShareTrip { .. } => "ShareTrip",
            TripsRoute::ManageCollaborators { .. } => "ManageCollaborators",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            TripsRoute::TripsList => "My Trips",
            TripsRoute::TripDetails { .. } => "Trip Details",
            TripsRoute::CreateTrip => "Create New Trip",
            TripsRoute::EditTrip { .. } => "Edit Trip",
            TripsRoute::DayDetails { .. } => "Day Details",
            TripsRoute::AddActivity { .. } => "Add Activity",
            TripsRoute::AddAccommodation { .. } => "Add Accommodation",
            TripsRoute::ActivityDetails { .. } => "Activity Details",
            TripsRoute::AccommodationDetails { .. } => "Accommodation Details",
            TripsRoute::ShareTrip { .. } => "Share Trip",
            TripsRoute::ManageCollaborators { .. } => "Manage Collaborators",
        }
    }
}

impl TripsRoute {
    /// The trip this screen belongs to, if any
    pub fn trip_id(&self) -> Option<&str> {
        match self {
            TripsRoute::TripsList | TripsRoute::CreateTrip => None,
            TripsRoute::TripDetails { trip_id }
            | TripsRoute::EditTrip { trip_id }
            | TripsRoute::DayDetails { trip_id, .. }
            | TripsRoute::AddActivity { trip_id, .. }
            | TripsRoute::AddAccommodation { trip_id, .. }
            | TripsRoute::ActivityDetails { trip_id, .. }
            | TripsRoute::AccommodationDetails { trip_id, .. }
            | TripsRoute::ShareTrip { trip_id }
            | TripsRoute::ManageCollaborators { trip_id } => Some(trip_id),
        }
    }

    pub fn day_index(&self) -> Option<u32> {
        match self {
            TripsRoute::DayDetails { day_index, .. }
            | TripsRoute::AddActivity { day_index, .. }
            | TripsRoute::AddAccommodation { day_index, .. }
            | TripsRoute::ActivityDetails { day_index, .. }
            | TripsRoute::AccommodationDetails { day_index, .. } => Some(*day_index),
            _ => None,
        }
    }

    /// Stack leading to this screen, starting at the trips list
    pub fn ancestry(&self) -> Vec<TripsRoute> {
        let mut stack = vec![TripsRoute::TripsList];
        if let Some(trip_id) = self.trip_id() {
            stack.push(TripsRoute::TripDetails {
                trip_id: trip_id.to_string(),
            });
            if let Some(day_index) = self.day_index() {
                stack.push(TripsRoute::DayDetails {
                    trip_id: trip_id.to_string(),
                    day_index,
                });
            }
        }
        if stack.last() != Some(self) {
            stack.push(self.clone());
        }
        stack
    }

    /// Deep link to a trip, day or itinerary item
    pub fn deep_link(&self, scheme: &str) -> Result<String> {
        let path = match self {
            TripsRoute::TripsList => String::new(),
            TripsRoute::TripDetails { trip_id } => format!("/{}", urlencoding::encode(trip_id)),
            TripsRoute::DayDetails { trip_id, day_index } => {
                format!("/{}/days/{}", urlencoding::encode(trip_id), day_index)
            }
            TripsRoute::ActivityDetails {
                trip_id,
                day_index,
                activity_id,
            } => format!(
                "/{}/days/{}/activities/{}",
                urlencoding::encode(trip_id),
                day_index,
                urlencoding::encode(activity_id)
            ),
            TripsRoute::AccommodationDetails {
                trip_id,
                day_index,
                accommodation_id,
            } => format!(
                "/{}/days/{}/accommodations/{}",
                urlencoding::encode(trip_id),
                day_index,
                urlencoding::encode(accommodation_id)
            ),
            other => {
                return Err(TripPlannerError::InvalidInput(format!(
                    "{} cannot be shared as a link",
                    other.name()
                )))
            }
        };

        let url = Url::parse(&format!("{}://trips{}", scheme, path))?;
        Ok(url.to_string())
    }

    /// Parse a deep link produced by [`TripsRoute::deep_link`]
    pub fn from_deep_link(link: &str, scheme: &str) -> Result<TripsRoute> {
        let url = Url::parse(link.trim())?;
        let unsupported = || TripPlannerError::InvalidInput(format!("Unsupported link: {}", link));

        if url.scheme() != scheme || url.host_str() != Some("trips") {
            return Err(unsupported());
        }

        let segments: Vec<String> = url
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|p| !p.is_empty())
                    .map(|p| urlencoding::decode(p).map(|s| s.into_owned()))
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(|_| unsupported())?
            .unwrap_or_default();
        let parts: Vec<&str> = segments.iter().map(String::as_str).collect();

        let day = |text: &str| text.parse::<u32>().map_err(|_| unsupported());

        let route = match parts.as_slice() {
            [] => TripsRoute::TripsList,
            [trip_id] => TripsRoute::TripDetails {
                trip_id: trip_id.to_string(),
            },
            [trip_id, "days", day_index] => TripsRoute::DayDetails {
                trip_id: trip_id.to_string(),
                day_index: day(day_index)?,
            },
            [trip_id, "days", day_index, "activities", activity_id] => TripsRoute::ActivityDetails {
                trip_id: trip_id.to_string(),
                day_index: day(day_index)?,
                activity_id: activity_id.to_string(),
            },
            [trip_id, "days", day_index, "accommodations", accommodation_id] => {
                TripsRoute::AccommodationDetails {
                    trip_id: trip_id.to_string(),
                    day_index: day(day_index)?,
                    accommodation_id: accommodation_id.to_string(),
                }
            }
            _ => return Err(unsupported()),
        };
        Ok(route)
    }
}
