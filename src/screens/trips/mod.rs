//! Screens of the trips tab

pub mod accommodation;
pub mod activity;
pub mod collaborators;
pub mod comments;
pub mod create;
pub mod day;
pub mod details;
pub mod edit;
pub mod form;
pub mod item_form;
pub mod list;
pub mod share;

pub use accommodation::{AccommodationDetailsScreen, AddAccommodationScreen};
pub use activity::{ActivityDetailsScreen, AddActivityScreen};
pub use collaborators::ManageCollaboratorsScreen;
pub use comments::CommentThread;
pub use create::CreateTripScreen;
pub use day::{DayDetailsScreen, DayStats};
pub use details::{DayCard, TripDetailsScreen};
pub use edit::EditTripScreen;
pub use form::{TripForm, SAMPLE_COVER_IMAGES};
pub use item_form::ItemForm;
pub use list::{filter_trips, TripCard, TripsListScreen};
pub use share::ShareTripScreen;
