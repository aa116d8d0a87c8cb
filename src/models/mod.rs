//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod comment;
pub mod itinerary;
pub mod trip;
pub mod user;

// Re-export commonly used models
pub use comment::{Comment, CommentTarget, CreateCommentRequest};
pub use itinerary::{
    Accommodation, AccommodationRequest, Activity, ActivityRequest, DailyTransportation, Day,
    FullTrip, Location, TransportationRequest,
};
pub use trip::{CreateTripRequest, Trip, TripState, UpdateTripRequest};
pub use user::{CreateUserRequest, UpdateUserRequest, User};
