//! Test data builders

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use trip_planner::models::{AccommodationRequest, ActivityRequest, Location};

pub const TEST_PASSWORD: &str = "password123";
pub const OWNER_EMAIL: &str = "owner@example.com";
pub const FRIEND_EMAIL: &str = "friend@example.com";
pub const STRANGER_EMAIL: &str = "stranger@example.com";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 7, 15, hour, minute, 0)
        .single()
        .expect("valid test time")
}

pub fn rome() -> Location {
    Location {
        latitude: 41.8902,
        longitude: 12.4922,
        address: Some("Piazza del Colosseo, 1".to_string()),
        name: Some("Colosseum".to_string()),
    }
}

pub fn activity_request(name: &str, start_hour: Option<u32>) -> ActivityRequest {
    ActivityRequest {
        name: name.to_string(),
        location: rome(),
        start_time: start_hour.map(|h| at(h, 0)),
        end_time: start_hour.map(|h| at(h + 2, 0)),
        price: Some(25.0),
        url: None,
        photos: None,
    }
}

pub fn accommodation_request(name: &str) -> AccommodationRequest {
    AccommodationRequest {
        name: name.to_string(),
        location: rome(),
        price: Some(150.0),
        url: Some("https://example.com/hotel".to_string()),
        photos: None,
    }
}
