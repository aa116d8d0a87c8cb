//! Randomized fixtures for tests that should not depend on exact names

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use fake::faker::address::en::{CityName, CountryName};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use fake::Fake;

use trip_planner::models::CreateTripRequest;

#[derive(Debug, Clone)]
pub struct AccountFixture {
    pub name: String,
    pub email: String,
}

pub fn account() -> AccountFixture {
    AccountFixture {
        name: Name().fake(),
        email: SafeEmail().fake(),
    }
}

/// "City, Country" destination
pub fn destination() -> String {
    let city: String = CityName().fake();
    let country: String = CountryName().fake();
    format!("{}, {}", city, country)
}

/// A trip of 1 to 10 days with a random title and destination
pub fn trip_request(start: NaiveDate) -> CreateTripRequest {
    let words: Vec<String> = Words(2..4).fake();
    let days: i64 = (0..10).fake();
    CreateTripRequest::new(
        &words.join(" "),
        &destination(),
        start,
        start + Duration::days(days),
    )
}
