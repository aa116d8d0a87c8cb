//! Demo dataset
//!
//! Three trips owned by the development account, two friends collaborating on
//! them, and a planned first day in Rome.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::info;

use super::service::DatabaseService;
use crate::models::{
    Accommodation, Activity, CreateUserRequest, DailyTransportation, Location, Trip, TripState, User,
};
use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::helpers::generate_uuid;

pub const DEMO_EMAIL: &str = "dev@example.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_NAME: &str = "Development User";

/// What was created, for callers that want to sign in or navigate
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub demo_user: User,
    pub friends: Vec<User>,
    pub trip_ids: Vec<String>,
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TripPlannerError::InvalidInput(format!("Invalid seed date {}-{}-{}", year, month, day)))
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single()
}

fn place(name: &str, address: &str, latitude: f64, longitude: f64) -> Location {
    Location {
        latitude,
        longitude,
        address: Some(address.to_string()),
        name: Some(name.to_string()),
    }
}

struct TripSeed<'a> {
    title: &'a str,
    destination: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    budget: f64,
    description: &'a str,
    cover_image: &'a str,
    state: TripState,
    transportation: &'a str,
    collaborators: Vec<String>,
}

impl TripSeed<'_> {
    fn into_trip(self, owner_id: &str) -> Trip {
        let now = Utc::now();
        Trip {
            id: generate_uuid(),
            title: self.title.to_string(),
            destination_region: self.destination.to_string(),
            start_date: self.start,
            end_date: self.end,
            budget: Some(self.budget),
            description: Some(self.description.to_string()),
            cover_image: Some(self.cover_image.to_string()),
            state: self.state,
            general_transportation: Some(self.transportation.to_string()),
            owner_id: owner_id.to_string(),
            collaborators: self.collaborators,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Populate empty repositories with the demo dataset
pub async fn seed_demo_data(db: &DatabaseService) -> Result<SeedSummary> {
    let demo_user = db
        .auth
        .create_user(
            CreateUserRequest {
                email: DEMO_EMAIL.to_string(),
                name: DEMO_NAME.to_string(),
            },
            DEMO_PASSWORD,
        )
        .await?;

    let mut friends = Vec::new();
    for (email, name) in [("alex@example.com", "Alex Rivera"), ("sam@example.com", "Sam Chen")] {
        let friend = db
            .auth
            .create_user(
                CreateUserRequest {
                    email: email.to_string(),
                    name: name.to_string(),
                },
                DEMO_PASSWORD,
            )
            .await?;
        friends.push(friend);
    }
    let alex = friends[0].id.clone();
    let sam = friends[1].id.clone();

    let rome = TripSeed {
        title: "Summer in Rome",
        destination: "Rome, Italy",
        start: date(2023, 7, 15)?,
        end: date(2023, 7, 25)?,
        budget: 2000.0,
        description: "Exploring the ancient city of Rome",
        cover_image: "https://images.unsplash.com/photo-1525874684015-58379d421a52",
        state: TripState::Completed,
        transportation: "Flight, Public Transport",
        collaborators: vec![alex.clone(), sam.clone()],
    }
    .into_trip(&demo_user.id);

    let barcelona = TripSeed {
        title: "Barcelona Weekend",
        destination: "Barcelona, Spain",
        start: date(2023, 10, 20)?,
        end: date(2023, 10, 23)?,
        budget: 800.0,
        description: "Weekend getaway to Barcelona",
        cover_image: "https://images.unsplash.com/photo-1583422409516-2895a77efded",
        state: TripState::WaitingToStart,
        transportation: "Flight",
        collaborators: vec![alex.clone()],
    }
    .into_trip(&demo_user.id);

    let japan = TripSeed {
        title: "Japan Adventure",
        destination: "Tokyo, Japan",
        start: date(2023, 12, 1)?,
        end: date(2023, 12, 15)?,
        budget: 5000.0,
        description: "Exploring Japan's culture and cuisine",
        cover_image: "https://images.unsplash.com/photo-1528164344705-47542687000d",
        state: TripState::InCreation,
        transportation: "Flight, Bullet Train",
        collaborators: vec![],
    }
    .into_trip(&demo_user.id);

    for trip in [&rome, &barcelona, &japan] {
        db.trips.save_trip(trip).await?;
    }

    let now = Utc::now();
    db.trips
        .save_accommodation(&Accommodation {
            id: generate_uuid(),
            trip_id: rome.id.clone(),
            day_index: 0,
            name: "Hotel Roma".to_string(),
            location: place("Hotel Roma", "Via del Corso 123, Rome, Italy", 41.9028, 12.4964),
            price: Some(150.0),
            url: Some("https://example.com/hotel-roma".to_string()),
            photos: Some(vec![
                "https://images.unsplash.com/photo-1566073771259-6a8506099945".to_string(),
            ]),
            is_selected: true,
            created_at: now,
            updated_at: now,
        })
        .await?;

    db.trips
        .save_activity(&Activity {
            id: generate_uuid(),
            trip_id: rome.id.clone(),
            day_index: 0,
            name: "Colosseum Tour".to_string(),
            location: place("Colosseum", "Piazza del Colosseo, Rome, Italy", 41.8902, 12.4924),
            start_time: at(2023, 7, 15, 10, 0),
            end_time: at(2023, 7, 15, 12, 0),
            price: Some(25.0),
            url: Some("https://example.com/colosseum-tour".to_string()),
            photos: Some(vec![
                "https://images.unsplash.com/photo-1552832230-c0197dd311b5".to_string(),
            ]),
            votes: BTreeSet::from([demo_user.id.clone(), alex.clone()]),
            created_at: now,
            updated_at: now,
        })
        .await?;

    db.trips
        .save_activity(&Activity {
            id: generate_uuid(),
            trip_id: rome.id.clone(),
            day_index: 0,
            name: "Lunch at La Trattoria".to_string(),
            location: place("La Trattoria", "Via della Lungaretta 45, Rome, Italy", 41.8992, 12.4768),
            start_time: at(2023, 7, 15, 13, 0),
            end_time: at(2023, 7, 15, 14, 30),
            price: Some(30.0),
            url: None,
            photos: Some(vec![]),
            votes: BTreeSet::from([demo_user.id.clone(), sam.clone()]),
            created_at: now,
            updated_at: now,
        })
        .await?;

    db.trips
        .save_transportation(&DailyTransportation {
            id: generate_uuid(),
            trip_id: rome.id.clone(),
            day_index: 0,
            kind: "Public Transportation".to_string(),
            details: Some("Metro and walking".to_string()),
            created_at: now,
            updated_at: now,
        })
        .await?;

    let trip_ids = vec![rome.id, barcelona.id, japan.id];
    info!(
        user_id = %demo_user.id,
        trips = trip_ids.len(),
        "Demo data seeded"
    );

    Ok(SeedSummary {
        demo_user,
        friends,
        trip_ids,
    })
}
