//! Trip repository: trips and everything scheduled on their days

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::SimulatedLatency;
use crate::database::tables::{TripChange, TripTables};
use crate::models::{Accommodation, Activity, Comment, DailyTransportation, Day, FullTrip, Trip};
use crate::utils::errors::Result;

/// Storage contract for trip data. Writes are upserts keyed by id; deletes
/// cascade to dependent items and report whether anything was removed.
/// Every check a write depends on runs in the same step as the write.
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Trips the user owns or collaborates on
    async fn list_for_member(&self, user_id: &str) -> Result<Vec<Trip>>;

    async fn find_trip(&self, trip_id: &str) -> Result<Option<Trip>>;

    async fn find_full_trip(&self, trip_id: &str) -> Result<Option<FullTrip>>;

    async fn find_day(&self, trip_id: &str, day_index: u32) -> Result<Option<Day>>;

    async fn save_trip(&self, trip: &Trip) -> Result<()>;

    /// Apply a checked change to a stored trip and return the result
    async fn change_trip(&self, trip_id: &str, change: TripChange) -> Result<Trip>;

    async fn delete_trip(&self, trip_id: &str) -> Result<bool>;

    async fn find_activity(&self, activity_id: &str) -> Result<Option<Activity>>;

    /// Fails with `DayOutOfRange` when the day is outside the trip
    async fn save_activity(&self, activity: &Activity) -> Result<()>;

    async fn delete_activity(&self, activity_id: &str) -> Result<bool>;

    async fn find_accommodation(&self, accommodation_id: &str) -> Result<Option<Accommodation>>;

    /// Returns the stored record; an existing one keeps its selection flag
    async fn save_accommodation(&self, accommodation: &Accommodation) -> Result<Accommodation>;

    /// Select an accommodation; returns it and the options it displaced
    async fn select_accommodation(&self, accommodation_id: &str) -> Result<(Accommodation, Vec<Accommodation>)>;

    async fn deselect_accommodation(&self, accommodation_id: &str) -> Result<Accommodation>;

    async fn delete_accommodation(&self, accommodation_id: &str) -> Result<bool>;

    async fn save_transportation(&self, transportation: &DailyTransportation) -> Result<()>;

    async fn delete_transportation(&self, trip_id: &str, day_index: u32) -> Result<bool>;

    async fn find_comment(&self, comment_id: &str) -> Result<Option<Comment>>;

    async fn save_comment(&self, comment: &Comment) -> Result<()>;

    async fn delete_comment(&self, comment_id: &str) -> Result<bool>;
}

/// Trip storage held in process memory
pub struct InMemoryTripRepository {
    tables: RwLock<TripTables>,
    latency: SimulatedLatency,
}

impl InMemoryTripRepository {
    pub fn new(latency: SimulatedLatency) -> Self {
        Self {
            tables: RwLock::new(TripTables::new()),
            latency,
        }
    }

    pub async fn trip_count(&self) -> usize {
        self.tables.read().await.trip_count()
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn list_for_member(&self, user_id: &str) -> Result<Vec<Trip>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables.trips_for_member(user_id))
    }

    async fn find_trip(&self, trip_id: &str) -> Result<Option<Trip>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables.trip(trip_id).cloned())
    }

    async fn find_full_trip(&self, trip_id: &str) -> Result<Option<FullTrip>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables.full_trip(trip_id))
    }

    async fn find_day(&self, trip_id: &str, day_index: u32) -> Result<Option<Day>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables.day(trip_id, day_index))
    }

    async fn save_trip(&self, trip: &Trip) -> Result<()> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        tables.upsert_trip(trip.clone());
        debug!(trip_id = %trip.id, "Trip saved");
        Ok(())
    }

    async fn change_trip(&self, trip_id: &str, change: TripChange) -> Result<Trip> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        let trip = tables.change_trip(trip_id, change)?;
        debug!(trip_id = trip_id, state = %trip.state, "Trip changed");
        Ok(trip)
    }

    async fn delete_trip(&self, trip_id: &str) -> Result<bool> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        let removed = tables.remove_trip(trip_id).is_some();
        debug!(trip_id = trip_id, removed = removed, "Trip deleted");
        Ok(removed)
    }

    async fn find_activity(&self, activity_id: &str) -> Result<Option<Activity>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables.activity(activity_id).cloned())
    }

    async fn save_activity(&self, activity: &Activity) -> Result<()> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        tables.schedule_activity(activity.clone())
    }

    async fn delete_activity(&self, activity_id: &str) -> Result<bool> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        Ok(tables.remove_activity(activity_id).is_some())
    }

    async fn find_accommodation(&self, accommodation_id: &str) -> Result<Option<Accommodation>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables.accommodation(accommodation_id).cloned())
    }

    async fn save_accommodation(&self, accommodation: &Accommodation) -> Result<Accommodation> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        tables.schedule_accommodation(accommodation.clone())
    }

    async fn select_accommodation(&self, accommodation_id: &str) -> Result<(Accommodation, Vec<Accommodation>)> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        tables.select_accommodation(accommodation_id)
    }

    async fn deselect_accommodation(&self, accommodation_id: &str) -> Result<Accommodation> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        tables.deselect_accommodation(accommodation_id)
    }

    async fn delete_accommodation(&self, accommodation_id: &str) -> Result<bool> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        Ok(tables.remove_accommodation(accommodation_id).is_some())
    }

    async fn save_transportation(&self, transportation: &DailyTransportation) -> Result<()> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        tables.schedule_transportation(transportation.clone())
    }

    async fn delete_transportation(&self, trip_id: &str, day_index: u32) -> Result<bool> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        Ok(tables.remove_transportation(trip_id, day_index).is_some())
    }

    async fn find_comment(&self, comment_id: &str) -> Result<Option<Comment>> {
        self.latency.wait().await;
        let tables = self.tables.read().await;
        Ok(tables.comment(comment_id).cloned())
    }

    async fn save_comment(&self, comment: &Comment) -> Result<()> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        tables.upsert_comment(comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<bool> {
        self.latency.wait().await;
        let mut tables = self.tables.write().await;
        Ok(tables.remove_comment(comment_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TripState;
    use chrono::{NaiveDate, Utc};
    use std::time::Duration;

    fn trip(id: &str, owner: &str) -> Trip {
        let now = Utc::now();
        Trip {
            id: id.to_string(),
            title: "Barcelona Weekend".to_string(),
            destination_region: "Barcelona, Spain".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 10, 20).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 10, 23).unwrap(),
            budget: Some(800.0),
            description: None,
            cover_image: None,
            state: TripState::WaitingToStart,
            general_transportation: None,
            owner_id: owner.to_string(),
            collaborators: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_find_delete() {
        let repo = InMemoryTripRepository::new(SimulatedLatency::none());
        repo.save_trip(&trip("t1", "u1")).await.unwrap();

        let found = repo.find_trip("t1").await.unwrap().unwrap();
        assert_eq!(found.title, "Barcelona Weekend");
        assert_eq!(repo.list_for_member("u1").await.unwrap().len(), 1);
        assert!(repo.list_for_member("u2").await.unwrap().is_empty());

        let full = repo.find_full_trip("t1").await.unwrap().unwrap();
        assert_eq!(full.days.len(), 4);

        assert!(repo.delete_trip("t1").await.unwrap());
        assert!(!repo.delete_trip("t1").await.unwrap());
        assert!(repo.find_trip("t1").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_wait_for_simulated_latency() {
        let repo = InMemoryTripRepository::new(SimulatedLatency::from_millis(500));
        let started = tokio::time::Instant::now();
        repo.find_trip("missing").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}
