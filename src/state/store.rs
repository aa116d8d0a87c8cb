//! Client-side trip store
//!
//! One normalized copy of every trip entity the client has seen. Services
//! write into it after the repository accepts a change; screens subscribe to
//! [`StoreEvent`]s and re-derive their view when an event concerns them.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::database::tables::TripTables;
use crate::models::{Accommodation, Activity, Comment, DailyTransportation, Day, FullTrip, Trip};

const EVENT_CAPACITY: usize = 256;

/// What changed in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    TripChanged { trip_id: String },
    TripRemoved { trip_id: String },
    DayChanged { trip_id: String, day_index: u32 },
    CommentsChanged { trip_id: String, entity_id: String },
    Cleared,
}

impl StoreEvent {
    /// Whether a view of the given trip must be re-derived
    pub fn affects_trip(&self, trip_id: &str) -> bool {
        match self {
            StoreEvent::TripChanged { trip_id: id }
            | StoreEvent::TripRemoved { trip_id: id }
            | StoreEvent::DayChanged { trip_id: id, .. }
            | StoreEvent::CommentsChanged { trip_id: id, .. } => id == trip_id,
            StoreEvent::Cleared => true,
        }
    }

    /// Whether a view of one day must be re-derived
    pub fn affects_day(&self, trip_id: &str, day_index: u32) -> bool {
        match self {
            StoreEvent::DayChanged {
                trip_id: id,
                day_index: day,
            } => id == trip_id && *day == day_index,
            StoreEvent::CommentsChanged { .. } => false,
            other => other.affects_trip(trip_id),
        }
    }
}

/// Cheaply cloneable handle to the shared store
#[derive(Clone)]
pub struct TripStore {
    tables: Arc<RwLock<TripTables>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for TripStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TripStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripStore")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

impl TripStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tables: Arc::new(RwLock::new(TripTables::new())),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: StoreEvent) {
        debug!(event = ?event, "Store event");
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub async fn trip(&self, trip_id: &str) -> Option<Trip> {
        self.tables.read().await.trip(trip_id).cloned()
    }

    pub async fn trips_for_member(&self, user_id: &str) -> Vec<Trip> {
        self.tables.read().await.trips_for_member(user_id)
    }

    pub async fn full_trip(&self, trip_id: &str) -> Option<FullTrip> {
        self.tables.read().await.full_trip(trip_id)
    }

    pub async fn day(&self, trip_id: &str, day_index: u32) -> Option<Day> {
        self.tables.read().await.day(trip_id, day_index)
    }

    pub async fn activity(&self, activity_id: &str) -> Option<Activity> {
        self.tables.read().await.activity(activity_id).cloned()
    }

    pub async fn accommodation(&self, accommodation_id: &str) -> Option<Accommodation> {
        self.tables.read().await.accommodation(accommodation_id).cloned()
    }

    pub async fn comments_for(&self, entity_id: &str) -> Vec<Comment> {
        self.tables.read().await.comments_for(entity_id)
    }

    pub async fn put_trips(&self, trips: Vec<Trip>) {
        let ids: Vec<String> = trips.iter().map(|t| t.id.clone()).collect();
        {
            let mut tables = self.tables.write().await;
            for trip in trips {
                tables.upsert_trip(trip);
            }
        }
        for trip_id in ids {
            self.publish(StoreEvent::TripChanged { trip_id });
        }
    }

    pub async fn put_trip(&self, trip: Trip) {
        let trip_id = trip.id.clone();
        self.tables.write().await.upsert_trip(trip);
        self.publish(StoreEvent::TripChanged { trip_id });
    }

    pub async fn put_full_trip(&self, full: FullTrip) {
        let trip_id = full.trip.id.clone();
        self.tables.write().await.replace_full_trip(full);
        self.publish(StoreEvent::TripChanged { trip_id });
    }

    pub async fn remove_trip(&self, trip_id: &str) {
        self.tables.write().await.remove_trip(trip_id);
        self.publish(StoreEvent::TripRemoved {
            trip_id: trip_id.to_string(),
        });
    }

    pub async fn put_day(&self, trip_id: &str, day: Day) {
        let day_index = day.index;
        self.tables.write().await.replace_day(trip_id, day);
        self.publish(StoreEvent::DayChanged {
            trip_id: trip_id.to_string(),
            day_index,
        });
    }

    pub async fn put_activity(&self, activity: Activity) {
        let event = StoreEvent::DayChanged {
            trip_id: activity.trip_id.clone(),
            day_index: activity.day_index,
        };
        self.tables.write().await.upsert_activity(activity);
        self.publish(event);
    }

    pub async fn remove_activity(&self, activity_id: &str) {
        let removed = self.tables.write().await.remove_activity(activity_id);
        if let Some(activity) = removed {
            self.publish(StoreEvent::DayChanged {
                trip_id: activity.trip_id,
                day_index: activity.day_index,
            });
        }
    }

    /// Upsert several accommodations of one day, publishing a single event
    pub async fn put_accommodations(&self, accommodations: Vec<Accommodation>) {
        let mut touched: Vec<(String, u32)> = Vec::new();
        {
            let mut tables = self.tables.write().await;
            for accommodation in accommodations {
                let key = (accommodation.trip_id.clone(), accommodation.day_index);
                if !touched.contains(&key) {
                    touched.push(key);
                }
                tables.upsert_accommodation(accommodation);
            }
        }
        for (trip_id, day_index) in touched {
            self.publish(StoreEvent::DayChanged { trip_id, day_index });
        }
    }

    pub async fn remove_accommodation(&self, accommodation_id: &str) {
        let removed = self
            .tables
            .write()
            .await
            .remove_accommodation(accommodation_id);
        if let Some(accommodation) = removed {
            self.publish(StoreEvent::DayChanged {
                trip_id: accommodation.trip_id,
                day_index: accommodation.day_index,
            });
        }
    }

    pub async fn put_transportation(&self, transportation: DailyTransportation) {
        let event = StoreEvent::DayChanged {
            trip_id: transportation.trip_id.clone(),
            day_index: transportation.day_index,
        };
        self.tables.write().await.upsert_transportation(transportation);
        self.publish(event);
    }

    pub async fn remove_transportation(&self, trip_id: &str, day_index: u32) {
        self.tables
            .write()
            .await
            .remove_transportation(trip_id, day_index);
        self.publish(StoreEvent::DayChanged {
            trip_id: trip_id.to_string(),
            day_index,
        });
    }

    pub async fn put_comment(&self, comment: Comment) {
        let event = StoreEvent::CommentsChanged {
            trip_id: comment.trip_id.clone(),
            entity_id: comment.entity_id.clone(),
        };
        self.tables.write().await.upsert_comment(comment);
        self.publish(event);
    }

    pub async fn remove_comment(&self, comment_id: &str) {
        let removed = self.tables.write().await.remove_comment(comment_id);
        if let Some(comment) = removed {
            self.publish(StoreEvent::CommentsChanged {
                trip_id: comment.trip_id,
                entity_id: comment.entity_id,
            });
        }
    }

    /// Drop everything, e.g. on sign out
    pub async fn clear(&self) {
        self.tables.write().await.clear();
        self.publish(StoreEvent::Cleared);
    }
}
