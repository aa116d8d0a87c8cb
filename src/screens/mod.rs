//! Screen state controllers
//!
//! One controller per screen. Fetching screens move through
//! [`LoadState`], form screens through [`SubmitState`]. Async work runs
//! under the screen's [`ScreenLifetime`] and is cancelled on unmount, so a
//! closed screen never receives a late result. Screens holding store data
//! re-derive it when a [`StoreEvent`] concerning them arrives.

pub mod auth;
pub mod profile;
pub mod trips;

use std::future::Future;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::state::store::{StoreEvent, TripStore};
use crate::utils::errors::{Result, TripPlannerError};
use crate::utils::logging::log_operation_failure;
use crate::utils::validation::ValidationError;

/// Fetch lifecycle of a screen's data
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Store the outcome of a fetch. A cancelled fetch writes nothing.
    pub fn settle(&mut self, operation: &str, result: Result<T>) -> Result<()> {
        match result {
            Ok(data) => {
                *self = LoadState::Loaded(data);
                Ok(())
            }
            Err(TripPlannerError::Cancelled) => Err(TripPlannerError::Cancelled),
            Err(e) => {
                log_operation_failure(operation, &e);
                *self = LoadState::Error(e.user_message());
                Err(e)
            }
        }
    }
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

/// Form submission status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitState {
    pub submitting: bool,
    /// Inline helper text of the last failure
    pub error: Option<String>,
    /// Confirmation shown after a successful step
    pub success: Option<String>,
}

impl SubmitState {
    /// Enter `submitting`. Fails with `Busy` while already submitting.
    pub fn begin(&mut self) -> Result<()> {
        if self.submitting {
            return Err(TripPlannerError::Busy);
        }
        self.submitting = true;
        self.error = None;
        self.success = None;
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn succeed(&mut self, message: Option<&str>) {
        self.submitting = false;
        self.error = None;
        self.success = message.map(str::to_string);
    }

    /// Show a failed form rule and hand back the error for the caller
    pub fn reject(&mut self, error: ValidationError) -> TripPlannerError {
        self.fail(error.to_string());
        error.into()
    }

    /// Record a failed operation; a cancellation leaves no trace
    pub fn record<T>(&mut self, operation: &str, result: &Result<T>) {
        match result {
            Ok(_) => {}
            Err(TripPlannerError::Cancelled) => self.submitting = false,
            Err(e) => {
                log_operation_failure(operation, e);
                self.fail(e.user_message());
            }
        }
    }
}

/// Ties async work to a mounted screen
#[derive(Debug, Clone, Default)]
pub struct ScreenLifetime {
    token: CancellationToken,
}

impl ScreenLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Token that unmounts the screen from another task
    pub fn handle(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    /// Run `work` unless the screen unmounts first
    pub async fn guard<T, F>(&self, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(TripPlannerError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("Screen unmounted, pending work dropped");
                Err(TripPlannerError::Cancelled)
            }
            result = work => result,
        }
    }
}

/// A screen's view of store changes
#[derive(Debug)]
pub struct StoreSubscription {
    events: broadcast::Receiver<StoreEvent>,
}

impl StoreSubscription {
    pub fn new(store: &TripStore) -> Self {
        Self {
            events: store.subscribe(),
        }
    }

    /// Drain pending events. True when one of them satisfies `concerns`
    /// or when events were missed.
    pub fn drain(&mut self, concerns: impl Fn(&StoreEvent) -> bool) -> bool {
        let mut relevant = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => relevant |= concerns(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped = skipped, "Store events missed");
                    relevant = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        relevant
    }
}
