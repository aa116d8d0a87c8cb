//! Root router
//!
//! Mounts one of three trees from the session phase: a splash while the
//! session initializes, the Auth stack when signed out and the Main tabs
//! when signed in. Deep links opened before sign-in are kept and applied
//! once the Main tree mounts.

use tokio::sync::watch;
use tracing::{debug, info};

use super::routes::{AuthRoute, Route, TripsRoute};
use super::stack::{NavAction, StackNavigator};
use crate::state::session::{SessionPhase, SessionState};
use crate::state::store::StoreEvent;
use crate::utils::errors::{Result, TripPlannerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainTab {
    Trips,
    Profile,
}

impl MainTab {
    pub fn title(self) -> &'static str {
        match self {
            MainTab::Trips => "Trips",
            MainTab::Profile => "Profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainTabs {
    active: MainTab,
    trips: StackNavigator<TripsRoute>,
}

impl MainTabs {
    pub fn new() -> Self {
        Self {
            active: MainTab::Trips,
            trips: StackNavigator::new(TripsRoute::TripsList),
        }
    }

    pub fn active(&self) -> MainTab {
        self.active
    }

    pub fn select(&mut self, tab: MainTab) {
        if self.active != tab {
            debug!(from = self.active.title(), to = tab.title(), "Tab switched");
            self.active = tab;
        }
    }

    pub fn trips(&self) -> &StackNavigator<TripsRoute> {
        &self.trips
    }

    pub fn trips_mut(&mut self) -> &mut StackNavigator<TripsRoute> {
        &mut self.trips
    }

    /// Header title of the visible screen
    pub fn title(&self) -> &'static str {
        match self.active {
            MainTab::Trips => self.trips.current().title(),
            MainTab::Profile => MainTab::Profile.title(),
        }
    }
}

impl Default for MainTabs {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RootState {
    /// Splash shown while the persisted session is checked
    Loading,
    Auth(StackNavigator<AuthRoute>),
    Main(MainTabs),
}

impl RootState {
    pub fn name(&self) -> &'static str {
        match self {
            RootState::Loading => "Loading",
            RootState::Auth(_) => "Auth",
            RootState::Main(_) => "Main",
        }
    }
}

pub struct RootRouter {
    state: RootState,
    session: watch::Receiver<SessionState>,
    scheme: String,
    pending_link: Option<TripsRoute>,
}

impl RootRouter {
    pub fn new(session: watch::Receiver<SessionState>, scheme: &str) -> Self {
        let mut router = Self {
            state: RootState::Loading,
            session,
            scheme: scheme.to_string(),
            pending_link: None,
        };
        router.sync();
        router
    }

    pub fn state(&self) -> &RootState {
        &self.state
    }

    pub fn auth(&self) -> Option<&StackNavigator<AuthRoute>> {
        match &self.state {
            RootState::Auth(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn auth_mut(&mut self) -> Option<&mut StackNavigator<AuthRoute>> {
        match &mut self.state {
            RootState::Auth(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn main(&self) -> Option<&MainTabs> {
        match &self.state {
            RootState::Main(tabs) => Some(tabs),
            _ => None,
        }
    }

    pub fn main_mut(&mut self) -> Option<&mut MainTabs> {
        match &mut self.state {
            RootState::Main(tabs) => Some(tabs),
            _ => None,
        }
    }

    pub fn pending_link(&self) -> Option<&TripsRoute> {
        self.pending_link.as_ref()
    }

    /// Re-read the session and switch trees when the phase changed.
    /// Returns true when a different tree is mounted.
    pub fn sync(&mut self) -> bool {
        let phase = self.session.borrow_and_update().phase;
        let next = match (phase, &self.state) {
            (SessionPhase::Initializing, RootState::Loading)
            | (SessionPhase::Unauthenticated, RootState::Auth(_))
            | (SessionPhase::Authenticated, RootState::Main(_)) => return false,
            (SessionPhase::Initializing, _) => RootState::Loading,
            (SessionPhase::Unauthenticated, _) => RootState::Auth(StackNavigator::new(AuthRoute::Welcome)),
            (SessionPhase::Authenticated, _) => {
                let mut tabs = MainTabs::new();
                if let Some(route) = self.pending_link.take() {
                    tabs.trips_mut().reset(route.ancestry());
                }
                RootState::Main(tabs)
            }
        };

        info!(from = self.state.name(), to = next.name(), "Root navigator switched");
        self.state = next;
        true
    }

    /// Wait for the next session update and sync with it
    pub async fn changed(&mut self) -> Result<bool> {
        self.session
            .changed()
            .await
            .map_err(|_| TripPlannerError::Cancelled)?;
        Ok(self.sync())
    }

    /// Apply an Auth-flow action; ignored unless the Auth tree is mounted
    pub fn apply_auth(&mut self, action: NavAction<AuthRoute>) -> bool {
        match self.auth_mut() {
            Some(stack) => {
                stack.apply(action);
                true
            }
            None => false,
        }
    }

    /// Apply a Trips-stack action; ignored unless the Main tree is mounted
    pub fn apply_trips(&mut self, action: NavAction<TripsRoute>) -> bool {
        match self.main_mut() {
            Some(tabs) => {
                tabs.trips_mut().apply(action);
                true
            }
            None => false,
        }
    }

    /// Open a `{scheme}://trips/...` link. Before sign-in it is stored and
    /// opened when the Main tree mounts.
    pub fn open_deep_link(&mut self, link: &str) -> Result<TripsRoute> {
        let route = TripsRoute::from_deep_link(link, &self.scheme)?;
        match self.main_mut() {
            Some(tabs) => {
                tabs.select(MainTab::Trips);
                tabs.trips_mut().reset(route.ancestry());
            }
            None => {
                debug!(route = route.name(), "Deep link deferred until sign in");
                self.pending_link = Some(route.clone());
            }
        }
        Ok(route)
    }

    /// Drop screens of trips that no longer exist
    pub fn handle_store_event(&mut self, event: &StoreEvent) {
        let Some(tabs) = self.main_mut() else {
            return;
        };
        match event {
            StoreEvent::TripRemoved { trip_id } => {
                tabs.trips_mut().retain(|r| r.trip_id() != Some(trip_id.as_str()));
            }
            StoreEvent::Cleared => tabs.trips_mut().pop_to_root(),
            _ => {}
        }
    }
}

impl std::fmt::Debug for RootRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootRouter")
            .field("state", &self.state)
            .field("pending_link", &self.pending_link)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(phase: SessionPhase) -> (watch::Sender<SessionState>, watch::Receiver<SessionState>) {
        watch::channel(SessionState {
            phase,
            user: None,
            is_loading: false,
            error: None,
        })
    }

    #[test]
    fn test_initializing_shows_loading() {
        let (_tx, rx) = channel(SessionPhase::Initializing);
        let router = RootRouter::new(rx, "tripplanner");
        assert_eq!(router.state(), &RootState::Loading);
    }

    #[test]
    fn test_phase_changes_switch_trees() {
        let (tx, rx) = channel(SessionPhase::Initializing);
        let mut router = RootRouter::new(rx, "tripplanner");

        tx.send_modify(|s| s.phase = SessionPhase::Unauthenticated);
        assert!(router.sync());
        assert_eq!(router.auth().map(|s| s.current().clone()), Some(AuthRoute::Welcome));

        tx.send_modify(|s| s.is_loading = true);
        assert!(!router.sync());

        tx.send_modify(|s| s.phase = SessionPhase::Authenticated);
        assert!(router.sync());
        assert_eq!(router.main().map(|m| m.active()), Some(MainTab::Trips));
        assert_eq!(router.main().map(|m| m.title()), Some("My Trips"));
    }

    #[test]
    fn test_deferred_deep_link_opens_after_sign_in() {
        let (tx, rx) = channel(SessionPhase::Unauthenticated);
        let mut router = RootRouter::new(rx, "tripplanner");
        let route = router.open_deep_link("tripplanner://trips/t1/days/0").unwrap();
        assert_eq!(router.pending_link(), Some(&route));

        tx.send_modify(|s| s.phase = SessionPhase::Authenticated);
        router.sync();
        let tabs = router.main().unwrap();
        assert_eq!(tabs.trips().current(), &route);
        assert_eq!(tabs.trips().depth(), 3);
        assert!(router.pending_link().is_none());
    }

    #[test]
    fn test_removed_trip_pops_its_screens() {
        let (_tx, rx) = channel(SessionPhase::Authenticated);
        let mut router = RootRouter::new(rx, "tripplanner");
        router.open_deep_link("tripplanner://trips/t1").unwrap();
        router.handle_store_event(&StoreEvent::TripRemoved {
            trip_id: "t1".to_string(),
        });
        assert_eq!(router.main().unwrap().trips().current(), &TripsRoute::TripsList);
    }
}
