//! Stack navigator
//!
//! A non-empty stack of routes. `navigate` returns to an existing entry
//! when the same route is already on the stack, `push` always adds one.

use tracing::debug;

use super::routes::Route;
use crate::utils::logging::log_navigation;

/// A navigation request produced by a screen controller
#[derive(Debug, Clone, PartialEq)]
pub enum NavAction<R> {
    Navigate(R),
    Push(R),
    Replace(R),
    GoBack,
    PopToRoot,
    Reset(Vec<R>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackNavigator<R: Route> {
    root: R,
    above: Vec<R>,
}

impl<R: Route> StackNavigator<R> {
    pub fn new(root: R) -> Self {
        Self {
            root,
            above: Vec::new(),
        }
    }

    /// Build a stack from bottom to top; `None` when `routes` is empty
    pub fn from_routes(routes: Vec<R>) -> Option<Self> {
        let mut iter = routes.into_iter();
        let root = iter.next()?;
        Some(Self {
            root,
            above: iter.collect(),
        })
    }

    pub fn current(&self) -> &R {
        self.above.last().unwrap_or(&self.root)
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    /// Routes from bottom to top
    pub fn routes(&self) -> impl Iterator<Item = &R> {
        std::iter::once(&self.root).chain(self.above.iter())
    }

    pub fn depth(&self) -> usize {
        self.above.len() + 1
    }

    pub fn can_go_back(&self) -> bool {
        !self.above.is_empty()
    }

    pub fn contains(&self, route: &R) -> bool {
        self.routes().any(|r| r == route)
    }

    pub fn navigate(&mut self, route: R) {
        if self.current() == &route {
            return;
        }
        let from = self.current().name();
        if self.root == route {
            self.above.clear();
        } else if let Some(pos) = self.above.iter().position(|r| r == &route) {
            self.above.truncate(pos + 1);
        } else {
            self.above.push(route);
        }
        log_navigation(from, self.current().name());
    }

    pub fn push(&mut self, route: R) {
        log_navigation(self.current().name(), route.name());
        self.above.push(route);
    }

    /// Pop the top route. Returns false at the root.
    pub fn go_back(&mut self) -> bool {
        match self.above.pop() {
            Some(popped) => {
                log_navigation(popped.name(), self.current().name());
                true
            }
            None => {
                debug!(route = self.root.name(), "Already at the root route");
                false
            }
        }
    }

    /// Swap the top route for another
    pub fn replace(&mut self, route: R) {
        log_navigation(self.current().name(), route.name());
        match self.above.last_mut() {
            Some(top) => *top = route,
            None => self.root = route,
        }
    }

    pub fn pop_to_root(&mut self) {
        if self.can_go_back() {
            log_navigation(self.current().name(), self.root.name());
            self.above.clear();
        }
    }

    /// Replace the whole stack. An empty list keeps the current root only.
    pub fn reset(&mut self, routes: Vec<R>) {
        let from = self.current().name();
        match Self::from_routes(routes) {
            Some(stack) => *self = stack,
            None => self.above.clear(),
        }
        log_navigation(from, self.current().name());
    }

    /// Drop every route above the root that fails `keep`
    pub fn retain(&mut self, keep: impl Fn(&R) -> bool) {
        let before = self.depth();
        if let Some(pos) = self.above.iter().position(|r| !keep(r)) {
            self.above.truncate(pos);
        }
        if self.depth() != before {
            debug!(
                removed = before - self.depth(),
                current = self.current().name(),
                "Dropped stale routes"
            );
        }
    }

    pub fn apply(&mut self, action: NavAction<R>) {
        match action {
            NavAction::Navigate(route) => self.navigate(route),
            NavAction::Push(route) => self.push(route),
            NavAction::Replace(route) => self.replace(route),
            NavAction::GoBack => {
                self.go_back();
            }
            NavAction::PopToRoot => self.pop_to_root(),
            NavAction::Reset(routes) => self.reset(routes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::routes::{AuthRoute, TripsRoute};

    fn details(id: &str) -> TripsRoute {
        TripsRoute::TripDetails {
            trip_id: id.to_string(),
        }
    }

    #[test]
    fn test_navigate_pops_back_to_existing_route() {
        let mut stack = StackNavigator::new(TripsRoute::TripsList);
        stack.navigate(details("t1"));
        stack.navigate(TripsRoute::DayDetails {
            trip_id: "t1".to_string(),
            day_index: 0,
        });
        assert_eq!(stack.depth(), 3);

        stack.navigate(details("t1"));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current(), &details("t1"));

        stack.navigate(TripsRoute::TripsList);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_allows_duplicates() {
        let mut stack = StackNavigator::new(AuthRoute::Welcome);
        stack.push(AuthRoute::Login);
        stack.push(AuthRoute::Login);
        assert_eq!(stack.depth(), 3);
    }

    #[test]
    fn test_go_back_stops_at_root() {
        let mut stack = StackNavigator::new(AuthRoute::Welcome);
        stack.push(AuthRoute::Login);
        assert!(stack.go_back());
        assert!(!stack.go_back());
        assert_eq!(stack.current(), &AuthRoute::Welcome);
    }

    #[test]
    fn test_replace_and_reset() {
        let mut stack = StackNavigator::new(AuthRoute::Welcome);
        stack.push(AuthRoute::Register);
        stack.replace(AuthRoute::Login);
        assert_eq!(stack.current(), &AuthRoute::Login);
        assert_eq!(stack.depth(), 2);

        stack.replace(AuthRoute::Login);
        stack.reset(vec![AuthRoute::Login]);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.root(), &AuthRoute::Login);

        stack.reset(Vec::new());
        assert_eq!(stack.root(), &AuthRoute::Login);
    }

    #[test]
    fn test_retain_drops_routes_above_first_stale_entry() {
        let mut stack = StackNavigator::from_routes(
            TripsRoute::DayDetails {
                trip_id: "t1".to_string(),
                day_index: 1,
            }
            .ancestry(),
        )
        .unwrap();
        assert_eq!(stack.depth(), 3);

        stack.retain(|r| r.trip_id() != Some("t1"));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current(), &TripsRoute::TripsList);
    }

    #[test]
    fn test_apply_actions() {
        let mut stack = StackNavigator::new(TripsRoute::TripsList);
        stack.apply(NavAction::Push(TripsRoute::CreateTrip));
        stack.apply(NavAction::Replace(details("new")));
        assert_eq!(stack.current(), &details("new"));
        stack.apply(NavAction::GoBack);
        assert_eq!(stack.current(), &TripsRoute::TripsList);
        stack.apply(NavAction::Reset(details("x").ancestry()));
        assert_eq!(stack.depth(), 2);
        stack.apply(NavAction::PopToRoot);
        assert_eq!(stack.depth(), 1);
    }
}
