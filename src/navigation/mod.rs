//! Navigation module
//!
//! Typed routes, stack navigators and the root router driven by the session

pub mod router;
pub mod routes;
pub mod stack;

pub use router::{MainTab, MainTabs, RootRouter, RootState};
pub use routes::{AuthRoute, Route, TripsRoute};
pub use stack::{NavAction, StackNavigator};
