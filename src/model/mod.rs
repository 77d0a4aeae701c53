//! Data exchanged with the routing backend

pub mod optimization;
pub mod route;
pub mod waypoint;

pub use optimization::{OptimizationOutcome, OptimizationRequest, OptimizationResponse};
pub use route::{Route, RoutePlan};
pub use waypoint::Waypoint;
