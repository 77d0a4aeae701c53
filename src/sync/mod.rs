//! Client-side synchronization: keeps the map's overlays consistent with
//! the backend's waypoints and the latest route plan.

pub mod notify;
pub mod renderer;
pub mod routes;
pub mod sequence;
pub mod store;
pub mod waypoints;
