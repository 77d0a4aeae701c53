//! The routing backend boundary: waypoint persistence and the optimizer

pub mod http;
pub mod memory;

use crate::model::{OptimizationRequest, OptimizationResponse, Waypoint};
use crate::Result;
use async_trait::async_trait;

/// The three calls the client makes against the backend.
///
/// Implementations report transport problems (connection, HTTP status,
/// undecodable body) as `Err`. An optimizer refusal is *not* an `Err` here:
/// it comes back as an [`OptimizationResponse`] carrying `error`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Persists one waypoint; returns the backend's acknowledgment
    async fn add_waypoint(&self, waypoint: &Waypoint) -> Result<serde_json::Value>;

    /// Fetches the authoritative waypoint collection, in server order
    async fn get_waypoints(&self) -> Result<Vec<Waypoint>>;

    /// Asks the optimizer for a route plan over the stored waypoints
    async fn optimize_route(&self, request: &OptimizationRequest) -> Result<OptimizationResponse>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for std::sync::Arc<B> {
    async fn add_waypoint(&self, waypoint: &Waypoint) -> Result<serde_json::Value> {
        (**self).add_waypoint(waypoint).await
    }

    async fn get_waypoints(&self) -> Result<Vec<Waypoint>> {
        (**self).get_waypoints().await
    }

    async fn optimize_route(&self, request: &OptimizationRequest) -> Result<OptimizationResponse> {
        (**self).optimize_route(request).await
    }
}
