use crate::model::route::{Route, RoutePlan, RoutePoint};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Body of `POST /optimize_route`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub num_vehicles: u32,
    pub vehicle_capacity: u32,
}

impl OptimizationRequest {
    pub fn new(num_vehicles: u32, vehicle_capacity: u32) -> Self {
        Self {
            num_vehicles,
            vehicle_capacity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_vehicles < 1 {
            return Err(Error::InvalidRequest(
                "at least one vehicle is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Raw answer of `POST /optimize_route`: either `routes` or `error`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Vec<RoutePoint>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OptimizationResponse {
    pub fn routes(routes: Vec<Vec<RoutePoint>>) -> Self {
        Self {
            routes: Some(routes),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            routes: None,
            error: Some(message.into()),
        }
    }

    /// Resolves the response. A non-empty `error` wins over `routes`; a body
    /// with neither is a protocol error.
    pub fn into_outcome(self) -> Result<OptimizationOutcome> {
        match (self.error, self.routes) {
            (Some(message), _) if !message.is_empty() => Ok(OptimizationOutcome::Rejected(message)),
            (_, Some(routes)) => Ok(OptimizationOutcome::Planned(RoutePlan::new(
                routes.into_iter().map(Route::from).collect(),
            ))),
            _ => Err(Error::Protocol(
                "optimize_route response has neither 'routes' nor 'error'".to_string(),
            )),
        }
    }
}

/// What one optimization call amounted to
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationOutcome {
    /// The optimizer produced a plan
    Planned(RoutePlan),
    /// The optimizer refused, with its message
    Rejected(String),
    /// A newer request already resolved; this answer was dropped unapplied
    Superseded { sequence: u64 },
}
