//! # waymap
//!
//! A map client for capacitated vehicle routing. Operators drop demand
//! waypoints on a map, the client keeps them in sync with a backend, asks the
//! backend optimizer for a multi-vehicle route plan and draws the result.
//!
//! The crate is organised the way a Leaflet-style engine is: geographic
//! primitives and viewport math in [`core`], overlay layers in [`layers`], a
//! [`surface::MapSurface`] boundary, and the synchronization protocol in
//! [`sync`] tied together by [`client::MapClient`].

pub mod backend;
pub mod client;
pub mod core;
pub mod layers;
pub mod model;
pub mod prelude;
pub mod surface;
pub mod sync;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{ClientConfig, MapViewConfig, RouteErrorPolicy},
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};

pub use backend::{http::HttpBackend, memory::MemoryBackend, Backend};

pub use client::{ClientStatus, MapClient};

pub use layers::{base::LayerTrait, marker::Marker, polyline::Polyline};

pub use model::{OptimizationOutcome, OptimizationRequest, Route, RoutePlan, Waypoint};

pub use surface::{Map, MapSurface};

pub use sync::{
    notify::{ChannelNotifier, LogNotifier, Notification, Notifier},
    renderer::OverlayRenderer,
    routes::{OptimizationState, RouteRequestController},
    store::WaypointStore,
    waypoints::WaypointSyncController,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend returned HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed backend response: {0}")]
    Protocol(String),

    #[error("Optimization failed: {0}")]
    Optimization(String),

    #[error("Invalid waypoint: {0}")]
    InvalidWaypoint(String),

    #[error("Invalid optimization request: {0}")]
    InvalidRequest(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures of the request/response exchange itself, as opposed
    /// to an answer the backend gave on purpose.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Status { .. } | Error::Serialization(_) | Error::Protocol(_)
        )
    }
}

/// Initializes `env_logger` with `waymap=info` unless `RUST_LOG` says otherwise.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("waymap=info"))
        .try_init();
}
