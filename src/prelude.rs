//! Prelude module for common waymap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use waymap::prelude::*;`

pub use crate::core::{
    config::{ClientConfig, MapViewConfig, RouteErrorPolicy},
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerProperties, LayerTrait, LayerType},
    manager::LayerManager,
    marker::Marker,
    polyline::{LineStyle, Polyline},
};

pub use crate::backend::{http::HttpBackend, memory::MemoryBackend, Backend};

pub use crate::model::{
    OptimizationOutcome, OptimizationRequest, OptimizationResponse, Route, RoutePlan, Waypoint,
};

pub use crate::surface::{Map, MapEvent, MapSurface};

pub use crate::sync::{
    notify::{ChannelNotifier, LogNotifier, Notification, Notifier},
    renderer::{OverlayRenderer, SharedRenderer},
    routes::{OptimizationState, RouteRequestController},
    store::WaypointStore,
    waypoints::WaypointSyncController,
};

pub use crate::client::MapClient;

pub use crate::{Error, Result};

pub use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
