//! The map client: one surface, one backend, two controllers
//!
//! [`MapClient`] wires the pieces together the way a front end uses them.
//! Startup centers the map and loads the server's waypoints, clicks become
//! waypoints carrying the operator's current demand, and optimization calls
//! draw route plans.

use crate::{
    backend::{http::HttpBackend, Backend},
    core::{config::ClientConfig, geo::LatLng},
    model::{OptimizationOutcome, Waypoint},
    prelude::Arc,
    surface::{Map, MapEvent, MapSurface},
    sync::{
        notify::Notifier,
        renderer::{lock_renderer, OverlayRenderer, SharedRenderer},
        routes::{OptimizationState, RouteRequestController},
        waypoints::WaypointSyncController,
    },
    Result,
};
use std::sync::atomic::{AtomicI64, Ordering};

/// Snapshot of what the client currently shows
#[derive(Debug, Clone, PartialEq)]
pub struct ClientStatus {
    pub waypoints: usize,
    pub total_demand: i64,
    pub next_demand: i64,
    pub routes_drawn: usize,
    pub optimization: OptimizationState,
    pub center: LatLng,
    pub zoom: f64,
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let optimization = match &self.optimization {
            OptimizationState::Idle => "idle".to_string(),
            OptimizationState::Requested { sequence } => format!("request #{} pending", sequence),
            OptimizationState::Succeeded(plan) => format!("{} routes", plan.len()),
            OptimizationState::Failed(message) => format!("failed: {}", message),
        };
        write!(
            f,
            "{} waypoints (total demand {}), next demand {}, {} routes drawn, optimization {}, view {} @ z{}",
            self.waypoints,
            self.total_demand,
            self.next_demand,
            self.routes_drawn,
            optimization,
            self.center,
            self.zoom
        )
    }
}

pub struct MapClient<B: Backend + ?Sized, S: MapSurface> {
    config: ClientConfig,
    renderer: SharedRenderer<S>,
    waypoints: WaypointSyncController<B, S>,
    routes: RouteRequestController<B, S>,
    next_demand: AtomicI64,
}

impl MapClient<HttpBackend, Map> {
    /// HTTP backend and headless map, both built from `config`
    pub fn from_config(config: ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let backend = Arc::new(HttpBackend::from_config(&config)?);
        let surface = Map::from_config(&config.map)?;
        Self::new(config, backend, surface, notifier)
    }
}

impl<B: Backend + ?Sized, S: MapSurface> MapClient<B, S> {
    pub fn new(
        config: ClientConfig,
        backend: Arc<B>,
        surface: S,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        config.validate()?;

        let renderer = OverlayRenderer::new(surface)
            .with_palette(config.route_palette.clone())
            .with_fit_padding(config.map.fit_padding)
            .into_shared();
        let waypoints = WaypointSyncController::new(backend.clone(), renderer.clone(), notifier.clone());
        let routes = RouteRequestController::new(backend, renderer.clone(), notifier)
            .with_error_policy(config.route_error_policy);

        Ok(Self {
            config,
            renderer,
            waypoints,
            routes,
            next_demand: AtomicI64::new(0),
        })
    }

    /// Centers the map on the configured view, then loads the server's
    /// waypoints.
    pub async fn startup(&self) -> Result<()> {
        let (center, zoom) = (self.config.map.center, self.config.map.zoom);
        lock_renderer(&self.renderer).surface_mut().set_view(center, zoom)?;
        log::info!("map centered on {} at zoom {}", center, zoom);
        self.waypoints.refresh().await
    }

    /// Demand given to the waypoint created by the next click
    pub fn set_demand(&self, demand: i64) {
        self.next_demand.store(demand, Ordering::SeqCst);
    }

    pub fn demand(&self) -> i64 {
        self.next_demand.load(Ordering::SeqCst)
    }

    /// A map click: creates a waypoint there with the current demand
    pub async fn handle_click(&self, lat_lng: LatLng) -> Result<()> {
        self.waypoints.add_waypoint(lat_lng, self.demand()).await
    }

    pub async fn add_waypoint(&self, lat_lng: LatLng, demand: i64) -> Result<()> {
        self.waypoints.add_waypoint(lat_lng, demand).await
    }

    pub async fn refresh(&self) -> Result<()> {
        self.waypoints.refresh().await
    }

    pub async fn optimize(&self, num_vehicles: u32, vehicle_capacity: u32) -> Result<OptimizationOutcome> {
        self.routes
            .request_optimization(num_vehicles, vehicle_capacity)
            .await
    }

    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.waypoints.waypoints()
    }

    pub fn optimization_state(&self) -> OptimizationState {
        self.routes.state()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn renderer(&self) -> &SharedRenderer<S> {
        &self.renderer
    }

    /// Runs `f` against the surface while holding the renderer lock
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(lock_renderer(&self.renderer).surface())
    }

    pub fn status(&self) -> ClientStatus {
        let (routes_drawn, center, zoom) = {
            let renderer = lock_renderer(&self.renderer);
            let viewport = renderer.surface().viewport();
            (renderer.route_overlay_ids().len(), viewport.center, viewport.zoom)
        };
        ClientStatus {
            waypoints: self.waypoints.waypoint_count(),
            total_demand: self.waypoints.total_demand(),
            next_demand: self.demand(),
            routes_drawn,
            optimization: self.routes.state(),
            center,
            zoom,
        }
    }
}

impl<B: Backend + ?Sized> MapClient<B, Map> {
    /// Reports a click on the headless map and dispatches it
    pub async fn click(&self, lat_lng: LatLng) -> Result<usize> {
        lock_renderer(&self.renderer).surface_mut().click(lat_lng)?;
        self.process_events().await
    }

    /// Drains the map's event queue and turns every click into a waypoint.
    /// Returns how many clicks were handled; failures were already reported
    /// to the operator.
    pub async fn process_events(&self) -> Result<usize> {
        let events = lock_renderer(&self.renderer).surface_mut().process_events();

        let mut handled = 0;
        let mut first_error = None;
        for event in events {
            if let MapEvent::Click { lat_lng } = event {
                handled += 1;
                if let Err(e) = self.handle_click(lat_lng).await {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(handled),
        }
    }
}

#[cfg(feature = "tokio-runtime")]
impl<B, S> MapClient<B, S>
where
    B: Backend + ?Sized + 'static,
    S: MapSurface + 'static,
{
    /// Runs an optimization on the tokio runtime without waiting for it.
    /// Overlapping calls are allowed; only the newest answer is drawn.
    pub fn spawn_optimize(
        self: &Arc<Self>,
        num_vehicles: u32,
        vehicle_capacity: u32,
    ) -> tokio::task::JoinHandle<Result<OptimizationOutcome>> {
        let client = Arc::clone(self);
        tokio::spawn(async move { client.optimize(num_vehicles, vehicle_capacity).await })
    }
}
