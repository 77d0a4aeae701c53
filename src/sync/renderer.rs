use crate::{
    core::{constants::ROUTE_PALETTE, geo::LatLngBounds},
    layers::{
        marker::Marker,
        polyline::{LineStyle, Polyline},
    },
    model::{RoutePlan, Waypoint},
    prelude::{Arc, Mutex},
    surface::MapSurface,
    Result,
};
use std::sync::MutexGuard;

/// Renderer shared between the controllers. The lock is never held across
/// an `.await`, so renders cannot interleave.
pub type SharedRenderer<S> = Arc<Mutex<OverlayRenderer<S>>>;

/// Locks a shared renderer, recovering from a poisoned lock: every replace
/// starts by tearing down whatever it finds, so the state stays usable.
pub fn lock_renderer<S: MapSurface>(renderer: &SharedRenderer<S>) -> MutexGuard<'_, OverlayRenderer<S>> {
    renderer
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Sole owner of the waypoint markers and route polylines on a surface.
///
/// Both sets are managed independently with replace-all semantics: the
/// previous set is torn down before the next one is drawn.
pub struct OverlayRenderer<S: MapSurface> {
    surface: S,
    palette: Vec<String>,
    fit_padding: Option<f64>,
    waypoint_overlays: Vec<String>,
    route_overlays: Vec<String>,
    generation: u64,
}

impl<S: MapSurface> OverlayRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            palette: ROUTE_PALETTE.iter().map(|c| c.to_string()).collect(),
            fit_padding: None,
            waypoint_overlays: Vec::new(),
            route_overlays: Vec::new(),
            generation: 0,
        }
    }

    /// Route colors; an empty palette keeps the default one
    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    pub fn with_fit_padding(mut self, padding: f64) -> Self {
        self.fit_padding = Some(padding);
        self
    }

    pub fn into_shared(self) -> SharedRenderer<S> {
        Arc::new(Mutex::new(self))
    }

    /// Color of the route at `index` in a plan
    pub fn route_color(&self, index: usize) -> &str {
        &self.palette[index % self.palette.len()]
    }

    /// Replaces every waypoint marker with one marker per waypoint,
    /// labelled with its demand.
    pub fn replace_waypoint_overlays(&mut self, waypoints: &[Waypoint]) -> Result<()> {
        tear_down(&mut self.surface, &mut self.waypoint_overlays)?;
        let generation = self.next_generation();

        for (index, waypoint) in waypoints.iter().enumerate() {
            let id = format!("waypoint-{}-{}", generation, index);
            let marker = Marker::new(id.clone(), waypoint.position()).with_popup(waypoint.label());
            self.surface.add_layer(Box::new(marker))?;
            self.waypoint_overlays.push(id);
        }

        log::debug!("drew {} waypoint markers", self.waypoint_overlays.len());
        Ok(())
    }

    /// Replaces every route polyline with one polyline per route and
    /// returns the bounds covering all drawn routes.
    pub fn replace_route_overlays(&mut self, plan: &RoutePlan) -> Result<Option<LatLngBounds>> {
        tear_down(&mut self.surface, &mut self.route_overlays)?;
        let generation = self.next_generation();

        for (index, route) in plan.routes.iter().enumerate() {
            let id = format!("route-{}-{}", generation, index);
            let style = LineStyle::with_color(self.route_color(index));
            let polyline = Polyline::new(id.clone(), route.points.clone(), style);
            self.surface.add_layer(Box::new(polyline))?;
            self.route_overlays.push(id);
        }

        log::debug!("drew {} route polylines", self.route_overlays.len());
        Ok(plan.bounds())
    }

    pub fn clear_route_overlays(&mut self) -> Result<()> {
        tear_down(&mut self.surface, &mut self.route_overlays)
    }

    /// Moves the viewport so `bounds` is fully visible
    pub fn fit_view(&mut self, bounds: &LatLngBounds) -> Result<()> {
        self.surface.fit_bounds(bounds, self.fit_padding)
    }

    pub fn waypoint_overlay_ids(&self) -> &[String] {
        &self.waypoint_overlays
    }

    pub fn route_overlay_ids(&self) -> &[String] {
        &self.route_overlays
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

/// Removes every overlay in `ids` from the surface. IDs whose removal
/// failed stay in `ids` so a later replace retries them.
fn tear_down<S: MapSurface>(surface: &mut S, ids: &mut Vec<String>) -> Result<()> {
    let mut first_error = None;
    ids.retain(|id| match surface.remove_layer(id) {
        Ok(()) => false,
        Err(e) => {
            log::warn!("failed to remove overlay {}: {}", id, e);
            first_error.get_or_insert(e);
            true
        }
    });

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
