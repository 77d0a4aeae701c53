use crate::{
    backend::Backend,
    core::geo::LatLng,
    model::Waypoint,
    prelude::{Arc, Mutex},
    surface::MapSurface,
    sync::{
        notify::{Notification, Notifier},
        renderer::{lock_renderer, SharedRenderer},
        sequence::SequenceGuard,
        store::WaypointStore,
    },
    Error, Result,
};

/// Keeps the client's waypoint mirror and markers in step with the server.
///
/// The server owns the collection. The client only creates waypoints and
/// re-fetches; it never patches its mirror locally.
pub struct WaypointSyncController<B: Backend + ?Sized, S: MapSurface> {
    backend: Arc<B>,
    renderer: SharedRenderer<S>,
    notifier: Arc<dyn Notifier>,
    store: Mutex<WaypointStore>,
    refreshes: SequenceGuard,
}

impl<B: Backend + ?Sized, S: MapSurface> WaypointSyncController<B, S> {
    pub fn new(backend: Arc<B>, renderer: SharedRenderer<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            renderer,
            notifier,
            store: Mutex::new(WaypointStore::new()),
            refreshes: SequenceGuard::new(),
        }
    }

    /// Creates a waypoint at `coordinate`, then refreshes once the server
    /// acknowledged it. Nothing is drawn before the refresh.
    pub async fn add_waypoint(&self, coordinate: LatLng, demand: i64) -> Result<()> {
        let waypoint = Waypoint::new(coordinate, demand);
        self.create(&waypoint).await?;
        self.refresh().await
    }

    /// Sends one waypoint to the server. Invalid waypoints are reported and
    /// never sent.
    pub async fn create(&self, waypoint: &Waypoint) -> Result<()> {
        if let Err(e) = waypoint.validate() {
            self.report("add waypoint", &e);
            return Err(e);
        }

        match self.backend.add_waypoint(waypoint).await {
            Ok(ack) => {
                log::info!(
                    "waypoint {} (demand {}) created: {}",
                    waypoint.position(),
                    waypoint.demand,
                    ack
                );
                Ok(())
            }
            Err(e) => {
                self.report("add waypoint", &e);
                Err(e)
            }
        }
    }

    /// Fetches the server's collection and redraws every marker from it.
    ///
    /// A failed fetch leaves the mirror and the markers as they were. A
    /// fetch that resolves after a newer one was applied is dropped.
    pub async fn refresh(&self) -> Result<()> {
        let sequence = self.refreshes.issue();
        let fetched = self.backend.get_waypoints().await;
        self.apply(sequence, fetched)
    }

    /// Admits, draws and mirrors one fetched collection under a single
    /// renderer lock, so a newer refresh cannot land in between.
    fn apply(&self, sequence: u64, fetched: Result<Vec<Waypoint>>) -> Result<()> {
        let mut renderer = lock_renderer(&self.renderer);
        if !self.refreshes.admit(sequence) {
            log::debug!("dropping stale waypoint refresh #{}", sequence);
            return Ok(());
        }

        let failure = match fetched {
            Ok(waypoints) => {
                log::debug!("refresh #{} fetched {} waypoints", sequence, waypoints.len());
                let rendered = renderer.replace_waypoint_overlays(&waypoints);
                self.lock_store().replace(waypoints);
                rendered.err().map(|e| ("draw waypoints", e))
            }
            Err(e) => Some(("refresh waypoints", e)),
        };
        drop(renderer);

        match failure {
            Some((operation, e)) => {
                self.report(operation, &e);
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// Copy of the last applied collection, in server order
    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.lock_store().snapshot()
    }

    pub fn waypoint_count(&self) -> usize {
        self.lock_store().len()
    }

    pub fn total_demand(&self) -> i64 {
        self.lock_store().total_demand()
    }

    fn lock_store(&self) -> std::sync::MutexGuard<'_, WaypointStore> {
        self.store
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn report(&self, operation: &str, error: &Error) {
        log::error!("{} failed: {}", operation, error);
        self.notifier.notify(&Notification::from_error(operation, error));
    }
}
