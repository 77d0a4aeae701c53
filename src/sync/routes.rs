use crate::{
    backend::Backend,
    core::config::RouteErrorPolicy,
    model::{OptimizationOutcome, OptimizationRequest, RoutePlan},
    prelude::{Arc, Mutex},
    surface::MapSurface,
    sync::{
        notify::{Notification, Notifier},
        renderer::{lock_renderer, OverlayRenderer, SharedRenderer},
        sequence::SequenceGuard,
    },
    Error, Result,
};

/// Where the latest optimization call stands
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OptimizationState {
    #[default]
    Idle,
    Requested { sequence: u64 },
    Succeeded(RoutePlan),
    Failed(String),
}

/// Turns optimization calls into route polylines.
///
/// Calls may overlap. Each one takes a sequence number, and an answer that
/// resolves after a newer one was applied is dropped without rendering or
/// notifying.
pub struct RouteRequestController<B: Backend + ?Sized, S: MapSurface> {
    backend: Arc<B>,
    renderer: SharedRenderer<S>,
    notifier: Arc<dyn Notifier>,
    error_policy: RouteErrorPolicy,
    requests: SequenceGuard,
    state: Mutex<OptimizationState>,
}

impl<B: Backend + ?Sized, S: MapSurface> RouteRequestController<B, S> {
    pub fn new(backend: Arc<B>, renderer: SharedRenderer<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            renderer,
            notifier,
            error_policy: RouteErrorPolicy::default(),
            requests: SequenceGuard::new(),
            state: Mutex::new(OptimizationState::Idle),
        }
    }

    pub fn with_error_policy(mut self, policy: RouteErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn error_policy(&self) -> RouteErrorPolicy {
        self.error_policy
    }

    pub fn state(&self) -> OptimizationState {
        self.lock_state().clone()
    }

    /// Asks the optimizer for a plan and draws it.
    ///
    /// An optimizer refusal is `Ok(Rejected)`: nothing new is drawn, the
    /// operator is told, and the error policy decides whether the old routes
    /// stay. Transport failures come back as `Err`.
    pub async fn request_optimization(
        &self,
        num_vehicles: u32,
        vehicle_capacity: u32,
    ) -> Result<OptimizationOutcome> {
        let request = OptimizationRequest::new(num_vehicles, vehicle_capacity);
        if let Err(e) = request.validate() {
            self.report("optimize", &e);
            return Err(e);
        }

        let sequence = self.requests.issue();
        self.set_state(OptimizationState::Requested { sequence });
        log::info!(
            "optimization #{} requested: {} vehicles, capacity {}",
            sequence,
            num_vehicles,
            vehicle_capacity
        );

        let resolved = match self.backend.optimize_route(&request).await {
            Ok(response) => response.into_outcome(),
            Err(e) => Err(e),
        };

        self.apply(sequence, resolved)
    }

    /// Admits and draws under one renderer lock, so an older answer can
    /// never draw over a newer one that was already admitted. The operator
    /// is notified after the lock is released.
    fn apply(
        &self,
        sequence: u64,
        resolved: Result<OptimizationOutcome>,
    ) -> Result<OptimizationOutcome> {
        let mut renderer = lock_renderer(&self.renderer);
        if !self.requests.admit(sequence) {
            log::debug!("dropping stale optimization #{}", sequence);
            return Ok(OptimizationOutcome::Superseded { sequence });
        }

        let (result, failed_operation) = match resolved {
            Ok(OptimizationOutcome::Planned(plan)) => match draw(&mut renderer, &plan) {
                Ok(()) => {
                    log::info!(
                        "optimization #{} drew {} routes ({:.1} km)",
                        sequence,
                        plan.len(),
                        plan.total_length_meters() / 1000.0
                    );
                    self.finish(sequence, OptimizationState::Succeeded(plan.clone()));
                    (Ok(OptimizationOutcome::Planned(plan)), None)
                }
                Err(e) => {
                    self.finish(sequence, OptimizationState::Failed(e.to_string()));
                    (Err(e), Some("draw routes"))
                }
            },
            Ok(OptimizationOutcome::Rejected(message)) => {
                if self.error_policy == RouteErrorPolicy::Clear {
                    if let Err(e) = renderer.clear_route_overlays() {
                        log::warn!("could not clear routes: {}", e);
                    }
                }
                self.finish(sequence, OptimizationState::Failed(message.clone()));
                (Ok(OptimizationOutcome::Rejected(message)), Some("optimize"))
            }
            Ok(superseded @ OptimizationOutcome::Superseded { .. }) => (Ok(superseded), None),
            Err(e) => {
                self.finish(sequence, OptimizationState::Failed(e.to_string()));
                (Err(e), Some("optimize"))
            }
        };
        drop(renderer);

        if let Some(operation) = failed_operation {
            match &result {
                Ok(OptimizationOutcome::Rejected(message)) => {
                    self.report(operation, &Error::Optimization(message.clone()))
                }
                Err(e) => self.report(operation, e),
                Ok(_) => {}
            }
        }
        result
    }

    /// Records the final state unless a newer call is still in flight
    fn finish(&self, sequence: u64, state: OptimizationState) {
        if sequence == self.requests.latest_issued() {
            self.set_state(state);
        }
    }

    fn set_state(&self, state: OptimizationState) {
        *self.lock_state() = state;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, OptimizationState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn report(&self, operation: &str, error: &Error) {
        log::error!("{} failed: {}", operation, error);
        self.notifier.notify(&Notification::from_error(operation, error));
    }
}

fn draw<S: MapSurface>(renderer: &mut OverlayRenderer<S>, plan: &RoutePlan) -> Result<()> {
    if let Some(bounds) = renderer.replace_route_overlays(plan)? {
        renderer.fit_view(&bounds)?;
    }
    Ok(())
}
