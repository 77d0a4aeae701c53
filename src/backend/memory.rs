//! In-process [`Backend`] with scriptable answers and a call journal
//!
//! Used by the test-suite and for running the client without a server. The
//! default optimizer answer is a placeholder (round-robin over vehicles),
//! not an optimization.

use crate::backend::Backend;
use crate::model::route::RoutePoint;
use crate::model::{OptimizationRequest, OptimizationResponse, Waypoint};
use crate::prelude::{Mutex, VecDeque};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::channel::oneshot;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    AddWaypoint(Waypoint),
    GetWaypoints,
    OptimizeRoute(OptimizationRequest),
}

/// Backend endpoints, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AddWaypoint,
    GetWaypoints,
    OptimizeRoute,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::AddWaypoint => crate::core::constants::ADD_WAYPOINT_PATH,
            Endpoint::GetWaypoints => crate::core::constants::GET_WAYPOINTS_PATH,
            Endpoint::OptimizeRoute => crate::core::constants::OPTIMIZE_ROUTE_PATH,
        }
    }
}

struct ScriptedAnswer<T> {
    response: T,
    gate: Option<oneshot::Receiver<()>>,
}

impl<T> ScriptedAnswer<T> {
    /// Waits for the gate, if any. A dropped sender releases the answer too.
    async fn release(self) -> T {
        if let Some(gate) = self.gate {
            let _ = gate.await;
        }
        self.response
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    waypoints: Mutex<Vec<Waypoint>>,
    optimize_script: Mutex<VecDeque<ScriptedAnswer<OptimizationResponse>>>,
    waypoints_script: Mutex<VecDeque<ScriptedAnswer<Vec<Waypoint>>>>,
    failures: Mutex<Vec<Endpoint>>,
    journal: Mutex<Vec<BackendCall>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with waypoints already stored, as if added earlier
    pub fn with_waypoints(waypoints: Vec<Waypoint>) -> Self {
        let backend = Self::default();
        *lock(&backend.waypoints) = waypoints;
        backend
    }

    /// Queues the answer for the next `optimize_route` call
    pub fn script_optimize(&self, response: OptimizationResponse) {
        lock(&self.optimize_script).push_back(ScriptedAnswer {
            response,
            gate: None,
        });
    }

    /// Queues an answer that is held back until the returned sender fires
    /// (or is dropped), to control the order in which calls resolve.
    pub fn script_optimize_gated(&self, response: OptimizationResponse) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        lock(&self.optimize_script).push_back(ScriptedAnswer {
            response,
            gate: Some(rx),
        });
        tx
    }

    /// Answers the next `get_waypoints` with `waypoints` instead of the
    /// stored collection, held back until the returned sender fires.
    pub fn script_waypoints_gated(&self, waypoints: Vec<Waypoint>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        lock(&self.waypoints_script).push_back(ScriptedAnswer {
            response: waypoints,
            gate: Some(rx),
        });
        tx
    }

    /// Makes the next call to `endpoint` fail with HTTP 503
    pub fn fail_next(&self, endpoint: Endpoint) {
        lock(&self.failures).push(endpoint);
    }

    /// Server-side mutation the client never sees until it refreshes
    pub fn replace_waypoints(&self, waypoints: Vec<Waypoint>) {
        *lock(&self.waypoints) = waypoints;
    }

    pub fn stored_waypoints(&self) -> Vec<Waypoint> {
        lock(&self.waypoints).clone()
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.journal).clone()
    }

    fn record(&self, call: BackendCall) {
        lock(&self.journal).push(call);
    }

    fn take_failure(&self, endpoint: Endpoint) -> Result<()> {
        let mut failures = lock(&self.failures);
        match failures.iter().position(|e| *e == endpoint) {
            Some(index) => {
                failures.remove(index);
                Err(Error::Status {
                    endpoint: endpoint.path().to_string(),
                    status: 503,
                })
            }
            None => Ok(()),
        }
    }

    /// Stand-in plan: the first waypoint is the depot, the others are dealt
    /// round-robin to vehicles and every non-trivial route starts at the depot.
    fn placeholder_plan(&self, request: &OptimizationRequest) -> OptimizationResponse {
        let waypoints = lock(&self.waypoints).clone();
        if waypoints.len() < 2 {
            return OptimizationResponse::error("At least 2 waypoints required");
        }

        let depot = RoutePoint {
            lat: waypoints[0].lat,
            lon: waypoints[0].lon,
        };
        let vehicles = request.num_vehicles.max(1) as usize;
        let mut routes: Vec<Vec<RoutePoint>> = vec![vec![depot]; vehicles];
        for (i, waypoint) in waypoints.iter().skip(1).enumerate() {
            routes[i % vehicles].push(RoutePoint {
                lat: waypoint.lat,
                lon: waypoint.lon,
            });
        }
        routes.retain(|route| route.len() > 1);
        OptimizationResponse::routes(routes)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn add_waypoint(&self, waypoint: &Waypoint) -> Result<serde_json::Value> {
        self.record(BackendCall::AddWaypoint(*waypoint));
        self.take_failure(Endpoint::AddWaypoint)?;
        lock(&self.waypoints).push(*waypoint);
        Ok(serde_json::json!({ "status": "success" }))
    }

    async fn get_waypoints(&self) -> Result<Vec<Waypoint>> {
        self.record(BackendCall::GetWaypoints);
        self.take_failure(Endpoint::GetWaypoints)?;

        let scripted = lock(&self.waypoints_script).pop_front();
        match scripted {
            Some(answer) => Ok(answer.release().await),
            None => Ok(lock(&self.waypoints).clone()),
        }
    }

    async fn optimize_route(&self, request: &OptimizationRequest) -> Result<OptimizationResponse> {
        self.record(BackendCall::OptimizeRoute(*request));
        self.take_failure(Endpoint::OptimizeRoute)?;

        let scripted = lock(&self.optimize_script).pop_front();
        match scripted {
            Some(answer) => Ok(answer.release().await),
            None => Ok(self.placeholder_plan(request)),
        }
    }
}
