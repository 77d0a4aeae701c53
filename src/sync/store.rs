use crate::model::Waypoint;

/// Client mirror of the server's waypoint collection. Only ever replaced
/// wholesale with a freshly fetched list.
#[derive(Debug, Clone, Default)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
}

impl WaypointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, waypoints: Vec<Waypoint>) {
        self.waypoints = waypoints;
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn snapshot(&self) -> Vec<Waypoint> {
        self.waypoints.clone()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn total_demand(&self) -> i64 {
        self.waypoints.iter().map(|w| w.demand).sum()
    }
}
