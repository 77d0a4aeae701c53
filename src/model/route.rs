use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// A coordinate as the optimizer reports it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<RoutePoint> for LatLng {
    fn from(point: RoutePoint) -> Self {
        LatLng::new(point.lat, point.lon)
    }
}

/// One vehicle's path, in visit order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub points: Vec<LatLng>,
}

impl Route {
    pub fn new(points: Vec<LatLng>) -> Self {
        Self { points }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.points)
    }

    /// Great-circle length of the path in meters
    pub fn length_meters(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }
}

impl From<Vec<RoutePoint>> for Route {
    fn from(points: Vec<RoutePoint>) -> Self {
        Self::new(points.into_iter().map(LatLng::from).collect())
    }
}

/// Every vehicle's route from one optimization call. Position only picks a
/// display color; it is not a vehicle identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePlan {
    pub routes: Vec<Route>,
}

impl RoutePlan {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Union of every non-empty route's bounds
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.routes
            .iter()
            .filter_map(Route::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    pub fn total_length_meters(&self) -> f64 {
        self.routes.iter().map(Route::length_meters).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_bounds_skip_empty_routes() {
        let plan = RoutePlan::new(vec![
            Route::new(vec![LatLng::new(45.0, -71.0)]),
            Route::default(),
            Route::new(vec![LatLng::new(46.0, -72.0)]),
        ]);
        let bounds = plan.bounds().unwrap();
        assert_eq!(bounds, LatLngBounds::from_coords(45.0, -72.0, 46.0, -71.0));
        assert!(RoutePlan::default().bounds().is_none());
    }

    #[test]
    fn test_route_length() {
        let route = Route::new(vec![
            LatLng::new(45.0, -71.0),
            LatLng::new(45.0, -71.0),
            LatLng::new(46.0, -71.0),
        ]);
        // One degree of latitude is roughly 111 km
        assert!((route.length_meters() - 111_300.0).abs() < 1_000.0);
    }
}
