use crate::core::constants::DEMAND_LABEL_PREFIX;
use crate::core::geo::LatLng;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A demand location, in the backend's wire shape `{lat, lon, demand}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub demand: i64,
}

impl Waypoint {
    pub fn new(position: LatLng, demand: i64) -> Self {
        Self {
            lat: position.lat,
            lon: position.lng,
            demand,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }

    /// Popup text shown on the waypoint's marker
    pub fn label(&self) -> String {
        format!("{}{}", DEMAND_LABEL_PREFIX, self.demand)
    }

    /// Checks coordinate ranges and a non-negative demand
    pub fn validate(&self) -> Result<()> {
        if !self.position().is_valid() {
            return Err(Error::InvalidWaypoint(format!(
                "coordinate {} is outside lat [-90, 90] / lon [-180, 180]",
                self.position()
            )));
        }
        if self.demand < 0 {
            return Err(Error::InvalidWaypoint(format!(
                "demand must be >= 0, got {}",
                self.demand
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let waypoint = Waypoint::new(LatLng::new(45.383402, -71.932936), 5);
        let json = serde_json::to_value(waypoint).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "lat": 45.383402, "lon": -71.932936, "demand": 5 })
        );
    }

    #[test]
    fn test_label() {
        let waypoint = Waypoint::new(LatLng::new(45.0, -71.0), 5);
        assert_eq!(waypoint.label(), "Demande: 5");
    }

    #[test]
    fn test_validate() {
        assert!(Waypoint::new(LatLng::new(45.0, -71.0), 0).validate().is_ok());
        assert!(Waypoint::new(LatLng::new(95.0, -71.0), 1).validate().is_err());
        assert!(Waypoint::new(LatLng::new(45.0, -181.0), 1).validate().is_err());
        assert!(matches!(
            Waypoint::new(LatLng::new(45.0, -71.0), -3).validate(),
            Err(Error::InvalidWaypoint(_))
        ));
    }
}
