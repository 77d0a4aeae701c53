use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::base::{LayerProperties, LayerTrait, LayerType},
};
use serde::{Deserialize, Serialize};

/// Style for line features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Line color, as a CSS color name or hex string
    pub color: String,
    /// Line width
    pub width: f32,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
}

impl LineStyle {
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            width: 3.0,
            opacity: 1.0,
        }
    }
}

/// An ordered path drawn as one connected line
pub struct Polyline {
    properties: LayerProperties,
    points: Vec<LatLng>,
    style: LineStyle,
}

impl Polyline {
    pub fn new(id: String, points: Vec<LatLng>, style: LineStyle) -> Self {
        let properties = LayerProperties::new(id, "Polyline".to_string(), LayerType::Polyline);
        Self {
            properties,
            points,
            style,
        }
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn color(&self) -> &str {
        &self.style.color
    }
}

impl LayerTrait for Polyline {
    crate::impl_layer_trait!(Polyline, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "points": self.points.iter().map(|p| [p.lat, p.lng]).collect::<Vec<_>>(),
            "color": self.style.color,
            "weight": self.style.width,
            "opacity": self.style.opacity,
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_bounds() {
        let line = Polyline::new(
            "route-0".to_string(),
            vec![LatLng::new(45.0, -71.0), LatLng::new(46.0, -72.0)],
            LineStyle::with_color("red"),
        );

        let bounds = line.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(45.0, -72.0));
        assert_eq!(bounds.north_east, LatLng::new(46.0, -71.0));
        assert_eq!(line.color(), "red");
        assert_eq!(line.options()["color"], "red");
    }

    #[test]
    fn test_empty_polyline_has_no_bounds() {
        let line = Polyline::new("route-0".to_string(), Vec::new(), LineStyle::default());
        assert!(line.bounds().is_none());
    }
}
