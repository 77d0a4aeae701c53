use crate::core::geo::LatLngBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Marker,
    Polyline,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Marker => write!(f, "marker"),
            LayerType::Polyline => write!(f, "polyline"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        // Base tiles under routes, routes under markers, like Leaflet panes
        let z_index = match layer_type {
            LayerType::Tile => 0,
            LayerType::Polyline => 400,
            LayerType::Marker => 600,
        };
        Self {
            id,
            name,
            layer_type,
            z_index,
        }
    }
}

/// Anything that can be placed on a map surface as an overlay
pub trait LayerTrait: Send + Sync {
    /// Unique per surface
    fn id(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    /// Render order; higher draws on top
    fn z_index(&self) -> i32;

    /// Geographic extent, for layers that have one
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Layer options as the surface would receive them
    fn options(&self) -> serde_json::Value;

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties() {
        let props = LayerProperties::new(
            "route-0".to_string(),
            "Route 1".to_string(),
            LayerType::Polyline,
        );

        assert_eq!(props.id, "route-0");
        assert_eq!(props.name, "Route 1");
        assert_eq!(props.layer_type, LayerType::Polyline);
        assert_eq!(props.z_index, 400);
    }

    #[test]
    fn test_markers_stack_above_routes() {
        let marker = LayerProperties::new("m".into(), "m".into(), LayerType::Marker);
        let route = LayerProperties::new("r".into(), "r".into(), LayerType::Polyline);
        let tiles = LayerProperties::new("t".into(), "t".into(), LayerType::Tile);
        assert!(marker.z_index > route.z_index);
        assert!(route.z_index > tiles.z_index);
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Tile.to_string(), "tile");
        assert_eq!(LayerType::Polyline.to_string(), "polyline");
        assert_eq!(LayerType::Marker.to_string(), "marker");
    }
}
