use crate::{
    layers::base::{LayerTrait, LayerType},
    prelude::HashMap,
    Error, Result,
};

/// Manages layers for the map, handling ordering and lookup
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs for rendering (sorted by z-index)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer to the manager. IDs are unique per map.
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(Error::Layer(format!("layer '{}' already exists", layer_id)));
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Gets all layers in render order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Layers of one kind, in render order
    pub fn layers_of_type(&self, layer_type: LayerType) -> Vec<&dyn LayerTrait> {
        self.layers()
            .into_iter()
            .filter(|layer| layer.layer_type() == layer_type)
            .collect()
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::layers::{
        marker::Marker,
        polyline::{LineStyle, Polyline},
    };

    #[test]
    fn test_render_order_follows_z_index() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(Marker::new("m".to_string(), LatLng::new(1.0, 1.0))))
            .unwrap();
        manager
            .add_layer(Box::new(Polyline::new(
                "p".to_string(),
                vec![LatLng::new(0.0, 0.0)],
                LineStyle::default(),
            )))
            .unwrap();

        let ids: Vec<&str> = manager.layers().iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["p", "m"]);
        assert_eq!(manager.layers_of_type(LayerType::Marker).len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut manager = LayerManager::new();
        let position = LatLng::new(1.0, 1.0);
        manager
            .add_layer(Box::new(Marker::new("m".to_string(), position)))
            .unwrap();
        let second = manager.add_layer(Box::new(Marker::new("m".to_string(), position)));
        assert!(matches!(second, Err(Error::Layer(_))));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_remove_layer() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(Marker::new("m".to_string(), LatLng::new(1.0, 1.0))))
            .unwrap();
        assert!(manager.remove_layer("m").is_some());
        assert!(manager.remove_layer("m").is_none());
        assert!(manager.is_empty());
    }
}
