use crate::{
    core::{
        config::MapViewConfig,
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{
        base::{LayerTrait, LayerType},
        manager::LayerManager,
        tile::TileLayer,
    },
    prelude::{HashMap, VecDeque},
    surface::{MapEvent, MapSurface},
    Error, Result,
};

pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Headless map: viewport, overlay registry and event queue
pub struct Map {
    pub viewport: Viewport,
    layer_manager: LayerManager,
    listeners: HashMap<String, Vec<EventCallback>>,
    event_queue: VecDeque<MapEvent>,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            viewport: Viewport::new(center, zoom, size),
            layer_manager: LayerManager::new(),
            listeners: HashMap::default(),
            event_queue: VecDeque::new(),
        }
    }

    /// Builds the startup map: configured view plus the base tile layer
    pub fn from_config(config: &MapViewConfig) -> Result<Self> {
        let mut map = Self::new(config.center, config.zoom, config.size);
        map.viewport.set_zoom_limits(0.0, config.max_zoom);
        map.viewport.set_zoom(config.zoom);

        let base = TileLayer::new(
            "base".to_string(),
            "Base map".to_string(),
            config.tile_url.clone(),
            config.max_zoom,
        )
        .with_attribution("© OpenStreetMap contributors");
        map.add_layer(Box::new(base))?;
        Ok(map)
    }

    /// Registers a listener for one event type ("click", "layeradd", ...)
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Queues clicks always; surface bookkeeping events only while some
    /// listener subscribes to them, so the queue stays bounded when nobody
    /// drains it.
    fn emit(&mut self, event: MapEvent) {
        let wanted = matches!(event, MapEvent::Click { .. })
            || self
                .listeners
                .get(event.event_type())
                .map_or(false, |callbacks| !callbacks.is_empty());
        if wanted {
            self.event_queue.push_back(event);
        }
    }

    /// Events waiting for [`Map::process_events`]
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    /// A click on the map at `lat_lng`, as the front end reports it
    pub fn click(&mut self, lat_lng: LatLng) -> Result<()> {
        if !lat_lng.is_valid() {
            return Err(Error::InvalidWaypoint(format!(
                "click outside the world at {}",
                lat_lng
            )));
        }
        self.emit(MapEvent::Click { lat_lng });
        Ok(())
    }

    /// Drains queued events, dispatching each to its listeners
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Layers of one kind in render order
    pub fn layers_of_type(&self, layer_type: LayerType) -> Vec<&dyn LayerTrait> {
        self.layer_manager.layers_of_type(layer_type)
    }

    fn view_changed(&mut self) {
        let (center, zoom) = (self.viewport.center, self.viewport.zoom);
        self.emit(MapEvent::ViewChanged { center, zoom });
    }
}

impl MapSurface for Map {
    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(Error::InvalidWaypoint(format!("view center {} is out of range", center)));
        }
        let (old_center, old_zoom) = (self.viewport.center, self.viewport.zoom);
        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);

        if self.viewport.center != old_center || self.viewport.zoom != old_zoom {
            self.view_changed();
        }
        Ok(())
    }

    fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.layer_manager.add_layer(layer)?;
        self.emit(MapEvent::LayerAdd { layer_id });
        Ok(())
    }

    fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
        if self.layer_manager.remove_layer(layer_id).is_some() {
            self.emit(MapEvent::LayerRemove {
                layer_id: layer_id.to_string(),
            });
        }
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Option<f64>) -> Result<()> {
        self.viewport.fit_bounds(bounds, padding);
        self.view_changed();
        Ok(())
    }

    fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn layer_count(&self, layer_type: LayerType) -> usize {
        self.layer_manager.layers_of_type(layer_type).len()
    }
}
