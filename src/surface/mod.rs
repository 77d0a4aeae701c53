//! The map surface boundary
//!
//! [`MapSurface`] is everything the overlay renderer needs from a map
//! widget. [`Map`] implements it headlessly: viewport math, a layer registry
//! and an event queue, with drawing left to whatever front end embeds it.

pub mod events;
pub mod map;

pub use events::MapEvent;
pub use map::Map;

use crate::core::geo::{LatLng, LatLngBounds};
use crate::core::viewport::Viewport;
use crate::layers::base::{LayerTrait, LayerType};
use crate::Result;

pub trait MapSurface: Send {
    /// Centers the view on `center` at `zoom`
    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()>;

    /// Adds an overlay; its ID must not already be on the surface
    fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()>;

    /// Removes an overlay; removing an unknown ID is not an error
    fn remove_layer(&mut self, layer_id: &str) -> Result<()>;

    /// Adjusts the view so `bounds` is fully visible
    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Option<f64>) -> Result<()>;

    fn viewport(&self) -> &Viewport;

    /// Number of overlays of one kind currently on the surface
    fn layer_count(&self, layer_type: LayerType) -> usize;
}
