use crate::layers::base::{LayerProperties, LayerTrait, LayerType};

/// Raster base layer. The surface owns fetching and drawing the tiles;
/// this layer only carries the source description.
pub struct TileLayer {
    properties: LayerProperties,
    url_template: String,
    max_zoom: f64,
    attribution: String,
}

impl TileLayer {
    pub fn new(id: String, name: String, url_template: String, max_zoom: f64) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            url_template,
            max_zoom,
            attribution: String::new(),
        }
    }

    pub fn with_attribution(mut self, attribution: &str) -> Self {
        self.attribution = attribution.to_string();
        self
    }

    /// Resolves the URL of one tile, rotating `{s}` over the a/b/c subdomains
    pub fn tile_url(&self, x: u32, y: u32, z: u8) -> String {
        let subdomain = ["a", "b", "c"][((x + y) % 3) as usize];
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.properties.name,
            "url": self.url_template,
            "maxZoom": self.max_zoom,
            "attribution": self.attribution,
        })
    }
}
