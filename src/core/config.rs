//! Configuration for the map client
//!
//! Settings come from three layers, each overriding the previous one:
//! compiled-in defaults, an optional JSON file, and `WAYMAP_*` environment
//! variables.

use crate::core::constants::{
    DEFAULT_CENTER, DEFAULT_FIT_PADDING, DEFAULT_MAX_ZOOM, DEFAULT_TILE_URL, DEFAULT_ZOOM,
    ROUTE_PALETTE,
};
use crate::core::geo::{LatLng, Point};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`ClientConfig::backend_url`]
pub const ENV_BACKEND_URL: &str = "WAYMAP_BACKEND_URL";
/// Environment variable overriding [`ClientConfig::route_error_policy`]
pub const ENV_ERROR_POLICY: &str = "WAYMAP_ERROR_POLICY";

/// What happens to the routes already on the map when the optimizer
/// answers with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteErrorPolicy {
    /// Keep the last successful plan on screen
    #[default]
    Preserve,
    /// Remove every route polyline
    Clear,
}

impl std::str::FromStr for RouteErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "clear" => Ok(Self::Clear),
            other => Err(Error::Config(format!(
                "unknown route error policy '{}', expected 'preserve' or 'clear'",
                other
            ))),
        }
    }
}

/// Initial view and base layer of the map surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub size: Point,
    pub tile_url: String,
    pub max_zoom: f64,
    /// Padding in pixels when fitting the view to routes
    pub fit_padding: f64,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            size: Point::new(1024.0, 768.0),
            tile_url: DEFAULT_TILE_URL.to_string(),
            max_zoom: DEFAULT_MAX_ZOOM,
            fit_padding: DEFAULT_FIT_PADDING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend_url: String,
    pub map: MapViewConfig,
    pub route_palette: Vec<String>,
    pub route_error_policy: RouteErrorPolicy,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            map: MapViewConfig::default(),
            route_palette: ROUTE_PALETTE.iter().map(|c| c.to_string()).collect(),
            route_error_policy: RouteErrorPolicy::default(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Parses a JSON document; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded config from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    /// Applies `WAYMAP_*` overrides from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup; split out so tests don't
    /// have to touch the process environment.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(policy) = lookup(ENV_ERROR_POLICY) {
            self.route_error_policy = policy.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            return Err(Error::Config("backend_url must not be empty".to_string()));
        }
        if self.route_palette.is_empty() {
            return Err(Error::Config("route_palette must hold at least one color".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be positive".to_string()));
        }
        if !self.map.center.is_valid() {
            return Err(Error::Config(format!("map center {} is out of range", self.map.center)));
        }
        if self.map.zoom < 0.0 || self.map.zoom > self.map.max_zoom {
            return Err(Error::Config(format!(
                "zoom {} outside 0..={}",
                self.map.zoom, self.map.max_zoom
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_center_on_sherbrooke() {
        let config = ClientConfig::default();
        assert_eq!(config.map.center, LatLng::new(45.383402, -71.932936));
        assert_eq!(config.map.zoom, 13.0);
        assert_eq!(config.map.max_zoom, 19.0);
        assert_eq!(config.route_palette, vec!["blue", "red", "green", "purple"]);
        assert_eq!(config.route_error_policy, RouteErrorPolicy::Preserve);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClientConfig::from_json_str(
            r#"{ "backend_url": "http://routing.local:8080", "route_error_policy": "clear" }"#,
        )
        .unwrap();

        assert_eq!(config.backend_url, "http://routing.local:8080");
        assert_eq!(config.route_error_policy, RouteErrorPolicy::Clear);
        assert_eq!(config.map.zoom, 13.0);
        assert_eq!(config.route_palette.len(), 4);
    }

    #[test]
    fn test_empty_palette_rejected() {
        let result = ClientConfig::from_json_str(r#"{ "route_palette": [] }"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default()
            .apply_overrides(|key| match key {
                ENV_BACKEND_URL => Some("http://10.0.0.2:5000".to_string()),
                ENV_ERROR_POLICY => Some("Clear".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.backend_url, "http://10.0.0.2:5000");
        assert_eq!(config.route_error_policy, RouteErrorPolicy::Clear);
    }

    #[test]
    fn test_bad_policy_in_env_is_config_error() {
        let result = ClientConfig::default().apply_overrides(|key| {
            (key == ENV_ERROR_POLICY).then(|| "sometimes".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
