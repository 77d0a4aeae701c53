//! Core constants derived from Leaflet defaults and the routing backend's conventions.
//! Keeping them in a single place makes it easier to tweak client-wide magic numbers.

use crate::core::geo::LatLng;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Initial map center (Sherbrooke, QC) used until routes are fitted.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 45.383402,
    lng: -71.932936,
};

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Base layer served by OpenStreetMap.
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Highest zoom the base layer serves.
pub const DEFAULT_MAX_ZOOM: f64 = 19.0;

/// Pixels kept free around fitted route bounds.
pub const DEFAULT_FIT_PADDING: f64 = 20.0;

/// Route colors, indexed by route position modulo the palette length.
pub const ROUTE_PALETTE: [&str; 4] = ["blue", "red", "green", "purple"];

/// Prefix of the popup label bound to every waypoint marker.
pub const DEMAND_LABEL_PREFIX: &str = "Demande: ";

/// Backend endpoints, relative to the configured base URL.
pub const ADD_WAYPOINT_PATH: &str = "/add_waypoint";
pub const GET_WAYPOINTS_PATH: &str = "/get_waypoints";
pub const OPTIMIZE_ROUTE_PATH: &str = "/optimize_route";
