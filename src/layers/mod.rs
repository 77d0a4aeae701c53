pub mod base;
pub mod macros;
pub mod manager;
pub mod marker;
pub mod polyline;
pub mod tile;
