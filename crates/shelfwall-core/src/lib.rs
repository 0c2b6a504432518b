#![forbid(unsafe_code)]

//! Core types for the Shelfwall masonry engine: tiles, pixel geometry, and
//! configuration.

pub mod config;
pub mod geometry;
pub mod tile;

pub use config::{ConfigError, MasonryConfig};
pub use geometry::PixelRect;
pub use tile::{PlayStatus, Tile, TileId, TileSnapshot, snapshot_all, tracked_changed};
