#![forbid(unsafe_code)]

//! Shelfwall public facade crate.
//!
//! Re-exports the tile model, configuration, and masonry pipeline from the
//! internal crates, and offers a prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use shelfwall_core::{
    ConfigError, MasonryConfig, PixelRect, PlayStatus, Tile, TileId, TileSnapshot, snapshot_all,
    tracked_changed,
};

// --- Layout re-exports -----------------------------------------------------

pub use shelfwall_layout::{
    Cell, ColumnGeometry, Frame, Layout, MasonryScroller, PackStats, Packed, Packer,
    ReflowDecision, ReflowEngine, ReflowStats, RepackReason, Score, VisibleRange, pack, visible,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Shelfwall.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The masonry configuration cannot produce a layout.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid masonry config: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for Shelfwall APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Construction ---------------------------------------------------------

/// Build a scroller for `config`, rejecting unusable values.
pub fn scroller(config: MasonryConfig) -> Result<MasonryScroller> {
    Ok(MasonryScroller::try_new(config)?)
}

/// Build a scroller from defaults plus `SHELFWALL_*` environment overrides.
///
/// Malformed or unusable overrides are reported rather than ignored.
/// `SHELFWALL_FULL_REPACK` switches the engine to force-full mode.
pub fn scroller_from_env() -> Result<MasonryScroller> {
    scroller_from_lookup(|var| std::env::var(var).ok())
}

/// Like [`scroller_from_env`], reading variables through `lookup`.
pub fn scroller_from_lookup<F>(lookup: F) -> Result<MasonryScroller>
where
    F: Fn(&str) -> Option<String>,
{
    let config = MasonryConfig::default().apply_overrides(&lookup)?;
    config.validate()?;
    let engine = ReflowEngine::from_lookup(config, lookup);
    Ok(MasonryScroller::with_engine(engine))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Cell, Error, Frame, Layout, MasonryConfig, MasonryScroller, PlayStatus, Result, Tile,
        TileId,
    };

    pub use crate::{core, layout};
}

pub use shelfwall_core as core;
pub use shelfwall_layout as layout;
