#![forbid(unsafe_code)]

//! Masonry configuration.
//!
//! [`MasonryConfig`] is fixed at construction of a pipeline. All fields have
//! defaults; a config can be built with the `with_*` setters, deserialized
//! with serde (missing fields take their defaults), or overridden from the
//! environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SHELFWALL_MIN_ITEM_WIDTH` | `min_item_width` |
//! | `SHELFWALL_ITEM_GAP` | `item_gap` |
//! | `SHELFWALL_BEAM_WIDTH` | `beam_width` |
//! | `SHELFWALL_BUFFER_ROWS` | `buffer_rows` |
//!
//! # Failure Modes
//!
//! | Condition | `validate()` | `sanitized()` |
//! |-----------|--------------|---------------|
//! | `min_item_width + item_gap == 0` | `ZeroColumnPitch` | `min_item_width = 1` |
//! | ratio not finite or `<= 0` | `InvalidAspectRatio` | default ratio |
//! | `beam_width == 0` | `ZeroBeamWidth` | `beam_width = 1` |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default ratio (width / height) for tiles without a known thumbnail size.
pub const DEFAULT_FALLBACK_ASPECT_RATIO: f64 = 4.0 / 3.0;

/// Default height reserved under each image for the title.
pub const DEFAULT_TITLE_AREA_HEIGHT: u32 = 40;

/// Default number of extra cells kept above and below the window per column.
pub const DEFAULT_BUFFER_ROWS: usize = 5;

/// Default number of candidate layouts kept per search step.
pub const DEFAULT_BEAM_WIDTH: usize = 50;

const ENV_MIN_ITEM_WIDTH: &str = "SHELFWALL_MIN_ITEM_WIDTH";
const ENV_ITEM_GAP: &str = "SHELFWALL_ITEM_GAP";
const ENV_BEAM_WIDTH: &str = "SHELFWALL_BEAM_WIDTH";
const ENV_BUFFER_ROWS: &str = "SHELFWALL_BUFFER_ROWS";

/// Error returned for a configuration the engine cannot use.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `min_item_width + item_gap` is zero, so no column count can be derived.
    ZeroColumnPitch,
    /// The fallback aspect ratio is not a finite positive number.
    InvalidAspectRatio(f64),
    /// The beam search must keep at least one candidate.
    ZeroBeamWidth,
    /// An environment override could not be parsed.
    InvalidEnv { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroColumnPitch => {
                write!(f, "min_item_width + item_gap must be greater than zero")
            }
            Self::InvalidAspectRatio(ratio) => {
                write!(f, "fallback aspect ratio must be finite and positive, got {ratio}")
            }
            Self::ZeroBeamWidth => write!(f, "beam width must be at least 1"),
            Self::InvalidEnv { var, value } => {
                write!(f, "{var}={value:?} is not a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Sizing and search parameters for the masonry pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasonryConfig {
    /// Narrowest column allowed; drives the column count.
    pub min_item_width: u32,
    /// Horizontal gap between columns and vertical gap between cells.
    pub item_gap: u32,
    /// Padding on each side of the image inside a cell.
    pub tile_internal_padding: u32,
    /// Height added below the image for the title.
    pub title_area_height: u32,
    /// Width / height ratio used when a tile has no intrinsic size.
    pub fallback_aspect_ratio: f64,
    /// Extra cells per column kept on each side of the visible window.
    pub buffer_rows: usize,
    /// Candidates kept per beam-search step.
    pub beam_width: usize,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            min_item_width: 200,
            item_gap: 16,
            tile_internal_padding: 8,
            title_area_height: DEFAULT_TITLE_AREA_HEIGHT,
            fallback_aspect_ratio: DEFAULT_FALLBACK_ASPECT_RATIO,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            beam_width: DEFAULT_BEAM_WIDTH,
        }
    }
}

impl MasonryConfig {
    /// Defaults with the given column sizing.
    #[must_use]
    pub fn new(min_item_width: u32, item_gap: u32) -> Self {
        Self {
            min_item_width,
            item_gap,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_min_item_width(mut self, width: u32) -> Self {
        self.min_item_width = width;
        self
    }

    #[must_use]
    pub fn with_item_gap(mut self, gap: u32) -> Self {
        self.item_gap = gap;
        self
    }

    #[must_use]
    pub fn with_tile_internal_padding(mut self, padding: u32) -> Self {
        self.tile_internal_padding = padding;
        self
    }

    #[must_use]
    pub fn with_title_area_height(mut self, height: u32) -> Self {
        self.title_area_height = height;
        self
    }

    #[must_use]
    pub fn with_fallback_aspect_ratio(mut self, ratio: f64) -> Self {
        self.fallback_aspect_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_buffer_rows(mut self, rows: usize) -> Self {
        self.buffer_rows = rows;
        self
    }

    #[must_use]
    pub fn with_beam_width(mut self, width: usize) -> Self {
        self.beam_width = width;
        self
    }

    /// Check that the engine can derive a layout from this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_item_width.saturating_add(self.item_gap) == 0 {
            return Err(ConfigError::ZeroColumnPitch);
        }
        if !self.fallback_aspect_ratio.is_finite() || self.fallback_aspect_ratio <= 0.0 {
            return Err(ConfigError::InvalidAspectRatio(self.fallback_aspect_ratio));
        }
        if self.beam_width == 0 {
            return Err(ConfigError::ZeroBeamWidth);
        }
        Ok(())
    }

    /// Clamp every invalid field to the nearest usable value.
    ///
    /// The result always passes [`validate`](Self::validate).
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.min_item_width.saturating_add(self.item_gap) == 0 {
            self.min_item_width = 1;
        }
        if !self.fallback_aspect_ratio.is_finite() || self.fallback_aspect_ratio <= 0.0 {
            self.fallback_aspect_ratio = DEFAULT_FALLBACK_ASPECT_RATIO;
        }
        self.beam_width = self.beam_width.max(1);
        self
    }

    /// Defaults overridden from the process environment.
    ///
    /// Malformed variables are ignored (and logged with the `tracing` feature).
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply overrides from the process environment, ignoring malformed values.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides_lenient(|var| std::env::var(var).ok())
    }

    /// Apply overrides from the process environment, failing on malformed values.
    pub fn try_with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Values are trimmed and parsed as non-negative integers.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, ENV_MIN_ITEM_WIDTH)? {
            self.min_item_width = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_ITEM_GAP)? {
            self.item_gap = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_BEAM_WIDTH)? {
            self.beam_width = v as usize;
        }
        if let Some(v) = parse_var(&lookup, ENV_BUFFER_ROWS)? {
            self.buffer_rows = v as usize;
        }
        Ok(self)
    }

    /// Like [`apply_overrides`](Self::apply_overrides), but a malformed
    /// variable is skipped and the remaining ones still apply.
    #[must_use]
    pub fn apply_overrides_lenient<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self;
        for var in [
            ENV_MIN_ITEM_WIDTH,
            ENV_ITEM_GAP,
            ENV_BEAM_WIDTH,
            ENV_BUFFER_ROWS,
        ] {
            let single = |name: &str| if name == var { lookup(name) } else { None };
            match config.clone().apply_overrides(single) {
                Ok(next) => config = next,
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_err, "ignoring malformed masonry override");
                }
            }
        }
        config
    }
}

fn parse_var<F>(lookup: &F, var: &'static str) -> Result<Option<u32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { var, value: raw })
}
