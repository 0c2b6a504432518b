#![forbid(unsafe_code)]

//! Pixel geometry primitives.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in content pixels.
///
/// Origin is the top-left corner of the scroll content, not the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge, saturating at `u32::MAX`.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the vertical span `[self.y, self.bottom()]` touches the
    /// closed band `[top, bottom]`.
    ///
    /// Touching edges count, which matches the virtualizer's `>=` window test.
    #[inline]
    pub const fn spans_rows(&self, top: u32, bottom: u32) -> bool {
        self.bottom() >= top && self.y <= bottom
    }
}
