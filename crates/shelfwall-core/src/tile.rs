#![forbid(unsafe_code)]

//! Library tiles as seen by the masonry engine.
//!
//! A [`Tile`] is a read-only snapshot of one collection element. The engine
//! never owns the collection; it receives a fresh `&[Tile]` on every update
//! and keeps at most a [`TileSnapshot`] of the attributes that are allowed to
//! force a re-pack.
//!
//! # Tracked vs untracked attributes
//!
//! | Attribute | Tracked | Effect of a change |
//! |-----------|---------|--------------------|
//! | `id` | yes | full re-pack |
//! | `play_status` | yes | full re-pack |
//! | `thumbnail` | yes | full re-pack |
//! | `thumbnail_width` / `thumbnail_height` | no | picked up by the next in-place reflow |
//! | everything else | no | only visible through `Cell::tile` |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a tile across collection refreshes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TileId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Play progress shown as a badge on the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayStatus {
    #[default]
    Unplayed,
    Playing,
    Cleared,
}

/// One game in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tile {
    pub id: TileId,
    pub title: String,
    pub play_status: PlayStatus,
    /// Thumbnail reference (path or URL). Empty when the game has none.
    pub thumbnail: String,
    /// Intrinsic thumbnail width in pixels, when known.
    pub thumbnail_width: Option<u32>,
    /// Intrinsic thumbnail height in pixels, when known.
    pub thumbnail_height: Option<u32>,
    pub total_play_time_secs: u64,
    pub last_play_at: Option<String>,
}

impl Tile {
    /// Create a tile with the given id and no thumbnail.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id: TileId(id),
            ..Self::default()
        }
    }

    /// Set the title (builder).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the play status (builder).
    #[must_use]
    pub fn with_play_status(mut self, status: PlayStatus) -> Self {
        self.play_status = status;
        self
    }

    /// Set the thumbnail reference and its intrinsic size (builder).
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>, width: u32, height: u32) -> Self {
        self.thumbnail = thumbnail.into();
        self.thumbnail_width = Some(width);
        self.thumbnail_height = Some(height);
        self
    }

    /// Set only the intrinsic size, keeping the reference (builder).
    #[must_use]
    pub fn with_intrinsic_size(mut self, width: u32, height: u32) -> Self {
        self.thumbnail_width = Some(width);
        self.thumbnail_height = Some(height);
        self
    }

    /// Intrinsic `(width, height)` when both are present and non-zero.
    #[inline]
    pub fn intrinsic_size(&self) -> Option<(u32, u32)> {
        match (self.thumbnail_width, self.thumbnail_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Project the attributes that force a re-pack.
    #[must_use]
    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            id: self.id,
            play_status: self.play_status,
            thumbnail: self.thumbnail.clone(),
        }
    }
}

/// The re-layout-relevant projection of a [`Tile`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub play_status: PlayStatus,
    pub thumbnail: String,
}

impl TileSnapshot {
    /// Whether `tile` still matches this snapshot on every tracked attribute.
    #[inline]
    pub fn matches(&self, tile: &Tile) -> bool {
        self.id == tile.id && self.play_status == tile.play_status && self.thumbnail == tile.thumbnail
    }
}

/// Snapshot a whole collection, preserving order.
#[must_use]
pub fn snapshot_all(tiles: &[Tile]) -> Vec<TileSnapshot> {
    tiles.iter().map(Tile::snapshot).collect()
}

/// Whether `current` differs from `previous` in length, order of ids, or any
/// tracked attribute.
pub fn tracked_changed(current: &[Tile], previous: &[TileSnapshot]) -> bool {
    current.len() != previous.len()
        || current
            .iter()
            .zip(previous)
            .any(|(tile, snap)| !snap.matches(tile))
}
