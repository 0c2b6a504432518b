#![forbid(unsafe_code)]

//! Placed cells, columns, layouts, and scores.
//!
//! # Invariants
//!
//! 1. Within a column, cells are in insertion order, which is also vertical
//!    order.
//! 2. The first cell of a column has `top == 0`; every later cell has
//!    `top == previous.top + previous.height + gap`.
//! 3. A [`Layout`] is never edited from outside the stage that produced it;
//!    a new generation replaces it wholesale.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use shelfwall_core::{PixelRect, Tile, TileId};

/// A tile placed at a concrete position within one layout generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
    /// The tile this cell was built from, by value.
    pub tile: Tile,
    /// Width the thumbnail is drawn at (column width minus padding).
    pub image_width: u32,
    /// Height the thumbnail is drawn at.
    pub image_height: u32,
}

impl Cell {
    #[inline]
    pub fn id(&self) -> TileId {
        self.tile.id
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    #[inline]
    pub const fn rect(&self) -> PixelRect {
        PixelRect::new(self.left, self.top, self.width, self.height)
    }
}

/// Cells of one column, top to bottom.
pub type Column = Vec<Cell>;

/// Bottom edge of a column, or 0 when it holds no cells.
#[inline]
pub fn column_bottom(column: &[Cell]) -> u32 {
    column.last().map_or(0, Cell::bottom)
}

/// Two-part balance estimate; lower is better.
///
/// Ordering is lexicographic: `max_height` first, `spread` breaks ties.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Score {
    /// Tallest column bottom.
    pub max_height: u32,
    /// Tallest minus shortest column bottom.
    pub spread: u32,
}

impl Score {
    pub const ZERO: Self = Self {
        max_height: 0,
        spread: 0,
    };

    #[inline]
    pub const fn new(max_height: u32, spread: u32) -> Self {
        Self { max_height, spread }
    }

    /// Score a set of final column bottoms. No columns scores zero.
    pub fn from_bottoms(bottoms: &[u32]) -> Self {
        let (Some(&max), Some(&min)) = (bottoms.iter().max(), bottoms.iter().min()) else {
            return Self::ZERO;
        };
        Self::new(max, max - min)
    }
}

/// The columns of one packing generation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    columns: Vec<Column>,
}

impl Layout {
    /// A layout with `count` empty columns.
    #[must_use]
    pub fn with_columns(count: usize) -> Self {
        Self {
            columns: vec![Vec::new(); count],
        }
    }

    #[must_use]
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[inline]
    pub fn column(&self, index: usize) -> Option<&[Cell]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Structurally empty: no cells in any column.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }

    pub fn bottoms(&self) -> Vec<u32> {
        self.columns.iter().map(|c| column_bottom(c)).collect()
    }

    /// Scrollable height: the tallest column bottom, 0 when there are no cells.
    pub fn total_extent(&self) -> u32 {
        self.columns
            .iter()
            .map(|c| column_bottom(c))
            .max()
            .unwrap_or(0)
    }

    /// Balance of this layout as a finished placement.
    pub fn score(&self) -> Score {
        Score::from_bottoms(&self.bottoms())
    }

    /// Column holding the cell for `id`.
    pub fn column_of(&self, id: TileId) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.iter().any(|cell| cell.id() == id))
    }

    /// Every cell, column by column.
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.columns.iter().flatten()
    }

    /// Column index of every tile in placement order of `ids`.
    ///
    /// Ids missing from the layout map to `None`.
    pub fn assignment(&self, ids: impl IntoIterator<Item = TileId>) -> Vec<Option<usize>> {
        ids.into_iter().map(|id| self.column_of(id)).collect()
    }

    /// Fast fingerprint of assignment and geometry, for change detection.
    ///
    /// Tile content other than the id does not participate.
    pub fn fingerprint(&self) -> u64 {
        let mut h = FxHasher::default();
        self.columns.len().hash(&mut h);
        for column in &self.columns {
            column.len().hash(&mut h);
            for cell in column {
                cell.tile.id.hash(&mut h);
                cell.rect().hash(&mut h);
                cell.image_width.hash(&mut h);
                cell.image_height.hash(&mut h);
            }
        }
        h.finish()
    }

    #[must_use]
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
