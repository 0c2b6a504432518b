#![forbid(unsafe_code)]

//! Viewport virtualization.
//!
//! Selects the cells a renderer has to materialize for a scroll window,
//! padded by a fixed number of cells per column so fast scrolling does not
//! expose unrendered gaps.
//!
//! # Window
//!
//! Per column, independently:
//!
//! ```text
//! first = first cell with top + height ≥ scroll_top      (column skipped if none)
//! last  = first cell with top ≥ scroll_top + viewport    (else the last cell)
//! slice = [first − buffer, last + buffer] ∩ [0, len − 1]
//! ```
//!
//! Buffering is index-based, not pixel-based. Output order follows column
//! order but callers must not rely on it; each cell carries its own
//! absolute position.
//!
//! # Invariants
//!
//! 1. Every cell whose vertical span touches `[scroll_top, scroll_top + viewport]`
//!    is selected.
//! 2. At most `buffer` cells per column are selected on either side of
//!    that band (plus the first cell at or below the window's bottom edge).
//! 3. An empty layout selects nothing and has zero extent.
//!
//! Lookups use binary search; they rely on the layout invariant that cell
//! tops and bottoms are non-decreasing within a column.

use std::ops::Range;

use crate::model::{Cell, Layout};

/// Cells of one column selected for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRange {
    pub column: usize,
    pub range: Range<usize>,
}

/// Scrollable height of `layout`.
#[inline]
pub fn total_extent(layout: &Layout) -> u32 {
    layout.total_extent()
}

/// Buffered index range of one column, or `None` when every cell ends above
/// the window.
pub fn column_range(
    column: &[Cell],
    scroll_top: u32,
    viewport_height: u32,
    buffer: usize,
) -> Option<Range<usize>> {
    let first = column.partition_point(|cell| cell.bottom() < scroll_top);
    if first == column.len() {
        return None;
    }
    let window_end = scroll_top.saturating_add(viewport_height);
    let last = match column.partition_point(|cell| cell.top < window_end) {
        end if end == column.len() => column.len() - 1,
        end => end,
    };
    let start = first.saturating_sub(buffer);
    let end = last.saturating_add(buffer).min(column.len() - 1);
    Some(start..end + 1)
}

/// Per-column buffered ranges for a scroll window.
pub fn visible_ranges(
    layout: &Layout,
    scroll_top: u32,
    viewport_height: u32,
    buffer: usize,
) -> Vec<VisibleRange> {
    layout
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(column, cells)| {
            column_range(cells, scroll_top, viewport_height, buffer)
                .map(|range| VisibleRange { column, range })
        })
        .collect()
}

/// Cells to render for a scroll window.
pub fn visible(
    layout: &Layout,
    scroll_top: u32,
    viewport_height: u32,
    buffer: usize,
) -> Vec<&Cell> {
    visible_ranges(layout, scroll_top, viewport_height, buffer)
        .into_iter()
        .flat_map(|VisibleRange { column, range }| &layout.columns()[column][range])
        .collect()
}
