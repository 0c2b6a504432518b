#![forbid(unsafe_code)]

//! Greedy completion scoring.
//!
//! Ranks a partial column assignment by finishing it with the cheapest
//! possible heuristic (each remaining tile goes to the currently shortest
//! column) and scoring the result. Only column bottoms influence the score,
//! so the completion runs on a copy of the bottoms rather than on cells.
//!
//! Cost: O(remaining × columns) per call.

use shelfwall_core::{MasonryConfig, Tile};

use crate::metrics::{ColumnGeometry, MetricsResolver, next_top};
use crate::model::{Layout, Score};

/// Index of the shortest column; ties go to the lowest index.
pub fn shortest_column(bottoms: &[u32]) -> Option<usize> {
    bottoms
        .iter()
        .enumerate()
        .min_by_key(|&(index, &bottom)| (bottom, index))
        .map(|(index, _)| index)
}

/// Finish `bottoms` greedily with `remaining` cell heights and score it.
pub fn greedy_score(bottoms: &[u32], remaining: &[u32], gap: u32) -> Score {
    if bottoms.is_empty() {
        return Score::ZERO;
    }
    let mut cols = bottoms.to_vec();
    for &height in remaining {
        // Non-empty, so a shortest column always exists.
        let Some(index) = shortest_column(&cols) else {
            break;
        };
        cols[index] = next_top(cols[index], gap).saturating_add(height);
    }
    Score::from_bottoms(&cols)
}

/// The pure shortest-column-first layout of `tiles`.
///
/// This is the balance baseline the beam search is measured against.
pub fn greedy_layout(tiles: &[Tile], config: &MasonryConfig, container_width: u32) -> Layout {
    let Some(geometry) = ColumnGeometry::resolve(config, container_width) else {
        return Layout::default();
    };
    if tiles.is_empty() {
        return Layout::default();
    }
    let resolver = MetricsResolver::new(config);
    let mut columns = vec![Vec::new(); geometry.count];
    let mut bottoms = vec![0u32; geometry.count];
    for tile in tiles {
        let Some(index) = shortest_column(&bottoms) else {
            break;
        };
        let cell = resolver.place(tile, &geometry, index, geometry.next_top(bottoms[index]));
        bottoms[index] = cell.bottom();
        columns[index].push(cell);
    }
    Layout::from_columns(columns)
}
