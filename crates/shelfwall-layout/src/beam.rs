#![forbid(unsafe_code)]

//! Beam-search masonry packer.
//!
//! Tiles are placed one at a time in input order. At each depth every kept
//! candidate ("beam") is extended into every column that passes the
//! placement rule, each extension is ranked by [`greedy_score`] against the
//! tiles still to come, and the best `beam_width` extensions survive.
//!
//! # Placement rule
//!
//! Stacking onto a column that is already among the taller half is
//! forbidden. A column's height for this test is its *hypothetical bottom*:
//! the top of its last cell minus one gap, or 0 for a column whose last
//! cell sits at the top. Its rank is the number of other columns whose
//! current bottom is strictly taller. The placement is rejected when
//!
//! ```text
//! hypothetical > 0  &&  rank < ⌈columns / 2⌉
//! ```
//!
//! A single column is always valid.
//!
//! # Determinism
//!
//! Column ties resolve to the lowest index and equal scores keep insertion
//! order (stable sort), so identical input always yields an identical layout.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Empty input or zero width | empty layout, 0 columns |
//! | Every extension rejected (only with 0-tall cells and no gap) | best beam force-placed into the shortest column |
//! | Beam set empty | one empty column per resolved column (unreachable in practice) |
//!
//! Cost: O(tiles × beam_width × columns × (tiles + columns)).

use shelfwall_core::{MasonryConfig, Tile};

use crate::metrics::{ColumnGeometry, MetricsResolver, next_top};
use crate::model::{Layout, Score};
use crate::scorer::{greedy_score, shortest_column};

/// Counters for one packing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    /// Extensions built and scored.
    pub candidates: usize,
    /// Extensions rejected by the placement rule.
    pub pruned: usize,
    /// Depths at which every extension was rejected.
    pub fallbacks: usize,
}

/// Result of [`Packer::pack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    pub layout: Layout,
    pub columns: usize,
    pub column_width: u32,
    pub stats: PackStats,
}

impl Packed {
    fn empty() -> Self {
        Self {
            layout: Layout::default(),
            columns: 0,
            column_width: 0,
            stats: PackStats::default(),
        }
    }
}

/// A partial assignment under consideration.
#[derive(Debug, Clone)]
struct Beam {
    /// Column of each tile placed so far, in input order.
    assignment: Vec<u32>,
    bottoms: Vec<u32>,
    /// Top of the last cell in each column.
    last_tops: Vec<Option<u32>>,
    score: Score,
}

impl Beam {
    fn empty(columns: usize, capacity: usize) -> Self {
        Self {
            assignment: Vec::with_capacity(capacity),
            bottoms: vec![0; columns],
            last_tops: vec![None; columns],
            score: Score::ZERO,
        }
    }

    fn extend(&self, column: usize, height: u32, gap: u32) -> Self {
        let mut next = self.clone();
        let top = next_top(next.bottoms[column], gap);
        next.assignment.push(column as u32);
        next.last_tops[column] = Some(top);
        next.bottoms[column] = top.saturating_add(height);
        next
    }

    fn allows(&self, column: usize, gap: u32) -> bool {
        let columns = self.bottoms.len();
        if columns <= 1 {
            return true;
        }
        let hypothetical = match self.last_tops[column] {
            Some(top) if top > 0 => top.saturating_sub(gap),
            _ => 0,
        };
        if hypothetical == 0 {
            return true;
        }
        // Position of the first equal value in a descending sort, where this
        // column's slot holds the hypothetical bottom.
        let rank = self
            .bottoms
            .iter()
            .enumerate()
            .filter(|&(index, &bottom)| index != column && bottom > hypothetical)
            .count();
        rank >= columns.div_ceil(2)
    }
}

/// Packs tiles into balanced columns.
#[derive(Debug, Clone)]
pub struct Packer {
    config: MasonryConfig,
    resolver: MetricsResolver,
}

impl Packer {
    /// Create a packer. Invalid config values are clamped.
    pub fn new(config: MasonryConfig) -> Self {
        let config = config.sanitized();
        let resolver = MetricsResolver::new(&config);
        Self { config, resolver }
    }

    #[inline]
    pub fn config(&self) -> &MasonryConfig {
        &self.config
    }

    #[inline]
    pub fn resolver(&self) -> &MetricsResolver {
        &self.resolver
    }

    /// Pack `tiles` for a container `container_width` pixels wide.
    pub fn pack(&self, tiles: &[Tile], container_width: u32) -> Packed {
        if tiles.is_empty() {
            return Packed::empty();
        }
        let Some(geometry) = ColumnGeometry::resolve(&self.config, container_width) else {
            return Packed::empty();
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "masonry_pack",
            tiles = tiles.len(),
            columns = geometry.count,
            column_width = geometry.width,
            beam_width = self.config.beam_width
        )
        .entered();

        let (layout, stats) = self.search(tiles, &geometry);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            candidates = stats.candidates,
            pruned = stats.pruned,
            fallbacks = stats.fallbacks,
            extent = layout.total_extent(),
            "masonry pack finished"
        );

        Packed {
            layout,
            columns: geometry.count,
            column_width: geometry.width,
            stats,
        }
    }

    fn search(&self, tiles: &[Tile], geometry: &ColumnGeometry) -> (Layout, PackStats) {
        let gap = geometry.gap;
        let columns = geometry.count;
        let beam_width = self.config.beam_width.max(1);
        let heights: Vec<u32> = tiles
            .iter()
            .map(|tile| self.resolver.resolve(tile, geometry).height)
            .collect();
        let mut stats = PackStats::default();

        let mut initial = Beam::empty(columns, tiles.len());
        initial.score = greedy_score(&initial.bottoms, &heights, gap);
        let mut beams = vec![initial];

        for (depth, &height) in heights.iter().enumerate() {
            let remaining = &heights[depth + 1..];
            let mut candidates = Vec::with_capacity(beams.len() * columns);

            for beam in &beams {
                for column in 0..columns {
                    if !beam.allows(column, gap) {
                        stats.pruned += 1;
                        continue;
                    }
                    let mut next = beam.extend(column, height, gap);
                    next.score = greedy_score(&next.bottoms, remaining, gap);
                    candidates.push(next);
                }
            }
            stats.candidates += candidates.len();

            if candidates.is_empty() {
                let Some(best) = beams.first() else {
                    break;
                };
                stats.fallbacks += 1;
                let column = shortest_column(&best.bottoms).unwrap_or(0);
                let mut forced = best.extend(column, height, gap);
                forced.score = greedy_score(&forced.bottoms, remaining, gap);
                beams = vec![forced];
            } else {
                candidates.sort_by(|a, b| a.score.cmp(&b.score));
                candidates.truncate(beam_width);
                beams = candidates;
            }
        }

        let layout = match beams.into_iter().next() {
            Some(best) if best.assignment.len() == tiles.len() => {
                self.materialize(tiles, geometry, &best.assignment)
            }
            _ => Layout::with_columns(columns),
        };
        (layout, stats)
    }

    /// Turn an assignment into placed cells.
    fn materialize(&self, tiles: &[Tile], geometry: &ColumnGeometry, assignment: &[u32]) -> Layout {
        let mut columns = vec![Vec::new(); geometry.count];
        let mut bottoms = vec![0u32; geometry.count];
        for (tile, &column) in tiles.iter().zip(assignment) {
            let column = column as usize;
            let cell = self
                .resolver
                .place(tile, geometry, column, geometry.next_top(bottoms[column]));
            bottoms[column] = cell.bottom();
            columns[column].push(cell);
        }
        Layout::from_columns(columns)
    }
}

/// One-shot [`Packer::pack`] with the given config.
pub fn pack(tiles: &[Tile], container_width: u32, config: &MasonryConfig) -> Packed {
    Packer::new(config.clone()).pack(tiles, container_width)
}
