#![forbid(unsafe_code)]

//! Incremental reflow engine.
//!
//! Decides, on each `(tiles, container_width)` input, whether the previous
//! column assignment can be kept and only re-measured, or whether a full
//! beam-search re-pack is needed.
//!
//! # Decision Rule
//!
//! Evaluated in order:
//!
//! 1. Zero width or no tiles: state is reset, the layout is empty.
//! 2. Full re-pack when forced, when no previous layout holds any cell, when
//!    the column count changed, or when the tracked snapshot differs
//!    (length, id at a position, play status, thumbnail reference).
//! 3. Otherwise every cell keeps its column and order; tops are recomputed
//!    from 0 per column and heights come from the *latest* tile with the
//!    same id, so untracked edits (e.g. thumbnail dimensions) still show up.
//!
//! State is replaced after every branch.
//!
//! # Key Invariant
//!
//! A reflow never changes a cell's column. A re-pack is bit-identical to a
//! fresh [`Packer::pack`] of the same input.
//!
//! # Force-Full Fallback
//!
//! [`ReflowEngine::set_force_full`] makes every update a full re-pack. The
//! same switch is read from `SHELFWALL_FULL_REPACK` by
//! [`ReflowEngine::from_env`].

use rustc_hash::FxHashMap;
use shelfwall_core::{
    ConfigError, MasonryConfig, Tile, TileId, TileSnapshot, snapshot_all, tracked_changed,
};

use crate::beam::Packer;
use crate::metrics::{ColumnGeometry, MetricsResolver};
use crate::model::{Column, Layout};

// ============================================================================
// Decisions
// ============================================================================

/// Why an update ran a full re-pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepackReason {
    /// Force-full mode is on.
    Forced,
    /// The previous layout holds no cells.
    NoPriorLayout,
    /// The container width crossed a column-count boundary.
    ColumnCountChanged { from: usize, to: usize },
    /// Membership, order, or a tracked attribute changed.
    TilesChanged,
}

/// Which branch an update took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflowDecision {
    /// Empty input; state was reset.
    Cleared,
    Repacked(RepackReason),
    /// Same assignment, refreshed geometry.
    Resized,
}

// ============================================================================
// ReflowState
// ============================================================================

/// The generation retained between updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReflowState {
    pub columns: usize,
    pub layout: Layout,
    pub snapshot: Vec<TileSnapshot>,
    pub container_width: u32,
}

impl ReflowState {
    /// Forget the previous generation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// ReflowStats
// ============================================================================

/// Counters since creation or the last [`ReflowEngine::reset_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflowStats {
    pub repacks: usize,
    pub resizes: usize,
    pub clears: usize,
    pub last_decision: Option<ReflowDecision>,
}

impl ReflowStats {
    /// Total updates observed.
    pub fn updates(&self) -> usize {
        self.repacks + self.resizes + self.clears
    }

    /// Fraction of non-empty updates served without a re-pack (0.0 – 1.0).
    pub fn reuse_rate(&self) -> f64 {
        let laid_out = self.repacks + self.resizes;
        if laid_out == 0 {
            0.0
        } else {
            self.resizes as f64 / laid_out as f64
        }
    }

    fn record(&mut self, decision: ReflowDecision) {
        match decision {
            ReflowDecision::Cleared => self.clears += 1,
            ReflowDecision::Repacked(_) => self.repacks += 1,
            ReflowDecision::Resized => self.resizes += 1,
        }
        self.last_decision = Some(decision);
    }
}

// ============================================================================
// ReflowEngine
// ============================================================================

/// Environment switch that turns every update into a full re-pack.
pub const ENV_FULL_REPACK: &str = "SHELFWALL_FULL_REPACK";

/// Owns the retained generation and routes each update to a re-pack or an
/// in-place reflow.
#[derive(Debug, Clone)]
pub struct ReflowEngine {
    packer: Packer,
    state: ReflowState,
    stats: ReflowStats,
    force_full: bool,
}

impl ReflowEngine {
    /// Create an engine. Invalid config values are clamped.
    #[must_use]
    pub fn new(config: MasonryConfig) -> Self {
        Self {
            packer: Packer::new(config),
            state: ReflowState::default(),
            stats: ReflowStats::default(),
            force_full: false,
        }
    }

    /// Create an engine, rejecting an unusable config.
    pub fn try_new(config: MasonryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create an engine honoring `SHELFWALL_FULL_REPACK`.
    ///
    /// When set to `"1"`, `"true"`, or `"yes"` (case-insensitive), every
    /// update re-packs.
    #[must_use]
    pub fn from_env(config: MasonryConfig) -> Self {
        Self::from_lookup(config, |var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(config: MasonryConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let force = lookup(ENV_FULL_REPACK).is_some_and(|v| {
            matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        });
        let mut engine = Self::new(config);
        engine.force_full = force;
        engine
    }

    // ── Update ──────────────────────────────────────────────────────

    /// Lay out `tiles` for `container_width` and return the new layout.
    pub fn update(&mut self, tiles: &[Tile], container_width: u32) -> &Layout {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "masonry_reflow",
            tiles = tiles.len(),
            container_width,
            previous_columns = self.state.columns
        )
        .entered();

        let geometry = if tiles.is_empty() {
            None
        } else {
            ColumnGeometry::resolve(self.packer.config(), container_width)
        };
        let Some(geometry) = geometry else {
            self.state.reset();
            self.finish(ReflowDecision::Cleared);
            return &self.state.layout;
        };

        let (layout, decision) = match self.repack_reason(tiles, &geometry) {
            Some(reason) => {
                let packed = self.packer.pack(tiles, container_width);
                (packed.layout, ReflowDecision::Repacked(reason))
            }
            None => (self.reflow(tiles, &geometry), ReflowDecision::Resized),
        };

        self.state = ReflowState {
            columns: geometry.count,
            layout,
            snapshot: snapshot_all(tiles),
            container_width,
        };
        self.finish(decision);
        &self.state.layout
    }

    fn finish(&mut self, decision: ReflowDecision) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            decision = ?decision,
            columns = self.state.columns,
            extent = self.state.layout.total_extent(),
            "masonry reflow decision"
        );
        self.stats.record(decision);
    }

    fn repack_reason(&self, tiles: &[Tile], geometry: &ColumnGeometry) -> Option<RepackReason> {
        if self.force_full {
            return Some(RepackReason::Forced);
        }
        if self.state.layout.is_empty() {
            return Some(RepackReason::NoPriorLayout);
        }
        if geometry.count != self.state.columns {
            return Some(RepackReason::ColumnCountChanged {
                from: self.state.columns,
                to: geometry.count,
            });
        }
        if tracked_changed(tiles, &self.state.snapshot) {
            return Some(RepackReason::TilesChanged);
        }
        None
    }

    /// Keep the previous assignment, re-measure every cell.
    fn reflow(&self, tiles: &[Tile], geometry: &ColumnGeometry) -> Layout {
        let resolver: &MetricsResolver = self.packer.resolver();
        let latest: FxHashMap<TileId, &Tile> = tiles.iter().map(|t| (t.id, t)).collect();

        let columns: Vec<Column> = self
            .state
            .layout
            .columns()
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let mut top = 0u32;
                column
                    .iter()
                    .map(|cell| {
                        let tile = latest.get(&cell.tile.id).copied().unwrap_or(&cell.tile);
                        let placed = resolver.place(tile, geometry, index, top);
                        top = placed.bottom().saturating_add(geometry.gap);
                        placed
                    })
                    .collect()
            })
            .collect();
        Layout::from_columns(columns)
    }

    // ── Configuration ───────────────────────────────────────────────

    /// Force every update to re-pack.
    pub fn set_force_full(&mut self, force: bool) {
        self.force_full = force;
    }

    #[must_use]
    pub fn force_full(&self) -> bool {
        self.force_full
    }

    #[must_use]
    pub fn config(&self) -> &MasonryConfig {
        self.packer.config()
    }

    // ── Statistics ──────────────────────────────────────────────────

    #[must_use]
    pub fn stats(&self) -> ReflowStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ReflowStats::default();
    }

    // ── Introspection ───────────────────────────────────────────────

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.state.layout
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.state.columns
    }

    #[must_use]
    pub fn container_width(&self) -> u32 {
        self.state.container_width
    }

    #[must_use]
    pub fn state(&self) -> &ReflowState {
        &self.state
    }

    /// Forget the retained generation; the next update re-packs.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

// ============================================================================
// Tests
// ============================================================================
