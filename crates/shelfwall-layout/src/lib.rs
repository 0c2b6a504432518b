#![forbid(unsafe_code)]

//! Masonry packing, incremental reflow, and viewport virtualization.
//!
//! The pipeline is a chain of pure stages plus one owned state struct:
//!
//! ```text
//! tiles ─► metrics ─► beam (scorer) ─► Layout ─► viewport ─► visible cells
//!                        ▲                │
//!                        └── reflow ◄─────┘   (retained between updates)
//! ```
//!
//! [`MasonryScroller`] wires the stages together for a scrolling surface.

pub mod beam;
pub mod metrics;
pub mod model;
pub mod reflow;
pub mod scorer;
pub mod scroller;
pub mod viewport;

pub use beam::{PackStats, Packed, Packer, pack};
pub use metrics::{CellMetrics, ColumnGeometry, MetricsResolver, column_count};
pub use model::{Cell, Column, Layout, Score};
pub use reflow::{
    ENV_FULL_REPACK, ReflowDecision, ReflowEngine, ReflowState, ReflowStats, RepackReason,
};
pub use scorer::{greedy_layout, greedy_score, shortest_column};
pub use scroller::{ExtentObserver, Frame, MasonryScroller};
pub use viewport::{VisibleRange, column_range, total_extent, visible, visible_ranges};

pub use shelfwall_core::{ConfigError, MasonryConfig, Tile, TileId};
