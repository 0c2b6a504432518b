#![forbid(unsafe_code)]

//! Scroll-driven masonry pipeline.
//!
//! [`MasonryScroller`] owns the tile list and the viewport inputs, and turns
//! them into a [`Frame`]: the cells to render plus the scrollable extent.
//!
//! ```text
//! set_tiles / set_container_width ──► dirty ──► ReflowEngine::update ──► extent observer
//!                                                       │
//! set_scroll_top / set_viewport_height ─────────────────┴──► viewport::visible ──► Frame
//! ```
//!
//! # Invariants
//!
//! 1. The engine runs only when the tiles or the container width changed
//!    since the last layout. Scroll and viewport changes only re-select.
//! 2. The extent observer fires once per layout run, after the layout is
//!    replaced, and never for a pure scroll.
//! 3. Setting a value equal to the current one leaves the scroller clean.

use std::fmt;

use shelfwall_core::{ConfigError, MasonryConfig, Tile};

use crate::model::{Cell, Layout};
use crate::reflow::{ReflowEngine, ReflowStats};
use crate::viewport;

/// Callback receiving the new total extent after each layout run.
pub type ExtentObserver = Box<dyn FnMut(u32)>;

/// What a renderer needs for one paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Cells to materialize, each carrying its absolute position.
    pub visible: Vec<&'a Cell>,
    /// Height of the scrollable area.
    pub total_extent: u32,
    pub scroll_top: u32,
    pub viewport_height: u32,
}

impl<'a> Frame<'a> {
    /// Whether nothing needs rendering.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The selected cells that touch the scroll window itself, without the
    /// buffer cells above and below it.
    pub fn on_screen(&self) -> impl Iterator<Item = &'a Cell> + '_ {
        let top = self.scroll_top;
        let bottom = top.saturating_add(self.viewport_height);
        self.visible
            .iter()
            .copied()
            .filter(move |cell| cell.rect().spans_rows(top, bottom))
    }
}

/// Tiles plus viewport state, laid out lazily.
pub struct MasonryScroller {
    engine: ReflowEngine,
    tiles: Vec<Tile>,
    container_width: u32,
    scroll_top: u32,
    viewport_height: u32,
    dirty: bool,
    extent_observer: Option<ExtentObserver>,
}

impl fmt::Debug for MasonryScroller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasonryScroller")
            .field("engine", &self.engine)
            .field("tiles", &self.tiles.len())
            .field("container_width", &self.container_width)
            .field("scroll_top", &self.scroll_top)
            .field("viewport_height", &self.viewport_height)
            .field("dirty", &self.dirty)
            .field("extent_observer", &self.extent_observer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl MasonryScroller {
    /// Create an empty scroller. Invalid config values are clamped.
    #[must_use]
    pub fn new(config: MasonryConfig) -> Self {
        Self::with_engine(ReflowEngine::new(config))
    }

    /// Create an empty scroller, rejecting an unusable config.
    pub fn try_new(config: MasonryConfig) -> Result<Self, ConfigError> {
        ReflowEngine::try_new(config).map(Self::with_engine)
    }

    /// Wrap an existing engine, e.g. one built with [`ReflowEngine::from_env`].
    #[must_use]
    pub fn with_engine(engine: ReflowEngine) -> Self {
        Self {
            engine,
            tiles: Vec::new(),
            container_width: 0,
            scroll_top: 0,
            viewport_height: 0,
            dirty: false,
            extent_observer: None,
        }
    }

    // ── Inputs ──────────────────────────────────────────────────────

    /// Replace the tile list. Order is packing priority.
    pub fn set_tiles(&mut self, tiles: impl Into<Vec<Tile>>) {
        let tiles = tiles.into();
        if tiles != self.tiles {
            self.tiles = tiles;
            self.dirty = true;
        }
    }

    pub fn set_container_width(&mut self, width: u32) {
        if width != self.container_width {
            self.container_width = width;
            self.dirty = true;
        }
    }

    pub fn set_scroll_top(&mut self, scroll_top: u32) {
        self.scroll_top = scroll_top;
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height;
    }

    /// Register the callback fired with the total extent after each layout.
    pub fn on_total_extent(&mut self, observer: impl FnMut(u32) + 'static) {
        self.extent_observer = Some(Box::new(observer));
    }

    /// Drop the extent callback.
    pub fn clear_total_extent_observer(&mut self) {
        self.extent_observer = None;
    }

    // ── Outputs ─────────────────────────────────────────────────────

    /// Bring the layout up to date with the current inputs.
    pub fn layout(&mut self) -> &Layout {
        if self.dirty {
            self.dirty = false;
            let extent = self
                .engine
                .update(&self.tiles, self.container_width)
                .total_extent();
            if let Some(observer) = self.extent_observer.as_mut() {
                observer(extent);
            }
        }
        self.engine.layout()
    }

    /// Cells to render for the current scroll window.
    pub fn frame(&mut self) -> Frame<'_> {
        let buffer = self.engine.config().buffer_rows;
        let (scroll_top, viewport_height) = (self.scroll_top, self.viewport_height);
        let layout = self.layout();
        Frame {
            visible: viewport::visible(layout, scroll_top, viewport_height, buffer),
            total_extent: layout.total_extent(),
            scroll_top,
            viewport_height,
        }
    }

    // ── Introspection ───────────────────────────────────────────────

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn container_width(&self) -> u32 {
        self.container_width
    }

    #[must_use]
    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    #[must_use]
    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Whether the next [`layout`](Self::layout) will run the engine.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn engine(&self) -> &ReflowEngine {
        &self.engine
    }

    /// Engine access, e.g. to toggle force-full mode.
    pub fn engine_mut(&mut self) -> &mut ReflowEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn stats(&self) -> ReflowStats {
        self.engine.stats()
    }
}
