#![forbid(unsafe_code)]

//! Column geometry and per-tile cell metrics.
//!
//! # Column geometry
//!
//! ```text
//! count       = max(1, ⌊(container + gap) / (min_item_width + gap)⌋)
//! width       = ⌊(container − gap·(count − 1)) / count⌋
//! image_width = max(1, width − 2·padding)
//! left(c)     = c · (width + gap)
//! ```
//!
//! # Cell height
//!
//! ```text
//! image_height = ⌊image_width · h / w⌋            (intrinsic size known)
//!              = ⌊image_width / fallback_ratio⌋   (otherwise)
//! height       = image_height + title_area_height
//! ```
//!
//! # Failure Modes
//!
//! None. A zero container width resolves to no geometry; non-finite
//! intermediates resolve to a zero image height.

use shelfwall_core::{MasonryConfig, Tile};

use crate::model::Cell;

/// Column count and widths for one container width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnGeometry {
    pub count: usize,
    pub width: u32,
    pub image_width: u32,
    pub gap: u32,
}

impl ColumnGeometry {
    /// Geometry for `container_width`, or `None` when the width is zero.
    pub fn resolve(config: &MasonryConfig, container_width: u32) -> Option<Self> {
        if container_width == 0 {
            return None;
        }
        let gap = u64::from(config.item_gap);
        let count = column_count(config, container_width);
        let gutters = gap * (count as u64 - 1);
        let width = (u64::from(container_width).saturating_sub(gutters) / count as u64) as u32;
        let padding = config.tile_internal_padding.saturating_mul(2);
        Some(Self {
            count,
            width,
            image_width: width.saturating_sub(padding).max(1),
            gap: config.item_gap,
        })
    }

    /// Horizontal offset of `column`.
    #[inline]
    pub fn left(&self, column: usize) -> u32 {
        let pitch = u64::from(self.width) + u64::from(self.gap);
        (column as u64 * pitch).min(u64::from(u32::MAX)) as u32
    }

    /// Top of a cell appended to a column whose bottom is `bottom`.
    #[inline]
    pub fn next_top(&self, bottom: u32) -> u32 {
        next_top(bottom, self.gap)
    }
}

/// Column count for `container_width`; 0 only when the width is 0.
pub fn column_count(config: &MasonryConfig, container_width: u32) -> usize {
    if container_width == 0 {
        return 0;
    }
    let gap = u64::from(config.item_gap);
    let pitch = u64::from(config.min_item_width) + gap;
    (u64::from(container_width) + gap)
        .checked_div(pitch)
        .unwrap_or(1)
        .max(1) as usize
}

/// Top of a cell appended below `bottom`: flush at 0 for an empty column,
/// otherwise one gap below.
#[inline]
pub fn next_top(bottom: u32, gap: u32) -> u32 {
    if bottom == 0 {
        0
    } else {
        bottom.saturating_add(gap)
    }
}

/// Resolved sizes of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellMetrics {
    pub image_width: u32,
    pub image_height: u32,
    /// Image plus title area.
    pub height: u32,
}

/// Derives display sizes from a tile's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsResolver {
    fallback_aspect_ratio: f64,
    title_area_height: u32,
}

impl MetricsResolver {
    pub fn new(config: &MasonryConfig) -> Self {
        Self {
            fallback_aspect_ratio: config.fallback_aspect_ratio,
            title_area_height: config.title_area_height,
        }
    }

    /// Image height for `tile` drawn `image_width` wide.
    pub fn image_height(&self, tile: &Tile, image_width: u32) -> u32 {
        if let Some((w, h)) = tile.intrinsic_size() {
            let scaled = u64::from(image_width) * u64::from(h) / u64::from(w);
            return scaled.min(u64::from(u32::MAX)) as u32;
        }
        let height = f64::from(image_width) / self.fallback_aspect_ratio;
        if !height.is_finite() || height <= 0.0 {
            return 0;
        }
        // `as` saturates above u32::MAX.
        height.floor() as u32
    }

    pub fn resolve(&self, tile: &Tile, geometry: &ColumnGeometry) -> CellMetrics {
        let image_height = self.image_height(tile, geometry.image_width);
        CellMetrics {
            image_width: geometry.image_width,
            image_height,
            height: image_height.saturating_add(self.title_area_height),
        }
    }

    /// Build the cell for `tile` at (`column`, `top`).
    pub fn place(&self, tile: &Tile, geometry: &ColumnGeometry, column: usize, top: u32) -> Cell {
        let metrics = self.resolve(tile, geometry);
        Cell {
            top,
            left: geometry.left(column),
            width: geometry.width,
            height: metrics.height,
            tile: tile.clone(),
            image_width: metrics.image_width,
            image_height: metrics.image_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MasonryConfig {
        MasonryConfig::new(100, 10).with_tile_internal_padding(0)
    }

    #[test]
    fn zero_width_has_no_geometry() {
        assert_eq!(ColumnGeometry::resolve(&config(), 0), None);
        assert_eq!(column_count(&config(), 0), 0);
    }

    #[test]
    fn column_count_formula() {
        let c = config();
        // (320 + 10) / 110 = 3
        assert_eq!(column_count(&c, 320), 3);
        // (219 + 10) / 110 = 2
        assert_eq!(column_count(&c, 219), 2);
        // narrower than one item still yields one column
        assert_eq!(column_count(&c, 30), 1);
    }

    #[test]
    fn geometry_widths() {
        let g = ColumnGeometry::resolve(&config(), 320).expect("non-zero width");
        assert_eq!(g.count, 3);
        assert_eq!(g.width, 100);
        assert_eq!(g.image_width, 100);
        assert_eq!(g.left(0), 0);
        assert_eq!(g.left(2), 220);

        let padded = MasonryConfig::new(100, 10).with_tile_internal_padding(8);
        let g = ColumnGeometry::resolve(&padded, 220).expect("non-zero width");
        assert_eq!(g.count, 2);
        assert_eq!(g.width, 105);
        assert_eq!(g.image_width, 89);
    }

    #[test]
    fn image_width_never_below_one() {
        let padded = MasonryConfig::new(10, 0).with_tile_internal_padding(50);
        let g = ColumnGeometry::resolve(&padded, 10).expect("non-zero width");
        assert_eq!(g.image_width, 1);
    }

    #[test]
    fn zero_pitch_degrades_to_single_column() {
        let c = MasonryConfig::new(0, 0);
        assert_eq!(column_count(&c, 500), 1);
    }

    #[test]
    fn next_top_rule() {
        assert_eq!(next_top(0, 10), 0);
        assert_eq!(next_top(140, 10), 150);
    }

    #[test]
    fn intrinsic_ratio_height() {
        let r = MetricsResolver::new(&config());
        let portrait = Tile::new(1).with_thumbnail("p.png", 300, 400);
        assert_eq!(r.image_height(&portrait, 150), 200);
        let odd = Tile::new(2).with_intrinsic_size(3, 1);
        assert_eq!(r.image_height(&odd, 100), 33);
    }

    #[test]
    fn fallback_ratio_height() {
        let r = MetricsResolver::new(&config());
        assert_eq!(r.image_height(&Tile::new(1), 100), 75);
        // zero intrinsic dimension falls back too
        let zero = Tile::new(2).with_intrinsic_size(0, 50);
        assert_eq!(r.image_height(&zero, 100), 75);
    }

    #[test]
    fn non_finite_fallback_is_zero() {
        let c = config().with_fallback_aspect_ratio(0.0);
        let r = MetricsResolver::new(&c);
        assert_eq!(r.image_height(&Tile::new(1), 100), 0);
    }

    #[test]
    fn resolve_adds_title_area() {
        let g = ColumnGeometry::resolve(&config(), 320).expect("non-zero width");
        let r = MetricsResolver::new(&config());
        let m = r.resolve(&Tile::new(1).with_intrinsic_size(1, 1), &g);
        assert_eq!(m.image_height, 100);
        assert_eq!(m.height, 140);

        let cell = r.place(&Tile::new(1).with_intrinsic_size(1, 1), &g, 1, 150);
        assert_eq!(cell.left, 110);
        assert_eq!(cell.top, 150);
        assert_eq!(cell.height, 140);
        assert_eq!(cell.bottom(), 290);
    }
}
