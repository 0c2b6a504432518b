//! Property-based invariant tests for the masonry pipeline.
//!
//! These tests verify structural invariants that must hold for any valid inputs:
//!
//! 1. Column count follows `max(1, ⌊(W + gap) / (min + gap)⌋)`.
//! 2. Every tile is placed exactly once; tops follow the gap rule.
//! 3. Column offsets and widths are uniform.
//! 4. Beam search is never taller than the greedy baseline.
//! 5. Packing is deterministic.
//! 6. Reflow with unchanged input is idempotent.
//! 7. A width change within one column count keeps every tile's column.
//! 8. A re-pack equals a fresh pack of the same input.
//! 9. Virtualization covers the window and stays within the buffer bound.
//! 10. No panics on degenerate widths and sizes.

use proptest::prelude::*;
use shelfwall_core::{MasonryConfig, Tile, TileId};
use shelfwall_layout::{
    Layout, Packer, ReflowDecision, ReflowEngine, column_range, greedy_layout, visible_ranges,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn arb_tiles(max_len: usize) -> impl Strategy<Value = Vec<Tile>> {
    proptest::collection::vec(proptest::option::of((1u32..=1200, 1u32..=1600)), 0..=max_len)
        .prop_map(|sizes| {
            sizes
                .into_iter()
                .enumerate()
                .map(|(i, size)| match size {
                    Some((w, h)) => Tile::new(i as u64).with_thumbnail(format!("{i}.png"), w, h),
                    None => Tile::new(i as u64).with_thumbnail(format!("{i}.png"), 0, 0),
                })
                .collect()
        })
}

fn arb_config() -> impl Strategy<Value = MasonryConfig> {
    (120u32..=400, 0u32..=32, 0u32..=16, 1usize..=12).prop_map(|(min, gap, padding, beam)| {
        MasonryConfig::new(min, gap)
            .with_tile_internal_padding(padding)
            .with_beam_width(beam)
    })
}

fn ids(tiles: &[Tile]) -> Vec<TileId> {
    tiles.iter().map(|t| t.id).collect()
}

fn expected_columns(config: &MasonryConfig, width: u32) -> usize {
    (((width + config.item_gap) / (config.min_item_width + config.item_gap)) as usize).max(1)
}

fn check_gap_rule(layout: &Layout, gap: u32) -> Result<(), TestCaseError> {
    for column in layout.columns() {
        let mut expected = 0;
        for cell in column {
            prop_assert_eq!(cell.top, expected, "cell {} off the gap rule", cell.id());
            expected = cell.bottom() + gap;
        }
    }
    Ok(())
}

fn cases() -> ProptestConfig {
    ProptestConfig::with_cases(64)
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Geometry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(cases())]

    #[test]
    fn column_count_follows_formula(config in arb_config(), width in 1u32..=2400, tiles in arb_tiles(12)) {
        prop_assume!(!tiles.is_empty());
        let packed = Packer::new(config.clone()).pack(&tiles, width);
        prop_assert_eq!(packed.columns, expected_columns(&config, width));
        prop_assert_eq!(packed.layout.column_count(), packed.columns);
    }

    #[test]
    fn every_tile_placed_once(config in arb_config(), width in 1u32..=2400, tiles in arb_tiles(24)) {
        let packed = Packer::new(config.clone()).pack(&tiles, width);
        let mut placed: Vec<TileId> = packed.layout.iter_cells().map(|c| c.id()).collect();
        placed.sort();
        prop_assert_eq!(placed, ids(&tiles));
        check_gap_rule(&packed.layout, config.item_gap)?;
    }

    #[test]
    fn columns_are_uniform(config in arb_config(), width in 1u32..=2400, tiles in arb_tiles(24)) {
        let packed = Packer::new(config.clone()).pack(&tiles, width);
        for (index, column) in packed.layout.columns().iter().enumerate() {
            for cell in column {
                prop_assert_eq!(cell.width, packed.column_width);
                prop_assert_eq!(cell.left, index as u32 * (packed.column_width + config.item_gap));
                prop_assert!(cell.height >= config.title_area_height);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4–5. Packing quality and determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(cases())]

    #[test]
    fn never_taller_than_greedy(config in arb_config(), width in 1u32..=2400, tiles in arb_tiles(24)) {
        let packed = Packer::new(config.clone()).pack(&tiles, width);
        let greedy = greedy_layout(&tiles, &config, width);
        prop_assert!(
            packed.layout.score() <= greedy.score(),
            "beam {:?} worse than greedy {:?}",
            packed.layout.score(),
            greedy.score()
        );
        prop_assert!(packed.layout.total_extent() <= greedy.total_extent());
    }

    #[test]
    fn packing_is_deterministic(config in arb_config(), width in 1u32..=2400, tiles in arb_tiles(24)) {
        let packer = Packer::new(config);
        let a = packer.pack(&tiles, width);
        let b = packer.pack(&tiles, width);
        prop_assert_eq!(a.layout.fingerprint(), b.layout.fingerprint());
        prop_assert_eq!(a, b);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6–8. Reflow
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(cases())]

    #[test]
    fn reflow_is_idempotent(config in arb_config(), width in 1u32..=2400, tiles in arb_tiles(24)) {
        let mut engine = ReflowEngine::new(config);
        let first = engine.update(&tiles, width).clone();
        let second = engine.update(&tiles, width).clone();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn resize_keeps_columns(
        config in arb_config(),
        width in 1u32..=2400,
        delta in 0u32..=400,
        tiles in arb_tiles(24),
    ) {
        let next = width + delta;
        prop_assume!(!tiles.is_empty());
        prop_assume!(expected_columns(&config, width) == expected_columns(&config, next));

        let mut engine = ReflowEngine::new(config.clone());
        let before = engine.update(&tiles, width).assignment(ids(&tiles));
        let after = engine.update(&tiles, next).clone();
        prop_assert_eq!(engine.stats().last_decision, Some(ReflowDecision::Resized));
        prop_assert_eq!(after.assignment(ids(&tiles)), before);
        check_gap_rule(&after, config.item_gap)?;
    }

    #[test]
    fn repack_equals_fresh_pack(
        config in arb_config(),
        w1 in 1u32..=2400,
        w2 in 1u32..=2400,
        first in arb_tiles(16),
        second in arb_tiles(16),
    ) {
        let mut engine = ReflowEngine::new(config.clone());
        engine.update(&first, w1);
        let layout = engine.update(&second, w2).clone();
        if let Some(ReflowDecision::Repacked(_)) = engine.stats().last_decision {
            prop_assert_eq!(layout, Packer::new(config).pack(&second, w2).layout);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Virtualization
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(cases())]

    #[test]
    fn window_cover_and_buffer_bound(
        config in arb_config(),
        width in 1u32..=2400,
        tiles in arb_tiles(40),
        scroll_top in 0u32..=6000,
        viewport in 0u32..=1500,
        buffer in 0usize..=6,
    ) {
        let layout = Packer::new(config).pack(&tiles, width).layout;
        let window_end = scroll_top + viewport;
        let ranges = visible_ranges(&layout, scroll_top, viewport, buffer);

        for (index, column) in layout.columns().iter().enumerate() {
            let range = ranges
                .iter()
                .find(|r| r.column == index)
                .map(|r| r.range.clone());
            prop_assert_eq!(range.clone(), column_range(column, scroll_top, viewport, buffer));

            let mut outside = 0;
            for (i, cell) in column.iter().enumerate() {
                let touches = cell.rect().spans_rows(scroll_top, window_end);
                let selected = range.as_ref().is_some_and(|r| r.contains(&i));
                if touches {
                    prop_assert!(selected, "column {} cell {} touches but not selected", index, i);
                } else if selected {
                    outside += 1;
                }
            }
            prop_assert!(outside <= 2 * buffer + 1, "{} extra cells for buffer {}", outside, buffer);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 10. Degenerate input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn degenerate_input_never_panics(
        min in 0u32..=3,
        gap in 0u32..=3,
        padding in 0u32..=u32::MAX,
        width in 0u32..=8,
        size in (0u32..=u32::MAX, 0u32..=u32::MAX),
    ) {
        let config = MasonryConfig::new(min, gap).with_tile_internal_padding(padding);
        let tiles = vec![Tile::new(1).with_intrinsic_size(size.0, size.1); 3];
        let mut engine = ReflowEngine::new(config);
        let layout = engine.update(&tiles, width).clone();
        if width == 0 {
            prop_assert!(layout.columns().is_empty());
        } else {
            prop_assert_eq!(layout.cell_count(), 3);
        }
        let _ = visible_ranges(&layout, 0, u32::MAX, usize::MAX);
    }
}
