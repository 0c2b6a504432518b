#![no_main]

use libfuzzer_sys::fuzz_target;
use shelfwall_core::{MasonryConfig, Tile};
use shelfwall_layout::{Packer, column_count, visible};

fuzz_target!(|data: &[u8]| {
    // Header: container width (2 bytes), min width, gap, padding, beam width.
    if data.len() < 6 {
        return;
    }
    // Width 0..1024 and min width 32..287 keep the column count at 32 or below.
    let width = u32::from(u16::from_le_bytes([data[0], data[1]]) % 1024);
    let config = MasonryConfig::new(u32::from(data[2]) + 32, u32::from(data[3] % 64))
        .with_tile_internal_padding(u32::from(data[4] % 32))
        .with_beam_width(usize::from(data[5] % 16));
    let payload = &data[6..];

    // Two bytes per tile: intrinsic width and height (0 means unknown).
    let tiles: Vec<Tile> = payload
        .chunks_exact(2)
        .take(48)
        .enumerate()
        .map(|(i, pair)| {
            Tile::new(i as u64).with_intrinsic_size(u32::from(pair[0]), u32::from(pair[1]))
        })
        .collect();

    let packer = Packer::new(config);
    let packed = packer.pack(&tiles, width);
    let layout = &packed.layout;

    // Post-conditions that must always hold:
    if tiles.is_empty() || width == 0 {
        assert_eq!(layout.column_count(), 0, "empty input produced columns");
        return;
    }
    assert_eq!(
        layout.column_count(),
        column_count(packer.config(), width),
        "column count off formula"
    );
    assert_eq!(layout.cell_count(), tiles.len(), "tile lost or duplicated");

    let gap = packer.config().item_gap;
    for column in layout.columns() {
        let mut expected_top = 0u32;
        for cell in column {
            assert_eq!(cell.top, expected_top, "gap invariant broken");
            expected_top = cell.bottom().saturating_add(gap);
        }
    }

    let extent = layout.total_extent();
    let all = visible(layout, 0, extent, 0);
    assert_eq!(all.len(), tiles.len(), "full window missed cells");
});
