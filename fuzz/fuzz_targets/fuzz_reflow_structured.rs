#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shelfwall_core::{MasonryConfig, PlayStatus, Tile};
use shelfwall_layout::{Packer, ReflowDecision, ReflowEngine};

#[derive(Debug, Arbitrary)]
enum Step {
    Resize(u16),
    Insert { at: u8, w: u8, h: u8 },
    Remove(u8),
    Status { at: u8, status: u8 },
    Reshape { at: u8, h: u8 },
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Script {
    initial: Vec<(u8, u8)>,
    width: u16,
    steps: Vec<Step>,
}

fuzz_target!(|script: Script| {
    let config = MasonryConfig::new(80, 8)
        .with_tile_internal_padding(4)
        .with_beam_width(8);
    let mut engine = ReflowEngine::new(config.clone());
    let packer = Packer::new(config);

    let mut next_id = 0u64;
    let mut tile = |w: u8, h: u8| {
        next_id += 1;
        Tile::new(next_id).with_thumbnail(format!("t/{next_id}.png"), u32::from(w), u32::from(h))
    };
    let mut tiles: Vec<Tile> = script.initial.iter().take(32).map(|&(w, h)| tile(w, h)).collect();
    let mut width = u32::from(script.width % 2048);
    engine.update(&tiles, width);

    for step in script.steps.into_iter().take(32) {
        match step {
            Step::Resize(w) => width = u32::from(w % 2048),
            Step::Insert { at, w, h } if tiles.len() < 48 => {
                let at = usize::from(at) % (tiles.len() + 1);
                tiles.insert(at, tile(w, h));
            }
            Step::Insert { .. } => {}
            Step::Remove(at) if !tiles.is_empty() => {
                tiles.remove(usize::from(at) % tiles.len());
            }
            Step::Remove(_) => {}
            Step::Status { at, status } if !tiles.is_empty() => {
                let index = usize::from(at) % tiles.len();
                tiles[index].play_status = match status % 3 {
                    0 => PlayStatus::Unplayed,
                    1 => PlayStatus::Playing,
                    _ => PlayStatus::Cleared,
                };
            }
            Step::Status { .. } => {}
            Step::Reshape { at, h } if !tiles.is_empty() => {
                let index = usize::from(at) % tiles.len();
                tiles[index].thumbnail_height = Some(u32::from(h));
            }
            Step::Reshape { .. } => {}
            Step::Clear => tiles.clear(),
        }

        let layout = engine.update(&tiles, width).clone();

        // Post-conditions that must always hold:
        match engine.stats().last_decision {
            Some(ReflowDecision::Repacked(_)) => {
                assert_eq!(layout, packer.pack(&tiles, width).layout, "re-pack diverged");
            }
            Some(ReflowDecision::Cleared) => {
                assert_eq!(layout.column_count(), 0, "cleared layout kept columns");
            }
            Some(ReflowDecision::Resized) | None => {}
        }
        if !tiles.is_empty() && width > 0 {
            assert_eq!(layout.cell_count(), tiles.len(), "tile lost or duplicated");
        }
    }
});
