/// Grid generation: random, non-overlapping item placement.
///
/// Randomness comes from the caller's RNG so a seeded RNG gives a
/// reproducible grid.

use std::collections::BTreeSet;

use rand::seq::{index, IteratorRandom};
use rand::Rng;

use super::rules::{EXTRA_LIFE_CHANCE, EXTRA_SCORE_CHANCE};
use super::tile::{TileAssignment, TileKind};

/// `min(count, max)` distinct positions drawn uniformly from `[0, max)`.
///
/// Sampling without replacement, so it always terminates even when
/// `count >= max`.
pub fn pick_unique_positions<R: Rng + ?Sized>(rng: &mut R, count: usize, max: usize) -> Vec<usize> {
    let amount = count.min(max);
    if amount == 0 {
        return vec![];
    }
    index::sample(rng, max, amount).into_vec()
}

/// One position in `[0, max)` not in `used`, or None when all are taken.
pub fn pick_free_position<R: Rng + ?Sized>(rng: &mut R, used: &BTreeSet<usize>, max: usize) -> Option<usize> {
    (0..max).filter(|p| !used.contains(p)).choose(rng)
}

/// Normal round grid: treasures, then at most one extra life and at
/// most one extra score on free positions. Everything else is blank.
pub fn assign_items<R: Rng + ?Sized>(rng: &mut R, grid_size: usize, treasure_count: usize) -> TileAssignment {
    let mut tiles = TileAssignment::blank(grid_size);
    let mut used = BTreeSet::new();

    for pos in pick_unique_positions(rng, treasure_count, grid_size) {
        tiles.set(pos, TileKind::Treasure);
        used.insert(pos);
    }

    // Each roll is independent; a full grid just skips the item
    if rng.random_bool(EXTRA_LIFE_CHANCE) {
        if let Some(pos) = pick_free_position(rng, &used, grid_size) {
            tiles.set(pos, TileKind::ExtraLife);
            used.insert(pos);
        }
    }
    if rng.random_bool(EXTRA_SCORE_CHANCE) {
        if let Some(pos) = pick_free_position(rng, &used, grid_size) {
            tiles.set(pos, TileKind::ExtraScore);
            used.insert(pos);
        }
    }

    log_grid(&tiles);
    tiles
}

/// Bonus round grid: treasures only.
pub fn bonus_items<R: Rng + ?Sized>(rng: &mut R, grid_size: usize, treasure_count: usize) -> TileAssignment {
    let mut tiles = TileAssignment::blank(grid_size);
    reroll_treasures(rng, &mut tiles, treasure_count);
    tiles
}

/// Move every treasure to a fresh random set of positions.
/// Used by the bonus round after each click; old positions may repeat.
/// Bonus grids hold treasures only, so nothing else gets overwritten.
pub fn reroll_treasures<R: Rng + ?Sized>(rng: &mut R, tiles: &mut TileAssignment, treasure_count: usize) {
    tiles.clear_treasures();
    let size = tiles.len();
    for pos in pick_unique_positions(rng, treasure_count, size) {
        tiles.set(pos, TileKind::Treasure);
    }
}

fn log_grid(tiles: &TileAssignment) {
    if log::log_enabled!(log::Level::Debug) {
        log::debug!(
            "treasure at {:?}, extra life at {:?}, extra score at {:?}",
            tiles.positions_of(TileKind::Treasure),
            tiles.positions_of(TileKind::ExtraLife),
            tiles.positions_of(TileKind::ExtraScore),
        );
        for line in tiles.dump_rows() {
            log::debug!("{line}");
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
