use crate::grids::terrain_grid::TerrainGrid;
use crate::grids::{Position, TerrainKind};
use rand::prelude::*;

/// Walls removed by a braiding pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Braid {
    pub carved: Vec<Position>,
    pub candidates: usize,
}

/// An interior wall joining two plain cells on opposite sides.
pub fn is_braid_candidate(grid: &TerrainGrid, (row, col): Position) -> bool {
    if row == 0 || col == 0 || row + 1 >= grid.dims.rows || col + 1 >= grid.dims.columns {
        return false;
    }
    if !grid.is_kind((row, col), TerrainKind::Wall) {
        return false;
    }

    let plain = |at| grid.is_kind(at, TerrainKind::Plain);
    (plain((row, col - 1)) && plain((row, col + 1)))
        || (plain((row - 1, col)) && plain((row + 1, col)))
}

pub fn braid_candidates(grid: &TerrainGrid) -> Vec<Position> {
    let mut candidates = Vec::new();
    for row in 1..grid.dims.rows.saturating_sub(1) {
        for col in 1..grid.dims.columns.saturating_sub(1) {
            if is_braid_candidate(grid, (row, col)) {
                candidates.push((row, col));
            }
        }
    }

    candidates
}

/// Opens up to `count` candidate walls, each one adding a loop. Asking for
/// more than exist just opens all of them.
pub fn braid<R: Rng + ?Sized>(grid: &mut TerrainGrid, count: usize, rng: &mut R) -> Braid {
    let mut candidates = braid_candidates(grid);
    let total = candidates.len();
    candidates.shuffle(rng);
    candidates.truncate(count);

    for wall in candidates.iter() {
        grid.set_cell(*wall, TerrainKind::Plain);
    }

    Braid {
        carved: candidates,
        candidates: total,
    }
}
