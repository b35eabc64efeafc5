use crate::grids::terrain_grid::TerrainGrid;
use crate::grids::{Position, TerrainKind};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainFeature {
    pub kind: TerrainKind,
    pub count: usize,
    pub max_walk_length: usize,
}

impl TerrainFeature {
    pub fn new(kind: TerrainKind, count: usize, max_walk_length: usize) -> Self {
        Self {
            kind,
            count,
            max_walk_length,
        }
    }
}

pub fn default_features() -> Vec<TerrainFeature> {
    vec![
        TerrainFeature::new(TerrainKind::Water, 4, 50),
        TerrainFeature::new(TerrainKind::Mud, 6, 30),
        TerrainFeature::new(TerrainKind::Forest, 5, 40),
    ]
}

/// Self-avoiding walk from `origin`, painting plain cells with `kind`.
/// Returns how many cells were painted.
pub fn random_walk<R: Rng + ?Sized>(
    grid: &mut TerrainGrid,
    origin: Position,
    kind: TerrainKind,
    max_walk_length: usize,
    rng: &mut R,
) -> usize {
    let mut current = origin;
    let mut painted = 0;

    for _ in 0..max_walk_length {
        if !grid.is_kind(current, TerrainKind::Plain) {
            break;
        }
        grid.set_cell(current, kind);
        painted += 1;

        let open = grid
            .get_neighborhood_of(current, 1)
            .of_kind(TerrainKind::Plain);
        match open.choose(rng) {
            Some(next) => current = *next,
            None => break,
        }
    }

    painted
}

/// Runs every feature's walks in order. Walls are never touched.
pub fn paint_features<R: Rng + ?Sized>(
    grid: &mut TerrainGrid,
    features: &[TerrainFeature],
    rng: &mut R,
) -> usize {
    let mut painted = 0;

    for feature in features {
        for _ in 0..feature.count {
            let origin = match grid.positions_of(TerrainKind::Plain).choose(rng) {
                Some(origin) => *origin,
                None => {
                    log::warn!("no plain cell left for {} walk", feature.kind.name());
                    break;
                }
            };

            painted += random_walk(grid, origin, feature.kind, feature.max_walk_length, rng);
        }
    }

    painted
}

#[cfg(test)]
mod test_terrain {
    use super::*;

    #[test]
    fn walk_is_bounded_and_self_avoiding() {
        let mut grid = TerrainGrid::with_dims(1, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let painted = random_walk(&mut grid, (0, 0), TerrainKind::Water, 4, &mut rng);
        assert_eq!(painted, 4);
        assert_eq!(grid.count(TerrainKind::Water), 4);
        for col in 0..4 {
            assert!(grid.is_kind((0, col), TerrainKind::Water));
        }
    }

    #[test]
    fn walk_stops_when_boxed_in() {
        let mut grid = TerrainGrid::with_dims(3, 3).unwrap();
        grid.fill();
        grid.set_cell((1, 1), TerrainKind::Plain);

        let painted = random_walk(&mut grid, (1, 1), TerrainKind::Mud, 30, &mut rand::thread_rng());
        assert_eq!(painted, 1);
        assert_eq!(grid.count(TerrainKind::Wall), 8);
    }

    #[test]
    fn never_paints_walls() {
        let mut grid = TerrainGrid::with_dims(9, 9).unwrap();
        for row in 0..9 {
            grid.set_cell((row, 4), TerrainKind::Wall);
        }

        paint_features(&mut grid, &default_features(), &mut StdRng::seed_from_u64(12));
        assert_eq!(grid.count(TerrainKind::Wall), 9);
    }

    #[test]
    fn all_walls_is_a_no_op() {
        let mut grid = TerrainGrid::with_dims(4, 4).unwrap();
        grid.fill();
        let painted = paint_features(&mut grid, &default_features(), &mut StdRng::seed_from_u64(0));
        assert_eq!(painted, 0);
    }
}
