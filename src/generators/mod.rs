pub mod braid;
pub mod prim;
pub mod terrain;

use crate::grids::terrain_grid::TerrainGrid;
use crate::grids::TerrainKind;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use prim::RandPrims;
use terrain::{default_features, TerrainFeature};

/// Stepwise maze construction, so a carve can be animated or run to the end.
pub trait Generator {
    fn step_generation(&mut self);
    fn next_step(&mut self) -> &TerrainGrid;
    fn generate_maze(&mut self) -> &TerrainGrid;
    fn is_done(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Extra walls knocked out after the carve, each one adds a loop.
    pub imperfection_count: usize,
    pub terrain_features: Vec<TerrainFeature>,
    /// Fixed seed for reproducible boards, entropy otherwise.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            imperfection_count: 20,
            terrain_features: default_features(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub loops_carved: usize,
    pub braid_candidates: usize,
    pub cells_painted: usize,
}

pub struct MazeGenerator<R: Rng = StdRng> {
    rng: R,
}

impl MazeGenerator<StdRng> {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::with_rng(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MazeGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Rebuilds `grid` in place: carve, braid, paint terrain, then clear the
    /// start and goal cells. The markers themselves are left where they are.
    pub fn generate(&mut self, grid: &mut TerrainGrid, config: &GeneratorConfig) -> GenerationReport {
        RandPrims::new(grid, &mut self.rng).generate_maze();

        let braid = braid::braid(grid, config.imperfection_count, &mut self.rng);
        if config.imperfection_count > 0 {
            log::info!("Carved {} extra paths to create loops.", braid.carved.len());
        }

        let cells_painted = terrain::paint_features(grid, &config.terrain_features, &mut self.rng);
        grid.protect_markers();

        log::info!(
            "Generated {}x{} maze, {} walls, {} terrain cells",
            grid.dims.rows,
            grid.dims.columns,
            grid.count(TerrainKind::Wall),
            cells_painted
        );

        GenerationReport {
            loops_carved: braid.carved.len(),
            braid_candidates: braid.candidates,
            cells_painted,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::grids::terrain_grid::TerrainGrid;
    use crate::grids::TerrainKind;
    use std::collections::VecDeque;

    /// Connected components over every non-wall cell.
    pub fn open_components(grid: &TerrainGrid) -> usize {
        let mut seen = vec![false; grid.dims.len()];
        let mut components = 0;

        for start in 0..grid.dims.len() {
            if seen[start] || grid.cells()[start] == TerrainKind::Wall {
                continue;
            }
            components += 1;
            seen[start] = true;

            let mut queue = VecDeque::new();
            queue.push_back(grid.dims.position_of(start));
            while let Some(at) = queue.pop_front() {
                for ((kind, next), _) in grid.get_neighborhood_of(at, 1) {
                    let index = grid.dims.index_of(next);
                    if kind != TerrainKind::Wall && !seen[index] {
                        seen[index] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        components
    }
}
