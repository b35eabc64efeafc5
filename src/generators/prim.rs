use crate::generators::Generator;
use crate::grids::terrain_grid::TerrainGrid;
use crate::grids::{Position, TerrainKind};
use rand::prelude::*;

/// Rooms sit on even rows and even columns.
pub fn is_room(position: Position) -> bool {
    position.0 % 2 == 0 && position.1 % 2 == 0
}

/// Randomized Prim's carve over the even-coordinate sublattice. Even cells
/// are rooms, the odd cells between them are bridges, so the carved region
/// is always a spanning tree.
pub struct RandPrims<'a, R: Rng> {
    grid: &'a mut TerrainGrid,
    frontier: Vec<Position>,
    in_frontier: Vec<bool>,
    rng: R,
    last_carved: Option<Position>,
    pub done: bool,
}

impl<'a, R: Rng> RandPrims<'a, R> {
    pub fn new(grid: &'a mut TerrainGrid, mut rng: R) -> Self {
        grid.fill();

        // make it even
        let row = rng.gen_range(0, (grid.dims.rows + 1) / 2) * 2;
        let col = rng.gen_range(0, (grid.dims.columns + 1) / 2) * 2;
        grid.set_cell((row, col), TerrainKind::Plain);

        let mut carver = Self {
            in_frontier: vec![false; grid.dims.len()],
            grid,
            frontier: Vec::new(),
            rng,
            last_carved: Some((row, col)),
            done: false,
        };
        carver.push_frontier_of((row, col));
        carver.done = carver.frontier.is_empty();

        carver
    }

    /// Room most recently joined to the tree.
    pub fn last_carved(&self) -> Option<Position> {
        self.last_carved
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    fn push_frontier_of(&mut self, position: Position) {
        for ((kind, at), _) in self.grid.get_neighborhood_of(position, 2) {
            let index = self.grid.dims.index_of(at);
            if kind == TerrainKind::Wall && !self.in_frontier[index] {
                self.in_frontier[index] = true;
                self.frontier.push(at);
            }
        }
    }
}

impl<'a, R: Rng> Generator for RandPrims<'a, R> {
    fn step_generation(&mut self) {
        if self.frontier.is_empty() {
            self.done = true;
            return;
        }

        let rand_idx = self.rng.gen_range(0, self.frontier.len());
        let cell = self.frontier.swap_remove(rand_idx);

        let carved = self
            .grid
            .get_neighborhood_of(cell, 2)
            .of_kind(TerrainKind::Plain);

        if let Some(&neighbor) = carved.choose(&mut self.rng) {
            let bridge = ((cell.0 + neighbor.0) / 2, (cell.1 + neighbor.1) / 2);
            self.grid.set_cell(cell, TerrainKind::Plain);
            self.grid.set_cell(bridge, TerrainKind::Plain);
            self.last_carved = Some(cell);
        }

        self.push_frontier_of(cell);
        self.done = self.frontier.is_empty();
    }

    fn next_step(&mut self) -> &TerrainGrid {
        self.step_generation();
        &*self.grid
    }

    fn generate_maze(&mut self) -> &TerrainGrid {
        while !self.done {
            self.step_generation();
        }

        &*self.grid
    }

    fn is_done(&self) -> bool {
        self.done
    }
}
