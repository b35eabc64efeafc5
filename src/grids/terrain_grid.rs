use crate::error::GridError;
use crate::grids::{Dimensions, Direction, Neighborhood, Position, TerrainKind};

pub const DEFAULT_START: Position = (12, 10);
pub const DEFAULT_GOAL: Position = (12, 40);

/// Row-major terrain board plus the start and goal markers.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGrid {
    pub dims: Dimensions,

    cells: Vec<TerrainKind>,

    start: Position,
    goal: Position,
}

impl TerrainGrid {
    pub fn new() -> Self {
        Self {
            dims: Dimensions::default(),
            cells: vec![TerrainKind::Plain; Dimensions::default().len()],
            start: DEFAULT_START,
            goal: DEFAULT_GOAL,
        }
    }

    /// Empty board of the given size, markers clamped into the top-left
    /// and bottom-right corners when the defaults do not fit. Start and goal
    /// need a cell each.
    pub fn with_dims(rows: usize, columns: usize) -> Result<Self, GridError> {
        let dims = Dimensions { rows, columns };
        if dims.len() < 2 {
            return Err(GridError::InvalidDimensions { rows, columns });
        }

        let (start, goal) = if dims.contains(DEFAULT_START) && dims.contains(DEFAULT_GOAL) {
            (DEFAULT_START, DEFAULT_GOAL)
        } else {
            ((0, 0), (rows - 1, columns - 1))
        };

        Ok(Self {
            cells: vec![TerrainKind::Plain; dims.len()],
            dims,
            start,
            goal,
        })
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn cells(&self) -> &[TerrainKind] {
        &self.cells
    }

    pub fn get_cell(&self, position: Position) -> Option<TerrainKind> {
        if self.dims.contains(position) {
            Some(self.cells[self.dims.index_of(position)])
        } else {
            None
        }
    }

    /// Unchecked write, returns the previous kind. Used by the generators,
    /// which only ever address in-bounds cells.
    pub fn set_cell(&mut self, position: Position, kind: TerrainKind) -> TerrainKind {
        let index = self.dims.index_of(position);
        std::mem::replace(&mut self.cells[index], kind)
    }

    pub fn is_kind(&self, position: Position, kind: TerrainKind) -> bool {
        self.get_cell(position) == Some(kind)
    }

    pub fn get_neighborhood_of(&self, position: Position, distance: usize) -> Neighborhood {
        let mut neighbors = Neighborhood::new();

        for direction in Direction::ALL.iter() {
            let neighbor = direction
                .step(position, distance, self.dims)
                .map(|at| (self.cells[self.dims.index_of(at)], at));
            neighbors.set(*direction, neighbor);
        }

        neighbors
    }

    pub fn count(&self, kind: TerrainKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    pub fn positions_of(&self, kind: TerrainKind) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == kind)
            .map(|(index, _)| self.dims.position_of(index))
            .collect()
    }

    pub fn clear(&mut self) {
        self.cells = vec![TerrainKind::Plain; self.cells.len()];
    }

    pub fn fill(&mut self) {
        self.cells = vec![TerrainKind::Wall; self.cells.len()];
    }

    /// Forces the start and goal cells back to plain.
    pub fn protect_markers(&mut self) {
        self.set_cell(self.start, TerrainKind::Plain);
        self.set_cell(self.goal, TerrainKind::Plain);
    }

    /// Board edit: paints one cell. Start and goal only accept plain.
    pub fn paint(&mut self, position: Position, kind: TerrainKind) -> Result<TerrainKind, GridError> {
        if !self.dims.contains(position) {
            return Err(GridError::OutOfBounds(position));
        }
        if kind != TerrainKind::Plain && (position == self.start || position == self.goal) {
            return Err(GridError::Protected(position));
        }

        Ok(self.set_cell(position, kind))
    }

    pub fn move_start(&mut self, position: Position) -> Result<(), GridError> {
        self.check_marker_target(position, self.goal)?;
        self.start = position;
        self.set_cell(position, TerrainKind::Plain);
        Ok(())
    }

    pub fn move_goal(&mut self, position: Position) -> Result<(), GridError> {
        self.check_marker_target(position, self.start)?;
        self.goal = position;
        self.set_cell(position, TerrainKind::Plain);
        Ok(())
    }

    fn check_marker_target(&self, position: Position, other: Position) -> Result<(), GridError> {
        match self.get_cell(position) {
            None => Err(GridError::OutOfBounds(position)),
            Some(TerrainKind::Wall) => Err(GridError::Blocked(position)),
            Some(_) if position == other => Err(GridError::Protected(position)),
            Some(_) => Ok(()),
        }
    }

    /// Wire form sent to the solver: one vector of terrain codes per row.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.dims.columns)
            .map(|row| row.iter().map(|kind| u8::from(*kind)).collect())
            .collect()
    }
}

impl Default for TerrainGrid {
    fn default() -> Self {
        Self::new()
    }
}
