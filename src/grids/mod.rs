pub mod terrain_grid;

use serde::{Deserialize, Serialize};

pub const ROWS: usize = 25;
pub const COLS: usize = 50;

/// (row, column), zero based, row 0 at the top.
pub type Position = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
}

impl Dimensions {
    pub fn contains(&self, (row, column): Position) -> bool {
        row < self.rows && column < self.columns
    }

    pub fn index_of(&self, (row, column): Position) -> usize {
        self.columns * row + column
    }

    pub fn position_of(&self, index: usize) -> Position {
        (index / self.columns, index % self.columns)
    }

    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            rows: ROWS,
            columns: COLS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Moves `distance` cells away from `from`, `None` when that leaves `dims`.
    pub fn step(self, from: Position, distance: usize, dims: Dimensions) -> Option<Position> {
        let (row, column) = from;
        let to = match self {
            Direction::North => (row.checked_sub(distance)?, column),
            Direction::South => (row + distance, column),
            Direction::East => (row, column + distance),
            Direction::West => (row, column.checked_sub(distance)?),
        };

        if dims.contains(to) {
            Some(to)
        } else {
            None
        }
    }
}

pub type Neighbor = (TerrainKind, Position);

/// The up-to-four cells `distance` steps away from a cell, in N/S/E/W order.
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood {
    pub north: Option<Neighbor>,
    pub south: Option<Neighbor>,
    pub east: Option<Neighbor>,
    pub west: Option<Neighbor>,

    counter: usize,
}

impl Neighborhood {
    pub fn new() -> Self {
        Self {
            north: None,
            south: None,
            east: None,
            west: None,
            counter: 0,
        }
    }

    pub fn get(&self, direction: Direction) -> Option<Neighbor> {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    pub fn set(&mut self, direction: Direction, neighbor: Option<Neighbor>) {
        match direction {
            Direction::North => self.north = neighbor,
            Direction::South => self.south = neighbor,
            Direction::East => self.east = neighbor,
            Direction::West => self.west = neighbor,
        }
    }

    /// Positions of the neighbors holding `kind`.
    pub fn of_kind(self, kind: TerrainKind) -> Vec<Position> {
        self.filter(|((neighbor, _), _)| *neighbor == kind)
            .map(|((_, position), _)| position)
            .collect()
    }
}

impl Default for Neighborhood {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Neighborhood {
    type Item = (Neighbor, Direction);

    fn next(&mut self) -> Option<Self::Item> {
        while self.counter < Direction::ALL.len() {
            let direction = Direction::ALL[self.counter];
            self.counter += 1;

            if let Some(neighbor) = self.get(direction) {
                return Some((neighbor, direction));
            }
        }

        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    Plain = 0,
    Wall = 1,
    Water = 2,
    Mud = 3,
    Forest = 4,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 5] = [
        TerrainKind::Plain,
        TerrainKind::Wall,
        TerrainKind::Water,
        TerrainKind::Mud,
        TerrainKind::Forest,
    ];

    /// Cost of entering a cell of this kind, `None` for walls.
    pub fn cost(self) -> Option<u32> {
        match self {
            TerrainKind::Plain => Some(1),
            TerrainKind::Wall => None,
            TerrainKind::Water => Some(5),
            TerrainKind::Mud => Some(10),
            TerrainKind::Forest => Some(3),
        }
    }

    pub fn is_passable(self) -> bool {
        self.cost().is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::Plain => "Plain",
            TerrainKind::Wall => "Wall",
            TerrainKind::Water => "Water",
            TerrainKind::Mud => "Mud",
            TerrainKind::Forest => "Forest",
        }
    }
}

impl TryFrom<u8> for TerrainKind {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TerrainKind::Plain),
            1 => Ok(TerrainKind::Wall),
            2 => Ok(TerrainKind::Water),
            3 => Ok(TerrainKind::Mud),
            4 => Ok(TerrainKind::Forest),
            other => Err(format!("unknown terrain code {}", other)),
        }
    }
}

impl From<TerrainKind> for u8 {
    fn from(kind: TerrainKind) -> Self {
        kind as u8
    }
}
