//! Cells, directions, the snake body and the rules that move it.
//!
//! [`GridWorld`] owns no mutable state of its own: it holds the board
//! geometry and applies one rule at a time to a [`Snake`] the caller owns.

use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GridError;

/// Random draws `spawn_food` tries before it enumerates the free cells.
pub const SPAWN_ATTEMPTS: usize = 64;

// ════════════════════════════════════════════════════════════════════════════
// Cell
// ════════════════════════════════════════════════════════════════════════════

/// One grid-aligned position, in pixels.  Both coordinates are multiples of
/// the grid's cell size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The neighbouring cell `cell_size` pixels away in `dir`.
    pub fn step(self, dir: Direction, cell_size: i32) -> Cell {
        let (dx, dy) = dir.offset();
        Cell {
            x: self.x + dx * cell_size,
            y: self.y + dy * cell_size,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Direction
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up    => Direction::Down,
            Direction::Down  => Direction::Up,
            Direction::Left  => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step `(dx, dy)`; `y` grows downward.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up    => ( 0, -1),
            Direction::Down  => ( 0,  1),
            Direction::Left  => (-1,  0),
            Direction::Right => ( 1,  0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up    => "UP",
            Direction::Down  => "DOWN",
            Direction::Left  => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Grid — board geometry
// ════════════════════════════════════════════════════════════════════════════

/// Board geometry in pixels.  Valid cells span `[0, width) × [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid {
    pub width:     i32,
    pub height:    i32,
    pub cell_size: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            width:     600,
            height:    600,
            cell_size: 20,
        }
    }
}

impl Grid {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Result<Self, GridError> {
        let grid = Grid { width, height, cell_size };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        let positive = self.width > 0 && self.height > 0 && self.cell_size > 0;
        if !positive || self.width % self.cell_size != 0 || self.height % self.cell_size != 0 {
            return Err(GridError::InvalidGeometry {
                width:     self.width,
                height:    self.height,
                cell_size: self.cell_size,
            });
        }
        Ok(())
    }

    pub fn columns(&self) -> i32 { self.width / self.cell_size }
    pub fn rows(&self)    -> i32 { self.height / self.cell_size }

    pub fn cell_count(&self) -> usize {
        (self.columns() as usize) * (self.rows() as usize)
    }

    /// The cell containing the board's midpoint.
    pub fn center(&self) -> Cell {
        let snap = |v: i32| v - v % self.cell_size;
        Cell::new(snap(self.width / 2), snap(self.height / 2))
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    /// Cell at column `col`, row `row`.
    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        Cell::new(col * self.cell_size, row * self.cell_size)
    }

    /// Every cell on the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows()).flat_map(move |row| (0..self.columns()).map(move |col| self.cell_at(col, row)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Snake — the body, head first
// ════════════════════════════════════════════════════════════════════════════

/// Ordered body cells, head at the front.  Never empty.
///
/// Backed by a `VecDeque` so the per-move head push and tail pop are both
/// O(1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// A single-segment snake.
    pub fn new(head: Cell) -> Self {
        let mut body = VecDeque::with_capacity(16);
        body.push_back(head);
        Snake { body }
    }

    /// Build a snake from cells listed head first.  `None` when empty.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() { None } else { Some(Snake { body }) }
    }

    pub fn head(&self) -> Cell { self.body[0] }
    pub fn tail(&self) -> Cell { self.body[self.body.len() - 1] }

    pub fn len(&self) -> usize { self.body.len() }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool { self.body.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// True when `cell` is one of the segments behind the head.
    pub fn body_contains(&self, cell: Cell) -> bool {
        self.body.iter().skip(1).any(|&c| c == cell)
    }

    pub fn to_vec(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GridWorld — the movement, collision and food rules
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridWorld {
    grid: Grid,
}

impl GridWorld {
    pub fn new(grid: Grid) -> Self {
        GridWorld { grid }
    }

    pub fn grid(&self) -> &Grid { &self.grid }

    /// The startup snake: one segment on the centre cell.
    pub fn initial_snake(&self) -> Snake {
        Snake::new(self.grid.center())
    }

    /// Move `snake` one cell in `direction`.
    ///
    /// The new head is pushed onto the front.  If it lands on `food` the
    /// tail stays (the body grows by one) and `true` is returned; the caller
    /// is then responsible for spawning fresh food.  Otherwise the tail is
    /// dropped and the length is unchanged.
    ///
    /// No collision check happens here; see [`GridWorld::check_collision`].
    pub fn advance(&self, snake: &mut Snake, food: Cell, direction: Direction) -> bool {
        let head = snake.head().step(direction, self.grid.cell_size);
        snake.body.push_front(head);

        let ate = head == food;
        if !ate {
            snake.body.pop_back();
        }
        debug!(head = %head, len = snake.len(), ate, "snake advanced {}", direction);
        ate
    }

    /// True iff the head is off the board or sits on another body segment.
    pub fn check_collision(&self, snake: &Snake) -> bool {
        let head = snake.head();
        !self.grid.contains(head) || snake.body_contains(head)
    }

    /// Pick a cell uniformly among those not covered by `snake`.
    ///
    /// Tries [`SPAWN_ATTEMPTS`] random draws first, which almost always
    /// succeeds on a mostly-empty board, then falls back to choosing from
    /// the enumerated free cells.  Fails only when no free cell exists.
    pub fn spawn_food<R: Rng + ?Sized>(&self, snake: &Snake, rng: &mut R) -> Result<Cell, GridError> {
        let (columns, rows) = (self.grid.columns(), self.grid.rows());

        if snake.len() < self.grid.cell_count() {
            for _ in 0..SPAWN_ATTEMPTS {
                let cell = self.grid.cell_at(rng.gen_range(0..columns), rng.gen_range(0..rows));
                if !snake.contains(cell) {
                    return Ok(cell);
                }
            }
        }

        debug!(len = snake.len(), "random food placement exhausted, scanning free cells");
        let free: Vec<Cell> = self.grid.cells().filter(|&c| !snake.contains(c)).collect();
        free.choose(rng)
            .copied()
            .ok_or(GridError::NoFreeCell { columns, rows })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
