//! # snake_grid
//!
//! The grid world behind a discretely-stepped snake: cells, directions,
//! the snake body, food placement, collision rules and the speed curve
//! that turns "food eaten" into a step cadence.
//!
//! Everything here is pure game logic with no rendering and no input
//! handling.  The only source of nondeterminism is the RNG handed to
//! [`GridWorld::spawn_food`], so callers (and tests) decide how food is
//! seeded.
//!
//! ## Quick start
//!
//! ```rust
//! use snake_grid::{Cell, Direction, Grid, GridWorld, Snake, SpeedCurve};
//! use rand::SeedableRng;
//!
//! let world = GridWorld::new(Grid::default());
//! let mut snake = Snake::new(Cell::new(300, 300));
//! let ate = world.advance(&mut snake, Cell::new(320, 300), Direction::Right);
//! assert!(ate);
//! assert_eq!(snake.len(), 2);
//! assert!(!world.check_collision(&snake));
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let food = world.spawn_food(&snake, &mut rng).unwrap();
//! assert!(!snake.contains(food));
//!
//! assert_eq!(SpeedCurve::default().cadence(1), 13);
//! ```
//!
//! ## Coordinates
//!
//! Cells are addressed in pixel units: every [`Cell`] is a multiple of the
//! grid's `cell_size`, with the origin in the top-left corner and `y`
//! growing downward.

pub mod error;
pub mod grid;
pub mod speed;

pub use error::GridError;
pub use grid::{Cell, Direction, Grid, GridWorld, Snake, SPAWN_ATTEMPTS};
pub use speed::SpeedCurve;
