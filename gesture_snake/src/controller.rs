//! Per-tick orchestration: gesture interpretation, move cadence, game over
//! and restart.
//!
//! `GameController` exclusively owns the [`GameState`].  Each call to
//! [`GameController::step`] is one external tick (one captured frame).

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use hand_gesture::{GestureInterpreter, GestureState, HandSample};
use snake_grid::{Cell, Direction, Grid, GridError, GridWorld, Snake, SpeedCurve};

use crate::config::GameConfig;

// ════════════════════════════════════════════════════════════════════════════
// Phase / TickOutcome
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase { Running, GameOver }

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not a move tick.
    Waiting,
    Moved,
    /// Moved onto food; fresh food spawned and cadence recomputed.
    Ate,
    /// The move ended on a wall or the body; now GameOver.
    Collided,
    /// Food was eaten but the snake now fills the board; now GameOver.
    BoardFilled,
    /// Already GameOver; nothing moved.
    Over,
}

// ════════════════════════════════════════════════════════════════════════════
// GameState — the rendering snapshot
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    snake:         Snake,
    food:          Cell,
    direction:     Direction,
    /// Ticks between moves; see [`SpeedCurve::cadence`].
    cadence:       u32,
    food_eaten:    u32,
    frame_counter: u64,
    phase:         Phase,
}

impl GameState {
    pub fn snake(&self)         -> &Snake    { &self.snake }
    pub fn food(&self)          -> Cell      { self.food }
    pub fn direction(&self)     -> Direction { self.direction }
    pub fn cadence(&self)       -> u32       { self.cadence }
    pub fn food_eaten(&self)    -> u32       { self.food_eaten }
    pub fn frame_counter(&self) -> u64       { self.frame_counter }
    pub fn phase(&self)         -> Phase     { self.phase }
    pub fn is_running(&self)    -> bool      { self.phase == Phase::Running }
}

// ════════════════════════════════════════════════════════════════════════════
// GameController
// ════════════════════════════════════════════════════════════════════════════

pub struct GameController {
    world:          GridWorld,
    curve:          SpeedCurve,
    interpreter:    GestureInterpreter,
    rng:            StdRng,
    state:          GameState,
    quit_requested: bool,
}

impl GameController {
    pub fn new(config: &GameConfig) -> Result<Self, GridError> {
        config.grid.validate()?;
        config.speed.validate()?;

        let world = GridWorld::new(config.grid);
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let state = Self::startup_state(&world, &config.speed, &mut rng)?;

        Ok(GameController {
            world,
            curve: config.speed,
            interpreter: GestureInterpreter::new(state.direction),
            rng,
            state,
            quit_requested: false,
        })
    }

    fn startup_state(world: &GridWorld, curve: &SpeedCurve, rng: &mut StdRng) -> Result<GameState, GridError> {
        let snake = world.initial_snake();
        let food = world.spawn_food(&snake, rng)?;
        Ok(GameState {
            snake,
            food,
            direction:     Direction::Right,
            cadence:       curve.cadence(0),
            food_eaten:    0,
            frame_counter: 0,
            phase:         Phase::Running,
        })
    }

    // ── one tick ──────────────────────────────────────────────────────────

    /// Run gesture interpretation, then advance the snake if this is a move
    /// tick.  `sample` is `None` when no hand was detected this frame.
    pub fn step(&mut self, sample: Option<&HandSample>) -> TickOutcome {
        let state = &mut self.state;
        state.direction = self.interpreter.observe(sample, state.direction);
        state.frame_counter += 1;

        if state.phase == Phase::GameOver {
            return TickOutcome::Over;
        }
        if state.frame_counter % u64::from(state.cadence) != 0 {
            return TickOutcome::Waiting;
        }

        let mut outcome = TickOutcome::Moved;
        if self.world.advance(&mut state.snake, state.food, state.direction) {
            state.food_eaten += 1;
            state.cadence = self.curve.cadence(state.food_eaten);
            info!(food_eaten = state.food_eaten, cadence = state.cadence, "food eaten");

            match self.world.spawn_food(&state.snake, &mut self.rng) {
                Ok(food) => {
                    debug!(food = %food, "food spawned");
                    state.food = food;
                    outcome = TickOutcome::Ate;
                }
                Err(e) => {
                    warn!(error = %e, "snake fills the board");
                    state.phase = Phase::GameOver;
                    return TickOutcome::BoardFilled;
                }
            }
        }

        if self.world.check_collision(&state.snake) {
            state.phase = Phase::GameOver;
            info!(
                head = %state.snake.head(),
                food_eaten = state.food_eaten,
                frame = state.frame_counter,
                "game over"
            );
            return TickOutcome::Collided;
        }
        outcome
    }

    // ── commands ──────────────────────────────────────────────────────────

    /// Reset to startup values.  Only honoured in GameOver; returns whether
    /// the reset happened.
    pub fn restart(&mut self) -> Result<bool, GridError> {
        if self.state.phase != Phase::GameOver {
            debug!("restart ignored while running");
            return Ok(false);
        }
        self.state = Self::startup_state(&self.world, &self.curve, &mut self.rng)?;
        self.interpreter.reset(self.state.direction);
        info!(food = %self.state.food, "game restarted");
        Ok(true)
    }

    /// Ask the driving loop to stop delivering ticks.
    pub fn quit(&mut self) {
        info!("quit requested");
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool { self.quit_requested }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn state(&self)   -> &GameState    { &self.state }
    pub fn grid(&self)    -> &Grid         { self.world.grid() }
    pub fn gesture(&self) -> &GestureState { self.interpreter.state() }
    pub fn is_locked(&self) -> bool        { self.interpreter.is_locked() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::Landmark;

    const THUMB: [bool; 5] = [true, false, false, false, false];
    const OPEN:  [bool; 5] = [true; 5];

    fn config() -> GameConfig {
        GameConfig { seed: Some(7), ..GameConfig::default() }
    }

    /// Fast config: every tick is a move tick.
    fn fast_config(width: i32, height: i32) -> GameConfig {
        GameConfig {
            grid:  Grid { width, height, cell_size: 20 },
            speed: SpeedCurve { base_cadence: 1, increment: 0, min_cadence: 1 },
            fps:   10,
            seed:  Some(11),
        }
    }

    fn point(dir: Direction) -> HandSample {
        let (dx, dy) = dir.offset();
        let base = Landmark::new(300.0, 300.0);
        HandSample::with_thumb(THUMB, base, Landmark::new(base.x + dx as f32 * 60.0, base.y + dy as f32 * 60.0))
    }

    fn open_hand() -> HandSample {
        HandSample::with_thumb(OPEN, Landmark::new(300.0, 300.0), Landmark::new(300.0, 240.0))
    }

    fn steps(ctl: &mut GameController, n: usize, sample: Option<&HandSample>) -> Vec<TickOutcome> {
        (0..n).map(|_| ctl.step(sample)).collect()
    }

    #[test]
    fn startup_values() {
        let ctl = GameController::new(&config()).unwrap();
        let s = ctl.state();
        assert_eq!(s.snake().to_vec(), vec![Cell::new(300, 300)]);
        assert_eq!(s.direction(), Direction::Right);
        assert_eq!(s.cadence(), 15);
        assert_eq!(s.food_eaten(), 0);
        assert_eq!(s.frame_counter(), 0);
        assert_eq!(s.phase(), Phase::Running);
        assert!(!s.snake().contains(s.food()));
        assert!(!ctl.is_locked());
    }

    #[test]
    fn moves_only_on_cadence_ticks() {
        let mut ctl = GameController::new(&config()).unwrap();
        ctl.state.food = Cell::new(0, 0);
        let out = steps(&mut ctl, 14, None);
        assert!(out.iter().all(|&o| o == TickOutcome::Waiting));
        assert_eq!(ctl.state().snake().head(), Cell::new(300, 300));
        assert_eq!(ctl.step(None), TickOutcome::Moved);
        assert_eq!(ctl.state().snake().head(), Cell::new(320, 300));
    }

    #[test]
    fn eating_grows_and_speeds_up() {
        let mut ctl = GameController::new(&config()).unwrap();
        ctl.state.food = Cell::new(320, 300);
        steps(&mut ctl, 14, None);
        assert_eq!(ctl.step(None), TickOutcome::Ate);

        let s = ctl.state();
        assert_eq!(s.snake().to_vec(), vec![Cell::new(320, 300), Cell::new(300, 300)]);
        assert_eq!(s.food_eaten(), 1);
        assert_eq!(s.cadence(), 13);
        assert_ne!(s.food(), Cell::new(320, 300));
        assert!(!s.snake().contains(s.food()));
    }

    #[test]
    fn wall_collision_ends_game_and_freezes() {
        let mut ctl = GameController::new(&fast_config(100, 100)).unwrap();
        ctl.state.food = Cell::new(0, 0);
        // Centre is (40, 40); two moves right reach x = 80, the third hits x = 100.
        assert_eq!(steps(&mut ctl, 2, None), vec![TickOutcome::Moved; 2]);
        assert_eq!(ctl.step(None), TickOutcome::Collided);
        assert_eq!(ctl.state().phase(), Phase::GameOver);
        // The colliding position is what gets rendered.
        assert_eq!(ctl.state().snake().head(), Cell::new(100, 40));

        let frozen = ctl.state().snake().clone();
        assert!(steps(&mut ctl, 10, None).iter().all(|&o| o == TickOutcome::Over));
        assert_eq!(ctl.state().snake(), &frozen);
        assert_eq!(ctl.state().frame_counter(), 13);
    }

    #[test]
    fn gestures_still_interpreted_after_game_over() {
        let mut ctl = GameController::new(&fast_config(100, 100)).unwrap();
        ctl.state.food = Cell::new(0, 0);
        steps(&mut ctl, 2, None);
        assert_eq!(ctl.step(None), TickOutcome::Collided);
        let frozen = ctl.state().snake().clone();
        let eaten = ctl.state().food_eaten();

        assert!(!ctl.is_locked());
        assert_eq!(ctl.step(Some(&open_hand())), TickOutcome::Over);
        assert!(ctl.is_locked());
        assert_eq!(ctl.state().snake(), &frozen);
        assert_eq!(ctl.state().food_eaten(), eaten);
        assert_eq!(ctl.state().frame_counter(), 4);

        // Thumb-only unlocks and may turn, but nothing moves.
        assert_eq!(ctl.step(Some(&point(Direction::Up))), TickOutcome::Over);
        assert!(!ctl.is_locked());
        assert_eq!(ctl.state().direction(), Direction::Up);
        assert_eq!(ctl.state().snake(), &frozen);
        assert_eq!(ctl.state().frame_counter(), 5);
    }

    #[test]
    fn gesture_steers_the_snake() {
        let mut ctl = GameController::new(&fast_config(200, 200)).unwrap();
        ctl.state.food = Cell::new(0, 0);
        ctl.step(Some(&point(Direction::Up)));
        assert_eq!(ctl.state().direction(), Direction::Up);
        assert_eq!(ctl.state().snake().head(), Cell::new(100, 80));
    }

    #[test]
    fn reversal_rejected_through_controller() {
        let mut ctl = GameController::new(&fast_config(200, 200)).unwrap();
        ctl.state.food = Cell::new(0, 0);
        ctl.step(Some(&point(Direction::Left)));
        assert_eq!(ctl.state().direction(), Direction::Right);
        assert_eq!(ctl.state().snake().head(), Cell::new(120, 100));
    }

    #[test]
    fn lock_scenario() {
        let mut ctl = GameController::new(&config()).unwrap();
        ctl.step(Some(&open_hand()));
        assert!(ctl.is_locked());
        assert!(ctl.gesture().lock_engaged());

        // Locked: pointing down with the open hand changes nothing.
        let mut down_open = open_hand();
        down_open.landmarks[hand_gesture::THUMB_TIP] = Landmark::new(300.0, 400.0);
        ctl.step(Some(&down_open));
        assert_eq!(ctl.state().direction(), Direction::Right);

        // Thumb-only pointing back the way we came unlocks but can't reverse.
        ctl.step(Some(&point(Direction::Left)));
        assert!(!ctl.is_locked());
        assert_eq!(ctl.state().direction(), Direction::Right);

        ctl.step(Some(&point(Direction::Down)));
        assert_eq!(ctl.state().direction(), Direction::Down);
    }

    #[test]
    fn restart_while_running_is_noop() {
        let mut ctl = GameController::new(&config()).unwrap();
        steps(&mut ctl, 20, None);
        let before = ctl.state().clone();
        assert_eq!(ctl.restart(), Ok(false));
        assert_eq!(ctl.state(), &before);
    }

    #[test]
    fn restart_after_game_over_resets() {
        let mut ctl = GameController::new(&fast_config(100, 100)).unwrap();
        ctl.state.food = Cell::new(60, 40);
        assert_eq!(ctl.step(Some(&open_hand())), TickOutcome::Ate);
        // Park the respawned food off the snake's row.
        ctl.state.food = Cell::new(0, 80);
        steps(&mut ctl, 5, None);
        assert_eq!(ctl.state().phase(), Phase::GameOver);
        assert_eq!(ctl.state().food_eaten(), 1);
        assert!(ctl.is_locked());

        assert_eq!(ctl.restart(), Ok(true));
        let s = ctl.state();
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.food_eaten(), 0);
        assert_eq!(s.frame_counter(), 0);
        assert_eq!(s.cadence(), 1);
        assert_eq!(s.direction(), Direction::Right);
        assert_eq!(s.snake().to_vec(), vec![Cell::new(40, 40)]);
        assert!(!s.snake().contains(s.food()));
        assert!(!ctl.is_locked());
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        // 2x1 board: the centre is (20, 0); the only free cell is (0, 0).
        let mut cfg = fast_config(40, 20);
        cfg.seed = Some(3);
        let mut ctl = GameController::new(&cfg).unwrap();
        assert_eq!(ctl.state().food(), Cell::new(0, 0));
        ctl.step(Some(&point(Direction::Up)));
        // Moving up leaves the board before reaching food.
        assert_eq!(ctl.state().phase(), Phase::GameOver);

        assert_eq!(ctl.restart(), Ok(true));
        ctl.state.direction = Direction::Left;
        ctl.interpreter.reset(Direction::Left);
        assert_eq!(ctl.step(None), TickOutcome::BoardFilled);
        assert_eq!(ctl.state().phase(), Phase::GameOver);
        assert_eq!(ctl.state().snake().len(), 2);
        assert_eq!(ctl.state().food_eaten(), 1);
    }

    #[test]
    fn single_cell_board_cannot_start() {
        assert!(GameController::new(&fast_config(20, 20)).is_err());
    }

    #[test]
    fn length_tracks_food_eaten() {
        let mut ctl = GameController::new(&fast_config(200, 200)).unwrap();
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for round in 0..40 {
            for tick in 0..4 {
                let dir = turns[(round + tick / 2) % 4];
                ctl.step(Some(&point(dir)));
                let s = ctl.state();
                assert_eq!(s.snake().len() as u32, s.food_eaten() + 1);
            }
            if ctl.state().phase() == Phase::GameOver {
                assert_eq!(ctl.restart(), Ok(true));
            }
        }
    }

    #[test]
    fn quit_sets_flag() {
        let mut ctl = GameController::new(&config()).unwrap();
        assert!(!ctl.quit_requested());
        ctl.quit();
        assert!(ctl.quit_requested());
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let a = GameController::new(&config()).unwrap();
        let b = GameController::new(&config()).unwrap();
        assert_eq!(a.state().food(), b.state().food());
    }
}
