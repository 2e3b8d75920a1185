//! Software-rendered game window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │ SNAKE GAME   food / speed    │ HAND CONTROL                 │
//! ├──────────────────────────────┼──────────────────────────────┤
//! │                              │                              │
//! │   grid: snake, food,         │   simulated camera view:     │
//! │   DIRECTION LOCKED,          │   thumb vector + landmarks   │
//! │   GAME OVER overlay          │                              │
//! │                              │   [T] [I] [M] [R] [P]        │
//! ├──────────────────────────────┴──────────────────────────────┤
//! │ key legend                                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use hand_gesture::{HandSample, FINGER_NAMES, THUMB_MCP, THUMB_TIP};
use snake_grid::{Cell, Direction, Grid};

use crate::controller::{GameState, Phase};
use crate::source::{SimInput, SimPose, CAMERA_SIZE};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const HEADER_H:      usize = 40;
const FOOTER_H:      usize = 24;
const BG_COLOR:      u32   = 0xFF1A1A2E;
const BOARD_BG:      u32   = 0xFF10101C;
const PANEL_BG:      u32   = 0xFF16213E;
const BORDER_COLOR:  u32   = 0xFF3A6EA5;
const SNAKE_COLOR:   u32   = 0xFF2ECC71;
const HEAD_COLOR:    u32   = 0xFF58E68F;
const FOOD_COLOR:    u32   = 0xFFE74C3C;
const ALERT_COLOR:   u32   = 0xFFFF4040;
const TEXT_COLOR:    u32   = 0xFFEEEEEE;
const DIM_TEXT:      u32   = 0xFF888888;
const THUMB_COLOR:   u32   = 0xFFFFD700;
const JOINT_COLOR:   u32   = 0xFF9999CC;
const EYE_WHITE:     u32   = 0xFFFFFFFF;
const EYE_PUPIL:     u32   = 0xFF000000;

/// Window-level commands the keyboard can issue besides hand input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Restart,
    Quit,
}

const HAND_KEYS: [(Key, SimInput); 8] = [
    (Key::Up,    SimInput::Point(Direction::Up)),
    (Key::Down,  SimInput::Point(Direction::Down)),
    (Key::Left,  SimInput::Point(Direction::Left)),
    (Key::Right, SimInput::Point(Direction::Right)),
    (Key::Space, SimInput::Pose(SimPose::OpenHand)),
    (Key::T,     SimInput::Pose(SimPose::ThumbOnly)),
    (Key::F,     SimInput::Pose(SimPose::ThumbIndex)),
    (Key::H,     SimInput::Hide),
];

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    frame:  Frame,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(grid: &Grid, frame_interval: Duration, sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let frame = Frame::new(grid);

        let mut window = Window::new(
            "Snake Game with Hand Control",
            frame.width, frame.height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        // One window update per game tick.
        window.limit_update_rate(Some(frame_interval));

        Ok(Visualizer { window, frame, sim_tx })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Forward hand keys to the simulator and collect window commands.
    pub fn poll_input(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        if !self.window.is_open() {
            commands.push(Command::Quit);
            return commands;
        }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            commands.push(Command::Quit);
        }
        if self.window.is_key_pressed(Key::R, KeyRepeat::No) {
            commands.push(Command::Restart);
        }

        for (key, input) in HAND_KEYS {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                let _ = self.sim_tx.send(input);
            }
        }
        commands
    }

    /// Render one frame.
    pub fn render(&mut self, state: &GameState, grid: &Grid, locked: bool, hand: Option<&HandSample>) {
        self.frame.draw(state, grid, locked, hand);
        self.window
            .update_with_buffer(&self.frame.buf, self.frame.width, self.frame.height)
            .ok();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Frame — the window-independent framebuffer
// ════════════════════════════════════════════════════════════════════════════

pub struct Frame {
    buf:     Vec<u32>,
    width:   usize,
    height:  usize,
    /// Board size in pixels; the hand panel is `board_h` square.
    board_w: usize,
    board_h: usize,
}

impl Frame {
    pub fn new(grid: &Grid) -> Self {
        let board_w = grid.width.max(0) as usize;
        let board_h = grid.height.max(0) as usize;
        let width   = board_w + board_h;
        let height  = HEADER_H + board_h + FOOTER_H;
        Frame {
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            board_w,
            board_h,
        }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn draw(&mut self, state: &GameState, grid: &Grid, locked: bool, hand: Option<&HandSample>) {
        self.buf.fill(BG_COLOR);

        // ── Header ────────────────────────────────────────────────────────
        self.draw_label("SNAKE GAME", 12, 12, TEXT_COLOR, 3);
        let stats = format!(
            "FOOD: {}  SPEED: {}  DIR: {}",
            state.food_eaten(), state.cadence(), state.direction()
        );
        let stats_x = self.board_w.saturating_sub(text_width(&stats, 2) + 12);
        self.draw_label(&stats, stats_x, 16, DIM_TEXT, 2);
        self.draw_label("HAND CONTROL", self.board_w + 12, 12, TEXT_COLOR, 3);

        // ── Board ─────────────────────────────────────────────────────────
        self.fill_rect(0, HEADER_H, self.board_w, self.board_h, BOARD_BG);
        self.draw_board(state, grid);
        self.draw_border(0, HEADER_H, self.board_w, self.board_h, BORDER_COLOR);
        self.draw_border(1, HEADER_H + 1, self.board_w.saturating_sub(2), self.board_h.saturating_sub(2), BORDER_COLOR);

        match state.phase() {
            Phase::Running if locked => {
                let text = "DIRECTION LOCKED";
                let x = self.board_w.saturating_sub(text_width(text, 2) + 20);
                self.draw_label(text, x, HEADER_H + 20, ALERT_COLOR, 2);
            }
            Phase::Running => {}
            Phase::GameOver => self.draw_game_over(state.food_eaten()),
        }

        // ── Hand panel ────────────────────────────────────────────────────
        self.fill_rect(self.board_w, HEADER_H, self.board_h, self.board_h, PANEL_BG);
        self.draw_hand(hand, locked);
        for y in 0..self.height {
            self.set_pixel(self.board_w, y, EYE_PUPIL);
        }

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "ARROWS=THUMB  SPACE=OPEN HAND  T=THUMB ONLY  F=THUMB+INDEX  H=HIDE  R=RESTART  Q=QUIT",
            10, self.height - FOOTER_H + 8, DIM_TEXT, 2,
        );
    }

    // ── Board ─────────────────────────────────────────────────────────────

    fn draw_board(&mut self, state: &GameState, grid: &Grid) {
        let cs = grid.cell_size as usize;
        self.fill_cell(state.food(), cs, FOOD_COLOR);

        for &segment in state.snake().iter().skip(1) {
            self.fill_cell(segment, cs, SNAKE_COLOR);
        }
        let head = state.snake().head();
        self.fill_cell(head, cs, HEAD_COLOR);
        self.draw_eyes(head, cs, state.direction());
    }

    /// Cell rectangle, clipped to the board.  Cells off the board (the head
    /// after a wall collision) are skipped.
    fn fill_cell(&mut self, cell: Cell, cs: usize, color: u32) {
        if cell.x < 0 || cell.y < 0 {
            return;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        if x >= self.board_w || y >= self.board_h {
            return;
        }
        let w = cs.min(self.board_w - x).saturating_sub(1);
        let h = cs.min(self.board_h - y).saturating_sub(1);
        self.fill_rect(x, HEADER_H + y, w, h, color);
    }

    fn draw_eyes(&mut self, head: Cell, cs: usize, dir: Direction) {
        if head.x < 0 || head.y < 0 || head.x as usize >= self.board_w || head.y as usize >= self.board_h {
            return;
        }
        let half = cs as isize / 2;
        let cx = head.x as isize + half;
        let cy = (HEADER_H as isize) + head.y as isize + half;
        let (fx, fy) = dir.offset();
        let (fx, fy) = (fx as isize, fy as isize);
        // Lateral axis is the forward axis rotated a quarter turn.
        let (lx, ly) = (-fy, fx);
        let fwd  = cs as isize / 5;
        let side = cs as isize / 4;
        let r    = (cs / 6).max(1);
        for s in [-1isize, 1] {
            let ex = cx + fx * fwd + lx * side * s;
            let ey = cy + fy * fwd + ly * side * s;
            self.fill_circle(ex, ey, r, EYE_WHITE);
            self.fill_circle(ex + fx, ey + fy, (r / 2).max(1), EYE_PUPIL);
        }
    }

    fn draw_game_over(&mut self, food_eaten: u32) {
        // Dim the board.
        for row in HEADER_H..HEADER_H + self.board_h {
            for col in 0..self.board_w {
                let i = row * self.width + col;
                self.buf[i] = blend(self.buf[i], 0xFF000000, 0.55);
            }
        }
        let mid_y = HEADER_H + self.board_h / 2;
        self.draw_centered("GAME OVER", mid_y.saturating_sub(60), ALERT_COLOR, 8);
        self.draw_centered(&format!("FOOD EATEN: {}", food_eaten), mid_y + 10, TEXT_COLOR, 3);
        self.draw_centered("PRESS R TO RESTART", mid_y + 50, TEXT_COLOR, 3);
    }

    fn draw_centered(&mut self, text: &str, y: usize, color: u32, scale: usize) {
        let x = self.board_w.saturating_sub(text_width(text, scale)) / 2;
        self.draw_label(text, x, y, color, scale);
    }

    // ── Hand panel ────────────────────────────────────────────────────────

    fn draw_hand(&mut self, hand: Option<&HandSample>, locked: bool) {
        let x0 = self.board_w;
        let side = self.board_h;

        let Some(hand) = hand else {
            let text = "NO HAND";
            let x = x0 + side.saturating_sub(text_width(text, 4)) / 2;
            self.draw_label(text, x, (HEADER_H + side / 2).saturating_sub(10), DIM_TEXT, 4);
            return;
        };

        let k = side as f32 / CAMERA_SIZE;
        let to_px = |x: f32, y: f32| -> (isize, isize) {
            (x0 as isize + (x * k) as isize, HEADER_H as isize + (y * k) as isize)
        };

        for (i, lm) in hand.landmarks.iter().enumerate() {
            if i == THUMB_MCP || i == THUMB_TIP { continue; }
            let (px, py) = to_px(lm.x, lm.y);
            self.fill_circle(px, py, 3, JOINT_COLOR);
        }
        if let (Some(base), Some(tip)) = (hand.landmark(THUMB_MCP), hand.landmark(THUMB_TIP)) {
            let (bx, by) = to_px(base.x, base.y);
            let (tx, ty) = to_px(tip.x, tip.y);
            let color = if locked { DIM_TEXT } else { THUMB_COLOR };
            self.draw_line(bx, by, tx, ty, color);
            self.fill_circle(bx, by, 6, color);
            self.fill_circle(tx, ty, 8, color);
        }

        // Finger-up boxes along the bottom of the panel.
        let (box_w, gap, by) = finger_row(side);
        let total = FINGER_NAMES.len() * (box_w + gap) - gap;
        let mut bx = x0 + side.saturating_sub(total) / 2;
        let glyph = (box_w / 12).max(1);
        for (name, &up) in FINGER_NAMES.iter().zip(hand.fingers_up.iter()) {
            let fill = if up { SNAKE_COLOR } else { BOARD_BG };
            self.fill_rect(bx, by, box_w, box_w, fill);
            self.draw_border(bx, by, box_w, box_w, BORDER_COLOR);
            let initial: String = name.chars().take(1).collect();
            self.draw_label(&initial, bx + (box_w - 3 * glyph) / 2, by + (box_w - 5 * glyph) / 2, TEXT_COLOR, glyph);
            bx += box_w + gap;
        }

        if locked {
            let text = "LOCKED";
            let x = x0 + side.saturating_sub(text_width(text, 3)) / 2;
            self.draw_label(text, x, HEADER_H + 20, ALERT_COLOR, 3);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.width) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.height) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    fn set_pixel_signed(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    fn fill_circle(&mut self, cx: isize, cy: isize, r: usize, color: u32) {
        let r = r as isize;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel_signed(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line, three pixels thick.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.fill_circle(x, y, 1, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// 3×5 bitmap font, each pixel drawn as a `scale`×`scale` block.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32, scale: usize) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.width { break; }
        }
    }
}

/// Finger-box size, gap and top edge for a hand panel `side` pixels
/// square.  Boxes shrink with the panel and stay below the header.
fn finger_row(side: usize) -> (usize, usize, usize) {
    let box_w = (side / 12).clamp(8, 48);
    let gap   = box_w / 4;
    let by    = HEADER_H + side.saturating_sub(box_w + box_w / 2);
    (box_w, gap, by)
}

fn text_width(text: &str, scale: usize) -> usize {
    (text.chars().count() * 4).saturating_sub(1) * scale
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let (ar, br) = ((a >> 16) & 0xFF, (b >> 16) & 0xFF);
    let (ag, bg) = ((a >> 8) & 0xFF, (b >> 8) & 0xFF);
    let (ab, bb) = (a & 0xFF, b & 0xFF);
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::controller::{GameController, TickOutcome};
    use hand_gesture::Landmark;
    use snake_grid::SpeedCurve;

    fn controller(width: i32, height: i32, cell_size: i32) -> GameController {
        GameController::new(&GameConfig {
            grid:  Grid { width, height, cell_size },
            speed: SpeedCurve { base_cadence: 1, increment: 0, min_cadence: 1 },
            fps:   10,
            seed:  Some(3),
        }).unwrap()
    }

    fn open_hand() -> HandSample {
        HandSample::with_thumb([true; 5], Landmark::new(300.0, 300.0), Landmark::new(300.0, 240.0))
    }

    #[test]
    fn small_board_renders_every_panel() {
        let mut ctl = controller(40, 20, 20);
        let mut frame = Frame::new(ctl.grid());
        assert_eq!((frame.width(), frame.height()), (60, HEADER_H + 20 + FOOTER_H));

        let hand = open_hand();
        frame.draw(ctl.state(), ctl.grid(), true, Some(&hand));
        frame.draw(ctl.state(), ctl.grid(), false, None);
        assert!(frame.pixels().iter().any(|&p| p == BORDER_COLOR));

        // The snake starts in the right column, so the first move hits the wall.
        assert_eq!(ctl.step(Some(&hand)), TickOutcome::Collided);
        assert!(ctl.is_locked());
        frame.draw(ctl.state(), ctl.grid(), true, Some(&hand));
        assert_eq!(frame.pixels().len(), frame.width() * frame.height());
    }

    #[test]
    fn one_pixel_board_renders() {
        let ctl = controller(2, 1, 1);
        let mut frame = Frame::new(ctl.grid());
        frame.draw(ctl.state(), ctl.grid(), true, Some(&open_hand()));
        assert_eq!(frame.pixels().len(), 3 * (HEADER_H + 1 + FOOTER_H));
    }

    #[test]
    fn finger_row_stays_inside_the_panel() {
        for side in [20, 100, 600] {
            let (box_w, gap, by) = finger_row(side);
            assert!(by >= HEADER_H);
            assert!(by + box_w <= HEADER_H + side);
            assert!(gap < box_w);
        }
        assert_eq!(finger_row(600).0, 48);
    }

    #[test]
    fn glyphs_are_case_insensitive() {
        assert_eq!(char_glyph('a'), char_glyph('A'));
        assert_eq!(char_glyph('q'), char_glyph('Q'));
    }

    #[test]
    fn every_overlay_letter_has_a_glyph() {
        let fallback = char_glyph('~');
        for text in ["GAME OVER", "FOOD EATEN", "PRESS R TO RESTART", "DIRECTION LOCKED", "NO HAND", "QUIT"] {
            for ch in text.chars().filter(|c| *c != ' ') {
                assert_ne!(char_glyph(ch), fallback, "missing glyph for {:?}", ch);
            }
        }
    }

    #[test]
    fn text_width_scales() {
        assert_eq!(text_width("AB", 1), 7);
        assert_eq!(text_width("AB", 3), 21);
        assert_eq!(text_width("", 2), 0);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF102030, 0xFF000000, 0.0), 0xFF102030);
        assert_eq!(blend(0xFF102030, 0xFF000000, 1.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFF000000, 0.4) >> 24, 0xFF);
    }
}
