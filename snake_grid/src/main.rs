//! Terminal stepper for the grid world: one typed command, one move.

use rand::rngs::StdRng;
use rand::SeedableRng;
use snake_grid::{Cell, Direction, Grid, GridWorld, Snake, SpeedCurve};
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             Snake Grid — step-by-step                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let world = GridWorld::new(Grid::default());
    let curve = SpeedCurve::default();
    let mut rng = StdRng::from_entropy();

    'game: loop {
        let mut snake = world.initial_snake();
        let mut direction = Direction::Right;
        let mut eaten = 0u32;
        let Ok(mut food) = world.spawn_food(&snake, &mut rng) else {
            println!("  ⚠  board has no room for food.");
            return;
        };

        loop {
            print_board(&world, &snake, food);
            println!(
                "  dir={}  length={}  food eaten={}  cadence={}",
                direction, snake.len(), eaten, curve.cadence(eaten)
            );

            let cmd = read_line("  w/a/s/d = turn + step, Enter = step, q = quit: ");
            let turn = match cmd.trim() {
                "q" | "Q" => break 'game,
                "w" => Some(Direction::Up),
                "s" => Some(Direction::Down),
                "a" => Some(Direction::Left),
                "d" => Some(Direction::Right),
                ""  => None,
                other => { println!("  ⚠  unknown command {:?}", other); continue; }
            };
            if let Some(d) = turn {
                if d == direction.opposite() {
                    println!("  ⚠  can't reverse into yourself.");
                } else {
                    direction = d;
                }
            }

            if world.advance(&mut snake, food, direction) {
                eaten += 1;
                food = match world.spawn_food(&snake, &mut rng) {
                    Ok(f) => f,
                    Err(e) => {
                        println!("\n  ✓  {} — you filled the board!", e);
                        break;
                    }
                };
            }
            if world.check_collision(&snake) {
                print_board(&world, &snake, food);
                println!("\n  ✗  GAME OVER — food eaten: {}\n", eaten);
                break;
            }
        }

        if !read_line("  Play again? (y/N): ").trim().eq_ignore_ascii_case("y") {
            break;
        }
    }
    println!("\nGoodbye!\n");
}

fn print_board(world: &GridWorld, snake: &Snake, food: Cell) {
    let grid = world.grid();
    println!("  ┌{}┐", "─".repeat(grid.columns() as usize));
    for row in 0..grid.rows() {
        let line: String = (0..grid.columns())
            .map(|col| {
                let cell = grid.cell_at(col, row);
                if cell == snake.head() { '@' }
                else if snake.contains(cell) { 'o' }
                else if cell == food { '*' }
                else { ' ' }
            })
            .collect();
        println!("  │{}│", line);
    }
    println!("  └{}┘", "─".repeat(grid.columns() as usize));
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
