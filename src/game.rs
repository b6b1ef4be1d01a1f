use std::{cmp::max, time::Duration};

use crate::config::Settings;
use crate::direction::Direction::{self, *};
use crate::error::{Result, TermError};
use crate::geometry::{Rect2D, Vector2D};
use crate::glyph::Glyph;
use crate::snake::{MoveResult::*, Segment, Snake};
use crate::term::{Key, Terminal};

use crossterm::style::Color;
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, warn};

pub const POINTS_PER_APPLE: u32 = 10;

const APPLE_COLOR: Color = Color::Red;
const OBSTACLE_COLOR: Color = Color::DarkGrey;
const BORDER_COLOR: Color = Color::Grey;
const HUD_COLOR: Color = Color::White;

// Random draws before giving up and scanning for the remaining free cells
const PLACEMENT_ATTEMPTS_PER_CELL: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Over { score: u32 },
    Won { score: u32 },
    Quit { score: u32 },
}

impl Outcome {
    /// Line to print after leaving the game screen. Only a quit needs one,
    /// the other endings already showed the score in game.
    pub fn exit_line(&self) -> Option<String> {
        match self {
            Outcome::Quit { score } => Some(format!("Score: {}", score)),
            Outcome::Over { .. } | Outcome::Won { .. } => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    Over(Outcome),
}

pub struct Game<'t, T: Terminal, R: Rng> {
    term: &'t mut T,
    rng: R,
    field: Rect2D,
    snake: Snake,
    apple: Segment,
    obstacles: Vec<Vector2D>,
    score: u32,
    frame_delay: Duration,
    delay_step: Duration,
    min_delay: Duration,
    state: GameState,
    paused: bool,
    stale_cells: Vec<Vector2D>,
}

impl<'t, T: Terminal, R: Rng> Game<'t, T, R> {
    /// Lays the field out in the middle of the terminal, with a border around
    /// it and the score line above.
    pub fn new(settings: &Settings, term: &'t mut T, rng: R) -> Result<Self> {
        let (w, h) = (settings.field_width, settings.field_height);
        let needed = (w.saturating_add(2), h.saturating_add(3));
        let actual = term.size();
        if actual.0 < needed.0 || actual.1 < needed.1 {
            return Err(TermError::TooSmall { needed, actual });
        }

        let left = (actual.0 - needed.0) / 2;
        let top = (actual.1 - needed.1) / 2;
        let field = Rect2D::new(Vector2D::new(left as i32 + 1, top as i32 + 2), w, h);

        let head_x = max(w as i32 / 2, settings.initial_length as i32 - 1);
        let snake = Snake::new(Vector2D::new(head_x, h as i32 / 2), settings.initial_length, Right);

        let mut game = Game {
            term,
            rng,
            field,
            snake,
            apple: Segment { glyph: Glyph::Apple, position: Vector2D::default() },
            obstacles: vec![],
            score: 0,
            frame_delay: settings.initial_delay,
            delay_step: settings.delay_step,
            min_delay: settings.min_delay,
            state: GameState::Running,
            paused: false,
            stale_cells: vec![],
        };
        if !game.relocate_apple() {
            game.state = GameState::Over(Outcome::Won { score: 0 });
        }

        Ok(game)
    }

    pub fn with_obstacles(mut self, obstacles: Vec<Vector2D>) -> Self {
        self.obstacles = obstacles;
        if self.is_occupied(self.apple.position) && !self.relocate_apple() {
            self.state = GameState::Over(Outcome::Won { score: self.score });
        }
        self
    }

    /// Replaces the snake, e.g. to start from a known position.
    pub fn set_snake(&mut self, snake: Snake) {
        self.stale_cells.extend(self.snake.segments().iter().map(|s| s.position));
        self.snake = snake;
    }

    pub fn set_apple(&mut self, pos: Vector2D) {
        self.stale_cells.push(self.apple.position);
        self.apple.position = pos;
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apple(&self) -> Vector2D {
        self.apple.position
    }

    pub fn field(&self) -> Rect2D {
        self.field
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Intro, then ticks until the session ends, then the final report.
    pub fn run(&mut self) -> Result<Outcome> {
        info!(width = self.field.width, height = self.field.height, delay = ?self.frame_delay, "session started");

        self.term.set_cursor_visible(false)?;
        self.term.clear()?;
        self.term.draw_border(self.field, BORDER_COLOR)?;
        self.render()?;

        if !self.show_intro()? {
            self.state = GameState::Over(Outcome::Quit { score: self.score });
        }

        let outcome = loop {
            if let GameState::Over(outcome) = self.tick()? {
                break outcome;
            }
        };

        info!(?outcome, "session ended");
        self.report(outcome)?;
        Ok(outcome)
    }

    /// One iteration of the loop: draw, take at most one key, move, sleep.
    pub fn tick(&mut self) -> Result<GameState> {
        if let GameState::Over(_) = self.state {
            return Ok(self.state);
        }

        self.render()?;

        let mut dir_change: Option<Direction> = None;
        match self.term.poll_key()? {
            Some(Key::Interrupt) => {
                self.state = GameState::Over(Outcome::Quit { score: self.score });
                return Ok(self.state);
            }
            Some(Key::Esc) => self.toggle_pause()?,
            Some(key) => dir_change = key.direction(),
            None => {}
        }

        if self.paused {
            self.term.sleep(self.frame_delay);
            return Ok(self.state);
        }

        if self.step(dir_change) == GameState::Running {
            self.term.sleep(self.frame_delay);
        }
        Ok(self.state)
    }

    /// Advances the simulation by one cell, without touching the terminal.
    pub fn step(&mut self, dir_change: Option<Direction>) -> GameState {
        if self.state != GameState::Running {
            return self.state;
        }

        if let Some(dir) = dir_change {
            if self.snake.set_direction(dir) {
                debug!(?dir, "direction changed");
            }
        }

        match self.snake.advance(self.field) {
            Crashed { head, old_tail } => {
                if let Some(tail) = old_tail {
                    self.stale_cells.push(tail);
                }
                debug!(?head, "snake ran into itself");
                self.state = GameState::Over(Outcome::Over { score: self.score });
            }
            Moved { new_head, old_head: _, old_tail } => {
                if let Some(tail) = old_tail {
                    self.stale_cells.push(tail);
                }

                if self.obstacles.contains(&new_head) {
                    debug!(?new_head, "snake hit an obstacle");
                    self.snake.kill();
                    self.state = GameState::Over(Outcome::Over { score: self.score });
                } else if new_head == self.apple.position {
                    self.eat_apple();
                }
            }
        }

        self.state
    }

    ///////////////////////////////////////////////////////////////////////////

    fn eat_apple(&mut self) {
        self.score += POINTS_PER_APPLE;
        self.snake.grow();
        self.frame_delay = max(self.frame_delay.saturating_sub(self.delay_step), self.min_delay);
        debug!(score = self.score, delay = ?self.frame_delay, "apple eaten");

        let board_full = self.snake.len() + self.obstacles.len() >= self.field.area();
        if board_full || !self.relocate_apple() {
            self.state = GameState::Over(Outcome::Won { score: self.score });
        }
    }

    /// Moves the apple to a random free cell. Returns `false` when the board is full.
    fn relocate_apple(&mut self) -> bool {
        match self.free_cell() {
            Some(pos) => {
                self.apple.position = pos;
                true
            }
            None => false,
        }
    }

    fn free_cell(&mut self) -> Option<Vector2D> {
        let (w, h) = (self.field.width as i32, self.field.height as i32);

        for _ in 0..self.field.area() * PLACEMENT_ATTEMPTS_PER_CELL {
            let pos = Vector2D::new(self.rng.gen_range(0..w), self.rng.gen_range(0..h));
            if !self.is_occupied(pos) {
                return Some(pos);
            }
        }

        warn!(snake_len = self.snake.len(), "apple placement fell back to a full scan");
        let choices: Vec<Vector2D> = self.field.cells().filter(|pos| !self.is_occupied(*pos)).collect();
        choices.choose(&mut self.rng).copied()
    }

    fn is_occupied(&self, pos: Vector2D) -> bool {
        self.snake.collides_with(pos) || self.obstacles.contains(&pos)
    }

    fn render(&mut self) -> Result<()> {
        let origin = self.field.origin;
        let hud = format!("Score: {}", self.score);
        self.term.print_text(origin + Vector2D::new(-1, -2), &hud, HUD_COLOR)?;

        for pos in std::mem::take(&mut self.stale_cells) {
            self.term.render_glyph(self.field.to_screen(pos), ' ', Color::Reset)?;
        }

        for pos in &self.obstacles {
            self.term.render_glyph(self.field.to_screen(*pos), Glyph::Obstacle.to_char(), OBSTACLE_COLOR)?;
        }

        // No apple is in play once the board is full
        if !self.is_occupied(self.apple.position) {
            self.term.render_glyph(self.field.to_screen(self.apple.position), self.apple.glyph.to_char(), APPLE_COLOR)?;
        }

        // Tail first so the head always ends up on top
        let alive = self.snake.is_alive();
        for segment in self.snake.segments().iter().rev() {
            let glyph = if alive { segment.glyph } else { Glyph::DeadBody };
            self.term.render_glyph(self.field.to_screen(segment.position), glyph.to_char(), self.snake.color())?;
        }

        self.term.flush()
    }

    fn show_intro(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "Ctrl+C to quit",
            "",
            "Press any key to begin",
        ])?;

        let key = self.term.read_key()?;
        self.term.hide_message()?;
        Ok(key != Key::Interrupt)
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }

    fn report(&mut self, outcome: Outcome) -> Result<()> {
        let headline = match outcome {
            Outcome::Over { score } => format!("Game Over! Score: {}", score),
            Outcome::Won { score } => format!("You won! Score: {}", score),
            Outcome::Quit { .. } => return Ok(()),
        };

        self.render()?;
        self.term.show_message(&[&headline, "", "Press any key to exit"])?;
        self.term.read_key()?;
        Ok(())
    }
}
