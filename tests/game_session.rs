use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crossterm::style::Color;
use rand::{rngs::StdRng, SeedableRng};

use snake::config::Settings;
use snake::direction::Direction::*;
use snake::error::Result;
use snake::game::{Game, GameState, Outcome};
use snake::geometry::{Rect2D, Vector2D};
use snake::glyph::{BodyGlyph, Glyph};
use snake::snake::Snake;
use snake::term::{Key, Terminal};

const RNG_SEED: u64 = 0x0123456789ABCDEF;

/// In-memory terminal: keys come from a script, drawing lands in a map.
#[derive(Default)]
struct ScriptedTerminal {
    polled: VecDeque<Key>,
    typed: VecDeque<Key>,
    screen: HashMap<Vector2D, char>,
    messages: Vec<Vec<String>>,
    message_visible: bool,
    sleeps: Vec<Duration>,
    cursor_visible: bool,
}

impl ScriptedTerminal {
    fn with_keys(polled: &[Key], typed: &[Key]) -> Self {
        ScriptedTerminal {
            polled: polled.iter().copied().collect(),
            typed: typed.iter().copied().collect(),
            cursor_visible: true,
            ..Default::default()
        }
    }

    fn char_at(&self, pos: Vector2D) -> char {
        self.screen.get(&pos).copied().unwrap_or(' ')
    }

    fn shown(&self, text: &str) -> bool {
        self.messages.iter().flatten().any(|line| line == text)
    }
}

impl Terminal for ScriptedTerminal {
    fn size(&self) -> (u16, u16) {
        (80, 24)
    }

    fn render_glyph(&mut self, pos: Vector2D, ch: char, _color: Color) -> Result<()> {
        self.screen.insert(pos, ch);
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<Key>> {
        Ok(self.polled.pop_front())
    }

    fn read_key(&mut self) -> Result<Key> {
        Ok(self.typed.pop_front().unwrap_or(Key::Other))
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.screen.clear();
        Ok(())
    }

    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        self.messages.push(lines.iter().map(|l| l.to_string()).collect());
        self.message_visible = true;
        Ok(())
    }

    fn hide_message(&mut self) -> Result<()> {
        self.message_visible = false;
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }

    fn restore(&mut self) -> Result<()> {
        Ok(())
    }
}

fn settings(length: usize) -> Settings {
    Settings { field_width: 10, field_height: 10, initial_length: length, ..Settings::default() }
}

fn new_game<'t>(term: &'t mut ScriptedTerminal, s: &Settings) -> Game<'t, ScriptedTerminal, StdRng> {
    Game::new(s, term, StdRng::seed_from_u64(RNG_SEED)).unwrap()
}

#[test]
fn eats_the_apple_on_the_second_tick() {
    let s = settings(1);
    let mut term = ScriptedTerminal::with_keys(&[], &[]);
    {
        let mut game = new_game(&mut term, &s);
        game.set_snake(Snake::new(Vector2D::new(4, 3), 1, Right));
        game.set_apple(Vector2D::new(6, 3));

        assert_eq!(game.tick().unwrap(), GameState::Running);
        assert_eq!(game.snake().head().position, Vector2D::new(5, 3));
        assert_eq!(game.score(), 0);

        assert_eq!(game.tick().unwrap(), GameState::Running);
        assert_eq!(game.snake().head().position, Vector2D::new(6, 3));
        assert_eq!(game.score(), 10);
        assert_eq!(game.snake().len(), 2);
        assert!(!game.snake().collides_with(game.apple()));
        assert!(game.field().contains(game.apple()));
    }

    assert_eq!(term.sleeps, vec![s.initial_delay, s.initial_delay - s.delay_step]);
}

#[test]
fn keys_steer_but_cannot_reverse() {
    let mut term = ScriptedTerminal::with_keys(&[Key::Down, Key::Up, Key::Char('d')], &[]);
    let mut game = new_game(&mut term, &settings(3));
    game.set_snake(Snake::new(Vector2D::new(5, 5), 3, Right));
    game.set_apple(Vector2D::new(0, 0));

    game.tick().unwrap();
    assert_eq!(game.snake().head().position, Vector2D::new(5, 6));

    // Up is straight back while heading Down
    game.tick().unwrap();
    assert_eq!(game.snake().direction(), Down);
    assert_eq!(game.snake().head().position, Vector2D::new(5, 7));

    game.tick().unwrap();
    assert_eq!(game.snake().direction(), Right);
    assert_eq!(game.snake().head().position, Vector2D::new(6, 7));
}

#[test]
fn escape_pauses_and_resumes() {
    let mut term = ScriptedTerminal::with_keys(&[Key::Esc, Key::Char('w'), Key::Esc], &[]);
    {
        let mut game = new_game(&mut term, &settings(3));
        game.set_snake(Snake::new(Vector2D::new(5, 5), 3, Right));
        game.set_apple(Vector2D::new(0, 0));

        game.tick().unwrap();
        assert!(game.is_paused());
        assert_eq!(game.snake().head().position, Vector2D::new(5, 5));

        game.tick().unwrap();
        assert_eq!(game.snake().direction(), Right);
        assert_eq!(game.snake().head().position, Vector2D::new(5, 5));

        game.tick().unwrap();
        assert!(!game.is_paused());
        assert_eq!(game.snake().head().position, Vector2D::new(6, 5));
    }

    assert!(term.shown("Paused"));
    assert!(!term.message_visible);
    assert_eq!(term.sleeps.len(), 3);
}

#[test]
fn ctrl_c_quits_immediately() {
    let mut term = ScriptedTerminal::with_keys(&[Key::Interrupt, Key::Down], &[]);
    let mut game = new_game(&mut term, &settings(3));
    let head = game.snake().head().position;

    let quit = GameState::Over(Outcome::Quit { score: 0 });
    assert_eq!(game.tick().unwrap(), quit);
    assert_eq!(game.tick().unwrap(), quit);
    assert_eq!(game.snake().head().position, head);
}

#[test]
fn full_session_ends_in_game_over() {
    let mut term = ScriptedTerminal::with_keys(&[Key::Down, Key::Left, Key::Up], &[Key::Other, Key::Other]);
    let crash_at;
    let field: Rect2D;
    {
        let mut game = new_game(&mut term, &settings(5));
        game.set_snake(Snake::new(Vector2D::new(5, 5), 5, Right));
        game.set_apple(Vector2D::new(0, 0));

        assert_eq!(game.run().unwrap(), Outcome::Over { score: 0 });
        assert!(!game.snake().is_alive());
        crash_at = game.field().to_screen(game.snake().head().position);
        field = game.field();
    }

    assert!(!term.cursor_visible);
    assert!(term.shown("Press any key to begin"));
    assert!(term.shown("Game Over! Score: 0"));
    assert_eq!(term.char_at(crash_at), 'X');

    // The cell the tail left on the fatal move is wiped, not left as live body
    let body: Vec<char> = [BodyGlyph::Solid, BodyGlyph::Dense, BodyGlyph::Light]
        .iter()
        .map(|b| Glyph::Body(*b).to_char())
        .collect();
    let leftovers: Vec<Vector2D> = field
        .cells()
        .filter(|c| body.contains(&term.char_at(field.to_screen(*c))))
        .collect();
    assert!(leftovers.is_empty(), "live body left at {:?}", leftovers);
    assert_eq!(term.char_at(field.to_screen(Vector2D::new(3, 5))), ' ');
    let dead = field.cells().filter(|c| term.char_at(field.to_screen(*c)) == 'X').count();
    assert_eq!(dead, 4);
    assert!(term.typed.is_empty());
}

#[test]
fn ctrl_c_on_the_intro_skips_the_game() {
    let mut term = ScriptedTerminal::with_keys(&[], &[Key::Interrupt]);
    {
        let mut game = new_game(&mut term, &settings(3));
        assert_eq!(game.run().unwrap(), Outcome::Quit { score: 0 });
    }

    assert!(term.sleeps.is_empty());
    assert!(!term.messages.iter().flatten().any(|l| l.starts_with("Game Over")));
}

#[test]
fn score_line_and_border_are_drawn() {
    let mut term = ScriptedTerminal::with_keys(&[Key::Interrupt], &[Key::Other]);
    let origin;
    {
        let mut game = new_game(&mut term, &settings(3));
        origin = game.field().origin;
        game.run().unwrap();
    }

    let hud: String = (0..8).map(|i| term.char_at(origin + Vector2D::new(i - 1, -2))).collect();
    assert_eq!(hud, "Score: 0");
    assert_eq!(term.char_at(origin - Vector2D::new(1, 1)), '+');
    assert_eq!(term.char_at(origin + Vector2D::new(10, 10)), '+');
    assert_eq!(term.char_at(origin + Vector2D::new(-1, 3)), '|');
}
