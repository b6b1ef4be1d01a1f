use crate::direction::Direction;
use crate::error::{Result, TermError};
use crate::geometry::{Rect2D, Vector2D};
use std::io::{IsTerminal, Stdout, Write, stdout};
use std::{thread, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key press, independent of the backend that decoded it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Char(char),
    Esc,
    Interrupt,
    Other,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up | Key::Char('w') | Key::Char('W') => Some(Direction::Up),
            Key::Down | Key::Char('s') | Key::Char('S') => Some(Direction::Down),
            Key::Left | Key::Char('a') | Key::Char('A') => Some(Direction::Left),
            Key::Right | Key::Char('d') | Key::Char('D') => Some(Direction::Right),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(ev: KeyEvent) -> Self {
        match ev.code {
            KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Esc => Key::Esc,
            _ => Key::Other,
        }
    }
}

/// Everything the game needs from a terminal. Positions are absolute screen
/// coordinates.
pub trait Terminal {
    fn size(&self) -> (u16, u16);

    fn render_glyph(&mut self, pos: Vector2D, ch: char, color: Color) -> Result<()>;

    /// Non-blocking: `None` when no key is buffered.
    fn poll_key(&mut self) -> Result<Option<Key>>;

    fn read_key(&mut self) -> Result<Key>;

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    /// Draws a centered box with the given lines over whatever is on screen.
    fn show_message(&mut self, lines: &[&str]) -> Result<()>;

    /// Removes the message box, restoring what was underneath.
    fn hide_message(&mut self) -> Result<()>;

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn print_text(&mut self, pos: Vector2D, text: &str, color: Color) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.render_glyph(pos + Vector2D::new(i as i32, 0), ch, color)?;
        }
        Ok(())
    }

    /// Frames `rect` one cell outside its edges.
    fn draw_border(&mut self, rect: Rect2D, color: Color) -> Result<()> {
        let top_left = rect.origin - Vector2D::new(1, 1);
        let bottom_right = rect.bottom_right();

        for x in top_left.x..=bottom_right.x {
            let ch = if x == top_left.x || x == bottom_right.x {'+'} else {'-'};
            self.render_glyph(Vector2D::new(x, top_left.y), ch, color)?;
            self.render_glyph(Vector2D::new(x, bottom_right.y), ch, color)?;
        }

        for y in rect.origin.y..bottom_right.y {
            self.render_glyph(Vector2D::new(top_left.x, y), '|', color)?;
            self.render_glyph(Vector2D::new(bottom_right.x, y), '|', color)?;
        }

        Ok(())
    }

    /// Throws away any buffered keys so they don't leak to the shell.
    fn drain_input(&mut self) -> Result<()> {
        while self.poll_key()?.is_some() {}
        Ok(())
    }

    fn restore(&mut self) -> Result<()>;
}

#[derive(Copy, Clone, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

struct Message {
    top_left: (u16, u16),
    width: u16,
    height: u16,
}

/// Crossterm-backed terminal. Holds the color and screen state that would
/// otherwise live in globals.
pub struct CrosstermTerminal {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<Cell>,
    color: Option<Color>,
    current_msg: Option<Message>,
    active: bool,
}

impl CrosstermTerminal {
    /// Switches to the alternate screen in raw mode.
    pub fn open() -> Result<Self> {
        let stdout = stdout();
        if !stdout.is_terminal() {
            return Err(TermError::NotInteractive);
        }

        let (width, height) = terminal::size()?;
        let mut term = CrosstermTerminal {
            width,
            height,
            stdout,
            screen: vec![BLANK; width as usize * height as usize],
            color: None,
            current_msg: None,
            active: false,
        };

        execute!(term.stdout, EnterAlternateScreen, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()?;
        term.active = true;
        Ok(term)
    }

    fn index(&self, pos: Vector2D) -> Option<usize> {
        let in_bounds = pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32;
        in_bounds.then(|| self.width as usize * pos.y as usize + pos.x as usize)
    }

    // Leaves the screen buffer alone so message boxes can be drawn over it
    fn queue_cell(&mut self, pos: (u16, u16), cell: Cell) -> Result<()> {
        if self.color != Some(cell.color) {
            queue!(self.stdout, style::SetForegroundColor(cell.color))?;
            self.color = Some(cell.color);
        }
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(cell.ch))?;
        Ok(())
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn render_glyph(&mut self, pos: Vector2D, ch: char, color: Color) -> Result<()> {
        let Some(i) = self.index(pos) else {
            return Ok(());
        };

        let cell = Cell { ch, color };
        self.screen[i] = cell;
        self.queue_cell((pos.x as u16, pos.y as u16), cell)
    }

    fn poll_key(&mut self) -> Result<Option<Key>> {
        // First buffered key wins, the rest of this tick's batch is dropped.
        // An interrupt anywhere in the batch takes priority.
        let mut first = None;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Release {
                    continue;
                }
                let key = Key::from(ev);
                if key == Key::Interrupt {
                    return Ok(Some(key));
                }
                first.get_or_insert(key);
            }
        }

        Ok(first)
    }

    fn read_key(&mut self) -> Result<Key> {
        loop {
            if let Event::Key(ev) = event::read()? {
                if ev.kind != KeyEventKind::Release {
                    return Ok(Key::from(ev));
                }
            }
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            execute!(self.stdout, cursor::Show)?;
        } else {
            execute!(self.stdout, cursor::Hide)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.queue_cell((top_left.0 + x_diff, y), BLANK)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.queue_cell((top_left.0 + x_diff as u16, y), Cell { ch, color: Color::White })?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    fn hide_message(&mut self) -> Result<()> {
        let Some(msg) = self.current_msg.take() else {
            return Ok(());
        };

        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            for x in msg.top_left.0..msg.top_left.0 + msg.width {
                if let Some(i) = self.index(Vector2D::new(x as i32, y as i32)) {
                    let cell = self.screen[i];
                    self.queue_cell((x, y), cell)?;
                }
            }
        }

        self.flush()
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )?;
        Ok(())
    }
}
