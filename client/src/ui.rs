use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use glam::Vec2;

use common::maze::Layout;
use common::render::{Line, Renderer, Stroke};

// Each lattice square is two terminal columns wide so cells look square.
const SQUARE: &str = "██";
const BLANK: &str = "  ";

/// Draws maze segments on a character lattice where cell `(i, j)` spans
/// squares `2i..=2i + 2` across and `2j..=2j + 2` down, with its center at
/// `(2i + 1, 2j + 1)`.
pub struct TerminalRenderer<W: Write> {
    stdout: W,
    layout: Layout,
    status_row: u16,
    error: Option<io::Error>,
    is_raw_mode_owner: bool, // True except in tests.
}

impl TerminalRenderer<Stdout> {
    pub fn new(layout: Layout, rows: usize) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self {
            stdout,
            layout,
            status_row: status_row(rows),
            error: None,
            is_raw_mode_owner: true,
        })
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// The first write error since the last call, if any. Drawing itself
    /// can't fail, so errors are parked here.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn show_status(&mut self, message: &str) -> io::Result<()> {
        queue!(
            self.stdout,
            MoveTo(0, self.status_row),
            Clear(ClearType::CurrentLine),
            ResetColor,
            Print(message)
        )?;
        self.stdout.flush()
    }

    fn to_lattice(&self, point: Vec2) -> (i64, i64) {
        let Layout { origin, cell_size } = self.layout;
        let scaled = (point - origin) / cell_size * 2.0;
        (scaled.x.round() as i64, scaled.y.round() as i64)
    }

    fn draw(&mut self, line: Line, stroke: Stroke) -> io::Result<()> {
        let (x0, y0) = self.to_lattice(line.start);
        let (x1, y1) = self.to_lattice(line.end);
        let steps = (x1 - x0).abs().max((y1 - y0).abs());

        let (color, glyph) = match stroke {
            Stroke::Wall => (Color::White, SQUARE),
            Stroke::Erased => (Color::Reset, BLANK),
            Stroke::Path => (Color::Red, SQUARE),
            Stroke::Retreat => (Color::DarkGrey, SQUARE),
        };

        queue!(self.stdout, SetForegroundColor(color))?;
        for k in 0..=steps {
            // Wall ends are pillars shared with other walls; erasing a wall
            // leaves them standing.
            if stroke == Stroke::Erased && (k == 0 || k == steps) {
                continue;
            }
            let (x, y) = if steps == 0 {
                (x0, y0)
            } else {
                (
                    x0 + (x1 - x0) * k / steps,
                    y0 + (y1 - y0) * k / steps,
                )
            };
            if x < 0 || y < 0 {
                continue;
            }
            queue!(self.stdout, MoveTo(2 * x as u16, y as u16), Print(glyph))?;
        }
        queue!(self.stdout, ResetColor)?;
        self.stdout.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw_segment(&mut self, line: Line, stroke: Stroke) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.draw(line, stroke) {
            self.error = Some(e);
        }
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        if self.is_raw_mode_owner {
            // Only restore the terminal if this instance was the one to take
            // it over. Tests write to a buffer and leave the runner alone.
            execute!(self.stdout, ResetColor, Show, LeaveAlternateScreen).ok();
            terminal::disable_raw_mode().ok();
        }
    }
}

/// Terminal rows and columns needed to show a maze plus the status line.
pub fn required_size(cols: usize, rows: usize) -> (usize, usize) {
    (2 * (2 * cols + 1), status_row(rows) as usize + 1)
}

fn status_row(rows: usize) -> u16 {
    (2 * rows + 2).min(u16::MAX as usize) as u16
}

/// Blocks until the user asks to close the window.
pub fn wait_for_close() -> io::Result<()> {
    loop {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if is_close_request(&event::read()?) {
            return Ok(());
        }
    }
}

pub fn is_close_request(event: &Event) -> bool {
    match event {
        Event::Key(key_event) => {
            if key_event.modifiers == KeyModifiers::CONTROL {
                return matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('d'));
            }
            matches!(
                key_event.code,
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter
            )
        }
        _ => false,
    }
}
