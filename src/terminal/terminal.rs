use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, TerminalEvent};
use crate::ui::span::Span;
use crate::ui::style::Color;
use crossterm::event::{Event, KeyEventKind, poll, read};
use crossterm::style::{Attribute, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stderr, Write};
use std::time::Duration;

/// Inline renderer on stderr, so stdout stays free for the picked path.
pub struct Terminal {
    out: Stderr,
    width: u16,
    drawn: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, _) = terminal::size()?;
        Ok(Self {
            out: io::stderr(),
            width,
            drawn: 0,
        })
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            match read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    return Ok(TerminalEvent::Key(map_key_event(key)));
                }
                Event::Resize(width, _) => {
                    self.width = width;
                    return Ok(TerminalEvent::Resize { width });
                }
                _ => continue,
            }
        }
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.out, cursor::Hide)
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        execute!(self.out, cursor::Show)
    }

    /// Redraws the picker area in place of the previous frame.
    pub fn draw(&mut self, lines: &[Vec<Span>]) -> io::Result<()> {
        self.rewind()?;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                write!(self.out, "\r\n")?;
            }
            self.render_line(line)?;
        }
        self.drawn = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        self.out.flush()
    }

    /// Erases the picker area.
    pub fn clear(&mut self) -> io::Result<()> {
        self.rewind()?;
        self.drawn = 0;
        self.out.flush()
    }

    fn rewind(&mut self) -> io::Result<()> {
        if self.drawn > 1 {
            queue!(self.out, cursor::MoveUp(self.drawn - 1))?;
        }
        queue!(
            self.out,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )
    }

    fn render_line(&mut self, line: &[Span]) -> io::Result<()> {
        for span in line {
            let style = span.style;
            if let Some(fg) = style.color {
                queue!(self.out, SetForegroundColor(map_color(fg)))?;
            }
            if style.bold {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                queue!(self.out, SetAttribute(Attribute::Dim))?;
            }

            write!(self.out, "{}", span.text)?;

            if !style.is_plain() {
                queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
            }
        }
        Ok(())
    }
}

fn map_color(color: Color) -> crossterm::style::Color {
    match color {
        Color::DarkGrey => crossterm::style::Color::DarkGrey,
        Color::Green => crossterm::style::Color::Green,
        Color::Yellow => crossterm::style::Color::Yellow,
        Color::Cyan => crossterm::style::Color::Cyan,
    }
}

fn map_key_event(event: crossterm::event::KeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(event.code),
        modifiers: map_key_modifiers(event.modifiers),
    }
}

fn map_key_code(code: crossterm::event::KeyCode) -> KeyCode {
    match code {
        crossterm::event::KeyCode::Char(ch) => KeyCode::Char(ch),
        crossterm::event::KeyCode::Backspace => KeyCode::Backspace,
        crossterm::event::KeyCode::Enter => KeyCode::Enter,
        crossterm::event::KeyCode::Esc => KeyCode::Esc,
        crossterm::event::KeyCode::Up => KeyCode::Up,
        crossterm::event::KeyCode::Down => KeyCode::Down,
        crossterm::event::KeyCode::Home => KeyCode::Home,
        crossterm::event::KeyCode::End => KeyCode::End,
        crossterm::event::KeyCode::Tab => KeyCode::Tab,
        crossterm::event::KeyCode::BackTab => KeyCode::BackTab,
        _ => KeyCode::Other,
    }
}

fn map_key_modifiers(modifiers: crossterm::event::KeyModifiers) -> KeyModifiers {
    let mut mapped = KeyModifiers::NONE;
    if modifiers.contains(crossterm::event::KeyModifiers::SHIFT) {
        mapped |= KeyModifiers::SHIFT;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::CONTROL) {
        mapped |= KeyModifiers::CONTROL;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::ALT) {
        mapped |= KeyModifiers::ALT;
    }
    mapped
}
