//! Crossterm terminal driver for pathviz.
//!
//! Provides a [`CrosstermDriver`] that implements [`pathviz_core::Driver`]:
//! raw terminal events become [`Msg`]s, and [`Frame`]s are written back as
//! queued cursor moves and coloured cells.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use pathviz_core::{
    AttrMask, Color, Context, Driver, Frame, Key, ModMask, MouseAction, Msg, Point,
};

/// Maps a [`pathviz_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    if mods.contains(KeyModifiers::META) {
        m = m | ModMask::META;
    }
    m
}

fn to_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        _ => return None,
    };
    Some(key)
}

fn to_mouse_action(kind: MouseEventKind) -> Option<MouseAction> {
    let action = match kind {
        MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
        MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
        MouseEventKind::Down(MouseButton::Middle) => MouseAction::Auxiliary,
        MouseEventKind::Up(_) => MouseAction::Release,
        MouseEventKind::Moved | MouseEventKind::Drag(_) => MouseAction::Move,
        MouseEventKind::ScrollUp => MouseAction::WheelUp,
        MouseEventKind::ScrollDown => MouseAction::WheelDown,
        _ => return None,
    };
    Some(action)
}

/// Translate one terminal event. Key repeats and releases are dropped so
/// that a held key fires its binding once per press.
pub fn translate(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => to_key(code).map(|key| Msg::key_mod(key, to_mod_mask(modifiers))),
        Event::Key(_) => None,
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }) => to_mouse_action(kind).map(|action| {
            Msg::mouse(
                action,
                Point::new(i32::from(column), i32::from(row)),
                to_mod_mask(modifiers),
            )
        }),
        Event::Resize(w, h) => Some(Msg::screen(i32::from(w), i32::from(h))),
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
    poll_interval: Duration,
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            poll_interval: Duration::from_millis(16),
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Current terminal size in cells, `(width, height)`.
    pub fn size() -> io::Result<(i32, i32)> {
        let (w, h) = terminal::size()?;
        Ok((i32::from(w), i32::from(h)))
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        log::debug!("terminal initialised, mouse={}", self.mouse_enabled);
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(self.poll_interval)? {
            return Ok(());
        }
        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(msg) = translate(event::read()?) {
                tx.send(msg).ok();
            }
        }
        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout().lock();

        for fc in &frame.cells {
            let (p, cell) = (fc.pos, fc.cell);
            if p.x < 0 || p.y < 0 {
                continue;
            }
            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;

            let attrs = cell.style.attrs;
            for (mask, attr) in [
                (AttrMask::BOLD, Attribute::Bold),
                (AttrMask::ITALIC, Attribute::Italic),
                (AttrMask::UNDERLINE, Attribute::Underlined),
                (AttrMask::REVERSE, Attribute::Reverse),
                (AttrMask::DIM, Attribute::Dim),
            ] {
                if attrs.contains(mask) {
                    queue!(stdout, SetAttribute(attr))?;
                }
            }

            write!(stdout, "{}", cell.ch)?;

            if !attrs.is_empty() {
                queue!(stdout, SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            execute!(stdout, event::DisableMouseCapture).ok();
        }
        execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
        log::debug!("terminal restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, mods))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16, mods: KeyModifiers) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: mods,
        })
    }

    #[test]
    fn space_maps_to_space_key() {
        match translate(key(KeyCode::Char(' '), KeyModifiers::NONE)) {
            Some(Msg::KeyDown { key, .. }) => assert_eq!(key, Key::Space),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn only_presses_become_keys() {
        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('r'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert!(translate(release).is_none());
        assert!(translate(key(KeyCode::F(5), KeyModifiers::NONE)).is_none());
    }

    #[test]
    fn ctrl_click_keeps_modifier() {
        let ev = mouse(
            MouseEventKind::Down(MouseButton::Left),
            7,
            3,
            KeyModifiers::CONTROL,
        );
        match translate(ev) {
            Some(Msg::Mouse {
                action,
                pos,
                modifiers,
                ..
            }) => {
                assert_eq!(action, MouseAction::Main);
                assert_eq!(pos, Point::new(7, 3));
                assert!(modifiers.contains(ModMask::CTRL));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn drag_is_move() {
        let ev = mouse(
            MouseEventKind::Drag(MouseButton::Left),
            1,
            1,
            KeyModifiers::NONE,
        );
        assert!(matches!(
            translate(ev),
            Some(Msg::Mouse {
                action: MouseAction::Move,
                ..
            })
        ));
    }

    #[test]
    fn resize_is_screen() {
        assert!(matches!(
            translate(Event::Resize(80, 24)),
            Some(Msg::Screen {
                width: 80,
                height: 24,
                ..
            })
        ));
    }

    #[test]
    fn default_color_resets() {
        assert_eq!(to_ct_color(Color::DEFAULT), CtColor::Reset);
        assert_eq!(
            to_ct_color(Color::from_hex(0x4CAF50)),
            CtColor::Rgb {
                r: 0x4C,
                g: 0xAF,
                b: 0x50
            }
        );
    }
}
