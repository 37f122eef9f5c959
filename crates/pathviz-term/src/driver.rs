//! Crossterm terminal driver.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use pathviz_core::Point;

use crate::app::{Context, Driver};
use crate::messages::{Key, ModMask, MouseAction, Msg};
use crate::screen::{AttrMask, Color, Frame};

/// How long a poll waits for the first event.
const POLL_WAIT: Duration = Duration::from_millis(10);

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
    m
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// Translate one terminal event.
fn to_msg(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) => {
            // Ctrl+C is the conventional way out of a raw-mode program.
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Some(Msg::ch('q'));
            }
            to_key(code).map(|key| Msg::KeyDown {
                key,
                modifiers: to_mod_mask(modifiers),
            })
        }
        Event::Mouse(me) => {
            let pos = Point::new(i32::from(me.column), i32::from(me.row));
            let action = match me.kind {
                MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
                MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
                MouseEventKind::Drag(_) => MouseAction::Drag,
                MouseEventKind::Up(_) => MouseAction::Release,
                _ => return None,
            };
            Some(Msg::Mouse { action, pos })
        }
        Event::Resize(w, h) => Some(Msg::Screen {
            width: i32::from(w),
            height: i32::from(h),
        }),
        _ => None,
    }
}

/// A terminal back-end using crossterm: raw mode, alternate screen and
/// mouse capture.
pub struct CrosstermDriver {
    mouse_enabled: bool,
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
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
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            queue!(stdout, event::EnableMouseCapture)?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(POLL_WAIT)? {
            return Ok(());
        }
        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(m) = to_msg(event::read()?) {
                tx.send(m).ok();
            }
        }
        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout().lock();
        for fc in &frame.cells {
            let (p, glyph) = (fc.pos, fc.glyph);
            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(glyph.style.fg)),
                SetBackgroundColor(to_ct_color(glyph.style.bg))
            )?;
            let attrs = glyph.style.attrs;
            if attrs.contains(AttrMask::BOLD) {
                queue!(stdout, style::SetAttribute(Attribute::Bold))?;
            }
            if attrs.contains(AttrMask::UNDERLINE) {
                queue!(stdout, style::SetAttribute(Attribute::Underlined))?;
            }
            if attrs.contains(AttrMask::REVERSE) {
                queue!(stdout, style::SetAttribute(Attribute::Reverse))?;
            }
            if attrs.contains(AttrMask::DIM) {
                queue!(stdout, style::SetAttribute(Attribute::Dim))?;
            }
            write!(stdout, "{}", glyph.ch)?;
            if attrs != AttrMask::NONE {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = queue!(stdout, event::DisableMouseCapture);
        }
        let _ = queue!(
            stdout,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = stdout.flush();
        let _ = terminal::disable_raw_mode();
    }
}
