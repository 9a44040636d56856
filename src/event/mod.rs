//! Input events delivered to applications.
//!
//! Frame loops translate whatever their backend produces into [`Event`];
//! [`Event::from_crossterm`] covers terminal backends.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

use crate::geometry::{Point, Rectangle};

/// A key press with its modifier state. Keys are lowercase names such as
/// `"q"`, `"enter"` or `"f5"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into().to_lowercase(),
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Parse a combo such as `"ctrl+q"` or `"alt+shift+f4"`.
    pub fn parse(combo: &str) -> Option<Self> {
        let mut parts: Vec<&str> = combo.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|key| !key.is_empty())?;
        let mut press = KeyPress::new(key);
        for modifier in parts {
            match modifier.to_lowercase().as_str() {
                "ctrl" | "control" => press.ctrl = true,
                "alt" => press.alt = true,
                "shift" => press.shift = true,
                _ => return None,
            }
        }
        Some(press)
    }

    fn from_crossterm(key: &KeyEvent) -> Option<Self> {
        let name = match key.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(ch) => ch.to_lowercase().to_string(),
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Esc => "escape".to_string(),
            KeyCode::Tab | KeyCode::BackTab => "tab".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Delete => "delete".to_string(),
            KeyCode::Left => "left".to_string(),
            KeyCode::Right => "right".to_string(),
            KeyCode::Up => "up".to_string(),
            KeyCode::Down => "down".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::PageUp => "pageup".to_string(),
            KeyCode::PageDown => "pagedown".to_string(),
            KeyCode::F(n) => format!("f{n}"),
            _ => return None,
        };
        Some(Self {
            key: name,
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            alt: key.modifiers.contains(KeyModifiers::ALT),
            shift: key.modifiers.contains(KeyModifiers::SHIFT) || key.code == KeyCode::BackTab,
        })
    }
}

/// Input delivered to [`crate::App::event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MouseMotion(Point),
    MouseDown(Point),
    MouseUp(Point),
    KeyDown(KeyPress),
    Resize { width: f64, height: f64 },
    FocusGained,
    FocusLost,
}

impl Event {
    /// True for a key press matching `combo` exactly, modifiers included.
    /// An unparseable combo never matches.
    pub fn key_down(&self, combo: &str) -> bool {
        match (self, KeyPress::parse(combo)) {
            (Event::KeyDown(press), Some(wanted)) => *press == wanted,
            _ => false,
        }
    }

    pub fn mouse_motion(&self) -> bool {
        matches!(self, Event::MouseMotion(_))
    }

    /// Mouse motion ending inside `rectangle` (edges included).
    pub fn mouse_motion_inside(&self, rectangle: &Rectangle) -> bool {
        match self {
            Event::MouseMotion(point) => rectangle.contains(*point),
            _ => false,
        }
    }

    /// Pointer position carried by mouse events.
    pub fn mouse_point(&self) -> Option<Point> {
        match self {
            Event::MouseMotion(point) | Event::MouseDown(point) | Event::MouseUp(point) => {
                Some(*point)
            }
            _ => None,
        }
    }

    /// Translate a terminal event; cell coordinates become points. Key
    /// releases, scrolling and paste have no counterpart and yield `None`.
    pub fn from_crossterm(event: &CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                KeyPress::from_crossterm(key).map(Event::KeyDown)
            }
            CrosstermEvent::Mouse(mouse) => {
                let point = Point::new(f64::from(mouse.column), f64::from(mouse.row));
                match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        Some(Event::MouseMotion(point))
                    }
                    MouseEventKind::Down(_) => Some(Event::MouseDown(point)),
                    MouseEventKind::Up(_) => Some(Event::MouseUp(point)),
                    _ => None,
                }
            }
            CrosstermEvent::Resize(width, height) => Some(Event::Resize {
                width: f64::from(*width),
                height: f64::from(*height),
            }),
            CrosstermEvent::FocusGained => Some(Event::FocusGained),
            CrosstermEvent::FocusLost => Some(Event::FocusLost),
            _ => None,
        }
    }
}
