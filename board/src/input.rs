//! Input model: raw events, modifier keys, mouse buttons and keys.
//!
//! These are the host-agnostic shapes of the DOM events the router consumes.
//! They deserialize from JSON so recorded sessions can be replayed.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::viewport::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    #[must_use]
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// Ctrl, Alt or Meta is down. Shift alone only changes the key's case.
    #[must_use]
    pub fn chorded(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Which modifier turns the wheel and `+`/`-`/`0` into zoom gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomModifier {
    #[default]
    Ctrl,
    Meta,
    CtrlOrMeta,
}

impl ZoomModifier {
    #[must_use]
    pub fn is_held(self, mods: Modifiers) -> bool {
        match self {
            Self::Ctrl => mods.ctrl,
            Self::Meta => mods.meta,
            Self::CtrlOrMeta => mods.ctrl || mods.meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// A key value as reported by the DOM `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self(key.to_string())
    }

    /// Case-insensitive single-character match.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
    }
}

/// Scroll deltas; negative `dy` scrolls up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelDelta {
    #[serde(default)]
    pub dx: f64,
    pub dy: f64,
}

/// One raw input event, positioned in screen space where applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        at: Point,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        at: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        at: Point,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Wheel {
        at: Point,
        delta: WheelDelta,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    ContextMenu {
        at: Point,
    },
}

impl InputEvent {
    /// Screen position carried by pointer-like events.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { at, .. }
            | Self::PointerMove { at, .. }
            | Self::PointerUp { at, .. }
            | Self::Wheel { at, .. }
            | Self::ContextMenu { at } => Some(*at),
            Self::KeyDown { .. } => None,
        }
    }
}
