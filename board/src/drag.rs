//! Press-hold-drag state machine for tokens.
//!
//! ```text
//! Idle ──press──▶ Held ──move──▶ Dragging
//!   ▲               │                │
//!   └──release / cancel ◀────────────┘
//! ```
//!
//! The controller tracks the pointer in screen space only. World space is
//! touched exactly once, on release, when the accumulated screen delta is
//! converted through the mapper current at that moment and committed to the
//! store against the token's *current* position.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use serde::Serialize;

use crate::tokens::{TokenId, TokenStore};
use crate::viewport::{CoordinateMapper, Point};

/// The single interaction-session record: which token is held, where the
/// press began and where the pointer last was.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer is down on a token but has not moved.
    Held { token: TokenId, origin: Point, last: Point },
    /// Pointer has moved while held.
    Dragging { token: TokenId, origin: Point, last: Point },
}

impl DragPhase {
    #[must_use]
    pub fn token(&self) -> Option<TokenId> {
        match *self {
            Self::Idle => None,
            Self::Held { token, .. } | Self::Dragging { token, .. } => Some(token),
        }
    }
}

/// Resize direction bound to the `w` / `s` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeKey {
    Grow,
    Shrink,
}

/// A position written to the store when a drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commit {
    pub token: TokenId,
    pub position: Point,
}

#[derive(Debug, Clone)]
pub struct DragController {
    phase: DragPhase,
    resize_step: i32,
}

impl DragController {
    #[must_use]
    pub fn new(resize_step: i32) -> Self {
        Self { phase: DragPhase::Idle, resize_step }
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Token currently held or dragged.
    #[must_use]
    pub fn held(&self) -> Option<TokenId> {
        self.phase.token()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Idle → Held. Ignored (returns `false`) if something is already held.
    pub fn press(&mut self, token: TokenId, at: Point) -> bool {
        if self.phase != DragPhase::Idle {
            tracing::debug!(token, held = ?self.held(), "press ignored, already holding");
            return false;
        }
        tracing::debug!(token, "token held");
        self.phase = DragPhase::Held { token, origin: at, last: at };
        true
    }

    /// Record a pointer move. Held → Dragging on the first move. Returns the
    /// token being dragged, if any.
    pub fn move_to(&mut self, at: Point) -> Option<TokenId> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Held { token, origin, .. } => {
                tracing::debug!(token, "drag started");
                self.phase = DragPhase::Dragging { token, origin, last: at };
                Some(token)
            }
            DragPhase::Dragging { token, origin, .. } => {
                self.phase = DragPhase::Dragging { token, origin, last: at };
                Some(token)
            }
        }
    }

    /// Screen-space offset of the dragged token from where it started.
    #[must_use]
    pub fn preview_offset(&self) -> Option<(TokenId, Point)> {
        match self.phase {
            DragPhase::Dragging { token, origin, last } => Some((token, last - origin)),
            _ => None,
        }
    }

    /// End the hold at `at`. If a drag happened, convert the screen delta with
    /// `mapper` and commit the new world position. A token that vanished
    /// mid-drag commits nothing.
    pub fn release(&mut self, at: Point, mapper: &CoordinateMapper, store: &mut TokenStore) -> Option<Commit> {
        let phase = std::mem::take(&mut self.phase);
        let DragPhase::Dragging { token, origin, .. } = phase else {
            if let Some(token) = phase.token() {
                tracing::debug!(token, "released without drag");
            }
            return None;
        };
        let Some(current) = store.get(token).map(|t| t.position) else {
            tracing::debug!(token, "dragged token no longer exists");
            return None;
        };
        let start = mapper.world_to_screen(current);
        let position = mapper.screen_to_world(start + (at - origin));
        store.update_position(token, position);
        tracing::debug!(token, x = position.x, y = position.y, "drag committed");
        Some(Commit { token, position })
    }

    /// Resize the held token by one step. Returns the new size, or `None`
    /// when nothing is held or the token is gone.
    pub fn resize(&self, key: ResizeKey, store: &mut TokenStore) -> Option<u32> {
        let token = self.held()?;
        let delta = match key {
            ResizeKey::Grow => self.resize_step,
            ResizeKey::Shrink => -self.resize_step,
        };
        store.update_size(token, delta);
        store.get(token).map(|t| t.size)
    }

    /// Abandon any hold without committing. Returns the token that was held.
    pub fn cancel(&mut self) -> Option<TokenId> {
        let token = std::mem::take(&mut self.phase).token();
        if let Some(token) = token {
            tracing::debug!(token, "hold cancelled");
        }
        token
    }

    /// Drop the hold if it refers to `token` (which was just removed).
    pub fn forget(&mut self, token: TokenId) {
        if self.held() == Some(token) {
            self.phase = DragPhase::Idle;
        }
    }
}
