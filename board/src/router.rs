//! Input routing: one raw event in, one [`Route`] out.
//!
//! The router is pure. It sees the event plus a [`RouteContext`] describing
//! what is under the pointer and what is held, and picks the first matching
//! rule:
//!
//! 1. zoom modifier + wheel, or + `+` `=` `-` `0` → zoom / reset
//! 2. primary press on a token (no modifiers) → hold, or press a control
//! 3. `w` / `s` while a token is held → resize that token
//! 4. context menu on a token → open its detail view
//!
//! Pointer moves and releases continue an active hold. Anything else passes
//! through untouched so the host keeps its default behaviour (plain wheel
//! scrolling, for example).

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use crate::drag::ResizeKey;
use crate::hit::{Control, Hit, HitPart};
use crate::input::{Button, InputEvent, Key, ZoomModifier};
use crate::tokens::TokenId;
use crate::viewport::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// What the engine should do with an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    /// Zoom one step. `focal` is `None` for keyboard zoom.
    Zoom { direction: ZoomDirection, focal: Option<Point> },
    ResetViewport,
    /// Consumed but nothing to do (zero wheel delta, zoom frozen by a drag).
    Swallow,
    Hold { token: TokenId, at: Point },
    Control { token: TokenId, control: Control },
    DragMove { at: Point },
    Release { at: Point },
    Resize { token: TokenId, key: ResizeKey },
    OpenDetail { token: TokenId },
    /// Not ours; leave the host's default action alone.
    Pass,
}

impl Route {
    /// Whether the host should suppress its default handling.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::Pass)
    }
}

/// Facts about the session the router needs but does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteContext {
    /// Token part under the event position, if any.
    pub hit: Option<Hit>,
    /// Token currently held (Held or Dragging).
    pub held: Option<TokenId>,
    pub dragging: bool,
    /// The hit token is pinned in an open detail view.
    pub hit_pinned: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputRouter {
    zoom_modifier: ZoomModifier,
}

impl InputRouter {
    #[must_use]
    pub fn new(zoom_modifier: ZoomModifier) -> Self {
        Self { zoom_modifier }
    }

    #[must_use]
    pub fn route(&self, event: &InputEvent, ctx: &RouteContext) -> Route {
        if let Some(route) = self.zoom_gesture(event, ctx) {
            return route;
        }
        match event {
            InputEvent::PointerDown { at, button: Button::Primary, modifiers } if !modifiers.any() => {
                match ctx.hit {
                    Some(Hit { token, part: HitPart::Control(control) }) => Route::Control { token, control },
                    Some(Hit { token, part: HitPart::Body }) if ctx.held.is_none() && !ctx.hit_pinned => {
                        Route::Hold { token, at: *at }
                    }
                    _ => Route::Pass,
                }
            }
            InputEvent::KeyDown { key, modifiers } if !modifiers.chorded() => match (ctx.held, resize_key(key)) {
                (Some(token), Some(key)) => Route::Resize { token, key },
                _ => Route::Pass,
            },
            InputEvent::ContextMenu { .. } => match ctx.hit {
                Some(hit) => Route::OpenDetail { token: hit.token },
                None => Route::Pass,
            },
            InputEvent::PointerMove { at, .. } if ctx.held.is_some() => Route::DragMove { at: *at },
            InputEvent::PointerUp { at, button: Button::Primary, .. } if ctx.held.is_some() => Route::Release { at: *at },
            _ => Route::Pass,
        }
    }

    /// Rule 1. Zoom is frozen while a drag is in flight: the gesture is still
    /// consumed so the page does not zoom instead.
    fn zoom_gesture(&self, event: &InputEvent, ctx: &RouteContext) -> Option<Route> {
        let route = match event {
            InputEvent::Wheel { at, delta, modifiers } if self.zoom_modifier.is_held(*modifiers) => {
                if delta.dy < 0.0 {
                    Route::Zoom { direction: ZoomDirection::In, focal: Some(*at) }
                } else if delta.dy > 0.0 {
                    Route::Zoom { direction: ZoomDirection::Out, focal: Some(*at) }
                } else {
                    Route::Swallow
                }
            }
            InputEvent::KeyDown { key, modifiers } if self.zoom_modifier.is_held(*modifiers) => match key.0.as_str() {
                "+" | "=" => Route::Zoom { direction: ZoomDirection::In, focal: None },
                "-" => Route::Zoom { direction: ZoomDirection::Out, focal: None },
                "0" => Route::ResetViewport,
                _ => return None,
            },
            _ => return None,
        };
        if ctx.dragging && route != Route::Swallow {
            tracing::debug!(?route, "zoom ignored during drag");
            return Some(Route::Swallow);
        }
        Some(route)
    }
}

fn resize_key(key: &Key) -> Option<ResizeKey> {
    if key.is_char('w') {
        Some(ResizeKey::Grow)
    } else if key.is_char('s') {
        Some(ResizeKey::Shrink)
    } else {
        None
    }
}
