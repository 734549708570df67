//! Screen-space layout and hit-testing for tokens.
//!
//! Geometry is derived on demand from the token's world position and size
//! through a [`CoordinateMapper`]; nothing here is stored. Labels and
//! controls keep a fixed pixel size at every zoom level, the token square
//! scales with zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::Serialize;

use crate::consts::{CONTROL_PX, HP_ROW_OFFSET_PX};
use crate::tokens::{Token, TokenId, TokenKind, TokenStore};
use crate::viewport::{CoordinateMapper, Point};

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// On-canvas buttons drawn around a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Shrink,
    Grow,
    HpDown,
    HpUp,
}

impl Control {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Shrink => "–",
            Self::HpDown => "-",
            Self::Grow | Self::HpUp => "+",
        }
    }
}

/// Which part of a token a screen point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Control(Control),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub token: TokenId,
    pub part: HitPart,
}

/// Screen rectangles for one token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenLayout {
    pub body: Rect,
    pub controls: Vec<(Control, Rect)>,
}

/// Lay out `token` at the current transform, shifted by an in-flight drag
/// offset (screen pixels).
#[must_use]
pub fn layout(token: &Token, mapper: &CoordinateMapper, drag_offset: Point) -> TokenLayout {
    let origin = mapper.world_to_screen(token.position) + drag_offset;
    let side = mapper.world_len_to_screen(f64::from(token.size));
    let body = Rect::new(origin.x, origin.y, side, side);

    let mut controls = vec![
        (Control::Shrink, Rect::new(origin.x + side, origin.y, CONTROL_PX, CONTROL_PX)),
        (Control::Grow, Rect::new(origin.x + side, origin.y + side / 2.0, CONTROL_PX, CONTROL_PX)),
    ];
    if token.kind() == TokenKind::Player {
        let row = origin.y + side + HP_ROW_OFFSET_PX;
        controls.push((Control::HpDown, Rect::new(origin.x, row, side / 2.0, CONTROL_PX)));
        controls.push((Control::HpUp, Rect::new(origin.x + side / 2.0, row, side / 2.0, CONTROL_PX)));
    }
    TokenLayout { body, controls }
}

/// Find the topmost token part under `screen`.
///
/// Later tokens draw over earlier ones, so the search runs back to front.
/// Within a token, controls win over the body.
#[must_use]
pub fn hit_test(
    screen: Point,
    tokens: &TokenStore,
    mapper: &CoordinateMapper,
    drag: Option<(TokenId, Point)>,
) -> Option<Hit> {
    let snapshot = tokens.snapshot();
    snapshot.iter().rev().find_map(|token| {
        let offset = match drag {
            Some((id, offset)) if id == token.id => offset,
            _ => Point::ZERO,
        };
        let layout = layout(token, mapper, offset);
        if let Some((control, _)) = layout.controls.iter().find(|(_, rect)| rect.contains(screen)) {
            return Some(Hit { token: token.id, part: HitPart::Control(*control) });
        }
        layout.body.contains(screen).then_some(Hit { token: token.id, part: HitPart::Body })
    })
}
