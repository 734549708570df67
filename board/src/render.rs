//! Scene building: a renderer-agnostic draw list in screen space.
//!
//! The list is rebuilt from scratch on every call. Nothing in it feeds back
//! into the engine.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::{CAPTION_GAP_PX, PLACEHOLDER_FILL, STATUS_INSET_PX, STATUS_SPACING_PX};
use crate::drag::DragController;
use crate::hit::{self, Control, Rect};
use crate::image::{ImageRef, ImageRegistry};
use crate::tokens::{DisplayFields, Token, TokenId, TokenStore};
use crate::viewport::{Point, ViewportState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundDraw>,
    pub tokens: Vec<TokenDraw>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundDraw {
    pub image: ImageRef,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "fill", rename_all = "snake_case")]
pub enum Fill {
    Image { image: ImageRef },
    /// Circle inscribed in the token square, with a short label.
    Placeholder { color: &'static str, label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub at: Point,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenDraw {
    pub id: TokenId,
    pub body: Rect,
    pub fill: Fill,
    pub labels: Vec<Label>,
    pub statuses: Vec<Label>,
    pub controls: Vec<(Control, Rect)>,
    pub held: bool,
}

/// Build the draw list for the current state, back to front.
#[must_use]
pub fn build(
    viewport: &ViewportState,
    tokens: &TokenStore,
    images: &ImageRegistry,
    background: Option<&ImageRef>,
    drag: &DragController,
) -> Scene {
    let mapper = viewport.mapper();
    let background = background.and_then(|image| {
        let size = images.dimensions(image)?;
        let origin = mapper.world_to_screen(Point::ZERO);
        Some(BackgroundDraw {
            image: image.clone(),
            rect: Rect::new(
                origin.x,
                origin.y,
                mapper.world_len_to_screen(size.width),
                mapper.world_len_to_screen(size.height),
            ),
        })
    });

    let held = drag.held();
    let preview = drag.preview_offset();
    let tokens = tokens
        .iter()
        .map(|token| {
            let offset = match preview {
                Some((id, offset)) if id == token.id => offset,
                _ => Point::ZERO,
            };
            let layout = hit::layout(token, &mapper, offset);
            TokenDraw {
                id: token.id,
                fill: fill_for(token, images),
                labels: labels_for(token, layout.body),
                statuses: status_badges(token, layout.body),
                body: layout.body,
                controls: layout.controls,
                held: held == Some(token.id),
            }
        })
        .collect();

    Scene { background, tokens }
}

fn fill_for(token: &Token, images: &ImageRegistry) -> Fill {
    match &token.image {
        Some(image) if images.is_resolved(image) => Fill::Image { image: image.clone() },
        _ => Fill::Placeholder { color: PLACEHOLDER_FILL, label: initial(token.name()) },
    }
}

fn initial(name: &str) -> String {
    name.trim().chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

fn labels_for(token: &Token, body: Rect) -> Vec<Label> {
    match &token.fields {
        DisplayFields::Player { .. } => vec![Label {
            text: token.caption(),
            at: Point::new(body.x, body.y + body.height + CAPTION_GAP_PX),
            color: "blue",
        }],
        // Count badge in the top-right corner.
        DisplayFields::Creature { type_count, .. } => vec![Label {
            text: type_count.to_string(),
            at: Point::new(body.x + body.width - 10.0, body.y),
            color: "red",
        }],
    }
}

fn status_badges(token: &Token, body: Rect) -> Vec<Label> {
    token
        .active_statuses()
        .zip(0_u32..)
        .map(|(condition, index)| Label {
            text: condition.symbol().to_string(),
            at: Point::new(body.x + STATUS_INSET_PX + f64::from(index) * STATUS_SPACING_PX, body.y + STATUS_INSET_PX),
            color: condition.color(),
        })
        .collect()
}
