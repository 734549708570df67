use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::CatalogEntry;
use crate::config::BoardConfig;
use crate::detail::{DetailModel, DetailView};
use crate::drag::{DragController, DragPhase};
use crate::hit::{self, Control};
use crate::image::{ImageRef, ImageRegistry};
use crate::input::InputEvent;
use crate::render::{self, Scene};
use crate::router::{InputRouter, Route, RouteContext, ZoomDirection};
use crate::tokens::{Condition, Field, TokenDraft, TokenId, TokenKind, TokenStore};
use crate::viewport::{Point, Size, ViewportState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Side effects the host should react to after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ViewportChanged { zoom: f64, pan: Point },
    TokenHeld { id: TokenId },
    HoldCancelled { id: TokenId },
    TokenMoved { id: TokenId, position: Point },
    TokenResized { id: TokenId, size: u32 },
    TokenUpdated { id: TokenId },
    DetailOpened(DetailView),
    RenderNeeded,
}

/// Result of routing one input event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Routed {
    /// The host should suppress the browser's default handling.
    pub prevent_default: bool,
    pub actions: Vec<Action>,
}

/// Session state for one battle map. Every mutation goes through here.
pub struct EngineCore {
    config: BoardConfig,
    router: InputRouter,
    viewport: ViewportState,
    tokens: TokenStore,
    images: ImageRegistry,
    drag: DragController,
    detail: DetailView,
    background: Option<ImageRef>,
    creature_counts: HashMap<String, u32>,
    last_pointer: Option<Point>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        let config = config.validated();
        let mut engine = Self {
            router: InputRouter::new(config.zoom_modifier),
            viewport: ViewportState::new(config.zoom_limits()),
            tokens: TokenStore::new(config.min_token_size),
            images: ImageRegistry::new(),
            drag: DragController::new(config.resize_step),
            detail: DetailView::Closed,
            background: None,
            creature_counts: HashMap::new(),
            last_pointer: None,
            config,
        };
        engine.set_background(engine.config.default_background.clone());
        engine
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    #[must_use]
    pub fn images(&self) -> &ImageRegistry {
        &self.images
    }

    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    #[must_use]
    pub fn detail(&self) -> DetailView {
        self.detail
    }

    /// Detail panel contents, re-read from the store.
    #[must_use]
    pub fn detail_model(&self) -> Option<DetailModel> {
        self.detail.model(&self.tokens)
    }

    #[must_use]
    pub fn background(&self) -> Option<&ImageRef> {
        self.background.as_ref()
    }

    /// Headless draw list for the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        render::build(&self.viewport, &self.tokens, &self.images, self.background.as_ref(), &self.drag)
    }

    // --- Environment ---

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.set_viewport_size(Size::new(width, height));
    }

    /// Switch the map background. The centering offset only applies once the
    /// image has resolved.
    pub fn set_background(&mut self, image: Option<ImageRef>) {
        if let Some(image) = &image {
            self.images.request(image);
        }
        let size = image.as_ref().and_then(|i| self.images.dimensions(i));
        self.viewport.set_background_size(size);
        tracing::info!(background = image.as_ref().map(ImageRef::as_str), "background set");
        self.background = image;
    }

    /// The host finished loading `image`.
    pub fn image_resolved(&mut self, image: &ImageRef, width: u32, height: u32) -> Vec<Action> {
        if !self.images.resolve(image, width, height) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.background.as_ref() == Some(image) {
            self.viewport.set_background_size(self.images.dimensions(image));
            actions.push(self.viewport_changed());
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Token lifecycle ---

    /// Add a player token at the spawn point.
    pub fn add_player(&mut self, image: Option<ImageRef>) -> TokenId {
        if let Some(image) = &image {
            self.images.request(image);
        }
        let draft = TokenDraft::player(self.config.spawn, self.config.default_token_size, image);
        self.tokens.add(draft)
    }

    /// Add a creature from the catalog, numbering it among its kind.
    pub fn add_creature(&mut self, entry: Arc<CatalogEntry>) -> TokenId {
        let count = self.creature_counts.entry(entry.name.clone()).or_insert(0);
        *count += 1;
        let draft = TokenDraft::creature(entry, *count, self.config.spawn, self.config.default_token_size);
        if let Some(image) = &draft.image {
            self.images.request(image);
        }
        self.tokens.add(draft)
    }

    /// Remove a token, closing its detail view and dropping any hold on it.
    pub fn remove(&mut self, id: TokenId) -> bool {
        if self.tokens.remove(id).is_none() {
            return false;
        }
        self.forget(id);
        true
    }

    pub fn remove_players(&mut self) -> Vec<TokenId> {
        self.remove_kind(TokenKind::Player)
    }

    pub fn remove_creatures(&mut self) -> Vec<TokenId> {
        self.remove_kind(TokenKind::Creature)
    }

    fn remove_kind(&mut self, kind: TokenKind) -> Vec<TokenId> {
        let removed = self.tokens.retain(|t| t.kind() != kind);
        for id in &removed {
            self.forget(*id);
        }
        removed
    }

    fn forget(&mut self, id: TokenId) {
        if self.detail.close_if_showing(id) {
            tracing::debug!(id, "detail view closed with its token");
        }
        self.drag.forget(id);
    }

    // --- Record edits ---

    pub fn update_field(&mut self, id: TokenId, field: Field, value: &str) -> bool {
        let changed = self.tokens.update_field(id, field, value);
        if changed && field == Field::Image {
            if let Some(image) = self.tokens.get(id).and_then(|t| t.image.clone()) {
                self.images.request(&image);
            }
        }
        changed
    }

    pub fn update_status(&mut self, id: TokenId, condition: Condition, active: bool) -> bool {
        self.tokens.update_status(id, condition, active)
    }

    pub fn update_position(&mut self, id: TokenId, position: Point) -> bool {
        self.tokens.update_position(id, position)
    }

    pub fn update_size(&mut self, id: TokenId, delta: i32) -> bool {
        self.tokens.update_size(id, delta)
    }

    pub fn adjust_hp(&mut self, id: TokenId, delta: i64) -> bool {
        self.tokens.adjust_hp(id, delta)
    }

    // --- Detail view ---

    /// Open the detail view for `id`, cancelling any nascent drag.
    pub fn open_detail(&mut self, id: TokenId) -> Option<DetailView> {
        let view = DetailView::open_for(self.tokens.get(id)?);
        self.drag.cancel();
        self.detail = view;
        tracing::debug!(id, ?view, "detail view opened");
        Some(view)
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    pub fn toggle_pin(&mut self) -> bool {
        self.detail.toggle_pin()
    }

    /// Reveal the full stat block in an open creature view.
    pub fn trust(&mut self) -> bool {
        self.detail.trust()
    }

    // --- Viewport commands ---

    /// Toolbar zoom, anchored at the viewport centre.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_step(ZoomDirection::In, self.viewport_center())
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_step(ZoomDirection::Out, self.viewport_center())
    }

    pub fn reset_viewport(&mut self) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        let before = self.viewport;
        self.viewport.reset();
        before != self.viewport
    }

    /// Back to a blank session: default viewport and background, no tokens,
    /// ids restarting at 1, counts cleared, nothing held or open.
    pub fn reset(&mut self) {
        self.viewport.reset();
        self.tokens.clear();
        self.drag.cancel();
        self.detail.close();
        self.creature_counts.clear();
        self.last_pointer = None;
        self.set_background(self.config.default_background.clone());
        tracing::info!("session reset");
    }

    fn zoom_step(&mut self, direction: ZoomDirection, focal: Point) -> bool {
        if self.drag.is_dragging() {
            tracing::debug!("zoom ignored during drag");
            return false;
        }
        let factor = match direction {
            ZoomDirection::In => self.config.zoom_step,
            ZoomDirection::Out => 1.0 / self.config.zoom_step,
        };
        self.viewport.zoom_by(factor, focal)
    }

    fn viewport_center(&self) -> Point {
        self.viewport.stage().viewport.center()
    }

    fn viewport_changed(&self) -> Action {
        Action::ViewportChanged { zoom: self.viewport.zoom(), pan: self.viewport.pan() }
    }

    // --- Input ---

    /// Route one raw input event and apply it.
    pub fn handle(&mut self, event: &InputEvent) -> Routed {
        let at = event.position();
        if at.is_some() {
            self.last_pointer = at;
        }
        let mapper = self.viewport.mapper();
        let hit = at.and_then(|p| hit::hit_test(p, &self.tokens, &mapper, self.drag.preview_offset()));
        let ctx = RouteContext {
            hit,
            held: self.drag.held(),
            dragging: self.drag.is_dragging(),
            hit_pinned: hit.is_some_and(|h| self.detail.is_pinned_for(h.token)),
        };
        let route = self.router.route(event, &ctx);
        Routed { prevent_default: route.prevents_default(), actions: self.apply(route) }
    }

    fn apply(&mut self, route: Route) -> Vec<Action> {
        match route {
            Route::Zoom { direction, focal } => {
                let focal = focal.or(self.last_pointer).unwrap_or_else(|| self.viewport_center());
                if self.zoom_step(direction, focal) {
                    vec![self.viewport_changed(), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Route::ResetViewport => {
                if self.reset_viewport() {
                    vec![self.viewport_changed(), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Route::Hold { token, at } => {
                if self.drag.press(token, at) {
                    vec![Action::TokenHeld { id: token }]
                } else {
                    Vec::new()
                }
            }
            Route::Control { token, control } => self.apply_control(token, control),
            Route::DragMove { at } => match self.drag.move_to(at) {
                Some(_) => vec![Action::RenderNeeded],
                None => Vec::new(),
            },
            Route::Release { at } => {
                let mapper = self.viewport.mapper();
                match self.drag.release(at, &mapper, &mut self.tokens) {
                    Some(commit) => vec![
                        Action::TokenMoved { id: commit.token, position: commit.position },
                        Action::RenderNeeded,
                    ],
                    None => Vec::new(),
                }
            }
            Route::Resize { token, key } => match self.drag.resize(key, &mut self.tokens) {
                Some(size) => vec![Action::TokenResized { id: token, size }, Action::RenderNeeded],
                None => Vec::new(),
            },
            Route::OpenDetail { token } => {
                let mut actions = Vec::new();
                if let Some(id) = self.drag.cancel() {
                    actions.push(Action::HoldCancelled { id });
                }
                if let Some(view) = self.open_detail(token) {
                    actions.push(Action::DetailOpened(view));
                }
                actions
            }
            Route::Swallow | Route::Pass => Vec::new(),
        }
    }

    fn apply_control(&mut self, token: TokenId, control: Control) -> Vec<Action> {
        let step = self.config.resize_step;
        let changed = match control {
            Control::Shrink => self.tokens.update_size(token, -step),
            Control::Grow => self.tokens.update_size(token, step),
            Control::HpDown => self.tokens.adjust_hp(token, -1),
            Control::HpUp => self.tokens.adjust_hp(token, 1),
        };
        if !changed {
            return Vec::new();
        }
        let action = match (control, self.tokens.get(token)) {
            (Control::Shrink | Control::Grow, Some(t)) => Action::TokenResized { id: token, size: t.size },
            _ => Action::TokenUpdated { id: token },
        };
        vec![action, Action::RenderNeeded]
    }
}
