//! Engine tunables.
//!
//! Hosts build a [`BoardConfig`] however they like (the binary reads the
//! environment) and pass it through [`BoardConfig::validated`] so that a bad
//! value can never turn into a degenerate zoom factor or a zero-size token.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Serialize;

use crate::consts::{
    DEFAULT_TOKEN_SIZE, MAX_ZOOM, MIN_TOKEN_SIZE, MIN_ZOOM, RESIZE_STEP, SPAWN_X, SPAWN_Y, ZOOM_STEP,
};
use crate::image::ImageRef;
use crate::input::ZoomModifier;
use crate::viewport::{Point, ZoomLimits};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardConfig {
    /// Zoom multiplier per step; must be finite and greater than 1.
    pub zoom_step: f64,
    /// Zoom bounds; the pair must bracket 100% or both fall back.
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// World units per resize key press.
    pub resize_step: i32,
    /// Smallest token side in world units; raised to 20 if lower.
    pub min_token_size: u32,
    pub default_token_size: u32,
    /// World position new tokens appear at.
    pub spawn: Point,
    pub zoom_modifier: ZoomModifier,
    /// Background restored by a session reset.
    pub default_background: Option<ImageRef>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            zoom_step: ZOOM_STEP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            resize_step: RESIZE_STEP,
            min_token_size: MIN_TOKEN_SIZE,
            default_token_size: DEFAULT_TOKEN_SIZE,
            spawn: Point::new(SPAWN_X, SPAWN_Y),
            zoom_modifier: ZoomModifier::default(),
            default_background: None,
        }
    }
}

impl BoardConfig {
    /// Replace unusable values with defaults, logging each substitution.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            tracing::warn!(zoom_step = self.zoom_step, "zoom step must be finite and > 1, using default");
            self.zoom_step = defaults.zoom_step;
        }
        let limits = ZoomLimits::new(self.min_zoom, self.max_zoom);
        self.min_zoom = limits.min;
        self.max_zoom = limits.max;
        if self.resize_step <= 0 {
            tracing::warn!(resize_step = self.resize_step, "resize step must be positive, using default");
            self.resize_step = defaults.resize_step;
        }
        if self.min_token_size < MIN_TOKEN_SIZE {
            tracing::warn!(
                min_token_size = self.min_token_size,
                floor = MIN_TOKEN_SIZE,
                "minimum token size below the floor, raising it"
            );
            self.min_token_size = MIN_TOKEN_SIZE;
        }
        self.default_token_size = self.default_token_size.max(self.min_token_size);
        if !self.spawn.is_finite() {
            tracing::warn!("spawn point must be finite, using default");
            self.spawn = defaults.spawn;
        }
        self
    }

    #[must_use]
    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits::new(self.min_zoom, self.max_zoom)
    }
}
