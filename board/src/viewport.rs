//! Zoom/pan viewport state and the world ↔ screen coordinate mapping.
//!
//! World space is where tokens and the background live; screen space is CSS
//! pixels as seen by the pointer and the renderer. The two are related by
//!
//! ```text
//! screen = world * zoom + pan + centering
//! ```
//!
//! where `centering` keeps a resolved background image centred in the
//! viewport at the current zoom and is zero while no background is resolved.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};

/// A point (or offset) in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Width and height, in whichever space the owner says.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Inclusive bounds on the zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: MIN_ZOOM, max: MAX_ZOOM }
    }
}

impl ZoomLimits {
    /// Build limits, falling back to the defaults when the pair is unusable:
    /// non-finite, non-positive, inverted, or excluding 100%.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= DEFAULT_ZOOM && DEFAULT_ZOOM <= max {
            Self { min, max }
        } else {
            tracing::warn!(min, max, "invalid zoom limits, using defaults");
            Self::default()
        }
    }

    #[must_use]
    pub fn clamp(self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

/// The screen area the map is drawn into, and the background's world size
/// once it has resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Stage {
    pub viewport: Size,
    pub background: Option<Size>,
}

impl Stage {
    /// Offset that centres the background in the viewport at `zoom`.
    #[must_use]
    pub fn centering_offset(&self, zoom: f64) -> Point {
        match self.background {
            Some(bg) => Point::new(
                (self.viewport.width - bg.width * zoom) / 2.0,
                (self.viewport.height - bg.height * zoom) / 2.0,
            ),
            None => Point::ZERO,
        }
    }
}

/// One frozen view of the transform. Conversions through the same mapper are
/// exact inverses of each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    zoom: f64,
    origin: Point,
}

impl CoordinateMapper {
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Screen position of the world origin (`pan + centering`).
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        world * self.zoom + self.origin
    }

    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        (screen - self.origin) / self.zoom
    }

    /// Scale a world-space length to screen pixels.
    #[must_use]
    pub fn world_len_to_screen(&self, len: f64) -> f64 {
        len * self.zoom
    }

    /// Convert a screen-space displacement to a world-space displacement.
    #[must_use]
    pub fn screen_delta_to_world(&self, delta: Point) -> Point {
        delta / self.zoom
    }
}

/// Zoom factor and pan offset for the session, plus the stage geometry the
/// centering offset is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    zoom: f64,
    pan: Point,
    #[serde(skip)]
    limits: ZoomLimits,
    #[serde(skip)]
    stage: Stage,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

impl ViewportState {
    #[must_use]
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Point::ZERO,
            limits,
            stage: Stage::default(),
        }
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn zoom_percent(&self) -> f64 {
        self.zoom * 100.0
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    #[must_use]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.stage.viewport = size;
    }

    /// Record the resolved background dimensions (or forget them).
    pub fn set_background_size(&mut self, size: Option<Size>) {
        self.stage.background = size;
    }

    /// Capture the current transform for a batch of conversions.
    #[must_use]
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper {
            zoom: self.zoom,
            origin: self.pan + self.stage.centering_offset(self.zoom),
        }
    }

    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.mapper().world_to_screen(world)
    }

    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.mapper().screen_to_world(screen)
    }

    /// Multiply the zoom by `factor` (clamped to the limits), keeping the
    /// world point under `focal` fixed on screen. Returns whether the view
    /// changed.
    ///
    /// A non-finite or non-positive factor is a caller bug; it is logged and
    /// the state is left untouched.
    pub fn zoom_by(&mut self, factor: f64, focal: Point) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !focal.is_finite() {
            tracing::error!(factor, x = focal.x, y = focal.y, "rejected degenerate zoom request");
            return false;
        }
        let next = self.limits.clamp(self.zoom * factor);
        if (next - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let anchor = self.screen_to_world(focal);
        self.zoom = next;
        self.pan = focal - anchor * next - self.stage.centering_offset(next);
        true
    }

    /// Back to 100% with no pan. Idempotent.
    pub fn reset(&mut self) {
        self.zoom = DEFAULT_ZOOM;
        self.pan = Point::ZERO;
    }

    /// Replace the zoom limits, clamping the current zoom into them.
    pub fn set_zoom_limits(&mut self, limits: ZoomLimits) {
        self.limits = limits;
        self.zoom = limits.clamp(self.zoom);
    }
}
