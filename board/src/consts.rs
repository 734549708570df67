//! Shared numeric defaults for the board crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Multiplicative zoom change per wheel tick or hotkey press.
pub const ZOOM_STEP: f64 = 1.2;

/// Lowest zoom factor (10%).
pub const MIN_ZOOM: f64 = 0.1;

/// Highest zoom factor (800%).
pub const MAX_ZOOM: f64 = 8.0;

/// Zoom factor after a viewport reset (100%).
pub const DEFAULT_ZOOM: f64 = 1.0;

// ── Tokens ──────────────────────────────────────────────────────

/// Smallest token diameter in world units.
pub const MIN_TOKEN_SIZE: u32 = 20;

/// Diameter given to newly added tokens, in world units.
pub const DEFAULT_TOKEN_SIZE: u32 = 40;

/// World units added or removed per `w` / `s` press and per size button.
pub const RESIZE_STEP: i32 = 5;

/// World-space spawn point for new tokens.
pub const SPAWN_X: f64 = 100.0;
pub const SPAWN_Y: f64 = 100.0;

pub const DEFAULT_PLAYER_NAME: &str = "New Player";
pub const DEFAULT_PLAYER_HP: i64 = 10;

// ── Screen-space layout ─────────────────────────────────────────

/// Side of the square hit box for on-canvas `+` / `-` controls, in pixels.
pub const CONTROL_PX: f64 = 14.0;

/// Gap between the token square and its caption line.
pub const CAPTION_GAP_PX: f64 = 5.0;

/// Offset from the token's bottom edge to the hp control row.
pub const HP_ROW_OFFSET_PX: f64 = 25.0;

/// Horizontal spacing between status badges.
pub const STATUS_SPACING_PX: f64 = 18.0;

/// Inset of the first status badge from the token's top-left corner.
pub const STATUS_INSET_PX: f64 = 2.0;

/// Fill used for tokens whose image has not resolved.
pub const PLACEHOLDER_FILL: &str = "gray";
