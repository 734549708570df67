//! Binary configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::str::FromStr;

use board::config::BoardConfig;
use board::image::ImageRef;
use board::input::ZoomModifier;
use board::viewport::Size;

use crate::error::AppError;
use crate::maps;

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 720.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub board: BoardConfig,
    /// Host viewport the replayed session starts with.
    pub viewport: Size,
    pub catalog: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig { default_background: ImageRef::new(maps::default_map().url), ..BoardConfig::default() },
            viewport: Size::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            catalog: None,
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `BATTLEMAP_ZOOM_STEP`: default 1.2
    /// - `BATTLEMAP_MIN_ZOOM` / `BATTLEMAP_MAX_ZOOM`: default 0.1 / 8.0
    /// - `BATTLEMAP_RESIZE_STEP`: default 5
    /// - `BATTLEMAP_ZOOM_MODIFIER`: `ctrl` (default), `meta` or `ctrl_or_meta`
    /// - `BATTLEMAP_VIEWPORT_WIDTH` / `BATTLEMAP_VIEWPORT_HEIGHT`: default 1280x720
    /// - `BATTLEMAP_CATALOG`: monster catalog path
    /// - `BATTLEMAP_BACKGROUND`: default background image URL; the first
    ///   built-in map when unset, none when blank
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let board_defaults = defaults.board;
        let default_background = match lookup("BATTLEMAP_BACKGROUND") {
            Some(raw) => ImageRef::new(&raw),
            None => board_defaults.default_background.clone(),
        };

        let board = BoardConfig {
            zoom_step: parse_or(&lookup, "BATTLEMAP_ZOOM_STEP", board_defaults.zoom_step),
            min_zoom: parse_or(&lookup, "BATTLEMAP_MIN_ZOOM", board_defaults.min_zoom),
            max_zoom: parse_or(&lookup, "BATTLEMAP_MAX_ZOOM", board_defaults.max_zoom),
            resize_step: parse_or(&lookup, "BATTLEMAP_RESIZE_STEP", board_defaults.resize_step),
            zoom_modifier: parse_zoom_modifier(lookup("BATTLEMAP_ZOOM_MODIFIER").as_deref())?,
            default_background,
            ..board_defaults
        };

        let viewport = Size::new(
            positive_or(&lookup, "BATTLEMAP_VIEWPORT_WIDTH", defaults.viewport.width),
            positive_or(&lookup, "BATTLEMAP_VIEWPORT_HEIGHT", defaults.viewport.height),
        );
        let catalog = lookup("BATTLEMAP_CATALOG")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(Self { board, viewport, catalog })
    }
}

pub fn parse_zoom_modifier(raw: Option<&str>) -> Result<ZoomModifier, AppError> {
    match raw.map(str::trim).unwrap_or("ctrl") {
        "" | "ctrl" => Ok(ZoomModifier::Ctrl),
        "meta" => Ok(ZoomModifier::Meta),
        "ctrl_or_meta" => Ok(ZoomModifier::CtrlOrMeta),
        other => Err(AppError::Config(format!(
            "unsupported BATTLEMAP_ZOOM_MODIFIER '{other}' (expected ctrl, meta or ctrl_or_meta)"
        ))),
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, default = ?default, "invalid value, using default");
            default
        }
    }
}

fn positive_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    let value = parse_or(lookup, key, default);
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(key, value, default, "value must be positive, using default");
        default
    }
}
