#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn defaults_are_valid_unchanged() {
    let config = BoardConfig::default();
    assert_eq!(config.clone().validated(), config);
    assert_eq!(config.zoom_step, 1.2);
    assert_eq!(config.zoom_limits(), ZoomLimits { min: 0.1, max: 8.0 });
}

#[test]
fn degenerate_zoom_step_falls_back() {
    for step in [0.0, -1.2, 1.0, 0.5, f64::NAN, f64::INFINITY] {
        let config = BoardConfig { zoom_step: step, ..BoardConfig::default() }.validated();
        assert_eq!(config.zoom_step, ZOOM_STEP, "step {step}");
    }
}

#[test]
fn inverted_zoom_limits_fall_back() {
    let config = BoardConfig { min_zoom: 4.0, max_zoom: 2.0, ..BoardConfig::default() }.validated();
    assert_eq!((config.min_zoom, config.max_zoom), (MIN_ZOOM, MAX_ZOOM));
}

#[test]
fn custom_limits_survive() {
    let config = BoardConfig { min_zoom: 0.5, max_zoom: 3.0, ..BoardConfig::default() }.validated();
    assert_eq!(config.zoom_limits(), ZoomLimits { min: 0.5, max: 3.0 });
}

#[test]
fn non_positive_resize_step_falls_back() {
    let config = BoardConfig { resize_step: 0, ..BoardConfig::default() }.validated();
    assert_eq!(config.resize_step, RESIZE_STEP);
    let config = BoardConfig { resize_step: -5, ..BoardConfig::default() }.validated();
    assert_eq!(config.resize_step, RESIZE_STEP);
}

#[test]
fn default_size_raised_to_floor() {
    let config = BoardConfig { min_token_size: 30, default_token_size: 10, ..BoardConfig::default() }.validated();
    assert_eq!(config.default_token_size, 30);
}

#[test]
fn floor_below_twenty_is_raised() {
    for floor in [0, 5, 19] {
        let config = BoardConfig { min_token_size: floor, ..BoardConfig::default() }.validated();
        assert_eq!(config.min_token_size, MIN_TOKEN_SIZE, "floor {floor}");
    }
    let config = BoardConfig { min_token_size: 25, ..BoardConfig::default() }.validated();
    assert_eq!(config.min_token_size, 25);
}

#[test]
fn zoom_limits_must_include_one() {
    for (min, max) in [(2.0, 8.0), (0.1, 0.5)] {
        let config = BoardConfig { min_zoom: min, max_zoom: max, ..BoardConfig::default() }.validated();
        assert_eq!((config.min_zoom, config.max_zoom), (MIN_ZOOM, MAX_ZOOM), "{min}..{max}");
    }
}

#[test]
fn non_finite_spawn_falls_back() {
    let config = BoardConfig { spawn: Point::new(f64::NAN, 0.0), ..BoardConfig::default() }.validated();
    assert_eq!(config.spawn, Point::new(SPAWN_X, SPAWN_Y));
}
