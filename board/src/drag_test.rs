#![allow(clippy::float_cmp)]

use super::*;
use crate::tokens::TokenDraft;
use crate::viewport::ViewportState;

const EPSILON: f64 = 1e-9;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

fn setup() -> (DragController, TokenStore, TokenId) {
    let mut store = TokenStore::default();
    let id = store.add(TokenDraft::player(pt(100.0, 100.0), 40, None));
    (DragController::new(5), store, id)
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn starts_idle() {
    let (drag, _, _) = setup();
    assert_eq!(drag.phase(), DragPhase::Idle);
    assert_eq!(drag.held(), None);
}

#[test]
fn press_moves_to_held() {
    let (mut drag, _, id) = setup();
    assert!(drag.press(id, pt(110.0, 110.0)));
    assert_eq!(drag.phase(), DragPhase::Held { token: id, origin: pt(110.0, 110.0), last: pt(110.0, 110.0) });
    assert!(!drag.is_dragging());
}

#[test]
fn second_press_is_ignored() {
    let (mut drag, _, id) = setup();
    drag.press(id, pt(0.0, 0.0));
    assert!(!drag.press(id + 1, pt(5.0, 5.0)));
    assert_eq!(drag.held(), Some(id));
}

#[test]
fn move_while_held_starts_drag() {
    let (mut drag, _, id) = setup();
    drag.press(id, pt(110.0, 110.0));
    assert_eq!(drag.move_to(pt(120.0, 115.0)), Some(id));
    assert!(drag.is_dragging());
    assert_eq!(drag.preview_offset(), Some((id, pt(10.0, 5.0))));
}

#[test]
fn move_while_idle_does_nothing() {
    let (mut drag, _, _) = setup();
    assert_eq!(drag.move_to(pt(1.0, 1.0)), None);
    assert_eq!(drag.phase(), DragPhase::Idle);
}

#[test]
fn release_without_move_commits_nothing() {
    let (mut drag, mut store, id) = setup();
    let mapper = ViewportState::default().mapper();
    drag.press(id, pt(110.0, 110.0));
    assert_eq!(drag.release(pt(110.0, 110.0), &mapper, &mut store), None);
    assert_eq!(drag.phase(), DragPhase::Idle);
    assert_eq!(store.get(id).unwrap().position, pt(100.0, 100.0));
}

// =============================================================
// Commit
// =============================================================

#[test]
fn release_commits_world_delta_at_identity() {
    let (mut drag, mut store, id) = setup();
    let mapper = ViewportState::default().mapper();
    drag.press(id, pt(110.0, 110.0));
    drag.move_to(pt(150.0, 130.0));
    let commit = drag.release(pt(160.0, 140.0), &mapper, &mut store).unwrap();
    assert_eq!(commit.token, id);
    assert!(point_approx_eq(commit.position, pt(150.0, 130.0)));
    assert!(point_approx_eq(store.get(id).unwrap().position, pt(150.0, 130.0)));
}

#[test]
fn release_divides_screen_delta_by_zoom() {
    let (mut drag, mut store, id) = setup();
    let mut vp = ViewportState::default();
    vp.zoom_by(2.0, pt(37.0, 91.0));
    let mapper = vp.mapper();
    drag.press(id, pt(0.0, 0.0));
    drag.move_to(pt(10.0, 10.0));
    drag.release(pt(40.0, -20.0), &mapper, &mut store);
    assert!(point_approx_eq(store.get(id).unwrap().position, pt(120.0, 90.0)));
}

#[test]
fn release_uses_current_store_position() {
    let (mut drag, mut store, id) = setup();
    let mapper = ViewportState::default().mapper();
    drag.press(id, pt(0.0, 0.0));
    drag.move_to(pt(5.0, 5.0));
    // Another edit lands mid-drag.
    store.update_position(id, pt(0.0, 0.0));
    drag.release(pt(10.0, 0.0), &mapper, &mut store);
    assert!(point_approx_eq(store.get(id).unwrap().position, pt(10.0, 0.0)));
}

#[test]
fn release_after_removal_commits_nothing() {
    let (mut drag, mut store, id) = setup();
    let mapper = ViewportState::default().mapper();
    drag.press(id, pt(0.0, 0.0));
    drag.move_to(pt(5.0, 5.0));
    store.remove(id);
    assert_eq!(drag.release(pt(10.0, 10.0), &mapper, &mut store), None);
    assert_eq!(drag.phase(), DragPhase::Idle);
}

// =============================================================
// Resize, cancel, forget
// =============================================================

#[test]
fn resize_while_held() {
    let (mut drag, mut store, id) = setup();
    drag.press(id, pt(0.0, 0.0));
    assert_eq!(drag.resize(ResizeKey::Grow, &mut store), Some(45));
    assert_eq!(drag.resize(ResizeKey::Grow, &mut store), Some(50));
    assert_eq!(drag.resize(ResizeKey::Grow, &mut store), Some(55));
    assert_eq!(drag.resize(ResizeKey::Shrink, &mut store), Some(50));
    assert_eq!(drag.held(), Some(id));
}

#[test]
fn resize_while_dragging() {
    let (mut drag, mut store, id) = setup();
    drag.press(id, pt(0.0, 0.0));
    drag.move_to(pt(3.0, 3.0));
    assert_eq!(drag.resize(ResizeKey::Shrink, &mut store), Some(35));
    assert!(drag.is_dragging());
}

#[test]
fn resize_when_idle_is_noop() {
    let (drag, mut store, id) = setup();
    assert_eq!(drag.resize(ResizeKey::Grow, &mut store), None);
    assert_eq!(store.get(id).unwrap().size, 40);
}

#[test]
fn shrink_stops_at_floor() {
    let (mut drag, mut store, id) = setup();
    drag.press(id, pt(0.0, 0.0));
    for _ in 0..10 {
        drag.resize(ResizeKey::Shrink, &mut store);
    }
    assert_eq!(store.get(id).unwrap().size, 20);
}

#[test]
fn cancel_drops_hold_without_commit() {
    let (mut drag, mut store, id) = setup();
    drag.press(id, pt(0.0, 0.0));
    drag.move_to(pt(50.0, 50.0));
    assert_eq!(drag.cancel(), Some(id));
    assert_eq!(drag.phase(), DragPhase::Idle);
    let mapper = ViewportState::default().mapper();
    assert_eq!(drag.release(pt(50.0, 50.0), &mapper, &mut store), None);
    assert_eq!(store.get(id).unwrap().position, pt(100.0, 100.0));
}

#[test]
fn forget_only_matching_token() {
    let (mut drag, _, id) = setup();
    drag.press(id, pt(0.0, 0.0));
    drag.forget(id + 1);
    assert_eq!(drag.held(), Some(id));
    drag.forget(id);
    assert_eq!(drag.held(), None);
}
