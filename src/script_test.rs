#![allow(clippy::float_cmp)]

use board::detail::DetailView;
use board::drag::DragPhase;
use board::tokens::DisplayFields;

use super::*;

const BESTIARY: &str = r#"[
    {"name": "Goblin", "imageUrl": "goblin.png", "xp": 50, "statBlock": {"ac": 15}},
    {"name": "Owlbear", "flavor": {"imageUrl": "owlbear.png"}, "xp": 700}
]"#;

fn session() -> Session {
    let catalog = MonsterCatalog::from_json(BESTIARY).unwrap();
    let config = AppConfig { viewport: board::viewport::Size::new(800.0, 600.0), ..AppConfig::default() };
    Session::new(&config, Some(catalog), Some(42))
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    assert_eq!(Step::parse(1, "   ").unwrap(), None);
    assert_eq!(Step::parse(2, "# setup").unwrap(), None);
}

#[test]
fn parses_inputs_and_commands() {
    let step = Step::parse(1, r#"{"input":"key_down","key":"w"}"#).unwrap().unwrap();
    assert!(matches!(step, Step::Input(InputEvent::KeyDown { .. })));
    let step = Step::parse(2, r#"{"op":"update_status","id":1,"condition":"poison","active":true}"#).unwrap().unwrap();
    assert_eq!(step, Step::Command(Command::UpdateStatus { id: 1, condition: Condition::Poison, active: true }));
    let step = Step::parse(3, r#"{"op":"zoom_in"}"#).unwrap().unwrap();
    assert_eq!(step, Step::Command(Command::ZoomIn));
}

#[test]
fn bad_lines_report_their_number() {
    assert!(matches!(Step::parse(4, "{not json"), Err(AppError::Script { line: 4, .. })));
    assert!(matches!(Step::parse(5, r#"{"op":"teleport"}"#), Err(AppError::Script { line: 5, .. })));
    assert!(matches!(Step::parse(6, r#"{"id":1}"#), Err(AppError::Step { line: 6, .. })));
}

#[test]
fn wheel_zoom_scenario() {
    let mut s = session();
    s.run(
        r#"{"op":"add_player"}
{"input":"wheel","at":{"x":400,"y":300},"delta":{"dy":-1},"modifiers":{"ctrl":true}}"#,
    )
    .unwrap();
    let report = s.report(false);
    assert!((report.zoom_percent - 120.0).abs() < 1e-9);
    assert!((report.pan.x + 80.0).abs() < 1e-9);
    assert!((report.pan.y + 60.0).abs() < 1e-9);
    assert_eq!(report.prevented_defaults, 1);
    assert_eq!(report.steps, 2);
}

#[test]
fn drag_and_resize_scenario() {
    let mut s = session();
    s.run(
        r#"{"op":"add_player"}
{"input":"pointer_down","at":{"x":110,"y":110}}
{"input":"key_down","key":"w"}
{"input":"key_down","key":"W"}
{"input":"key_down","key":"w"}
{"input":"key_down","key":"s"}
{"input":"pointer_move","at":{"x":160,"y":130}}
{"input":"pointer_up","at":{"x":160,"y":130}}"#,
    )
    .unwrap();
    let report = s.report(false);
    assert_eq!(report.drag, DragPhase::Idle);
    let token = &report.tokens[0];
    assert_eq!(token.size, 50);
    assert_eq!(token.position, Point::new(150.0, 120.0));
}

#[test]
fn creatures_come_from_the_catalog() {
    let mut s = session();
    s.run(
        r#"{"op":"add_creature","name":"goblin"}
{"op":"add_creature","name":"Goblin"}
{"op":"open_detail","id":2}
{"op":"trust"}"#,
    )
    .unwrap();
    let report = s.report(false);
    assert_eq!(report.tokens.len(), 2);
    assert!(matches!(&report.tokens[1].fields, DisplayFields::Creature { type_count: 2, .. }));
    assert!(matches!(report.detail, DetailView::CreatureReveal { token: 2, trusted: true, .. }));
    // The default map and one shared goblin portrait.
    assert_eq!(report.pending_images.len(), 2);
}

#[test]
fn unknown_creature_is_a_step_error() {
    let mut s = session();
    let err = s.run(r#"{"op":"add_creature","name":"dragon"}"#).unwrap_err();
    assert!(matches!(err, AppError::Step { line: 1, message } if message.contains("dragon")));

    let mut bare = Session::new(&AppConfig::default(), None, Some(1));
    assert!(matches!(bare.run(r#"{"op":"add_creature","name":"Goblin"}"#), Err(AppError::Step { .. })));
}

#[test]
fn editor_commands_reach_the_store() {
    let mut s = session();
    s.run(
        r#"{"op":"add_player"}
{"op":"update_field","id":1,"field":"name","value":"Mira"}
{"op":"update_field","id":1,"field":"maxHp","value":"30"}
{"op":"update_field","id":1,"field":"hp","value":"12.9"}
{"op":"adjust_hp","id":1,"delta":-20}
{"op":"update_position","id":1,"x":5,"y":6}
{"op":"update_size","id":1,"delta":-100}"#,
    )
    .unwrap();
    let token = &s.report(false).tokens[0];
    assert_eq!(token.caption(), "Mira (0/30)");
    assert_eq!(token.position, Point::new(5.0, 6.0));
    assert_eq!(token.size, 20);
}

#[test]
fn images_resolve_and_leave_pending() {
    let mut s = session();
    s.run(
        r#"{"op":"add_player","image":"hero.png"}
{"op":"set_background","image":"cave.jpg"}"#,
    )
    .unwrap();
    assert_eq!(s.report(false).pending_images.len(), 3);
    s.run(r#"{"op":"image_loaded","image":"cave.jpg","width":400,"height":300}"#).unwrap();
    let report = s.report(true);
    assert_eq!(report.pending_images.len(), 2);
    assert_eq!(report.map, None);
    assert!(report.scene.is_some_and(|scene| scene.background.is_some()));
}

#[test]
fn dice_commands() {
    let mut s = session();
    s.run(
        r#"{"op":"adjust_multiplier","sides":6,"delta":2}
{"op":"roll","sides":6}
{"op":"roll","sides":20,"count":1}"#,
    )
    .unwrap();
    let history = s.dice.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].count, 3);
    assert_eq!(history[1].count, 1);
    let report = s.report(false);
    assert!(report.dice[0].starts_with("Rolled 3d6: ["));
    assert_eq!(report.multipliers[&6], 3);
    assert_eq!(report.multipliers[&20], 1);

    s.run(r#"{"op":"clear_history"}"#).unwrap();
    assert!(s.dice.history().is_empty());
}

#[test]
fn reset_clears_the_session() {
    let mut s = session();
    s.run(
        r#"{"op":"add_player"}
{"op":"add_creature","name":"Owlbear"}
{"op":"zoom_in"}
{"op":"reset"}
{"op":"add_player"}"#,
    )
    .unwrap();
    let report = s.report(false);
    assert_eq!(report.zoom_percent, 100.0);
    assert_eq!(report.tokens.len(), 1);
    assert_eq!(report.tokens[0].id, 1);
}

#[test]
fn report_serializes() {
    let mut s = session();
    s.run(r#"{"op":"add_player"}"#).unwrap();
    let value = serde_json::to_value(s.report(false)).unwrap();
    assert_eq!(value["zoomPercent"], 100.0);
    assert_eq!(value["tokens"][0]["kind"], "player");
    assert!(value.get("scene").is_none());
}

#[test]
fn bundled_skirmish_replays() {
    let catalog = MonsterCatalog::from_json(include_str!("../data/bestiary.json")).unwrap();
    let mut s = Session::new(&AppConfig::default(), Some(catalog), Some(3));
    s.run(include_str!("../data/skirmish.jsonl")).unwrap();
    let report = s.report(true);

    assert!((report.zoom_percent - 120.0).abs() < 1e-9);
    assert_eq!(report.tokens.len(), 3);
    let mira = &report.tokens[0];
    assert_eq!(mira.caption(), "Mira (19/24)");
    assert_eq!(mira.size, 45);
    assert_eq!(mira.position, Point::new(192.0, 142.0));
    assert_eq!(report.dice.len(), 1);
    assert!(matches!(report.detail, DetailView::CreatureReveal { token: 2, trusted: true, .. }));
    assert!(matches!(report.detail_model, Some(DetailModel::CreatureFull { sim_points: Some(50), .. })));
    assert_eq!(report.map, Some("Indoor Hazard Arena"));
    assert_eq!(report.sim_points, 350);
    // Field and River was replaced before it loaded; Mira and the goblins are still loading.
    assert_eq!(report.pending_images.len(), 3);
    assert!(report.scene.is_some_and(|scene| scene.background.is_some() && scene.tokens.len() == 3));
}

#[test]
fn sessions_start_on_the_first_map() {
    let report = session().report(false);
    assert_eq!(report.map, Some("Field and River"));
}

#[test]
fn select_map_switches_background_and_reset_restores_default() {
    let mut s = session();
    s.run(r#"{"op":"select_map","name":"bridge battle"}"#).unwrap();
    assert_eq!(s.report(false).map, Some("Bridge Battle"));

    s.run(r#"{"op":"reset"}"#).unwrap();
    assert_eq!(s.report(false).map, Some("Field and River"));

    let err = s.run(r#"{"op":"select_map","name":"Moon Base"}"#).unwrap_err();
    assert!(matches!(err, AppError::Step { line: 1, message } if message.contains("Moon Base")));
}

#[test]
fn sim_points_tally() {
    let mut s = session();
    s.run(
        r#"{"op":"set_sim_points","value":1000}
{"op":"divide_sim_points","divisor":3}
{"op":"divide_sim_points","divisor":6}
{"op":"reset"}"#,
    )
    .unwrap();
    // The tally is not part of the board, so a session reset keeps it.
    assert_eq!(s.report(false).sim_points, 55);

    let err = s.run(r#"{"op":"divide_sim_points","divisor":0}"#).unwrap_err();
    assert!(matches!(err, AppError::Step { line: 1, .. }));
    assert_eq!(s.report(false).sim_points, 55);
}

#[test]
fn oversized_roll_is_a_step_error() {
    let mut s = session();
    let err = s.run(r#"{"op":"roll","sides":6,"count":4000000000}"#).unwrap_err();
    assert!(matches!(err, AppError::Step { line: 1, message } if message.contains("at most")));
    assert!(s.dice.history().is_empty());
}
