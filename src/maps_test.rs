use super::*;

#[test]
fn field_and_river_is_the_default() {
    assert_eq!(default_map().name, "Field and River");
}

#[test]
fn find_ignores_case_and_padding() {
    assert_eq!(find(" bridge battle ").map(|m| m.name), Some("Bridge Battle"));
    assert!(find("Moon Base").is_none());
}

#[test]
fn by_url_round_trips_every_map() {
    for map in &BUILTIN_MAPS {
        assert_eq!(by_url(map.url), Some(map));
    }
    assert!(by_url("maps/cave.jpg").is_none());
}
