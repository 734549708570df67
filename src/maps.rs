//! Built-in battle maps offered by the map selector.

#[cfg(test)]
#[path = "maps_test.rs"]
mod maps_test;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapPreset {
    pub name: &'static str,
    pub url: &'static str,
}

/// Selector order. The first entry is the map a fresh session starts on.
pub const BUILTIN_MAPS: [MapPreset; 4] = [
    MapPreset {
        name: "Field and River",
        url: "https://i.postimg.cc/mgPLD86r/battlemap1-dungeondraft-map-UHD.png",
    },
    MapPreset { name: "Indoor Hazard Arena", url: "https://i.postimg.cc/vHq8bphj/battlemap2.png" },
    MapPreset { name: "Bridge Battle", url: "https://i.postimg.cc/bw4z2kK9/bridgebattlemap1-UHD.png" },
    MapPreset { name: "Classroom Brawl", url: "https://i.postimg.cc/m222xbYC/classbattle1-UHD.png" },
];

#[must_use]
pub fn default_map() -> &'static MapPreset {
    &BUILTIN_MAPS[0]
}

/// Case-insensitive lookup by display name.
#[must_use]
pub fn find(name: &str) -> Option<&'static MapPreset> {
    let name = name.trim();
    BUILTIN_MAPS.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

/// The built-in map whose image is `url`, if any.
#[must_use]
pub fn by_url(url: &str) -> Option<&'static MapPreset> {
    BUILTIN_MAPS.iter().find(|m| m.url == url)
}
