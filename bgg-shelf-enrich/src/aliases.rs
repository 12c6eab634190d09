//! Extra titles for games whose name differs between catalog entries.
//!
//! Expansion and accessory records frequently carry an older, regional, or
//! otherwise different spelling of their base game's name. Each entry maps
//! a canonical catalog name to the forms those child records use.

/// Canonical name → alias titles.
pub const TITLE_ALIASES: &[(&str, &[&str])] = &[
    ("Viticulture Essential Edition", &["Viticulture"]),
    ("Power Grid Deluxe: Europe/North America", &["Power Grid"]),
    ("Queendomino", &["Kingdomino"]),
    (
        "Rivals for Catan",
        &["The Rivals for Catan", "Die Fürsten von Catan", "Catan: Das Duell"],
    ),
    ("Rococo", &["Rokoko"]),
    ("Small World Underground", &["Small World"]),
    ("Unforgiven: The Lincoln Assassination Trial", &["Unforgiven"]),
    (
        "Attack on Titan: Deck-Building Game",
        &["Attack on Titan: The Deck-Building Game"],
    ),
    ("Cartographers", &["Cartographers: A Roll Player Tale"]),
    ("Hive Pocket", &["Hive"]),
    ("Catan", &["The Settlers of Catan", "Settlers of Catan"]),
    (
        "Legendary: A Marvel Deck Building Game",
        &["Legendary", "Marvel Legendary"],
    ),
];

/// Alias titles registered for `name`, empty when there are none.
pub fn aliases_for(name: &str) -> &'static [&'static str] {
    TITLE_ALIASES
        .iter()
        .find(|(canonical, _)| *canonical == name)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}
