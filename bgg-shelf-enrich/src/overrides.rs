//! Reserved catalog ids and hand-curated corrections to catalog data.
//!
//! The catalog occasionally tags items in ways that break the relationship
//! graph (an expansion filed as standalone, promo bundles filed as
//! expansions). Corrections live here so the resolver itself stays generic.

use std::collections::BTreeMap;

use bgg_shelf_core::{ItemId, Link, NamedRef, RawGameDetail};
use serde::Deserialize;

/// Synthetic base game that collects expansions and accessories whose base
/// game is not owned.
pub const CATCH_ALL_GAME_ID: ItemId = 81913;
pub const CATCH_ALL_GAME_NAME: &str = "ZZZ: Expansions without Game";

/// Family id of "Box of Promos" bundles. Members are treated as base games.
pub const PROMO_BOX_FAMILY_ID: ItemId = 39378;

/// Publisher id of "(Public Domain)".
pub const PUBLIC_DOMAIN_PUBLISHER_ID: ItemId = 171;

/// Family names starting with this group (before the first ':') are
/// catalog bookkeeping, not real families.
pub const ADMIN_FAMILY_GROUP: &str = "Admin";

/// An extra inbound expansion edge injected before link resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LinkOverride {
    pub expansion_id: ItemId,
    pub base_id: ItemId,
}

impl LinkOverride {
    pub const fn new(expansion_id: ItemId, base_id: ItemId) -> Self {
        Self {
            expansion_id,
            base_id,
        }
    }
}

/// Catalog links known to be missing.
pub const KNOWN_EXPANSION_LINKS: &[LinkOverride] = &[
    // Tuscany (original) also expands Viticulture Essential Edition
    LinkOverride::new(147101, 183394),
    // Poison expansion for Council of Verona
    LinkOverride::new(147827, 165469),
];

/// Whether an expansion is a promo bundle that should stand on its own.
pub fn is_promo_box(detail: &RawGameDetail) -> bool {
    detail.has_family(PROMO_BOX_FAMILY_ID)
}

pub fn is_admin_family(family: &NamedRef) -> bool {
    family
        .name
        .split(':')
        .next()
        .is_some_and(|group| group == ADMIN_FAMILY_GROUP)
}

/// Add each override's inbound edge to the matching expansion record.
///
/// Overrides naming an expansion that is not in the map are ignored.
/// Returns the number of edges added.
pub fn apply_link_overrides(
    expansions: &mut BTreeMap<ItemId, RawGameDetail>,
    overrides: &[LinkOverride],
) -> usize {
    let mut applied = 0;
    for ovr in overrides {
        let Some(expansion) = expansions.get_mut(&ovr.expansion_id) else {
            continue;
        };
        let already_linked = expansion
            .expansions
            .iter()
            .any(|link| link.inbound && link.id == ovr.base_id);
        if already_linked {
            continue;
        }
        log::debug!(
            "Linking expansion {} ({}) to base game {}",
            expansion.name,
            ovr.expansion_id,
            ovr.base_id
        );
        expansion.expansions.push(Link::inbound(ovr.base_id));
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgg_shelf_core::ItemKind;

    fn expansion(id: ItemId) -> RawGameDetail {
        RawGameDetail {
            id,
            kind: ItemKind::Expansion,
            name: format!("Expansion {id}"),
            ..Default::default()
        }
    }

    #[test]
    fn known_links_are_injected_once() {
        let mut map = BTreeMap::new();
        map.insert(147101, expansion(147101));

        assert_eq!(apply_link_overrides(&mut map, KNOWN_EXPANSION_LINKS), 1);
        assert_eq!(apply_link_overrides(&mut map, KNOWN_EXPANSION_LINKS), 0);
        assert_eq!(map[&147101].expansions, vec![Link::inbound(183394)]);
    }

    #[test]
    fn admin_group_matches_prefix_before_colon() {
        assert!(is_admin_family(&NamedRef::new(1, "Admin: Internal")));
        assert!(is_admin_family(&NamedRef::new(2, "Admin")));
        assert!(!is_admin_family(&NamedRef::new(3, "Administration: Games")));
        assert!(!is_admin_family(&NamedRef::new(4, "Theme: Admin")));
    }

    #[test]
    fn promo_box_is_detected_by_family() {
        let mut detail = expansion(5);
        assert!(!is_promo_box(&detail));
        detail
            .families
            .push(NamedRef::new(PROMO_BOX_FAMILY_ID, "Misc: Box of Promos"));
        assert!(is_promo_box(&detail));
    }
}
