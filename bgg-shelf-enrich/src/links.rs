//! Relationship graph between base games, expansions and accessories.
//!
//! Resolution runs in two passes over the immutable [`RecordStore`]:
//!
//! 1. classify: decide the top-level set (base games plus promo boxes) and
//!    collect the direct inbound edges of every expansion and accessory;
//! 2. join: attach each expansion (with its own sub-expansions and
//!    accessories) to every top-level game it points at, rolling anything
//!    unclaimed into the catch-all game.

use std::collections::{BTreeMap, BTreeSet};

use bgg_shelf_core::{ItemId, RawGameDetail};

use crate::overrides::{CATCH_ALL_GAME_ID, is_promo_box};
use crate::store::RecordStore;

/// Output of link resolution, borrowing details from the store.
#[derive(Debug, Default)]
pub struct ResolvedLinks<'a> {
    top_level: BTreeSet<ItemId>,
    expansions: BTreeMap<ItemId, Vec<&'a RawGameDetail>>,
    accessories: BTreeMap<ItemId, Vec<&'a RawGameDetail>>,
}

impl<'a> ResolvedLinks<'a> {
    /// Whether `id` gets its own top-level entity (base game, promo box, or
    /// the catch-all).
    pub fn is_top_level(&self, id: ItemId) -> bool {
        self.top_level.contains(&id)
    }

    pub fn top_level_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.top_level.iter().copied()
    }

    /// Expansions attached to a top-level game, in attachment order. May
    /// contain the same expansion more than once.
    pub fn expansions_of(&self, id: ItemId) -> &[&'a RawGameDetail] {
        self.expansions.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Accessories attached to a top-level game, in attachment order.
    pub fn accessories_of(&self, id: ItemId) -> &[&'a RawGameDetail] {
        self.accessories.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ── Pass 1: classify ────────────────────────────────────────────────────────

/// Direct edges collected before any joining happens.
#[derive(Debug, Default)]
struct Classified<'a> {
    top_level: BTreeSet<ItemId>,
    /// Expansion id → expansions that expand it.
    sub_expansions: BTreeMap<ItemId, Vec<&'a RawGameDetail>>,
    /// Top-level id → accessories pointing straight at it.
    top_accessories: BTreeMap<ItemId, Vec<&'a RawGameDetail>>,
    /// Expansion id → accessories pointing at that expansion.
    expansion_accessories: BTreeMap<ItemId, Vec<&'a RawGameDetail>>,
    /// Accessories with no owned target.
    orphan_accessories: Vec<&'a RawGameDetail>,
}

fn classify(store: &RecordStore) -> Classified<'_> {
    let mut out = Classified::default();

    out.top_level.extend(store.base_games().map(|d| d.id));
    out.top_level.extend(
        store
            .expansions()
            .filter(|d| is_promo_box(d))
            .map(|d| d.id),
    );

    for expansion in store.expansions() {
        for link in expansion.expansions.iter().filter(|l| l.inbound) {
            if store.expansion(link.id).is_some() {
                out.sub_expansions.entry(link.id).or_default().push(expansion);
            }
        }
    }

    for accessory in store.accessories() {
        let mut claimed = false;
        for link in accessory.accessories.iter().filter(|l| l.inbound) {
            if out.top_level.contains(&link.id) {
                out.top_accessories.entry(link.id).or_default().push(accessory);
                claimed = true;
            } else if store.expansion(link.id).is_some() {
                out.expansion_accessories
                    .entry(link.id)
                    .or_default()
                    .push(accessory);
                claimed = true;
            } else {
                log::debug!(
                    "Accessory {} ({}) links to unknown item {}",
                    accessory.name,
                    accessory.id,
                    link.id
                );
            }
        }
        if !claimed {
            out.orphan_accessories.push(accessory);
        }
    }

    out
}

// ── Pass 2: join ────────────────────────────────────────────────────────────

/// Resolve every link in the store.
pub fn resolve(store: &RecordStore) -> ResolvedLinks<'_> {
    let classified = classify(store);
    let mut expansions: BTreeMap<ItemId, Vec<&RawGameDetail>> = BTreeMap::new();
    let mut accessories: BTreeMap<ItemId, Vec<&RawGameDetail>> = BTreeMap::new();

    for (&id, direct) in &classified.top_accessories {
        accessories.entry(id).or_default().extend(direct);
    }
    accessories
        .entry(CATCH_ALL_GAME_ID)
        .or_default()
        .extend(&classified.orphan_accessories);

    let mut rolled_up = 0usize;
    for expansion in store.expansions() {
        let promo = is_promo_box(expansion);
        let mut targets = Vec::new();
        let mut has_owner = false;
        for link in expansion.expansions.iter().filter(|l| l.inbound) {
            if classified.top_level.contains(&link.id) {
                has_owner = true;
                targets.push(link.id);
            } else if store.expansion(link.id).is_some() {
                has_owner = true;
            }
        }

        // Promo boxes stand on their own and are never nested.
        if promo {
            continue;
        }
        if !has_owner {
            targets.push(CATCH_ALL_GAME_ID);
            rolled_up += 1;
        }

        let subs = classified
            .sub_expansions
            .get(&expansion.id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for target in targets {
            let list = expansions.entry(target).or_default();
            list.push(expansion);
            list.extend(subs);

            let acc = accessories.entry(target).or_default();
            for item in std::iter::once(expansion).chain(subs.iter().copied()) {
                if let Some(found) = classified.expansion_accessories.get(&item.id) {
                    acc.extend(found);
                }
            }
        }
    }

    let mut top_level = classified.top_level;
    top_level.insert(CATCH_ALL_GAME_ID);

    let orphans = classified.orphan_accessories.len();
    if rolled_up + orphans > 0 {
        log::warn!(
            "{rolled_up} expansions and {orphans} accessories have no owned base game, filing them under the catch-all"
        );
    }
    log::debug!("Resolved links: {} top-level ids", top_level.len());

    ResolvedLinks {
        top_level,
        expansions,
        accessories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::PROMO_BOX_FAMILY_ID;
    use crate::store::FetchedRecords;
    use bgg_shelf_core::{ItemKind, Link, NamedRef, RawCollectionItem};

    fn detail(id: ItemId, kind: ItemKind) -> RawGameDetail {
        RawGameDetail {
            id,
            kind,
            name: format!("Item {id}"),
            ..Default::default()
        }
    }

    fn expansion_of(id: ItemId, bases: &[ItemId]) -> RawGameDetail {
        let mut d = detail(id, ItemKind::Expansion);
        d.expansions = bases.iter().map(|&b| Link::inbound(b)).collect();
        d
    }

    fn accessory_of(id: ItemId, owners: &[ItemId]) -> RawGameDetail {
        let mut d = detail(id, ItemKind::Accessory);
        d.accessories = owners.iter().map(|&b| Link::inbound(b)).collect();
        d
    }

    fn store(details: Vec<RawGameDetail>) -> RecordStore {
        let owned = details
            .iter()
            .map(|d| RawCollectionItem::placeholder(d.id, d.name.clone()))
            .collect();
        RecordStore::new(FetchedRecords {
            owned,
            details,
            ..Default::default()
        })
        .unwrap()
    }

    fn ids(list: &[&RawGameDetail]) -> Vec<ItemId> {
        list.iter().map(|d| d.id).collect()
    }

    #[test]
    fn sub_expansions_are_flattened_into_the_base_game() {
        let store = store(vec![
            detail(1, ItemKind::BoardGame),
            expansion_of(2, &[1]),
            expansion_of(3, &[2]),
        ]);
        let links = resolve(&store);

        assert_eq!(ids(links.expansions_of(1)), vec![2, 3]);
        assert!(links.expansions_of(CATCH_ALL_GAME_ID).is_empty());
    }

    #[test]
    fn accessories_of_expansions_move_up_to_the_base_game() {
        let store = store(vec![
            detail(1, ItemKind::BoardGame),
            expansion_of(2, &[1]),
            accessory_of(10, &[2]),
            accessory_of(11, &[1]),
        ]);
        let links = resolve(&store);

        assert_eq!(ids(links.accessories_of(1)), vec![11, 10]);
    }

    #[test]
    fn unclaimed_items_roll_into_catch_all() {
        let store = store(vec![
            detail(1, ItemKind::BoardGame),
            expansion_of(2, &[500]),
            accessory_of(10, &[600]),
        ]);
        let links = resolve(&store);

        assert_eq!(ids(links.expansions_of(CATCH_ALL_GAME_ID)), vec![2]);
        assert_eq!(ids(links.accessories_of(CATCH_ALL_GAME_ID)), vec![10]);
    }

    #[test]
    fn promo_boxes_are_top_level_and_never_nested() {
        let mut promo = expansion_of(7, &[1]);
        promo
            .families
            .push(NamedRef::new(PROMO_BOX_FAMILY_ID, "Misc: Box of Promos"));
        let store = store(vec![detail(1, ItemKind::BoardGame), promo, expansion_of(8, &[7])]);
        let links = resolve(&store);

        assert!(links.is_top_level(7));
        assert!(links.expansions_of(1).is_empty());
        assert_eq!(ids(links.expansions_of(7)), vec![8]);
    }

    #[test]
    fn expansion_for_two_owned_bases_appears_under_both() {
        let store = store(vec![
            detail(1, ItemKind::BoardGame),
            detail(4, ItemKind::BoardGame),
            expansion_of(2, &[1, 4]),
        ]);
        let links = resolve(&store);

        assert_eq!(ids(links.expansions_of(1)), vec![2]);
        assert_eq!(ids(links.expansions_of(4)), vec![2]);
    }
}
