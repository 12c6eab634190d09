//! Keyed views over the raw fetch results, built once per run.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use bgg_shelf_core::{
    ItemId, ItemKind, MultiMap, RawCollectionItem, RawGameDetail, RawPlayRecord,
};

use crate::error::EnrichError;
use crate::overrides::{
    self, CATCH_ALL_GAME_ID, CATCH_ALL_GAME_NAME, KNOWN_EXPANSION_LINKS, LinkOverride,
};

/// Everything fetched from the catalog API for one run.
#[derive(Debug, Clone, Default)]
pub struct FetchedRecords {
    pub owned: Vec<RawCollectionItem>,
    pub accessories: Vec<RawCollectionItem>,
    pub plays: Vec<RawPlayRecord>,
    pub details: Vec<RawGameDetail>,
}

/// Ids whose catalog details the run needs: owned items and owned
/// accessories, first-seen order, without duplicates. The catch-all id is
/// synthetic and never requested.
pub fn detail_ids(owned: &[RawCollectionItem], accessories: &[RawCollectionItem]) -> Vec<ItemId> {
    let mut seen = BTreeSet::new();
    owned
        .iter()
        .chain(accessories)
        .map(|item| item.id)
        .filter(|&id| id != CATCH_ALL_GAME_ID && seen.insert(id))
        .collect()
}

/// Immutable, keyed snapshot of one run's input.
#[derive(Debug)]
pub struct RecordStore {
    owned: MultiMap<ItemId, RawCollectionItem>,
    owned_accessories: MultiMap<ItemId, RawCollectionItem>,
    players: BTreeMap<ItemId, BTreeSet<String>>,
    base_games: BTreeMap<ItemId, RawGameDetail>,
    expansions: BTreeMap<ItemId, RawGameDetail>,
    accessories: BTreeMap<ItemId, RawGameDetail>,
}

impl RecordStore {
    /// Build the store, applying the built-in catalog link corrections.
    pub fn new(records: FetchedRecords) -> Result<Self, EnrichError> {
        Self::with_link_overrides(records, &[])
    }

    /// Build the store with additional link corrections on top of the
    /// built-in ones.
    ///
    /// Fails with [`EnrichError::EmptyCollection`] when no owned item was
    /// fetched.
    pub fn with_link_overrides(
        records: FetchedRecords,
        extra_links: &[LinkOverride],
    ) -> Result<Self, EnrichError> {
        if records.owned.is_empty() {
            return Err(EnrichError::EmptyCollection);
        }

        let mut owned: MultiMap<ItemId, RawCollectionItem> =
            records.owned.into_iter().map(|item| (item.id, item)).collect();
        if !owned.contains_key(&CATCH_ALL_GAME_ID) {
            owned.insert(
                CATCH_ALL_GAME_ID,
                RawCollectionItem::placeholder(CATCH_ALL_GAME_ID, CATCH_ALL_GAME_NAME),
            );
        }

        let owned_accessories: MultiMap<ItemId, RawCollectionItem> = records
            .accessories
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let mut players: BTreeMap<ItemId, BTreeSet<String>> = BTreeMap::new();
        for play in records.plays {
            players.entry(play.game_id).or_default().extend(play.players);
        }

        let mut base_games = BTreeMap::new();
        let mut expansions = BTreeMap::new();
        let mut accessories = BTreeMap::new();
        for detail in records.details {
            let target = match detail.kind {
                ItemKind::BoardGame => &mut base_games,
                ItemKind::Expansion => &mut expansions,
                ItemKind::Accessory => &mut accessories,
            };
            target.insert(detail.id, detail);
        }
        base_games.insert(CATCH_ALL_GAME_ID, catch_all_detail());

        let patched = overrides::apply_link_overrides(&mut expansions, KNOWN_EXPANSION_LINKS)
            + overrides::apply_link_overrides(&mut expansions, extra_links);

        log::debug!(
            "Record store: {} owned ids ({} editions), {} accessory ids, {} base games, {} expansions, {} accessories, {} patched links",
            owned.len(),
            owned.total_len(),
            owned_accessories.len(),
            base_games.len(),
            expansions.len(),
            accessories.len(),
            patched,
        );

        Ok(Self {
            owned,
            owned_accessories,
            players,
            base_games,
            expansions,
            accessories,
        })
    }

    /// Owned collection rows grouped by id, in fetch order.
    pub fn owned(&self) -> &MultiMap<ItemId, RawCollectionItem> {
        &self.owned
    }

    pub fn is_owned(&self, id: ItemId) -> bool {
        self.owned.contains_key(&id)
    }

    /// Owned editions of `detail`, or one zero-value row when none was fetched.
    pub fn editions_of(&self, detail: &RawGameDetail) -> Cow<'_, [RawCollectionItem]> {
        let source = match detail.kind {
            ItemKind::Accessory => &self.owned_accessories,
            ItemKind::BoardGame | ItemKind::Expansion => &self.owned,
        };
        let editions = source.get_all(&detail.id);
        if editions.is_empty() {
            Cow::Owned(vec![RawCollectionItem::placeholder(
                detail.id,
                detail.name.clone(),
            )])
        } else {
            Cow::Borrowed(editions)
        }
    }

    /// Distinct participant names across every logged play of `id`, sorted.
    pub fn previous_players(&self, id: ItemId) -> Vec<String> {
        self.players
            .get(&id)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn base_game(&self, id: ItemId) -> Option<&RawGameDetail> {
        self.base_games.get(&id)
    }

    pub fn expansion(&self, id: ItemId) -> Option<&RawGameDetail> {
        self.expansions.get(&id)
    }

    /// Catalog details of type base game (plus the catch-all), by id.
    pub fn base_games(&self) -> impl Iterator<Item = &RawGameDetail> {
        self.base_games.values()
    }

    pub fn expansions(&self) -> impl Iterator<Item = &RawGameDetail> {
        self.expansions.values()
    }

    pub fn accessories(&self) -> impl Iterator<Item = &RawGameDetail> {
        self.accessories.values()
    }
}

fn catch_all_detail() -> RawGameDetail {
    RawGameDetail {
        id: CATCH_ALL_GAME_ID,
        kind: ItemKind::BoardGame,
        name: CATCH_ALL_GAME_NAME.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(id: ItemId, collection_id: u64) -> RawCollectionItem {
        RawCollectionItem {
            id,
            collection_id,
            name: format!("Game {id}"),
            ..Default::default()
        }
    }

    fn detail(id: ItemId, kind: ItemKind) -> RawGameDetail {
        RawGameDetail {
            id,
            kind,
            name: format!("Game {id}"),
            ..Default::default()
        }
    }

    #[test]
    fn empty_collection_is_rejected() {
        let err = RecordStore::new(FetchedRecords::default()).unwrap_err();
        assert!(matches!(err, EnrichError::EmptyCollection));
    }

    #[test]
    fn editions_sharing_an_id_are_kept_apart() {
        let store = RecordStore::new(FetchedRecords {
            owned: vec![owned(1, 10), owned(1, 11)],
            details: vec![detail(1, ItemKind::BoardGame)],
            ..Default::default()
        })
        .unwrap();

        let editions = store.editions_of(store.base_game(1).unwrap());
        let ids: Vec<_> = editions.iter().map(|e| e.collection_id).collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn unowned_detail_gets_placeholder_edition() {
        let store = RecordStore::new(FetchedRecords {
            owned: vec![owned(1, 10)],
            details: vec![detail(1, ItemKind::BoardGame), detail(2, ItemKind::Expansion)],
            ..Default::default()
        })
        .unwrap();

        let editions = store.editions_of(store.expansion(2).unwrap());
        assert_eq!(editions.len(), 1);
        assert_eq!(editions[0].id, 2);
        assert!(editions[0].tags.is_empty());
        assert_eq!(editions[0].num_plays, 0);
    }

    #[test]
    fn accessory_editions_come_from_accessory_rows() {
        let store = RecordStore::new(FetchedRecords {
            owned: vec![owned(1, 10)],
            accessories: vec![owned(3, 30), owned(3, 31)],
            details: vec![detail(1, ItemKind::BoardGame), detail(3, ItemKind::Accessory)],
            ..Default::default()
        })
        .unwrap();

        let tray = store.accessories().next().unwrap();
        let ids: Vec<_> = store.editions_of(tray).iter().map(|e| e.collection_id).collect();
        assert_eq!(ids, vec![30, 31]);
        assert!(!store.is_owned(3));
    }

    #[test]
    fn details_are_split_by_kind_and_catch_all_is_present() {
        let store = RecordStore::new(FetchedRecords {
            owned: vec![owned(1, 10)],
            details: vec![
                detail(1, ItemKind::BoardGame),
                detail(2, ItemKind::Expansion),
                detail(3, ItemKind::Accessory),
            ],
            ..Default::default()
        })
        .unwrap();

        assert!(store.base_game(1).is_some());
        assert!(store.expansion(2).is_some());
        assert!(store.accessories().any(|d| d.id == 3));
        assert!(store.base_game(CATCH_ALL_GAME_ID).is_some());
        assert!(store.is_owned(CATCH_ALL_GAME_ID));
    }

    #[test]
    fn play_participants_are_merged_and_sorted() {
        let store = RecordStore::new(FetchedRecords {
            owned: vec![owned(1, 10)],
            plays: vec![
                RawPlayRecord {
                    play_id: 1,
                    game_id: 1,
                    game_name: "Game 1".into(),
                    players: vec!["Zoe".into(), "Adam".into()],
                },
                RawPlayRecord {
                    play_id: 2,
                    game_id: 1,
                    game_name: "Game 1".into(),
                    players: vec!["Adam".into(), "Mia".into()],
                },
            ],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(store.previous_players(1), vec!["Adam", "Mia", "Zoe"]);
        assert!(store.previous_players(99).is_empty());
    }

    #[test]
    fn detail_ids_skip_duplicates_and_catch_all() {
        let ids = detail_ids(
            &[owned(5, 1), owned(3, 2), owned(5, 3), owned(CATCH_ALL_GAME_ID, 4)],
            &[owned(8, 5), owned(3, 6)],
        );
        assert_eq!(ids, vec![5, 3, 8]);
    }
}
