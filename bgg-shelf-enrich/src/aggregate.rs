//! Builds the enriched entity for every owned edition of every top-level
//! game, nesting owned expansions and accessories.

use std::collections::BTreeSet;

use bgg_shelf_core::{
    ItemId, Link, LinkedTitle, NamedRef, PublisherRef, RawCollectionItem, RawGameDetail,
    ResolvedGameEntity,
};

use crate::derived;
use crate::links;
use crate::overrides::{CATCH_ALL_GAME_ID, PUBLIC_DOMAIN_PUBLISHER_ID, is_admin_family};
use crate::store::RecordStore;
use crate::titles::{alternate_titles, move_article_to_end, strip_owner_prefix};

/// Resolve links and build all top-level entities, in owned-collection
/// order. The catch-all game is emitted only when something rolled into it.
pub fn enrich(store: &RecordStore) -> Vec<ResolvedGameEntity> {
    let links = links::resolve(store);
    let builder = Builder { store };
    let mut games = Vec::new();

    for (&id, editions) in store.owned().iter() {
        if !links.is_top_level(id) {
            continue;
        }
        let Some(detail) = store.base_game(id).or_else(|| store.expansion(id)) else {
            log::debug!("Owned item {id} has no catalog details, skipping");
            continue;
        };
        let expansions = links.expansions_of(id);
        let accessories = links.accessories_of(id);
        if id == CATCH_ALL_GAME_ID && expansions.is_empty() && accessories.is_empty() {
            continue;
        }
        for edition in editions {
            games.push(builder.build(detail, edition, expansions, accessories));
        }
    }

    log::info!(
        "Built {} game entries from {} top-level ids",
        games.len(),
        links.top_level_ids().count()
    );
    games
}

struct Builder<'a> {
    store: &'a RecordStore,
}

impl Builder<'_> {
    /// One top-level entity with its children attached and renamed.
    fn build(
        &self,
        base: &RawGameDetail,
        edition: &RawCollectionItem,
        expansions: &[&RawGameDetail],
        accessories: &[&RawGameDetail],
    ) -> ResolvedGameEntity {
        let mut entity = self.join(base, edition);
        let owner_titles = &entity.alternate_names;

        let mut expansion_entities = self.children(expansions, owner_titles);
        let accessory_entities = self.children(accessories, owner_titles);

        if base.id != CATCH_ALL_GAME_ID {
            entity.players = derived::merged_player_counts(base, &expansion_entities);
        }

        expansion_entities.sort_by(|a, b| a.name.cmp(&b.name));
        entity.expansions = expansion_entities;
        entity.accessories = accessory_entities;
        entity.accessories.sort_by(|a, b| a.name.cmp(&b.name));
        entity
    }

    /// One child entity per owned edition of each distinct child, renamed
    /// against the owner's titles.
    fn children(
        &self,
        details: &[&RawGameDetail],
        owner_titles: &[String],
    ) -> Vec<ResolvedGameEntity> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for &detail in details {
            if !seen.insert(detail.id) {
                continue;
            }
            for edition in self.store.editions_of(detail).iter() {
                let mut child = self.join(detail, edition);
                child.name = strip_owner_prefix(&child.name, owner_titles);
                out.push(child);
            }
        }
        out
    }

    /// Catalog fields joined with one owned edition. No children.
    fn join(&self, detail: &RawGameDetail, edition: &RawCollectionItem) -> ResolvedGameEntity {
        let titles = alternate_titles(detail);
        let name = edition
            .version_name
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(detail.name.as_str());
        let image = edition
            .version_image
            .clone()
            .or_else(|| edition.image.clone())
            .or_else(|| detail.image.clone());
        let stats = &detail.stats;
        let weight_rating = derived::parse_decimal(stats.weight.as_deref());

        let contained = sorted_titles(
            detail
                .contained
                .iter()
                .filter(|link| link.inbound)
                .map(|link| linked_title(link, |name| strip_owner_prefix(name, &titles))),
        );
        let integrates = sorted_titles(
            detail
                .integrates
                .iter()
                .filter(|link| self.store.is_owned(link.id))
                .map(|link| linked_title(link, move_article_to_end)),
        );
        let (reimplemented_by, reimplements): (Vec<_>, Vec<_>) = detail
            .reimplements
            .iter()
            .map(|link| linked_title(link, move_article_to_end))
            .partition(|title| title.inbound);

        ResolvedGameEntity {
            id: detail.id,
            collection_id: edition.collection_id,
            name: move_article_to_end(name),
            description: derived::decode_description(&detail.description),
            image,
            categories: detail.categories.clone(),
            mechanics: detail.mechanics.clone(),
            families: families(&detail.families),
            designers: detail.designers.clone(),
            artists: detail.artists.clone(),
            publishers: publishers(&detail.publishers, edition.publisher_id),
            players: derived::merged_player_counts(detail, &[]),
            weight: derived::weight_bucket(weight_rating),
            weight_rating,
            playing_time: derived::playtime_bucket(derived::parse_playing_time(
                detail.playing_time.as_deref(),
            )),
            rank: derived::rank(stats.rank.as_deref()),
            users_rated: derived::count_stat(stats.users_rated.as_deref()),
            num_owned: derived::count_stat(stats.num_owned.as_deref()),
            average: derived::parse_decimal(stats.average.as_deref()),
            rating: derived::parse_decimal(stats.rating.as_deref()),
            suggested_age: derived::suggested_age(&detail.suggested_ages),
            year: detail.year,
            min_players: detail.min_players,
            max_players: detail.max_players,
            min_age: detail.min_age,
            num_plays: edition.num_plays,
            tags: edition.tags.clone(),
            comment: edition.comment.clone(),
            wishlist_comment: edition.wishlist_comment.clone(),
            last_modified: edition.last_modified.clone(),
            previous_players: self.store.previous_players(detail.id),
            expansions: Vec::new(),
            accessories: Vec::new(),
            contained,
            reimplements: sorted_titles(reimplements),
            reimplemented_by: sorted_titles(reimplemented_by),
            integrates,
            alternate_names: titles,
        }
    }
}

fn linked_title(link: &Link, rename: impl Fn(&str) -> String) -> LinkedTitle {
    LinkedTitle {
        id: link.id,
        name: rename(link.name.as_deref().unwrap_or_default()),
        inbound: link.inbound,
    }
}

fn sorted_titles(titles: impl IntoIterator<Item = LinkedTitle>) -> Vec<LinkedTitle> {
    let mut seen = BTreeSet::new();
    let mut titles: Vec<_> = titles.into_iter().filter(|t| seen.insert(t.id)).collect();
    titles.sort_by(|a, b| a.name.cmp(&b.name));
    titles
}

fn families(families: &[NamedRef]) -> Vec<NamedRef> {
    let mut seen = BTreeSet::new();
    let mut kept: Vec<_> = families
        .iter()
        .filter(|f| !is_admin_family(f) && seen.insert(f.id))
        .cloned()
        .collect();
    kept.sort_by(|a, b| a.name.cmp(&b.name));
    kept
}

/// A public-domain publisher replaces the whole list. Otherwise the owned
/// edition's publisher is flagged.
fn publishers(publishers: &[NamedRef], owned_publisher: Option<ItemId>) -> Vec<PublisherRef> {
    if let Some(public_domain) = publishers
        .iter()
        .find(|p| p.id == PUBLIC_DOMAIN_PUBLISHER_ID)
    {
        return vec![PublisherRef {
            id: public_domain.id,
            name: public_domain.name.clone(),
            owned: false,
        }];
    }
    publishers
        .iter()
        .map(|p| PublisherRef {
            id: p.id,
            name: p.name.clone(),
            owned: owned_publisher == Some(p.id),
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_domain_collapses_publishers() {
        let list = [
            NamedRef::new(5, "Big Games"),
            NamedRef::new(PUBLIC_DOMAIN_PUBLISHER_ID, "(Public Domain)"),
            NamedRef::new(6, "Small Games"),
        ];
        let out = publishers(&list, Some(5));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, PUBLIC_DOMAIN_PUBLISHER_ID);
        assert!(!out[0].owned);
    }

    #[test]
    fn owned_edition_publisher_is_flagged() {
        let list = [NamedRef::new(5, "Big Games"), NamedRef::new(6, "Small Games")];
        let out = publishers(&list, Some(6));
        assert!(!out[0].owned);
        assert!(out[1].owned);
    }

    #[test]
    fn admin_families_are_dropped_and_rest_sorted() {
        let list = [
            NamedRef::new(1, "Theme: Space"),
            NamedRef::new(2, "Admin: Internal"),
            NamedRef::new(3, "Components: Dice"),
        ];
        let names: Vec<_> = families(&list).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Components: Dice", "Theme: Space"]);
    }
}
