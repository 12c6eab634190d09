//! Search records as the browsing frontend expects them.
//!
//! One record per owned edition, keyed by the collection-instance id so two
//! editions of the same game never overwrite each other.

use bgg_shelf_core::{
    ItemId, LinkedTitle, NamedRef, PlayerCount, PublisherRef, Recommendation, ResolvedGameEntity,
    StatusTag,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Two-level player-count facet: `level1` is the count, `level2` the count
/// plus its verdict (`"4 > Best with 4"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerFacet {
    pub level1: String,
    pub level2: String,
}

impl PlayerFacet {
    /// `None` for counts the community advises against.
    pub fn from_count(count: &PlayerCount) -> Option<Self> {
        let verdict = match count.recommendation {
            Recommendation::Best => "Best with",
            Recommendation::Recommended => "Recommended with",
            Recommendation::Expansion => "Expansion allows",
            Recommendation::NotRecommended => return None,
        };
        let players = &count.players;
        Some(Self {
            level1: players.clone(),
            level2: format!("{players} > {verdict} {players}"),
        })
    }
}

/// An owned expansion or accessory listed on its base game's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildRecord {
    pub id: ItemId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ChildRecord {
    fn from_entity(child: &ResolvedGameEntity) -> Self {
        Self {
            id: child.id,
            name: child.name.clone(),
            comment: child.comment.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub id: ItemId,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub description: String,
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub mechanics: Vec<String>,
    pub families: Vec<NamedRef>,
    pub designers: Vec<NamedRef>,
    pub artists: Vec<NamedRef>,
    pub publishers: Vec<PublisherRef>,
    pub players: Vec<PlayerFacet>,
    pub weight: String,
    #[serde(rename = "weightRating")]
    pub weight_rating: Decimal,
    pub playing_time: String,
    pub rank: Option<Decimal>,
    pub usersrated: Decimal,
    pub numowned: Decimal,
    pub average: Decimal,
    pub rating: Option<Decimal>,
    pub suggested_age: u32,
    pub year: Option<i32>,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub minage: Option<u32>,
    pub numplays: u32,
    pub tags: Vec<StatusTag>,
    pub comment: Option<String>,
    pub wishlist_comment: Option<String>,
    pub lastmodified: Option<String>,
    pub previous_players: Vec<String>,
    pub expansions: Vec<ChildRecord>,
    pub accessories: Vec<ChildRecord>,
    pub contained: Vec<LinkedTitle>,
    pub reimplements: Vec<LinkedTitle>,
    #[serde(rename = "reimplementedby")]
    pub reimplemented_by: Vec<LinkedTitle>,
    pub integrates: Vec<LinkedTitle>,
}

impl IndexRecord {
    /// Flatten an enriched entity. Numeric fields the frontend formats
    /// unconditionally (average, weight, suggested age) default to zero.
    pub fn from_entity(game: &ResolvedGameEntity) -> Self {
        Self {
            object_id: game.collection_id.to_string(),
            id: game.id,
            name: game.name.clone(),
            alternate_names: game.alternate_names.clone(),
            description: game.description.clone(),
            image: game.image.clone(),
            categories: game.categories.clone(),
            mechanics: game.mechanics.clone(),
            families: game.families.clone(),
            designers: game.designers.clone(),
            artists: game.artists.clone(),
            publishers: game.publishers.clone(),
            players: game.players.iter().filter_map(PlayerFacet::from_count).collect(),
            weight: game.weight.to_string(),
            weight_rating: game.weight_rating.unwrap_or_default(),
            playing_time: game.playing_time.to_string(),
            rank: game.rank,
            usersrated: game.users_rated,
            numowned: game.num_owned,
            average: game.average.unwrap_or_default(),
            rating: game.rating,
            suggested_age: game.suggested_age.unwrap_or_default(),
            year: game.year,
            min_players: game.min_players,
            max_players: game.max_players,
            minage: game.min_age,
            numplays: game.num_plays,
            tags: game.tags.clone(),
            comment: game.comment.clone(),
            wishlist_comment: game.wishlist_comment.clone(),
            lastmodified: game.last_modified.clone(),
            previous_players: game.previous_players.clone(),
            expansions: game.expansions.iter().map(ChildRecord::from_entity).collect(),
            accessories: game.accessories.iter().map(ChildRecord::from_entity).collect(),
            contained: game.contained.clone(),
            reimplements: game.reimplements.clone(),
            reimplemented_by: game.reimplemented_by.clone(),
            integrates: game.integrates.clone(),
        }
    }
}

/// Records for a whole run, in entity order.
pub fn records(games: &[ResolvedGameEntity]) -> Vec<IndexRecord> {
    games.iter().map(IndexRecord::from_entity).collect()
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
