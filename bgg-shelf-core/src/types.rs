//! Data model types for the collection sync pipeline.
//!
//! Three raw input shapes (owned collection rows, play records, catalog
//! details) and the enriched output entity handed to the search index.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog item id. Shared by base games, expansions and accessories.
pub type ItemId = u64;

// ── Collection ──────────────────────────────────────────────────────────────

/// Ownership/status flags on a collection row. Only flags set to "1" by the
/// catalog are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTag {
    ForTrade,
    Own,
    Preordered,
    PrevOwned,
    Want,
    WantToBuy,
    WantToPlay,
    Wishlist,
}

impl StatusTag {
    /// Every tag, in the order the catalog lists the status attributes.
    pub const ALL: [StatusTag; 8] = [
        Self::ForTrade,
        Self::Own,
        Self::Preordered,
        Self::PrevOwned,
        Self::Want,
        Self::WantToBuy,
        Self::WantToPlay,
        Self::Wishlist,
    ];

    /// Attribute name on the `<status>` element.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForTrade => "fortrade",
            Self::Own => "own",
            Self::Preordered => "preordered",
            Self::PrevOwned => "prevowned",
            Self::Want => "want",
            Self::WantToBuy => "wanttobuy",
            Self::WantToPlay => "wanttoplay",
            Self::Wishlist => "wishlist",
        }
    }

    pub fn from_attribute(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

/// One owned edition of a catalog item, as returned by the collection call.
///
/// Several rows may share the same `id` when the user owns more than one
/// edition; each keeps its own `collection_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCollectionItem {
    pub id: ItemId,
    /// Per-edition collection-instance id.
    pub collection_id: u64,
    pub name: String,
    /// Thumbnail of the catalog item.
    pub image: Option<String>,
    pub version_name: Option<String>,
    pub version_image: Option<String>,
    /// Publisher of the owned edition, if the user selected a version.
    pub publisher_id: Option<ItemId>,
    pub comment: Option<String>,
    pub wishlist_comment: Option<String>,
    pub tags: Vec<StatusTag>,
    pub last_modified: Option<String>,
    pub num_plays: u32,
}

impl RawCollectionItem {
    /// Zero-value row for an id that is referenced but not in the owned fetch.
    pub fn placeholder(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            collection_id: id,
            name: name.into(),
            ..Default::default()
        }
    }
}

// ── Plays ───────────────────────────────────────────────────────────────────

/// Placeholder used when a logged play has a participant without a name.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// One logged play session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlayRecord {
    pub play_id: u64,
    pub game_id: ItemId,
    pub game_name: String,
    /// Distinct participant names in the order they were logged.
    pub players: Vec<String>,
}

// ── Catalog details ─────────────────────────────────────────────────────────

/// Catalog item type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    #[serde(rename = "boardgame")]
    BoardGame,
    #[serde(rename = "boardgameexpansion")]
    Expansion,
    #[serde(rename = "boardgameaccessory")]
    Accessory,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoardGame => "boardgame",
            Self::Expansion => "boardgameexpansion",
            Self::Accessory => "boardgameaccessory",
        }
    }

    pub fn from_type_attr(s: &str) -> Option<Self> {
        match s {
            "boardgame" => Some(Self::BoardGame),
            "boardgameexpansion" => Some(Self::Expansion),
            "boardgameaccessory" => Some(Self::Accessory),
            _ => None,
        }
    }
}

/// A family, designer, artist or publisher reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: ItemId,
    pub name: String,
}

impl NamedRef {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A directed relationship link to another catalog item.
///
/// `inbound` is true when the edge points toward the subject of the record
/// carrying it (an expansion's link to its base game, for example).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: ItemId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inbound: bool,
}

impl Link {
    pub fn inbound(id: ItemId) -> Self {
        Self {
            id,
            name: None,
            inbound: true,
        }
    }

    pub fn named(id: ItemId, name: impl Into<String>, inbound: bool) -> Self {
        Self {
            id,
            name: Some(name.into()),
            inbound,
        }
    }
}

/// Raw vote tallies for one entry of the suggested-player-count poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerCountPoll {
    /// Player count label as the catalog writes it ("3", "4+").
    pub players: String,
    pub best: u32,
    pub recommended: u32,
    pub not_recommended: u32,
}

/// Votes for one age bucket of the suggested-player-age poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgePoll {
    pub age: u32,
    pub votes: u32,
}

/// Statistic fields exactly as the catalog returns them (numeric strings).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStats {
    pub rank: Option<String>,
    pub rating: Option<String>,
    pub users_rated: Option<String>,
    pub num_owned: Option<String>,
    pub average: Option<String>,
    pub weight: Option<String>,
}

/// A full catalog record for a base game, expansion, or accessory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGameDetail {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    pub alternate_names: Vec<String>,
    /// HTML-entity encoded, as delivered.
    pub description: String,
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub mechanics: Vec<String>,
    pub families: Vec<NamedRef>,
    pub designers: Vec<NamedRef>,
    pub artists: Vec<NamedRef>,
    pub publishers: Vec<NamedRef>,
    pub expansions: Vec<Link>,
    pub contained: Vec<Link>,
    pub reimplements: Vec<Link>,
    pub integrates: Vec<Link>,
    pub accessories: Vec<Link>,
    pub suggested_players: Vec<PlayerCountPoll>,
    pub suggested_ages: Vec<AgePoll>,
    pub stats: GameStats,
    pub playing_time: Option<String>,
    pub year: Option<i32>,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub min_age: Option<u32>,
}

impl RawGameDetail {
    pub fn has_family(&self, family_id: ItemId) -> bool {
        self.families.iter().any(|f| f.id == family_id)
    }
}

// ── Derived values ──────────────────────────────────────────────────────────

/// Community verdict for one player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Best,
    Recommended,
    NotRecommended,
    /// Player count only reachable with an owned expansion.
    Expansion,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Recommended => "recommended",
            Self::NotRecommended => "not_recommended",
            Self::Expansion => "expansion",
        }
    }
}

/// One entry of the merged player-count list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCount {
    pub players: String,
    pub recommendation: Recommendation,
}

impl PlayerCount {
    pub fn new(players: impl Into<String>, recommendation: Recommendation) -> Self {
        Self {
            players: players.into(),
            recommendation,
        }
    }
}

/// Complexity bucket derived from the community weight average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightBucket {
    Unknown,
    Light,
    #[serde(rename = "Light Medium")]
    LightMedium,
    Medium,
    #[serde(rename = "Medium Heavy")]
    MediumHeavy,
    Heavy,
}

impl WeightBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Light => "Light",
            Self::LightMedium => "Light Medium",
            Self::Medium => "Medium",
            Self::MediumHeavy => "Medium Heavy",
            Self::Heavy => "Heavy",
        }
    }
}

impl std::fmt::Display for WeightBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playing-time bucket derived from the catalog playing time in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaytimeBucket {
    Unknown,
    #[serde(rename = "< 30min")]
    UnderHalfHour,
    #[serde(rename = "30min - 1h")]
    HalfHourToHour,
    #[serde(rename = "1-2h")]
    OneToTwoHours,
    #[serde(rename = "2-3h")]
    TwoToThreeHours,
    #[serde(rename = "3-4h")]
    ThreeToFourHours,
    #[serde(rename = "> 4h")]
    OverFourHours,
}

impl PlaytimeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::UnderHalfHour => "< 30min",
            Self::HalfHourToHour => "30min - 1h",
            Self::OneToTwoHours => "1-2h",
            Self::TwoToThreeHours => "2-3h",
            Self::ThreeToFourHours => "3-4h",
            Self::OverFourHours => "> 4h",
        }
    }
}

impl std::fmt::Display for PlaytimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Resolved output ─────────────────────────────────────────────────────────

/// A linked title (contained item, reimplementation, integration) after
/// name cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedTitle {
    pub id: ItemId,
    pub name: String,
    pub inbound: bool,
}

/// A publisher entry; `owned` marks the publisher of the owned edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherRef {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub owned: bool,
}

/// One owned edition of a base game, joined with catalog data and every
/// owned expansion and accessory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGameEntity {
    pub id: ItemId,
    pub collection_id: u64,
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
    pub players: Vec<PlayerCount>,
    pub weight: WeightBucket,
    /// Unrounded community weight, when known.
    pub weight_rating: Option<Decimal>,
    pub playing_time: PlaytimeBucket,
    pub rank: Option<Decimal>,
    pub users_rated: Decimal,
    pub num_owned: Decimal,
    pub average: Option<Decimal>,
    pub rating: Option<Decimal>,
    pub suggested_age: Option<u32>,
    pub year: Option<i32>,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub min_age: Option<u32>,
    pub num_plays: u32,
    pub tags: Vec<StatusTag>,
    pub comment: Option<String>,
    pub wishlist_comment: Option<String>,
    pub last_modified: Option<String>,
    pub previous_players: Vec<String>,
    pub expansions: Vec<ResolvedGameEntity>,
    pub accessories: Vec<ResolvedGameEntity>,
    pub contained: Vec<LinkedTitle>,
    pub reimplements: Vec<LinkedTitle>,
    pub reimplemented_by: Vec<LinkedTitle>,
    pub integrates: Vec<LinkedTitle>,
}
