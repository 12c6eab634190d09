use super::*;
use bgg_shelf_core::{
    GameStats, ItemKind, Link, PlayerCountPoll, RawCollectionItem, RawGameDetail,
};
use bgg_shelf_enrich::{FetchedRecords, enrich_collection};

fn owned(id: ItemId, collection_id: u64) -> RawCollectionItem {
    RawCollectionItem {
        id,
        collection_id,
        tags: vec![StatusTag::Own],
        ..Default::default()
    }
}

fn poll(players: &str, best: u32, recommended: u32, not_recommended: u32) -> PlayerCountPoll {
    PlayerCountPoll {
        players: players.into(),
        best,
        recommended,
        not_recommended,
    }
}

fn sample_games() -> Vec<ResolvedGameEntity> {
    let base = RawGameDetail {
        id: 1,
        kind: ItemKind::BoardGame,
        name: "Foo".into(),
        suggested_players: vec![
            poll("1", 0, 1, 50),
            poll("2", 5, 20, 0),
            poll("3", 40, 5, 0),
        ],
        stats: GameStats {
            weight: Some("2.3".into()),
            average: Some("7.5".into()),
            rank: Some("Not Ranked".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    let expansion = RawGameDetail {
        id: 2,
        kind: ItemKind::Expansion,
        name: "Foo: Big Box".into(),
        expansions: vec![Link::inbound(1)],
        suggested_players: vec![poll("4", 1, 10, 0)],
        ..Default::default()
    };

    let mut records = FetchedRecords {
        owned: vec![owned(1, 100), owned(1, 101), owned(2, 200)],
        details: vec![base, expansion],
        ..Default::default()
    };
    records.owned[2].comment = Some("shrink-wrapped".into());
    enrich_collection(records).unwrap()
}

#[test]
fn test_one_record_per_owned_edition() {
    let records = records(&sample_games());
    let ids: Vec<_> = records.iter().map(|r| r.object_id.as_str()).collect();
    assert_eq!(ids, vec!["100", "101"]);
    assert!(records.iter().all(|r| r.id == 1));
}

#[test]
fn test_player_facets() {
    let record = IndexRecord::from_entity(&sample_games()[0]);
    assert_eq!(
        record.players,
        vec![
            PlayerFacet {
                level1: "2".into(),
                level2: "2 > Recommended with 2".into(),
            },
            PlayerFacet {
                level1: "3".into(),
                level2: "3 > Best with 3".into(),
            },
            PlayerFacet {
                level1: "4".into(),
                level2: "4 > Expansion allows 4".into(),
            },
        ]
    );
}

#[test]
fn test_not_recommended_has_no_facet() {
    let count = PlayerCount::new("7", Recommendation::NotRecommended);
    assert_eq!(PlayerFacet::from_count(&count), None);
}

#[test]
fn test_children_are_listed_by_name() {
    let record = IndexRecord::from_entity(&sample_games()[0]);
    assert_eq!(
        record.expansions,
        vec![ChildRecord {
            id: 2,
            name: "Big Box".into(),
            comment: Some("shrink-wrapped".into()),
        }]
    );
    assert!(record.accessories.is_empty());
}

#[test]
fn test_json_field_names() {
    let record = IndexRecord::from_entity(&sample_games()[0]);
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["objectID"], "100");
    assert_eq!(json["weight"], "Light Medium");
    assert!((json["weightRating"].as_f64().unwrap() - 2.3).abs() < 1e-9);
    assert_eq!(json["average"], 7.5);
    assert_eq!(json["playing_time"], "Unknown");
    assert!(json["rank"].is_null());
    assert_eq!(json["suggested_age"], 0);
    assert_eq!(json["tags"][0], "own");
    assert!(json["reimplementedby"].is_array());
    assert_eq!(json["players"][0]["level1"], "2");
}
