use super::*;

// -- Collection --

const COLLECTION_XML: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<items totalitems="2" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse" pubdate="Sat, 01 Jun 2024 10:00:00 +0000">
    <item objecttype="thing" objectid="13" subtype="boardgame" collid="1001">
        <name sortindex="1">CATAN</name>
        <yearpublished>1995</yearpublished>
        <image>https://cf.geekdo-images.com/catan.jpg</image>
        <thumbnail>https://cf.geekdo-images.com/catan_t.jpg</thumbnail>
        <version>
            <item type="boardgameversion" id="5555">
                <thumbnail>https://cf.geekdo-images.com/catan_v.jpg</thumbnail>
                <link type="boardgameversion" id="13" value="CATAN" inbound="true"/>
                <name type="primary" sortindex="1" value="German first edition"/>
                <link type="boardgamepublisher" id="37" value="KOSMOS"/>
                <link type="language" id="2188" value="German"/>
                <yearpublished value="1995"/>
            </item>
        </version>
        <status own="1" prevowned="0" fortrade="0" want="0" wanttoplay="1" wanttobuy="0" wishlist="0" preordered="0" lastmodified="2023-04-01 12:34:56"/>
        <numplays>12</numplays>
        <comment>Missing one road &amp; a robber</comment>
    </item>
    <item objecttype="thing" objectid="13" subtype="boardgame" collid="1002">
        <name sortindex="1">CATAN</name>
        <status own="1" prevowned="0" fortrade="1" want="0" wanttoplay="0" wanttobuy="0" wishlist="0" preordered="0" lastmodified="2023-05-01 08:00:00"/>
        <numplays>0</numplays>
        <wishlistcomment>Second copy</wishlistcomment>
    </item>
</items>"#;

#[test]
fn test_parse_collection_editions() {
    let items = parse_collection(COLLECTION_XML).unwrap();
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first.id, 13);
    assert_eq!(first.collection_id, 1001);
    assert_eq!(first.name, "CATAN");
    assert_eq!(first.image.as_deref(), Some("https://cf.geekdo-images.com/catan_t.jpg"));
    assert_eq!(first.version_name.as_deref(), Some("German first edition"));
    assert_eq!(
        first.version_image.as_deref(),
        Some("https://cf.geekdo-images.com/catan_v.jpg")
    );
    assert_eq!(first.publisher_id, Some(37));
    assert_eq!(first.tags, vec![StatusTag::Own, StatusTag::WantToPlay]);
    assert_eq!(first.last_modified.as_deref(), Some("2023-04-01 12:34:56"));
    assert_eq!(first.num_plays, 12);
    assert_eq!(first.comment.as_deref(), Some("Missing one road & a robber"));

    let second = &items[1];
    assert_eq!(second.id, 13);
    assert_eq!(second.collection_id, 1002);
    assert_eq!(second.version_name, None);
    assert_eq!(second.publisher_id, None);
    assert_eq!(second.tags, vec![StatusTag::ForTrade, StatusTag::Own]);
    assert_eq!(second.wishlist_comment.as_deref(), Some("Second copy"));
}

#[test]
fn test_parse_empty_collection() {
    let items = parse_collection(r#"<items totalitems="0"></items>"#).unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_collection_item_without_id_is_rejected() {
    let xml = r#"<items><item collid="1"><name>Broken</name></item></items>"#;
    assert!(matches!(
        parse_collection(xml),
        Err(BggError::InvalidResponse(_))
    ));
}

#[test]
fn test_version_publisher_prefers_objectid() {
    let xml = r#"<items>
        <item objectid="13" collid="1">
            <name>CATAN</name>
            <version>
                <item type="boardgameversion" id="5555">
                    <link type="boardgamepublisher" id="900" objectid="37" value="KOSMOS"/>
                </item>
            </version>
        </item>
        <item objectid="14" collid="2">
            <name>Other</name>
            <version>
                <item type="boardgameversion" id="6666">
                    <link type="boardgamepublisher" id="42" value="Acme"/>
                </item>
            </version>
        </item>
    </items>"#;
    let items = parse_collection(xml).unwrap();
    assert_eq!(items[0].publisher_id, Some(37));
    assert_eq!(items[1].publisher_id, Some(42));
}

// -- Plays --

const PLAYS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<plays username="someone" userid="1" total="2" page="1">
    <play id="900" date="2024-01-05" quantity="1" length="60" incomplete="0" nowinstats="0" location="Home">
        <item name="CATAN" objecttype="thing" objectid="13">
            <subtypes><subtype value="boardgame"/></subtypes>
        </item>
        <players>
            <player username="" userid="0" name="Alice" startposition="" color="red" score="10" new="0" rating="0" win="1"/>
            <player username="" userid="0" startposition="" color="blue" score="7" new="0" rating="0" win="0"/>
            <player username="" userid="0" name="Alice" startposition="" color="white" score="3" new="0" rating="0" win="0"/>
        </players>
    </play>
    <play id="901" date="2024-01-06" quantity="1" length="0" incomplete="0" nowinstats="0" location="">
        <item name="Azul" objecttype="thing" objectid="230802"/>
    </play>
</plays>"#;

#[test]
fn test_parse_plays() {
    let plays = parse_plays(PLAYS_XML).unwrap();
    assert_eq!(plays.len(), 2);

    assert_eq!(plays[0].play_id, 900);
    assert_eq!(plays[0].game_id, 13);
    assert_eq!(plays[0].game_name, "CATAN");
    assert_eq!(plays[0].players, vec!["Alice", "Unknown"]);

    assert_eq!(plays[1].game_id, 230802);
    assert!(plays[1].players.is_empty());
}

#[test]
fn test_parse_empty_plays_page() {
    let plays = parse_plays(r#"<plays username="someone" total="2" page="3"/>"#).unwrap();
    assert!(plays.is_empty());
}

// -- Things --

const THING_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
    <item type="boardgame" id="13">
        <thumbnail>https://cf.geekdo-images.com/catan_t.jpg</thumbnail>
        <image>https://cf.geekdo-images.com/catan.jpg</image>
        <name type="primary" sortindex="1" value="CATAN"/>
        <name type="alternate" sortindex="1" value="Die Siedler von Catan"/>
        <name type="alternate" sortindex="5" value="The Settlers of Catan"/>
        <description>Trade &amp;amp; build.&amp;#10;&amp;#10;Settle the island.</description>
        <yearpublished value="1995"/>
        <minplayers value="3"/>
        <maxplayers value="4"/>
        <poll name="suggested_numplayers" title="User Suggested Number of Players" totalvotes="10">
            <results numplayers="2">
                <result value="Best" numvotes="1"/>
                <result value="Recommended" numvotes="5"/>
                <result value="Not Recommended" numvotes="40"/>
            </results>
            <results numplayers="4">
                <result value="Best" numvotes="300"/>
                <result value="Recommended" numvotes="80"/>
                <result value="Not Recommended" numvotes="2"/>
            </results>
            <results numplayers="4+">
                <result value="Best" numvotes="0"/>
                <result value="Recommended" numvotes="3"/>
                <result value="Not Recommended" numvotes="50"/>
            </results>
        </poll>
        <playingtime value="120"/>
        <minplaytime value="60"/>
        <maxplaytime value="120"/>
        <minage value="10"/>
        <poll name="suggested_playerage" title="User Suggested Player Age" totalvotes="5">
            <results>
                <result value="8" numvotes="2"/>
                <result value="10" numvotes="3"/>
                <result value="12" numvotes="0"/>
                <result value="21 and up" numvotes="1"/>
            </results>
        </poll>
        <poll name="language_dependence" title="Language Dependence" totalvotes="3">
            <results>
                <result level="1" value="No necessary in-game text" numvotes="3"/>
            </results>
        </poll>
        <link type="boardgamecategory" id="1021" value="Economic"/>
        <link type="boardgamemechanic" id="2072" value="Dice Rolling"/>
        <link type="boardgamefamily" id="3" value="Admin: Better Description Needed!"/>
        <link type="boardgameexpansion" id="325" value="CATAN: Seafarers"/>
        <link type="boardgameimplementation" id="278" value="Catan Card Game" inbound="true"/>
        <link type="boardgamecompilation" id="400" value="CATAN: Big Box"/>
        <link type="boardgameintegration" id="500" value="Starfarers"/>
        <link type="boardgamedesigner" id="11" value="Klaus Teuber"/>
        <link type="boardgameartist" id="12" value="Michael Menzel"/>
        <link type="boardgamepublisher" id="37" value="KOSMOS"/>
        <link type="boardgameaccessory" id="600" value="CATAN: Wood Box"/>
        <statistics page="1">
            <ratings>
                <usersrated value="120000"/>
                <average value="7.1"/>
                <bayesaverage value="6.9"/>
                <ranks>
                    <rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="500" bayesaverage="6.9"/>
                    <rank type="family" id="5497" name="strategygames" friendlyname="Strategy Game Rank" value="300" bayesaverage="6.8"/>
                </ranks>
                <stddev value="1.4"/>
                <median value="0"/>
                <owned value="200000"/>
                <trading value="2000"/>
                <wanting value="500"/>
                <wishing value="4000"/>
                <numcomments value="20000"/>
                <numweights value="8000"/>
                <averageweight value="2.3"/>
            </ratings>
        </statistics>
    </item>
    <item type="boardgameexpansion" id="325">
        <name type="primary" sortindex="1" value="CATAN: Seafarers"/>
        <description></description>
        <link type="boardgameexpansion" id="13" value="CATAN" inbound="true"/>
        <statistics page="1">
            <ratings>
                <usersrated value="0"/>
                <ranks>
                    <rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="Not Ranked" bayesaverage="Not Ranked"/>
                </ranks>
            </ratings>
        </statistics>
    </item>
    <item type="videogame" id="99">
        <name type="primary" sortindex="1" value="Not a board game"/>
    </item>
</items>"#;

#[test]
fn test_parse_thing_core_fields() {
    let things = parse_things(THING_XML).unwrap();
    assert_eq!(things.len(), 2);

    let catan = &things[0];
    assert_eq!(catan.id, 13);
    assert_eq!(catan.kind, ItemKind::BoardGame);
    assert_eq!(catan.name, "CATAN");
    assert_eq!(
        catan.alternate_names,
        vec!["Die Siedler von Catan", "The Settlers of Catan"]
    );
    assert_eq!(catan.image.as_deref(), Some("https://cf.geekdo-images.com/catan.jpg"));
    assert_eq!(
        catan.description,
        "Trade &amp; build.&#10;&#10;Settle the island."
    );
    assert_eq!(catan.year, Some(1995));
    assert_eq!(catan.min_players, Some(3));
    assert_eq!(catan.max_players, Some(4));
    assert_eq!(catan.min_age, Some(10));
    assert_eq!(catan.playing_time.as_deref(), Some("120"));
}

#[test]
fn test_parse_thing_polls() {
    let things = parse_things(THING_XML).unwrap();
    let catan = &things[0];

    assert_eq!(catan.suggested_players.len(), 3);
    assert_eq!(
        catan.suggested_players[1],
        PlayerCountPoll {
            players: "4".into(),
            best: 300,
            recommended: 80,
            not_recommended: 2,
        }
    );
    assert_eq!(catan.suggested_players[2].players, "4+");

    assert_eq!(
        catan.suggested_ages,
        vec![
            AgePoll { age: 8, votes: 2 },
            AgePoll { age: 10, votes: 3 },
            AgePoll { age: 21, votes: 1 },
        ]
    );
}

#[test]
fn test_parse_thing_links_and_stats() {
    let things = parse_things(THING_XML).unwrap();
    let catan = &things[0];

    assert_eq!(catan.categories, vec!["Economic"]);
    assert_eq!(catan.mechanics, vec!["Dice Rolling"]);
    assert_eq!(catan.families[0].name, "Admin: Better Description Needed!");
    assert_eq!(catan.expansions, vec![Link::named(325, "CATAN: Seafarers", false)]);
    assert_eq!(catan.reimplements, vec![Link::named(278, "Catan Card Game", true)]);
    assert_eq!(catan.contained[0].id, 400);
    assert_eq!(catan.integrates[0].id, 500);
    assert_eq!(catan.designers, vec![NamedRef::new(11, "Klaus Teuber")]);
    assert_eq!(catan.artists[0].id, 12);
    assert_eq!(catan.publishers, vec![NamedRef::new(37, "KOSMOS")]);
    assert_eq!(catan.accessories[0].id, 600);

    assert_eq!(catan.stats.rank.as_deref(), Some("500"));
    assert_eq!(catan.stats.users_rated.as_deref(), Some("120000"));
    assert_eq!(catan.stats.average.as_deref(), Some("7.1"));
    assert_eq!(catan.stats.rating.as_deref(), Some("6.9"));
    assert_eq!(catan.stats.num_owned.as_deref(), Some("200000"));
    assert_eq!(catan.stats.weight.as_deref(), Some("2.3"));
}

#[test]
fn test_parse_expansion_inbound_link() {
    let things = parse_things(THING_XML).unwrap();
    let seafarers = &things[1];

    assert_eq!(seafarers.kind, ItemKind::Expansion);
    assert_eq!(seafarers.expansions, vec![Link::named(13, "CATAN", true)]);
    assert_eq!(seafarers.stats.rank.as_deref(), Some("Not Ranked"));
    assert!(seafarers.description.is_empty());
    assert!(seafarers.suggested_players.is_empty());
}

// -- Error documents --

#[test]
fn test_error_document_is_reported() {
    let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<errors><error><message>Invalid username specified</message></error></errors>"#;
    match check_api_errors(xml) {
        Err(BggError::Api(message)) => assert_eq!(message, "Invalid username specified"),
        other => panic!("expected API error, got {other:?}"),
    }
}

#[test]
fn test_error_attribute_is_reported() {
    let xml = r#"<error message="Rate limit exceeded."/>"#;
    assert!(matches!(check_api_errors(xml), Err(BggError::Api(m)) if m == "Rate limit exceeded."));
}

#[test]
fn test_data_document_passes_error_check() {
    assert!(check_api_errors(THING_XML).is_ok());
    assert!(check_api_errors(r#"<items totalitems="0"></items>"#).is_ok());
}
