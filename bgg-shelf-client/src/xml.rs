//! Parsers for the catalog API's XML responses.
//!
//! Each document type gets a small event handler driven by a shared
//! quick-xml read loop. Unknown elements and attributes are ignored.

use std::borrow::Cow;
use std::str::FromStr;

use bgg_shelf_core::{
    AgePoll, ItemId, ItemKind, Link, NamedRef, PlayerCountPoll, RawCollectionItem, RawGameDetail,
    RawPlayRecord, StatusTag, UNKNOWN_PLAYER,
};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

use crate::error::BggError;

/// Friendly name of the overall board game rank in the statistics block.
const BOARD_GAME_RANK: &str = "Board Game Rank";

// ── Shared read loop ────────────────────────────────────────────────────────

trait Handler {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), BggError>;
    fn text(&mut self, text: String);
    fn close(&mut self, name: &[u8]);
}

fn drive(xml: &str, handler: &mut impl Handler) -> Result<(), BggError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) => handler.open(&e)?,
            Event::Empty(e) => {
                handler.open(&e)?;
                handler.close(e.name().as_ref());
            }
            Event::Text(t) => handler.text(text_of(&t)),
            Event::CData(c) => handler.text(String::from_utf8_lossy(&c).into_owned()),
            Event::End(e) => handler.close(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

fn text_of(t: &BytesText<'_>) -> String {
    t.unescape()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| String::from_utf8_lossy(t).into_owned())
}

fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, BggError> {
    match e.try_get_attribute(name)? {
        Some(a) => Ok(Some(a.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn attr_parse<T: FromStr>(e: &BytesStart<'_>, name: &str) -> Result<Option<T>, BggError> {
    Ok(attr(e, name)?.and_then(|v| v.trim().parse().ok()))
}

fn required_id(e: &BytesStart<'_>, name: &str) -> Result<ItemId, BggError> {
    attr_parse(e, name)?.ok_or_else(|| {
        BggError::invalid_response(format!(
            "<{}> without a numeric {name} attribute",
            String::from_utf8_lossy(e.name().as_ref())
        ))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Error documents ─────────────────────────────────────────────────────────

/// Fail with [`BggError::Api`] when the body is an `<errors>`/`<error>`
/// document instead of data.
pub fn check_api_errors(xml: &str) -> Result<(), BggError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root_seen = false;
    let mut messages = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if !root_seen {
                    root_seen = true;
                    if !matches!(e.name().as_ref(), b"errors" | b"error") {
                        return Ok(());
                    }
                }
                if let Some(message) = non_empty(attr(&e, "message")?) {
                    messages.push(message);
                }
            }
            Event::Text(t) if root_seen => messages.push(text_of(&t)),
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Ok(());
    }
    if messages.is_empty() {
        messages.push("unspecified error".to_string());
    }
    Err(BggError::api(messages.join("; ")))
}

// ── Collection ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum CollectionField {
    Name,
    Thumbnail,
    VersionName,
    VersionThumbnail,
    Comment,
    WishlistComment,
    NumPlays,
}

#[derive(Default)]
struct CollectionHandler {
    items: Vec<RawCollectionItem>,
    current: Option<RawCollectionItem>,
    in_version: bool,
    in_version_item: bool,
    field: Option<CollectionField>,
}

impl Handler for CollectionHandler {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), BggError> {
        let name = e.name();
        if name.as_ref() == b"item" && !self.in_version {
            self.current = Some(RawCollectionItem {
                id: required_id(e, "objectid")?,
                collection_id: attr_parse(e, "collid")?.unwrap_or_default(),
                ..Default::default()
            });
            return Ok(());
        }
        let Some(item) = self.current.as_mut() else {
            return Ok(());
        };

        self.field = match (name.as_ref(), self.in_version_item) {
            (b"version", _) => {
                self.in_version = true;
                None
            }
            (b"item", _) => {
                self.in_version_item = true;
                None
            }
            (b"name", true) => match non_empty(attr(e, "value")?) {
                Some(value) => {
                    item.version_name = Some(value);
                    None
                }
                None => Some(CollectionField::VersionName),
            },
            (b"thumbnail", true) => Some(CollectionField::VersionThumbnail),
            (b"link", true) => {
                if item.publisher_id.is_none()
                    && attr(e, "type")?.as_deref() == Some("boardgamepublisher")
                {
                    item.publisher_id = match attr_parse(e, "objectid")? {
                        Some(id) => Some(id),
                        None => attr_parse(e, "id")?,
                    };
                }
                None
            }
            (b"name", false) => Some(CollectionField::Name),
            (b"thumbnail", false) => Some(CollectionField::Thumbnail),
            (b"comment", false) => Some(CollectionField::Comment),
            (b"wishlistcomment", false) => Some(CollectionField::WishlistComment),
            (b"numplays", false) => Some(CollectionField::NumPlays),
            (b"status", false) => {
                for tag in StatusTag::ALL {
                    if attr(e, tag.as_str())?.as_deref() == Some("1") {
                        item.tags.push(tag);
                    }
                }
                item.last_modified = non_empty(attr(e, "lastmodified")?);
                None
            }
            _ => None,
        };
        Ok(())
    }

    fn text(&mut self, text: String) {
        let (Some(item), Some(field)) = (self.current.as_mut(), self.field) else {
            return;
        };
        match field {
            CollectionField::Name => item.name = text,
            CollectionField::Thumbnail => item.image = Some(text),
            CollectionField::VersionName => item.version_name = Some(text),
            CollectionField::VersionThumbnail => item.version_image = Some(text),
            CollectionField::Comment => item.comment = Some(text),
            CollectionField::WishlistComment => item.wishlist_comment = Some(text),
            CollectionField::NumPlays => item.num_plays = text.trim().parse().unwrap_or_default(),
        }
    }

    fn close(&mut self, name: &[u8]) {
        self.field = None;
        match name {
            b"item" if self.in_version_item => self.in_version_item = false,
            b"item" => {
                if let Some(item) = self.current.take() {
                    self.items.push(item);
                }
            }
            b"version" => self.in_version = false,
            _ => {}
        }
    }
}

/// Parse a `/collection` response.
pub fn parse_collection(xml: &str) -> Result<Vec<RawCollectionItem>, BggError> {
    let mut handler = CollectionHandler::default();
    drive(xml, &mut handler)?;
    Ok(handler.items)
}

// ── Plays ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct PlaysHandler {
    plays: Vec<RawPlayRecord>,
    current: Option<RawPlayRecord>,
}

impl Handler for PlaysHandler {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), BggError> {
        if e.name().as_ref() == b"play" {
            self.current = Some(RawPlayRecord {
                play_id: attr_parse(e, "id")?.unwrap_or_default(),
                ..Default::default()
            });
            return Ok(());
        }
        let Some(play) = self.current.as_mut() else {
            return Ok(());
        };
        match e.name().as_ref() {
            b"item" => {
                play.game_id = required_id(e, "objectid")?;
                play.game_name = attr(e, "name")?.unwrap_or_default();
            }
            b"player" => {
                let name = non_empty(attr(e, "name")?).unwrap_or_else(|| UNKNOWN_PLAYER.to_string());
                if !play.players.contains(&name) {
                    play.players.push(name);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, _text: String) {}

    fn close(&mut self, name: &[u8]) {
        if name == b"play" {
            if let Some(play) = self.current.take() {
                self.plays.push(play);
            }
        }
    }
}

/// Parse one page of a `/plays` response.
pub fn parse_plays(xml: &str) -> Result<Vec<RawPlayRecord>, BggError> {
    let mut handler = PlaysHandler::default();
    drive(xml, &mut handler)?;
    Ok(handler.plays)
}

// ── Things ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Poll {
    NumPlayers,
    PlayerAge,
    Other,
}

#[derive(Debug, Clone, Copy)]
enum ThingField {
    Image,
    Description,
}

#[derive(Default)]
struct ThingsHandler {
    items: Vec<RawGameDetail>,
    current: Option<RawGameDetail>,
    poll: Option<Poll>,
    tally: Option<PlayerCountPoll>,
    field: Option<ThingField>,
}

impl ThingsHandler {
    fn open_item(&mut self, e: &BytesStart<'_>) -> Result<(), BggError> {
        let id = required_id(e, "id")?;
        let type_attr = attr(e, "type")?.unwrap_or_default();
        self.current = match ItemKind::from_type_attr(&type_attr) {
            Some(kind) => Some(RawGameDetail {
                id,
                kind,
                ..Default::default()
            }),
            None => {
                log::debug!("Skipping item {id} of unsupported type {type_attr:?}");
                None
            }
        };
        Ok(())
    }
}

impl Handler for ThingsHandler {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), BggError> {
        if e.name().as_ref() == b"item" {
            return self.open_item(e);
        }
        let Some(item) = self.current.as_mut() else {
            return Ok(());
        };

        match e.name().as_ref() {
            b"image" => self.field = Some(ThingField::Image),
            b"description" => self.field = Some(ThingField::Description),
            b"name" => {
                let value = attr(e, "value")?.unwrap_or_default();
                if attr(e, "type")?.as_deref() == Some("primary") {
                    item.name = value;
                } else if !value.is_empty() {
                    item.alternate_names.push(value);
                }
            }
            b"yearpublished" => item.year = attr_parse(e, "value")?,
            b"minplayers" => item.min_players = attr_parse(e, "value")?,
            b"maxplayers" => item.max_players = attr_parse(e, "value")?,
            b"minage" => item.min_age = attr_parse(e, "value")?,
            b"playingtime" => item.playing_time = non_empty(attr(e, "value")?),
            b"link" => parse_link(item, e)?,
            b"poll" => {
                self.poll = Some(match attr(e, "name")?.as_deref() {
                    Some("suggested_numplayers") => Poll::NumPlayers,
                    Some("suggested_playerage") => Poll::PlayerAge,
                    _ => Poll::Other,
                });
            }
            b"results" if self.poll == Some(Poll::NumPlayers) => {
                self.tally = Some(PlayerCountPoll {
                    players: attr(e, "numplayers")?.unwrap_or_default(),
                    ..Default::default()
                });
            }
            b"result" => {
                let value = attr(e, "value")?.unwrap_or_default();
                let votes: u32 = attr_parse(e, "numvotes")?.unwrap_or_default();
                match (self.poll, self.tally.as_mut()) {
                    (Some(Poll::NumPlayers), Some(tally)) => match value.as_str() {
                        "Best" => tally.best = votes,
                        "Recommended" => tally.recommended = votes,
                        "Not Recommended" => tally.not_recommended = votes,
                        _ => {}
                    },
                    (Some(Poll::PlayerAge), _) if votes > 0 => {
                        let leading: String = value.chars().take(2).collect();
                        if let Ok(age) = leading.trim().parse() {
                            item.suggested_ages.push(AgePoll { age, votes });
                        }
                    }
                    _ => {}
                }
            }
            b"usersrated" => item.stats.users_rated = attr(e, "value")?,
            b"average" => item.stats.average = attr(e, "value")?,
            b"bayesaverage" => item.stats.rating = attr(e, "value")?,
            b"owned" => item.stats.num_owned = attr(e, "value")?,
            b"averageweight" => item.stats.weight = attr(e, "value")?,
            b"rank" => {
                if attr(e, "friendlyname")?.as_deref() == Some(BOARD_GAME_RANK) {
                    item.stats.rank = attr(e, "value")?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: String) {
        let (Some(item), Some(field)) = (self.current.as_mut(), self.field) else {
            return;
        };
        match field {
            ThingField::Image => item.image = Some(text),
            ThingField::Description => item.description = text,
        }
    }

    fn close(&mut self, name: &[u8]) {
        self.field = None;
        match name {
            b"item" => {
                if let Some(item) = self.current.take() {
                    log::debug!("Parsed {} ({})", item.name, item.id);
                    self.items.push(item);
                }
            }
            b"results" => {
                if let (Some(tally), Some(item)) = (self.tally.take(), self.current.as_mut()) {
                    item.suggested_players.push(tally);
                }
            }
            b"poll" => self.poll = None,
            _ => {}
        }
    }
}

fn parse_link(item: &mut RawGameDetail, e: &BytesStart<'_>) -> Result<(), BggError> {
    let Some(id) = attr_parse::<ItemId>(e, "id")? else {
        return Ok(());
    };
    let link_type = attr(e, "type")?.unwrap_or_default();
    let value = attr(e, "value")?.unwrap_or_default();
    let inbound = attr(e, "inbound")?.as_deref() == Some("true");

    match link_type.as_str() {
        "boardgamecategory" => item.categories.push(value),
        "boardgamemechanic" => item.mechanics.push(value),
        "boardgamefamily" => item.families.push(NamedRef::new(id, value)),
        "boardgamedesigner" => item.designers.push(NamedRef::new(id, value)),
        "boardgameartist" => item.artists.push(NamedRef::new(id, value)),
        "boardgamepublisher" => item.publishers.push(NamedRef::new(id, value)),
        "boardgameexpansion" => item.expansions.push(Link::named(id, value, inbound)),
        "boardgamecompilation" => item.contained.push(Link::named(id, value, inbound)),
        "boardgameimplementation" => item.reimplements.push(Link::named(id, value, inbound)),
        "boardgameintegration" => item.integrates.push(Link::named(id, value, inbound)),
        "boardgameaccessory" => item.accessories.push(Link::named(id, value, inbound)),
        _ => {}
    }
    Ok(())
}

/// Parse a `/thing` response. Items of unsupported types are dropped.
pub fn parse_things(xml: &str) -> Result<Vec<RawGameDetail>, BggError> {
    let mut handler = ThingsHandler::default();
    drive(xml, &mut handler)?;
    Ok(handler.items)
}

#[cfg(test)]
#[path = "tests/xml_tests.rs"]
mod tests;
