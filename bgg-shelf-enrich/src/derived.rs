//! Pure calculators turning raw catalog fields into display values.

use std::sync::LazyLock;

use bgg_shelf_core::{
    AgePoll, PlayerCount, PlayerCountPoll, PlaytimeBucket, RawGameDetail, Recommendation,
    ResolvedGameEntity, WeightBucket,
};
use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Rank value the catalog uses for unranked items.
const NOT_RANKED: &str = "Not Ranked";

static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]*);").unwrap()
});

/// Minimum "best" votes before a player count can be called best.
const BEST_VOTE_THRESHOLD: u32 = 10;

/// Parse a numeric catalog string. Empty or malformed input is `None`.
pub fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<Decimal>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::debug!("Ignoring non-numeric catalog value {raw:?}");
            None
        }
    }
}

pub fn weight_bucket(weight: Option<Decimal>) -> WeightBucket {
    let Some(weight) = weight else {
        return WeightBucket::Unknown;
    };
    match weight.round().to_i64() {
        Some(i64::MIN..=-1) | None => WeightBucket::Unknown,
        Some(0 | 1) => WeightBucket::Light,
        Some(2) => WeightBucket::LightMedium,
        Some(3) => WeightBucket::Medium,
        Some(4) => WeightBucket::MediumHeavy,
        Some(_) => WeightBucket::Heavy,
    }
}

/// Bucket for a playing time in minutes: the first of 30/60/120/180/240
/// strictly above it, else "> 4h".
pub fn playtime_bucket(minutes: Option<u32>) -> PlaytimeBucket {
    match minutes {
        None => PlaytimeBucket::Unknown,
        Some(m) if m < 30 => PlaytimeBucket::UnderHalfHour,
        Some(m) if m < 60 => PlaytimeBucket::HalfHourToHour,
        Some(m) if m < 120 => PlaytimeBucket::OneToTwoHours,
        Some(m) if m < 180 => PlaytimeBucket::TwoToThreeHours,
        Some(m) if m < 240 => PlaytimeBucket::ThreeToFourHours,
        Some(_) => PlaytimeBucket::OverFourHours,
    }
}

pub fn parse_playing_time(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Reduce one poll entry's tallies to a verdict.
pub fn recommendation(poll: &PlayerCountPoll) -> Recommendation {
    if poll.best + poll.recommended <= poll.not_recommended {
        Recommendation::NotRecommended
    } else if poll.best > BEST_VOTE_THRESHOLD && poll.best > poll.recommended {
        Recommendation::Best
    } else {
        Recommendation::Recommended
    }
}

/// Player counts the community recommends, in poll order. A lone
/// remaining count is promoted to best.
pub fn suggested_player_counts(polls: &[PlayerCountPoll]) -> Vec<PlayerCount> {
    let mut counts: Vec<PlayerCount> = polls
        .iter()
        .map(|poll| PlayerCount::new(poll.players.clone(), recommendation(poll)))
        .filter(|count| count.recommendation != Recommendation::NotRecommended)
        .collect();
    if let [only] = counts.as_mut_slice() {
        only.recommendation = Recommendation::Best;
    }
    counts
}

/// Base game counts plus any count only an expansion provides, ascending.
pub fn merged_player_counts(
    detail: &RawGameDetail,
    expansions: &[ResolvedGameEntity],
) -> Vec<PlayerCount> {
    let mut counts = suggested_player_counts(&detail.suggested_players);
    for expansion in expansions {
        for count in &expansion.players {
            if !counts.iter().any(|c| c.players == count.players) {
                counts.push(PlayerCount::new(
                    count.players.clone(),
                    Recommendation::Expansion,
                ));
            }
        }
    }
    counts.sort_by_key(|c| player_count_key(&c.players));
    counts
}

/// Numeric sort key of a player-count label ("4+" → 4). Unparseable
/// labels sort last.
fn player_count_key(label: &str) -> u32 {
    label.trim_end_matches('+').trim().parse().unwrap_or(u32::MAX)
}

pub fn rank(raw: Option<&str>) -> Option<Decimal> {
    match raw {
        Some(NOT_RANKED) => None,
        other => parse_decimal(other),
    }
}

/// Parse a count statistic, absent → zero.
pub fn count_stat(raw: Option<&str>) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Vote-weighted mean of the suggested-age poll, rounded.
pub fn suggested_age(polls: &[AgePoll]) -> Option<u32> {
    let votes: u64 = polls.iter().map(|p| u64::from(p.votes)).sum();
    if votes == 0 {
        return None;
    }
    let weighted: u64 = polls
        .iter()
        .map(|p| u64::from(p.age) * u64::from(p.votes))
        .sum();
    (Decimal::from(weighted) / Decimal::from(votes))
        .round()
        .to_u32()
}

/// Decode HTML character references in a catalog description, one at a
/// time. Unknown entities, invalid code points and bare `&` are kept as is.
pub fn decode_description(raw: &str) -> String {
    CHAR_REF
        .replace_all(raw, |caps: &Captures<'_>| {
            let whole = &caps[0];
            resolve_char_ref(&caps[1]).unwrap_or_else(|| whole.to_string())
        })
        .into_owned()
}

fn resolve_char_ref(reference: &str) -> Option<String> {
    let code = match reference.strip_prefix('#') {
        Some(num) => match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse().ok(),
        },
        None => return resolve_html5_entity(reference).map(str::to_string),
    };
    let decoded = code.and_then(char::from_u32).filter(|c| *c != '\0');
    if decoded.is_none() {
        log::debug!("Keeping undecodable character reference &{reference};");
    }
    decoded.map(String::from)
}
