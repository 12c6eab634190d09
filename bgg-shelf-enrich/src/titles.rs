//! Title normalization: article handling, alternate titles, and stripping
//! a base game's name from the front of its expansions' names.

use std::sync::LazyLock;

use bgg_shelf_core::RawGameDetail;
use regex::Regex;

use crate::aliases::aliases_for;

const ARTICLES: [&str; 3] = ["A", "An", "The"];

static FAN_EXPANSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\(?Fan expans.*").unwrap());
static MAP_COLLECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*Map Collection: Volume ").unwrap());
static LEADING_NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\W+").unwrap());

/// Move a leading article to the end for sorting.
///
/// ```
/// use bgg_shelf_enrich::titles::move_article_to_end;
///
/// assert_eq!(move_article_to_end("The Castles of Burgundy"), "Castles of Burgundy, The");
/// assert_eq!(move_article_to_end("Agricola"), "Agricola");
/// ```
pub fn move_article_to_end(title: &str) -> String {
    let mut words = title.split_whitespace();
    match words.next() {
        Some(first) if ARTICLES.contains(&first) => {
            let rest: Vec<&str> = words.collect();
            format!("{}, {}", rest.join(" "), first)
        }
        _ => title.to_string(),
    }
}

/// Inverse of [`move_article_to_end`]: "Foo, The" → "The Foo".
pub fn move_article_to_start(title: &str) -> String {
    let parts: Vec<&str> = title.split(", ").collect();
    match parts.split_last() {
        Some((last, rest)) if !rest.is_empty() && ARTICLES.contains(last) => {
            format!("{} {}", last, rest.join(", "))
        }
        _ => title.to_string(),
    }
}

/// Every textual form under which `detail` might be referred to.
///
/// The order matters for prefix stripping: the first title that matches a
/// child name wins, so more specific forms come first.
pub fn alternate_titles(detail: &RawGameDetail) -> Vec<String> {
    let name = detail.name.trim();
    let mut titles: Vec<String> = Vec::new();
    let mut push = |title: &str| {
        let title = title.trim();
        if !title.is_empty() && !titles.iter().any(|t| t == title) {
            titles.push(title.to_string());
        }
    };

    push(name);
    if let Some((medium, _)) = name.split_once(['–', '—']) {
        push(medium);
    }
    if let Some((short, _)) = name.split_once(':') {
        push(short);
    }
    if let Some((no_edition, _)) = name.split_once('(') {
        push(no_edition);
    }
    if let Some(pos) = name.find("Big Box") {
        push(&name[..pos]);
    }
    for &alias in aliases_for(name) {
        push(alias);
    }
    for alternate in &detail.alternate_names {
        push(alternate.as_str());
    }
    for link in detail.reimplements.iter().chain(&detail.integrates) {
        if let Some(linked) = &link.name {
            push(linked.as_str());
        }
    }
    push(move_article_to_end(name).as_str());

    titles
}

/// Remove the owner's title from the front of a child item's name, then
/// apply the fixed cleanup rules. Never returns an empty string.
///
/// Owner titles are tried in order and the first case-insensitive prefix
/// match wins.
pub fn strip_owner_prefix(child_name: &str, owner_titles: &[String]) -> String {
    let start_form = move_article_to_start(child_name);

    let stripped = owner_titles
        .iter()
        .filter(|title| !title.is_empty())
        .find_map(|title| strip_prefix_ignore_case(&start_form, title))
        .unwrap_or(&start_form);

    let cleaned = FAN_EXPANSION.replace_all(stripped, " [Fan]");
    let cleaned = MAP_COLLECTION.replace_all(&cleaned, "Map Pack ");
    let cleaned = LEADING_NON_WORD.replace(&cleaned, "");
    let cleaned = cleaned.replace(" – ", ": ");
    let cleaned = move_article_to_end(&cleaned);

    if cleaned.is_empty() {
        child_name.to_string()
    } else {
        cleaned
    }
}

/// Case-insensitive `strip_prefix`, comparing char by char so non-ASCII
/// case folding cannot split a code point.
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = s.char_indices();
    let mut end = 0;
    for p in prefix.chars() {
        let (i, c) = chars.next()?;
        if !c.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
        end = i + c.len_utf8();
    }
    Some(&s[end..])
}
