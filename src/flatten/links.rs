//! Hyperlink relations and identifier extraction
//!
//! Porter objects carry a `links` array of `{rel, href}` pairs. Entity ids
//! are not fields of their own; they are the trailing path segment of the
//! `self` link.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static HOTEL_ID: LazyLock<Regex> = LazyLock::new(|| id_pattern("hotels"));
static REVIEW_ID: LazyLock<Regex> = LazyLock::new(|| id_pattern("reviews"));
static REVIEW_SITE_ID: LazyLock<Regex> = LazyLock::new(|| id_pattern("review[-_]?sites"));
static LANGUAGE_ID: LazyLock<Regex> = LazyLock::new(|| id_pattern("languages"));

/// `?date=<start>..<end>` on a snapshot self link
static SNAPSHOT_WINDOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]date=(\d+)\.\.(\d+)(?:&|#|$)").unwrap());

/// `/<collection>/<digits>` as the last path segment, with an optional
/// trailing slash, query string or fragment
fn id_pattern(collection: &str) -> Regex {
    Regex::new(&format!(r"(?i)/{collection}/(\d+)/?(?:[?#].*)?$")).unwrap()
}

/// Collection an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Hotel,
    Review,
    ReviewSite,
    Language,
}

impl LinkKind {
    fn pattern(self) -> &'static Regex {
        match self {
            LinkKind::Hotel => &HOTEL_ID,
            LinkKind::Review => &REVIEW_ID,
            LinkKind::ReviewSite => &REVIEW_SITE_ID,
            LinkKind::Language => &LANGUAGE_ID,
        }
    }
}

/// A resolved link: its href and the id parsed from it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkRef {
    /// Link target, empty when the relation is missing
    pub url: String,
    /// Parsed identifier, 0 when missing or unparseable
    pub id: i64,
}

/// href of the first link with the given relation
pub fn find_link<'a>(object: &'a Value, rel: &str) -> Option<&'a str> {
    object
        .get("links")?
        .as_array()?
        .iter()
        .find(|link| link.get("rel").and_then(Value::as_str) == Some(rel))?
        .get("href")?
        .as_str()
}

/// Identifier at the end of `href`, or 0
pub fn parse_id(href: &str, kind: LinkKind) -> i64 {
    kind.pattern()
        .captures(href.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Resolve the `rel` link of `object` as an entity of `kind`
pub fn resolve(object: Option<&Value>, rel: &str, kind: LinkKind) -> LinkRef {
    match object.and_then(|o| find_link(o, rel)) {
        Some(href) => LinkRef {
            url: href.to_string(),
            id: parse_id(href, kind),
        },
        None => LinkRef::default(),
    }
}

/// `(start, end)` Unix timestamps from a snapshot link, or `(0, 0)`
pub fn parse_snapshot_window(href: &str) -> (i64, i64) {
    SNAPSHOT_WINDOW
        .captures(href)
        .and_then(|caps| {
            let start = caps.get(1)?.as_str().parse().ok()?;
            let end = caps.get(2)?.as_str().parse().ok()?;
            Some((start, end))
        })
        .unwrap_or((0, 0))
}
