//! Book, catalog, and shelf entry domain model.
//!
//! Field names on the wire follow the remote store: catalog results and create
//! bodies use `olid`, `cover_url`, and `first_publish_year`, while shelf
//! entries nest their book metadata under `book`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 86400;

/// Server-assigned identifier of a shelf entry, unique within a user's shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Reading status of a shelf entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    #[default]
    WantToRead,
    Reading,
    Read,
}

impl ReadingStatus {
    /// Wire representation, also used as the `status` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WantToRead => "want_to_read",
            Self::Reading => "reading",
            Self::Read => "read",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WantToRead => "Want to Read",
            Self::Reading => "Reading",
            Self::Read => "Read",
        }
    }
}

impl FromStr for ReadingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "want_to_read" | "want" => Ok(Self::WantToRead),
            "reading" => Ok(Self::Reading),
            "read" => Ok(Self::Read),
            other => Err(format!("unknown reading status: {other}")),
        }
    }
}

/// Which entries a shelf load asks for.
///
/// Process-wide UI state; changing it triggers a full cache reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ReadingStatus),
}

impl StatusFilter {
    /// Value for the `status` query parameter; `None` means omit it.
    #[must_use]
    pub const fn as_query(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status.as_str()),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.label(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// A star rating in `1..=5`.
///
/// Not directly deserializable: the store accepts any integer, so decoding
/// goes through [`ShelfEntry`]'s lenient rating field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` when `value` is outside `1..=5`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Permissively coerces raw form input into a rating.
    ///
    /// The leading integer of the trimmed input is parsed (`"4.5"` and
    /// `"4 stars"` both give 4). Empty input, input without a leading integer,
    /// and integers outside `1..=5` yield `None` instead of an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfsync::domain::Rating;
    ///
    /// assert_eq!(Rating::coerce("4").map(Rating::value), Some(4));
    /// assert_eq!(Rating::coerce("7"), None);
    /// assert_eq!(Rating::coerce("great"), None);
    /// assert_eq!(Rating::coerce(""), None);
    /// ```
    #[must_use]
    pub fn coerce(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let sign_len = usize::from(trimmed.starts_with(['+', '-']));
        let digits_len = trimmed[sign_len..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits_len == 0 {
            return None;
        }

        let value: i64 = trimmed[..sign_len + digits_len].parse().ok()?;
        Self::from_stored(value)
    }

    /// Accepts a stored integer; anything outside `1..=5` is no rating.
    #[must_use]
    pub fn from_stored(value: i64) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::new)
    }
}

/// Coerces raw notes input: an empty string means no notes.
#[must_use]
pub fn coerce_notes(input: &str) -> Option<String> {
    if input.is_empty() {
        None
    } else {
        Some(input.to_string())
    }
}

/// A book found in the external catalog.
///
/// Produced only by search and discarded once selected or replaced by a
/// newer result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResult {
    #[serde(rename = "olid")]
    pub external_id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
}

/// Book metadata attached to a shelf entry. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
}

/// One book on the user's shelf, as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfEntry {
    pub id: EntryId,
    pub book: Book,
    pub status: ReadingStatus,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ShelfEntry {
    /// Describes how long ago the entry was added: `"just now"`, `"5m ago"`,
    /// `"3h ago"`, `"7d ago"`. `None` when the store sent no timestamp.
    #[must_use]
    pub fn added_ago(&self) -> Option<String> {
        let created = self.created_at?;
        let diff = (Utc::now() - created).num_seconds();

        Some(if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            format!("{}m ago", diff / SECONDS_PER_MINUTE)
        } else if diff < SECONDS_PER_DAY {
            format!("{}h ago", diff / SECONDS_PER_HOUR)
        } else {
            format!("{}d ago", diff / SECONDS_PER_DAY)
        })
    }

    /// Decodes a shelf listing one entry at a time.
    ///
    /// An entry that does not fit the model (a status other than the three
    /// known ones, a missing book) is skipped with a warning; the rest of
    /// the listing still loads.
    #[must_use]
    pub fn from_listing(items: Vec<serde_json::Value>) -> Vec<Self> {
        items
            .into_iter()
            .filter_map(|item| {
                let id = item.get("id").cloned();
                serde_json::from_value::<Self>(item)
                    .map_err(|e| tracing::warn!(id = ?id, error = %e, "skipping undecodable shelf entry"))
                    .ok()
            })
            .collect()
    }
}

/// Numbers outside `1..=5`, fractions, and non-numbers all become `None`.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<Rating>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_i64)
        .and_then(Rating::from_stored))
}

/// Accepts RFC 3339 timestamps and naive ISO timestamps (read as UTC).
/// Anything unparseable becomes `None` rather than failing the whole entry.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

/// Body of `POST /api/shelf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewShelfEntry {
    #[serde(rename = "olid", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    pub status: ReadingStatus,
    pub rating: Option<Rating>,
    pub notes: Option<String>,
}

impl NewShelfEntry {
    /// Builds a create body from a chosen catalog result and raw form input.
    #[must_use]
    pub fn from_selection(
        selection: &CatalogResult,
        status: ReadingStatus,
        rating_input: &str,
        notes_input: &str,
    ) -> Self {
        Self {
            external_id: Some(selection.external_id.clone()),
            title: selection.title.clone(),
            author: selection.author.clone(),
            cover_url: selection.cover_url.clone(),
            first_publish_year: selection.first_publish_year,
            status,
            rating: Rating::coerce(rating_input),
            notes: coerce_notes(notes_input),
        }
    }
}

/// Body of `PATCH /api/shelf/{id}`. Book identity is never resubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryUpdate {
    pub status: ReadingStatus,
    pub rating: Option<Rating>,
    pub notes: Option<String>,
}

impl EntryUpdate {
    #[must_use]
    pub fn from_input(status: ReadingStatus, rating_input: &str, notes_input: &str) -> Self {
        Self {
            status,
            rating: Rating::coerce(rating_input),
            notes: coerce_notes(notes_input),
        }
    }
}
