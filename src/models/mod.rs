//! Data models for harvested anime metadata
//!
//! Records are built field by field from a [`Spec`](crate::compose::Spec),
//! so the raw record is an ordered key/value map. [`AnimeMetadata`] is the
//! typed view of the same data, used when reading output back in.

use serde::{Deserialize, Serialize};

use crate::compose::Record;

/// Keys of an anime record, in output order.
pub const RECORD_KEYS: [&str; 8] = [
    "title",
    "altTitle",
    "type",
    "studio",
    "year",
    "rating",
    "description",
    "tags",
];

/// Value of one record field: a string, or the tag list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// One harvested anime, keyed in [`RECORD_KEYS`] order.
pub type AnimeRecord = Record<FieldValue>;

/// Title of a record, or `""` if the record somehow lacks one.
pub fn record_title(record: &AnimeRecord) -> &str {
    record
        .get("title")
        .and_then(FieldValue::as_text)
        .unwrap_or_default()
}

/// Typed form of an anime record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnimeMetadata {
    /// From the fragment's `h5`
    pub title: String,
    /// From `h6.aka`, empty when absent
    pub alt_title: String,
    /// From `li.type`, e.g. "TV (12ep)"
    #[serde(rename = "type")]
    pub anime_type: String,
    /// First unclassed list item
    pub studio: String,
    /// From `li.iconYear`, e.g. "2010 - 2011"
    pub year: String,
    /// From `div.ttRating`
    pub rating: String,
    /// From the fragment's `p`
    pub description: String,
    /// List items under `div.tags`
    pub tags: Vec<String>,
}

impl From<&AnimeRecord> for AnimeMetadata {
    fn from(record: &AnimeRecord) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(FieldValue::as_text)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            title: text("title"),
            alt_title: text("altTitle"),
            anime_type: text("type"),
            studio: text("studio"),
            year: text("year"),
            rating: text("rating"),
            description: text("description"),
            tags: record
                .get("tags")
                .and_then(FieldValue::as_list)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        }
    }
}
