use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One news entry, normalized from a raw `<item>` element.
///
/// Persisted (and emitted by the JSON renderer) as a flat mapping of feed
/// field name to string value: the named fields below plus whatever else the
/// feed carried, flattened from `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    /// Publish date with the feed's own UTC offset preserved.
    #[serde(rename = "pubDate")]
    pub pub_date: DateTime<FixedOffset>,
    /// Dedup key within one feed. Falls back to `link` when the feed has no
    /// `<guid>` element.
    pub guid: String,
    /// Item body (the feed's `description`), HTML stripped to plain text.
    #[serde(rename = "description", default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Any remaining non-empty simple fields (categories, enclosure URLs...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl FeedItem {
    /// Field name/value pairs in presentation order: the known fields first,
    /// then the extras. Values are already cleaned; empty ones are kept so
    /// callers decide whether to skip them.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("title".to_string(), self.title.clone()),
            ("link".to_string(), self.link.clone()),
            ("pubDate".to_string(), self.pub_date.to_rfc2822()),
            ("guid".to_string(), self.guid.clone()),
            ("description".to_string(), self.body.clone()),
        ];
        for (name, value) in &self.extra {
            fields.push((name.clone(), value.clone()));
        }
        fields
    }
}

/// One subscribed source. `source` is the canonical feed URL (trailing slash
/// stripped) and is the merge key across the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub source: String,
    pub items: Vec<FeedItem>,
}

/// A raw `<item>` as the parser saw it: field names paired with their
/// cleaned string values, in document order. Consumed by the normalizer.
#[derive(Debug, Default)]
pub struct RawEntry {
    pub fields: Vec<(String, String)>,
}

impl RawEntry {
    pub fn push(&mut self, name: String, value: String) {
        self.fields.push((name, value));
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported url scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("the source '{url}' does not contain rss feed data")]
    NotAFeed { url: String },

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("item '{title}' has no parseable publish date ('{value}')")]
    MalformedItem { title: String, value: String },

    #[error("storage file '{path}' contains invalid data: {source}")]
    CorruptStore {
        path: String,
        source: serde_json::Error,
    },

    #[error("no storage at '{path}'; run with a source argument first to create it")]
    MissingStore { path: String },

    #[error("no news found on {date}{}", .feed_source.as_ref().map(|s| format!(" for feed '{s}'")).unwrap_or_default())]
    NoMatch {
        date: NaiveDate,
        feed_source: Option<String>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReaderError>;
