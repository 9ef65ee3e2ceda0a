use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use scraper::Html;
use tracing::debug;

use crate::types::{FeedItem, RawEntry, ReaderError, Result};

/// Entities removed outright from every text field, never decoded to their
/// glyphs. The semicolon-less `&nbsp` appears in the wild and is matched
/// after the proper form.
const DROPPED_ENTITIES: [&str; 4] = ["&nbsp;", "&nbsp", "&laquo;", "&raquo;"];

/// Strip HTML markup from a text field.
///
/// The dropped entities are removed first. If the remainder parses to a
/// fragment containing any element, the concatenated text nodes are
/// returned; plain text is returned unchanged so it is not processed twice.
pub fn html_to_text(input: &str) -> String {
    let mut cleaned = input.to_string();
    for entity in DROPPED_ENTITIES {
        cleaned = cleaned.replace(entity, "");
    }

    let fragment = Html::parse_fragment(&cleaned);
    let has_markup = fragment
        .root_element()
        .descendants()
        .skip(1)
        .any(|node| node.value().is_element());

    if has_markup {
        fragment.root_element().text().collect()
    } else {
        cleaned
    }
}

/// Convert a raw entry into a canonical item.
///
/// `title`, `link`, `pubDate`, `guid` and `description` map to the struct
/// fields; every other non-empty field lands in `extra`. An entry without a
/// parseable publish date is a malformed-input error, not silently dropped.
pub fn normalize(raw: &RawEntry) -> Result<FeedItem> {
    let mut title = String::new();
    let mut link = String::new();
    let mut guid: Option<String> = None;
    let mut raw_date: Option<String> = None;
    let mut body = String::new();
    let mut extra = BTreeMap::new();

    for (name, value) in &raw.fields {
        match name.as_str() {
            "title" => title = value.clone(),
            "link" => link = value.clone(),
            "guid" => guid = Some(value.clone()),
            "pubDate" => raw_date = Some(value.clone()),
            "description" => body = value.clone(),
            _ => {
                extra.insert(name.clone(), value.clone());
            }
        }
    }

    let raw_date = raw_date.ok_or_else(|| ReaderError::MalformedItem {
        title: title.clone(),
        value: String::new(),
    })?;
    let pub_date = parse_pub_date(&raw_date).ok_or_else(|| ReaderError::MalformedItem {
        title: title.clone(),
        value: raw_date.clone(),
    })?;

    let guid = match guid {
        Some(guid) => guid,
        None => {
            debug!("Item '{}' has no guid, falling back to link", title);
            link.clone()
        }
    };

    Ok(FeedItem {
        title,
        link,
        pub_date,
        guid,
        body,
        extra,
    })
}

fn parse_pub_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}
