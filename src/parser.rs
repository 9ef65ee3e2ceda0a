use quick_xml::escape::{resolve_xml_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use crate::fetcher::Fetcher;
use crate::normalize::{html_to_text, normalize};
use crate::types::{Feed, RawEntry, ReaderError, Result};

/// Canonical form of a feed URL: trailing slashes stripped. This is the
/// dedup/merge key across the whole store.
pub fn canonical_source(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Fetch a feed URL and parse it into a canonical record.
pub fn fetch_feed(fetcher: &Fetcher, url: &str) -> Result<Feed> {
    let body = fetcher.fetch(url)?;
    parse_feed(&body, url)
}

/// Parse an RSS 2.0 document.
///
/// The document must contain an `<rss>` root, otherwise this is
/// `NotAFeed`. The feed title is the first `<title>` outside any item.
/// Each direct child of an `<item>` becomes one raw field: its text
/// content (HTML stripped), or its `url` attribute when it has no text
/// (enclosures, media links). Empty fields are skipped.
pub fn parse_feed(xml: &str, url: &str) -> Result<Feed> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut is_rss = false;
    let mut feed_title: Option<String> = None;
    let mut capturing_title = false;
    let mut title_text = String::new();

    let mut entries: Vec<RawEntry> = Vec::new();
    let mut in_item = false;
    let mut entry = RawEntry::default();
    // Cursor over the current direct child of <item>. Nested markup inside
    // it only contributes text, like the field element's own content.
    let mut field_name: Option<String> = None;
    let mut field_text = String::new();
    let mut field_url: Option<String> = None;
    let mut field_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if name == "rss" {
                    is_rss = true;
                }
                if in_item {
                    if field_name.is_none() {
                        field_name = Some(name);
                        field_text.clear();
                        field_url = url_attribute(&e);
                        field_depth = 1;
                    } else {
                        field_depth += 1;
                    }
                } else if name == "item" {
                    in_item = true;
                    entry = RawEntry::default();
                } else if name == "title" && feed_title.is_none() {
                    capturing_title = true;
                    title_text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                if name == "rss" {
                    is_rss = true;
                }
                if in_item && field_name.is_none() {
                    if let Some(value) = url_attribute(&e) {
                        entry.push(name, value);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                let raw = String::from_utf8_lossy(&t);
                // Decode entities with a resolver for the HTML names XML
                // does not know, so one stray &nbsp; cannot leave the
                // node's &amp;/&lt; undecoded.
                let text = match unescape_with(&raw, resolve_html_entity) {
                    Ok(cow) => cow.into_owned(),
                    Err(_) => raw.into_owned(),
                };
                append_text(&text, in_item, &field_name, &mut field_text, capturing_title, &mut title_text);
            }
            Ok(Event::CData(t)) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                append_text(&text, in_item, &field_name, &mut field_text, capturing_title, &mut title_text);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if in_item {
                    if field_name.is_some() {
                        field_depth -= 1;
                        if field_depth == 0 {
                            if let Some(field) = field_name.take() {
                                let value = if !field_text.trim().is_empty() {
                                    html_to_text(&field_text)
                                } else {
                                    field_url.take().unwrap_or_default()
                                };
                                if !value.is_empty() {
                                    entry.push(field, value);
                                }
                            }
                            field_text.clear();
                            field_url = None;
                        }
                    } else if name == "item" {
                        in_item = false;
                        entries.push(std::mem::take(&mut entry));
                    }
                } else if capturing_title && name == "title" {
                    capturing_title = false;
                    feed_title = Some(title_text.clone());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                // Documents that break the XML reader before an <rss> root
                // was seen are not feeds at all.
                if is_rss {
                    return Err(ReaderError::Parse(format!("xml error: {e}")));
                }
                return Err(ReaderError::NotAFeed {
                    url: url.to_string(),
                });
            }
        }
    }

    if !is_rss {
        return Err(ReaderError::NotAFeed {
            url: url.to_string(),
        });
    }

    let mut items = Vec::with_capacity(entries.len());
    for raw in &entries {
        let item = normalize(raw)?;
        debug!("Normalized item '{}'", item.title);
        items.push(item);
    }

    let title = feed_title.unwrap_or_default();
    info!("Parsed feed '{}' with {} items", title, items.len());

    Ok(Feed {
        title,
        source: canonical_source(url),
        items,
    })
}

/// HTML entities seen in real feeds that the XML reader cannot resolve.
/// The three the normalizer removes outright map back to their literal
/// form so it still sees them.
fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "nbsp" => Some("&nbsp;"),
        "laquo" => Some("&laquo;"),
        "raquo" => Some("&raquo;"),
        "mdash" => Some("\u{2014}"),
        "ndash" => Some("\u{2013}"),
        "hellip" => Some("\u{2026}"),
        "copy" => Some("\u{a9}"),
        "reg" => Some("\u{ae}"),
        // Predefined XML entities are only decoded if the resolver
        // returns them itself; delegate so &amp;/&lt; keep working.
        _ => resolve_xml_entity(entity),
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn url_attribute(e: &BytesStart<'_>) -> Option<String> {
    e.try_get_attribute("url")
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

fn append_text(
    text: &str,
    in_item: bool,
    field_name: &Option<String>,
    field_text: &mut String,
    capturing_title: bool,
    title_text: &mut String,
) {
    if in_item {
        if field_name.is_some() {
            field_text.push_str(text);
        }
    } else if capturing_title {
        title_text.push_str(text);
    }
}
