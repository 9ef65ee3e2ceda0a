use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::query::apply_limit;
use crate::render::{capitalize_first, escape, is_image_url};
use crate::types::{Feed, Result};

pub const HTML_FILE_NAME: &str = "rss_feed.html";

/// Write a web page with the given feeds into `dir` and return the path of
/// the created file: a table of contents linking to each feed, then one
/// section per feed with titles, anchors for links, inline images for
/// image-URL fields and plain paragraphs for everything else.
pub fn create_html(feeds: &[Feed], dir: &Path, limit: i64) -> Result<PathBuf> {
    let mut feeds = feeds.to_vec();
    apply_limit(&mut feeds, limit);

    let mut output = String::from("<!DOCTYPE html>\n<html>\n<body>\n");

    output.push_str("<h1>Feeds:</h1>\n");
    for feed in &feeds {
        output.push_str(&format!(
            "<h2><a href='#{0}'>{0}</a></h2>\n",
            escape(&feed.title)
        ));
    }
    output.push_str("<hr>\n");

    for feed in &feeds {
        output.push_str(&format!(
            "<h2 id='{0}'>Feed: {0}</h2>\n",
            escape(&feed.title)
        ));
        for item in &feed.items {
            for (name, value) in item.fields() {
                if value.is_empty() {
                    continue;
                }
                let label = capitalize_first(&name);
                if name == "title" {
                    output.push_str(&format!(
                        "<h3><b><u>{label}</b>: {}</u></h3>\n",
                        escape(&value)
                    ));
                } else if name == "link" {
                    output.push_str(&format!(
                        "<p><b>{label}</b>: <a href='{0}'>{0}</a></p>\n",
                        escape(&value)
                    ));
                } else if is_image_url(&value) {
                    output.push_str(&format!(
                        "<p><b>{label}:</b></p>\n<img src='{}' alt='image' width='300' height='200'><br>\n",
                        escape(&value)
                    ));
                } else {
                    output.push_str(&format!("<p><b>{label}</b>: {}</p>\n", escape(&value)));
                }
            }
            output.push_str("<hr>\n");
        }
    }
    output.push_str("</body>\n</html>\n");

    let full_path = dir.join(HTML_FILE_NAME);
    fs::write(&full_path, output)?;
    info!("Created html page at '{}'", full_path.display());
    Ok(full_path)
}
