use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{info, warn};

use crate::fetcher::Fetcher;
use crate::query::apply_limit;
use crate::render::{capitalize_first, escape, is_image_url};
use crate::types::{Feed, Result};

pub const FB2_FILE_NAME: &str = "rss_reader_book.fb2";

/// Write a FictionBook 2.0 e-book with the given feeds into `dir` and
/// return the path of the created file. One section per feed, a nested
/// section per item; image-URL fields are downloaded and embedded as
/// base64 `<binary>` blocks. An image that cannot be fetched is skipped
/// with a warning so the book is still produced.
pub fn create_fb2(feeds: &[Feed], dir: &Path, limit: i64, fetcher: &Fetcher) -> Result<PathBuf> {
    let mut feeds = feeds.to_vec();
    apply_limit(&mut feeds, limit);

    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <FictionBook xmlns=\"http://www.gribuser.ru/xml/fictionbook/2.0\" \
         xmlns:l=\"http://www.w3.org/1999/xlink\">\n<body>\n",
    );
    let mut binaries = String::new();
    let mut image_num = 0usize;

    for feed in &feeds {
        body.push_str(&format!(
            "<section><title><p>Feed: {}</p></title>\n",
            escape(&feed.title)
        ));
        for item in &feed.items {
            body.push_str("<section>");
            if !item.title.is_empty() {
                body.push_str(&format!(
                    "<title><p>{}</p></title>\n",
                    escape(&item.title)
                ));
            }
            for (name, value) in item.fields() {
                if value.is_empty() || name == "title" {
                    continue;
                }
                let label = capitalize_first(&name);
                if is_image_url(&value) {
                    match fetcher.fetch_bytes(&value) {
                        Ok(bytes) => {
                            body.push_str(&format!(
                                "<p><strong>{label}:</strong></p>\n<image l:href=\"#_{image_num}.jpg\"/>\n"
                            ));
                            binaries.push_str(&format!(
                                "<binary content-type=\"image/jpeg\" id=\"_{image_num}.jpg\">{}</binary>\n",
                                STANDARD.encode(&bytes)
                            ));
                            image_num += 1;
                        }
                        Err(err) => warn!("Skipping image '{}': {}", value, err),
                    }
                } else if name == "link" {
                    body.push_str(&format!(
                        "<p><strong>{label}</strong>: <a l:href=\"{0}\">{0}</a></p>\n",
                        escape(&value)
                    ));
                } else {
                    body.push_str(&format!(
                        "<p><strong>{label}</strong>: {}</p>\n",
                        escape(&value)
                    ));
                }
            }
            body.push_str("</section>\n");
        }
        body.push_str("</section>\n");
    }

    body.push_str("</body>\n");
    body.push_str(&binaries);
    body.push_str("</FictionBook>\n");

    let full_path = dir.join(FB2_FILE_NAME);
    fs::write(&full_path, body)?;
    info!("Created fb2 book at '{}'", full_path.display());
    Ok(full_path)
}
