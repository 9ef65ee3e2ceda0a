//! Output renderers. Each one consumes a list of feeds read-only; ordering
//! comes from the query layer, the per-feed limit is applied here.

pub mod fb2;
pub mod html;
pub mod json;
pub mod text;

const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Whether a field value looks like an image URL. Extension based, plus the
/// Yahoo image host whose URLs carry no usable extension.
pub fn is_image_url(url: &str) -> bool {
    if url.starts_with("https://s.yimg.com/") {
        return true;
    }
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('.').next() {
        Some(ext) => IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Minimal escaping for values interpolated into HTML/XML output.
pub(crate) fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `pubDate` -> `PubDate` for field labels.
pub(crate) fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
