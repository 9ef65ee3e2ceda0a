use crate::render::capitalize_first;
use crate::types::Feed;

/// Human-readable rendering: one header per feed, `Key: value` lines for
/// every non-empty item field, items separated by an asterisk rule.
pub fn render_text(feeds: &[Feed]) -> String {
    let mut output = String::new();
    for feed in feeds {
        output.push_str(&format!("\nFeed: {}\n{}\n\n", feed.title, "-".repeat(80)));
        for item in &feed.items {
            for (name, value) in item.fields() {
                if !value.is_empty() {
                    output.push_str(&format!("{}: {}\n", capitalize_first(&name), value));
                }
            }
            output.push_str(&format!("\n{}\n", "*".repeat(80)));
        }
    }
    output
}
