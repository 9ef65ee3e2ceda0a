use crate::types::{Feed, FeedItem};

/// Order items most recent first. The sort is stable, so items sharing a
/// publish date keep their original relative order.
pub fn sort_items_desc(items: &mut [FeedItem]) {
    items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
}

/// Truncate each feed's (already ordered) item list to `limit` entries.
/// A limit of zero or below means unlimited.
pub fn apply_limit(feeds: &mut [Feed], limit: i64) {
    if limit <= 0 {
        return;
    }
    let limit = limit as usize;
    for feed in feeds {
        if feed.items.len() > limit {
            feed.items.truncate(limit);
        }
    }
}
