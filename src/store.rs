use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::query::sort_items_desc;
use crate::types::{Feed, FeedItem, ReaderError, Result};

/// Flat-file collection of every feed merged so far, keyed by source URL.
///
/// Every operation loads the whole file into memory; mutation rewrites the
/// whole file. There is no locking: a single local process is assumed, and
/// concurrent writers race with last-writer-wins.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection. An absent file is the expected first-run
    /// condition (`MissingStore`); a file that exists but cannot be decoded
    /// is data corruption (`CorruptStore`).
    pub fn load(&self) -> Result<Vec<Feed>> {
        if !self.path.exists() {
            return Err(ReaderError::MissingStore {
                path: self.path.display().to_string(),
            });
        }
        let data = fs::read_to_string(&self.path)?;
        let feeds: Vec<Feed> =
            serde_json::from_str(&data).map_err(|source| ReaderError::CorruptStore {
                path: self.path.display().to_string(),
                source,
            })?;
        debug!(
            "Loaded {} feeds from '{}'",
            feeds.len(),
            self.path.display()
        );
        Ok(feeds)
    }

    /// Idempotent upsert of one freshly fetched feed.
    ///
    /// A new source appends the whole feed. For a known source, only items
    /// whose guid is not stored yet are appended; the first write of a guid
    /// wins and is never updated in place. Returns the number of newly
    /// added items.
    pub fn merge(&self, feed: &Feed) -> Result<usize> {
        let mut feeds = match self.load() {
            Ok(feeds) => feeds,
            Err(ReaderError::MissingStore { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };

        let added = match feeds.iter_mut().find(|f| f.source == feed.source) {
            None => {
                debug!("Source '{}' is new to the storage", feed.source);
                let count = feed.items.len();
                feeds.push(feed.clone());
                count
            }
            Some(stored) => {
                let seen: HashSet<&str> =
                    stored.items.iter().map(|item| item.guid.as_str()).collect();
                let fresh: Vec<FeedItem> = feed
                    .items
                    .iter()
                    .filter(|item| !seen.contains(item.guid.as_str()))
                    .cloned()
                    .collect();
                let count = fresh.len();
                stored.items.extend(fresh);
                count
            }
        };

        self.persist(&feeds)?;
        info!(
            "Merged feed '{}': {} new items stored",
            feed.source, added
        );
        Ok(added)
    }

    /// Select items published on the given calendar date, judged in each
    /// item's own timezone.
    ///
    /// With a source, the result is that one feed (or `NoMatch` scoped to
    /// it); without one, every feed with at least one matching item is
    /// returned, its item list replaced by the matching subset. Items in
    /// each returned feed are ordered most recent first.
    pub fn query(&self, date: NaiveDate, source: Option<&str>) -> Result<Vec<Feed>> {
        let feeds = self.load()?;

        let scoped: Vec<Feed> = match source {
            Some(src) => feeds.into_iter().filter(|f| f.source == src).collect(),
            None => feeds,
        };

        let mut matched = Vec::new();
        for mut feed in scoped {
            feed.items.retain(|item| item.pub_date.date_naive() == date);
            debug!(
                "Feed '{}' has {} items on {}",
                feed.title,
                feed.items.len(),
                date
            );
            if !feed.items.is_empty() {
                sort_items_desc(&mut feed.items);
                matched.push(feed);
            }
        }

        if matched.is_empty() {
            return Err(ReaderError::NoMatch {
                date,
                feed_source: source.map(str::to_string),
            });
        }
        Ok(matched)
    }

    // Whole-file overwrite; the load -> merge -> persist sequence is not
    // transactional.
    fn persist(&self, feeds: &[Feed]) -> Result<()> {
        let data = serde_json::to_string(feeds)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
