pub mod cli;
pub mod fetcher;
pub mod normalize;
pub mod parser;
pub mod query;
pub mod render;
pub mod store;
pub mod types;

pub use cli::{Cli, Config};
pub use fetcher::{FetchConfig, Fetcher};
pub use parser::{fetch_feed, parse_feed};
pub use store::Store;
pub use types::{Feed, FeedItem, RawEntry, ReaderError, Result};
