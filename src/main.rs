use clap::Parser;
use tracing::{debug, Level};

use rss_reader::cli::{Cli, Config};
use rss_reader::fetcher::{FetchConfig, Fetcher};
use rss_reader::parser::fetch_feed;
use rss_reader::query::{apply_limit, sort_items_desc};
use rss_reader::render;
use rss_reader::store::Store;
use rss_reader::types::{Feed, Result};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = cli.into_config();
    if let Err(err) = run(&config) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let store = Store::new(&config.storage);

    let mut feeds: Vec<Feed> = match (&config.source, config.date) {
        (None, None) => {
            println!("At least one argument is required: source or date.");
            println!(
                "usage: rss_reader [--date DATE] [--limit LIMIT] [--json] [--verbose] \
                 [--to-html DIR] [--to-fb2 DIR] [--storage FILE] [source]"
            );
            return Ok(());
        }
        (Some(source), None) => {
            let fetcher = Fetcher::new(FetchConfig::default())?;
            let feed = fetch_feed(&fetcher, source)?;
            let added = store.merge(&feed)?;
            debug!(
                "Merged {} new items into '{}'",
                added,
                store.path().display()
            );
            vec![feed]
        }
        (source, Some(date)) => store.query(date, source.as_deref())?,
    };

    // The store query path is already ordered; the live path is not.
    for feed in &mut feeds {
        sort_items_desc(&mut feed.items);
    }

    if let Some(dir) = &config.to_html {
        render::html::create_html(&feeds, dir, config.limit)?;
    }
    if let Some(dir) = &config.to_fb2 {
        let fetcher = Fetcher::new(FetchConfig::default())?;
        render::fb2::create_fb2(&feeds, dir, config.limit, &fetcher)?;
    }

    apply_limit(&mut feeds, config.limit);
    if config.json {
        println!("{}", render::json::render_json(&feeds)?);
    } else {
        print!("{}", render::text::render_text(&feeds));
    }
    Ok(())
}
