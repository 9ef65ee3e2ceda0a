use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::parser::canonical_source;

/// Get news from an rss feed.
#[derive(Debug, Parser)]
#[command(name = "rss_reader", version, about)]
pub struct Cli {
    /// Rss feed url
    pub source: Option<String>,

    /// Publishing date of news to display, format YYYYMMDD
    #[arg(long, value_parser = parse_cli_date)]
    pub date: Option<NaiveDate>,

    /// Limit of news to display (0 or below means unlimited)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub limit: i64,

    /// Print result as JSON in stdout
    #[arg(long)]
    pub json: bool,

    /// Outputs verbose status messages
    #[arg(long)]
    pub verbose: bool,

    /// Directory to write an html page with the news into
    #[arg(long = "to-html", value_name = "DIR")]
    pub to_html: Option<PathBuf>,

    /// Directory to write an fb2 book with the news into
    #[arg(long = "to-fb2", value_name = "DIR")]
    pub to_fb2: Option<PathBuf>,

    /// Path of the storage file
    #[arg(long, value_name = "FILE", default_value = "storage.json")]
    pub storage: PathBuf,
}

/// Explicit configuration handed to the core entry points; constructed once
/// from the parsed arguments.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: Option<String>,
    pub date: Option<NaiveDate>,
    pub limit: i64,
    pub json: bool,
    pub to_html: Option<PathBuf>,
    pub to_fb2: Option<PathBuf>,
    pub storage: PathBuf,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            // Canonicalize early so fetch, merge and query all see the same
            // source key.
            source: self.source.as_deref().map(canonical_source),
            date: self.date,
            limit: self.limit,
            json: self.json,
            to_html: self.to_html,
            to_fb2: self.to_fb2,
            storage: self.storage,
        }
    }
}

pub fn parse_cli_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| {
        format!("'{value}' is not a valid date, expected format YYYYMMDD (example: 20211021)")
    })
}
