use clap::Parser;
use rss_reader::cli::{parse_cli_date, Cli};

#[test]
fn date_validation() {
    assert!(parse_cli_date("20211220").is_ok());
    assert!(parse_cli_date("20211320").is_err());
    assert!(parse_cli_date("123").is_err());
    assert!(parse_cli_date("abc").is_err());
}

#[test]
fn invalid_date_is_rejected_at_argument_parsing() {
    let result = Cli::try_parse_from(["rss_reader", "--date", "20211320"]);
    assert!(result.is_err());

    let cli = Cli::try_parse_from(["rss_reader", "--date", "20211026"]).unwrap();
    let config = cli.into_config();
    assert_eq!(config.date.unwrap().to_string(), "2021-10-26");
}

#[test]
fn source_is_canonicalized_in_the_config() {
    let cli = Cli::try_parse_from(["rss_reader", "https://example.com/feed/"]).unwrap();
    let config = cli.into_config();
    assert_eq!(config.source.as_deref(), Some("https://example.com/feed"));
}

#[test]
fn defaults() {
    let cli = Cli::try_parse_from(["rss_reader"]).unwrap();
    let config = cli.into_config();
    assert_eq!(config.limit, 0);
    assert!(!config.json);
    assert!(config.source.is_none());
    assert!(config.date.is_none());
    assert_eq!(config.storage.to_str().unwrap(), "storage.json");
}

#[test]
fn negative_limit_is_accepted_as_unlimited() {
    let cli = Cli::try_parse_from(["rss_reader", "--limit", "-1"]).unwrap();
    assert_eq!(cli.limit, -1);
}
