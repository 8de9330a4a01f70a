//! Command-line interface definitions for the news normalizer.
//!
//! Every option can also be set through an environment variable. Options
//! left unset fall back to the YAML config file, then to built-in defaults
//! (see [`crate::config`]).

use clap::Parser;

use crate::models::TruncationMode;

/// Command-line arguments for the news normalizer.
///
/// # Examples
///
/// ```sh
/// # Process every source from data/raw with defaults
/// news_normalizer
///
/// # Only two sources, cutting provider truncation markers
/// news_normalizer -s news_api -s cnn -t truncate-aware
///
/// # Also maintain the article URL index
/// news_normalizer -u data/urls/article_urls.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the raw payload files
    #[arg(short, long, env = "NEWS_RAW_DIR")]
    pub raw_dir: Option<String>,

    /// Path of the processed articles JSON file
    #[arg(short, long, env = "NEWS_PROCESSED_OUTPUT")]
    pub output: Option<String>,

    /// Path of the article URL index to update
    #[arg(short, long, env = "NEWS_URLS_OUTPUT")]
    pub urls_output: Option<String>,

    /// How trailing `[+N chars]` truncation markers in content are handled
    #[arg(short, long, value_enum, env = "NEWS_TRUNCATION_MODE")]
    pub truncation: Option<TruncationMode>,

    /// Source to process (repeatable); defaults to every known source
    #[arg(short, long = "source")]
    pub sources: Vec<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "NEWS_CONFIG")]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news_normalizer"]);

        assert_eq!(cli.raw_dir, None);
        assert_eq!(cli.truncation, None);
        assert!(cli.sources.is_empty());
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "news_normalizer",
            "--raw-dir",
            "/tmp/raw",
            "--output",
            "/tmp/processed.json",
            "--truncation",
            "truncate-aware",
            "--source",
            "gnews",
        ]);

        assert_eq!(cli.raw_dir.as_deref(), Some("/tmp/raw"));
        assert_eq!(cli.output.as_deref(), Some("/tmp/processed.json"));
        assert_eq!(cli.truncation, Some(TruncationMode::TruncateAware));
        assert_eq!(cli.sources, vec!["gnews"]);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "news_normalizer",
            "-r",
            "raw",
            "-u",
            "urls.json",
            "-t",
            "strip",
            "-s",
            "news_api",
            "-s",
            "cnn",
        ]);

        assert_eq!(cli.urls_output.as_deref(), Some("urls.json"));
        assert_eq!(cli.truncation, Some(TruncationMode::Strip));
        assert_eq!(cli.sources, vec!["news_api", "cnn"]);
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["news_normalizer", "-t", "chop"]).is_err());
    }
}
