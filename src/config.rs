//! Run configuration: CLI flags over an optional YAML file over defaults.
//!
//! ```yaml
//! raw_dir: data/raw
//! output: data/processed/processed_news_data.json
//! urls_output: data/urls/article_urls.json
//! truncation: truncate-aware
//! sources:
//!   - name: news_api
//!   - name: cnn
//!     file: cnn_entries.json
//! ```
//!
//! Source files are resolved relative to `raw_dir`. Sources named on the
//! command line restrict the run to those names.

use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::cli::Cli;
use crate::models::TruncationMode;
use crate::sources::{SourceJob, SourceKind};

pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_OUTPUT: &str = "data/processed/processed_news_data.json";

/// One `sources` entry in the config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
}

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub raw_dir: Option<String>,
    pub output: Option<String>,
    pub urls_output: Option<String>,
    pub truncation: Option<TruncationMode>,
    pub sources: Option<Vec<SourceEntry>>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        let config = Self::from_yaml(&yaml)
            .map_err(|e| format!("invalid config {}: {}", path.display(), e))?;
        debug!(?config, "Loaded config file");
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub output: PathBuf,
    pub urls_output: Option<PathBuf>,
    pub truncation: TruncationMode,
    pub jobs: Vec<SourceJob>,
}

impl PipelineConfig {
    /// Resolve CLI arguments, loading the config file they point at.
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(Path::new(path))?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(cli, file))
    }

    /// Merge CLI arguments over an already loaded config file.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Self {
        let raw_dir = PathBuf::from(
            cli.raw_dir
                .clone()
                .or(file.raw_dir)
                .unwrap_or_else(|| DEFAULT_RAW_DIR.to_string()),
        );

        let entries = file.sources.unwrap_or_else(|| {
            SourceKind::ALL
                .iter()
                .map(|kind| SourceEntry {
                    name: kind.name().to_string(),
                    file: None,
                })
                .collect()
        });

        let jobs = if cli.sources.is_empty() {
            entries
                .iter()
                .map(|e| SourceJob::new(&raw_dir, &e.name, e.file.as_deref()))
                .collect()
        } else {
            // CLI names pick from the configured entries, keeping custom files
            let files: HashMap<&str, Option<&str>> = entries
                .iter()
                .map(|e| (e.name.trim(), e.file.as_deref()))
                .collect();
            cli.sources
                .iter()
                .map(|name| {
                    let file = files.get(name.trim()).copied().flatten();
                    SourceJob::new(&raw_dir, name, file)
                })
                .collect()
        };

        Self {
            output: PathBuf::from(
                cli.output
                    .clone()
                    .or(file.output)
                    .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
            ),
            urls_output: cli.urls_output.clone().or(file.urls_output).map(PathBuf::from),
            truncation: cli.truncation.or(file.truncation).unwrap_or_default(),
            jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("news_normalizer").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_cover_every_source() {
        let config = PipelineConfig::resolve(&cli(&[]), FileConfig::default());

        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.urls_output, None);
        assert_eq!(config.truncation, TruncationMode::Preserve);
        let names: Vec<&str> = config.jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["news_api", "currents", "gnews", "cnn"]);
        assert_eq!(config.jobs[3].path, PathBuf::from("data/raw/cnn_raw.json"));
    }

    #[test]
    fn test_parse_yaml_config() {
        let file = FileConfig::from_yaml(
            r#"
raw_dir: /srv/raw
truncation: truncate-aware
urls_output: /srv/urls.json
sources:
  - name: gnews
  - name: cnn
    file: cnn_entries.json
"#,
        )
        .unwrap();

        let config = PipelineConfig::resolve(&cli(&[]), file);
        assert_eq!(config.truncation, TruncationMode::TruncateAware);
        assert_eq!(config.urls_output, Some(PathBuf::from("/srv/urls.json")));
        assert_eq!(
            config.jobs,
            vec![
                SourceJob {
                    name: "gnews".to_string(),
                    path: PathBuf::from("/srv/raw/gnews_raw.json"),
                },
                SourceJob {
                    name: "cnn".to_string(),
                    path: PathBuf::from("/srv/raw/cnn_entries.json"),
                },
            ]
        );
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig::from_yaml(
            "raw_dir: /srv/raw\ntruncation: strip\noutput: /srv/out.json\nsources:\n  - name: cnn\n    file: feed.json\n",
        )
        .unwrap();
        let config = PipelineConfig::resolve(
            &cli(&["-r", "local", "-t", "preserve", "-s", "cnn", "-s", "currents"]),
            file,
        );

        assert_eq!(config.truncation, TruncationMode::Preserve);
        assert_eq!(config.output, PathBuf::from("/srv/out.json"));
        assert_eq!(config.jobs[0].path, PathBuf::from("local/feed.json"));
        assert_eq!(config.jobs[1].path, PathBuf::from("local/currents_raw.json"));
    }

    #[test]
    fn test_unknown_names_are_kept_as_jobs() {
        let config = PipelineConfig::resolve(&cli(&["-s", "reuters"]), FileConfig::default());
        assert_eq!(config.jobs[0].name, "reuters");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(FileConfig::from_yaml("raw_directory: x\n").is_err());
        assert!(FileConfig::from_yaml("truncation: chop\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/news.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
