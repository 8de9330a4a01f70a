//! Upstream news sources and their raw payload shapes.
//!
//! Raw payloads are fetched and saved to disk by an external fetcher. Each
//! source wraps its articles differently:
//!
//! | Source | Name | Raw file | Article list | URL key |
//! |--------|------|----------|--------------|---------|
//! | NewsAPI | `news_api` | `news_api_raw.json` | `articles` | `url` |
//! | Currents | `currents` | `currents_raw.json` | `news` | `url` |
//! | GNews | `gnews` | `gnews_raw.json` | `articles` | `url` |
//! | CNN RSS | `cnn` | `cnn_raw.json` | the payload itself | `link` |
//!
//! Adding a source means adding a [`SourceKind`] variant; every `match`
//! below then has to handle it.

use futures::future::try_join_all;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::utils::looks_truncated;

/// A supported upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// NewsAPI top headlines: `{"articles": [...]}`.
    NewsApi,
    /// Currents latest news: `{"news": [...]}`.
    Currents,
    /// GNews top headlines: `{"articles": [...]}`.
    GNews,
    /// CNN RSS feed entries saved as a bare list.
    CnnFeed,
}

impl SourceKind {
    /// All sources, in the order a full run processes them.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::NewsApi,
        SourceKind::Currents,
        SourceKind::GNews,
        SourceKind::CnnFeed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::NewsApi => "news_api",
            SourceKind::Currents => "currents",
            SourceKind::GNews => "gnews",
            SourceKind::CnnFeed => "cnn",
        }
    }

    /// File name the fetcher saves this source's raw payload under.
    pub fn raw_file_name(self) -> &'static str {
        match self {
            SourceKind::NewsApi => "news_api_raw.json",
            SourceKind::Currents => "currents_raw.json",
            SourceKind::GNews => "gnews_raw.json",
            SourceKind::CnnFeed => "cnn_raw.json",
        }
    }

    /// Key holding the article list, or `None` when the payload is the list.
    pub fn list_key(self) -> Option<&'static str> {
        match self {
            SourceKind::NewsApi | SourceKind::GNews => Some("articles"),
            SourceKind::Currents => Some("news"),
            SourceKind::CnnFeed => None,
        }
    }

    /// Key holding an entry's article link.
    pub fn url_key(self) -> &'static str {
        match self {
            SourceKind::CnnFeed => "link",
            _ => "url",
        }
    }

    /// Locate the article list inside a raw payload.
    ///
    /// Returns `None` when the expected key is missing or is not a list.
    pub fn articles(self, raw: &Value) -> Option<&Vec<Value>> {
        match self.list_key() {
            Some(key) => raw.get(key)?.as_array(),
            None => raw.as_array(),
        }
    }

    /// Collect article links from a raw payload, skipping entries without one.
    pub fn extract_urls(self, raw: &Value) -> Vec<String> {
        let key = self.url_key();
        self.articles(raw)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get(key)?.as_str())
                    .filter(|url| !url.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A source name that matches no [`SourceKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSourceKind(pub String);

impl fmt::Display for UnknownSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown source: {}", self.0)
    }
}

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownSourceKind(name.to_string()))
    }
}

/// One raw payload file to process, keyed by the source name it claims.
///
/// The name stays a string until normalization so that a misconfigured
/// source is reported and skipped rather than rejected up front. Jobs with
/// an unknown name are never loaded (see [`load_all`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceJob {
    pub name: String,
    pub path: PathBuf,
}

impl SourceJob {
    /// Build the job for one configured source.
    ///
    /// # Arguments
    ///
    /// * `raw_dir` - Directory the raw payload files live in
    /// * `name` - Source name as configured; surrounding whitespace is dropped
    /// * `file` - File name override, relative to `raw_dir`
    ///
    /// # Returns
    ///
    /// A job whose path is `raw_dir/file`, or `raw_dir/<default file>` for a
    /// known source. Unknown names get `{name}_raw.json`.
    pub fn new(raw_dir: &Path, name: &str, file: Option<&str>) -> Self {
        let file = match (file, name.parse::<SourceKind>()) {
            (Some(file), _) => file.to_string(),
            (None, Ok(kind)) => kind.raw_file_name().to_string(),
            (None, Err(_)) => format!("{}_raw.json", name.trim()),
        };
        Self {
            name: name.trim().to_string(),
            path: raw_dir.join(file),
        }
    }

    /// The job's source, if its name is a known one.
    pub fn kind(&self) -> Option<SourceKind> {
        self.name.parse().ok()
    }
}

/// Read and decode one raw payload file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON. A
/// payload cut off mid-document is called out in the log.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_raw_payload(path: &Path) -> Result<Value, Box<dyn Error>> {
    let bytes = fs::read(path).await.map_err(|e| {
        format!("failed to read raw payload {}: {}", path.display(), e)
    })?;
    debug!(bytes = bytes.len(), "Read raw payload");

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => Ok(value),
        Err(e) => {
            if looks_truncated(&e) {
                warn!(error = %e, "Raw payload ends mid-document; was the fetch interrupted?");
            }
            Err(format!("failed to decode raw payload {}: {}", path.display(), e).into())
        }
    }
}

/// Load every job's payload concurrently, preserving job order.
///
/// Jobs with an unknown source name are not read; their slot is `None` so
/// normalization can report them without the run failing.
///
/// # Arguments
///
/// * `jobs` - The configured sources, in processing order
///
/// # Returns
///
/// One entry per job: the decoded payload, or `None` for an unknown source.
///
/// # Errors
///
/// Returns the first read or decode error of a known source.
#[instrument(level = "info", skip_all, fields(jobs = jobs.len()))]
pub async fn load_all(jobs: &[SourceJob]) -> Result<Vec<Option<Value>>, Box<dyn Error>> {
    let payloads = try_join_all(jobs.iter().map(|job| async move {
        match job.kind() {
            Some(_) => load_raw_payload(&job.path).await.map(Some),
            None => {
                debug!(source = %job.name, "Unknown source; not loading its payload");
                Ok(None)
            }
        }
    }))
    .await?;
    info!(
        count = payloads.iter().flatten().count(),
        "Loaded raw payloads"
    );
    Ok(payloads)
}
