//! JSON output for processed articles and the article URL index.
//!
//! Both files are written as JSON indented with four spaces:
//!
//! ```text
//! data/
//! ├── processed/
//! │   └── processed_news_data.json   # [CanonicalArticle, ...]
//! └── urls/
//!     └── article_urls.json          # ["https://...", ...]
//! ```
//!
//! The URL index accumulates across runs; the processed file is replaced.

use itertools::Itertools;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::CanonicalArticle;

/// Serialize a value as JSON with four-space indentation.
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let json = to_indented_json(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    Ok(())
}

/// Write the processed article list, replacing any previous file.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(path: &Path, articles: &[CanonicalArticle]) -> Result<(), Box<dyn Error>> {
    write_json(path, articles).await?;
    info!("Wrote processed articles");
    Ok(())
}

/// Merge new article URLs into the URL index file.
///
/// Existing URLs keep their position; new ones are appended in the order
/// given and duplicates are dropped, including duplicates already in the
/// file.
///
/// # Arguments
///
/// * `path` - Location of the URL index; created if missing
/// * `urls` - Article URLs collected in this run
///
/// # Returns
///
/// How many URLs were not already in the index.
///
/// # Errors
///
/// Returns an error if an existing index cannot be read or decoded, or the
/// merged index cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display(), candidates = urls.len()))]
pub async fn update_url_index(path: &Path, urls: Vec<String>) -> Result<usize, Box<dyn Error>> {
    let existing: Vec<String> = match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| format!("failed to decode URL index {}: {}", path.display(), e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    // Legacy indexes may already hold duplicates
    let existing: Vec<String> = existing.into_iter().unique().collect();
    let before = existing.len();

    let merged: Vec<String> = existing.into_iter().chain(urls).unique().collect();
    let added = merged.len().saturating_sub(before);

    write_json(path, &merged).await?;
    info!(added, total = merged.len(), "Updated URL index");
    Ok(added)
}
