//! Helpers for content cleanup, logging and file system checks.
//!
//! - Truncation marker handling for article bodies
//! - String truncation for log previews
//! - JSON error detection for payloads cut off mid-document
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

use crate::models::TruncationMode;

/// Trailing `[+<ASCII digits> chars]` marker, optionally followed by whitespace.
static TRUNCATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\+[0-9]+ chars\]\s*$").unwrap());

const ELLIPSIS: char = '…';

/// Apply a [`TruncationMode`] to article content.
///
/// When the content ends with a truncation marker, everything from the first
/// ellipsis onward is cut (or from the marker itself if there is no
/// ellipsis). `TruncateAware` then re-appends the marker after a single
/// space; `Strip` drops it. Content without a marker is returned unchanged.
///
/// # Arguments
///
/// * `content` - Article body as delivered by the source
/// * `mode` - The policy to apply
///
/// # Returns
///
/// The processed content. Surrounding whitespace is left for the caller
/// to trim.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(apply_truncation("abc…[+120 chars]", TruncationMode::TruncateAware), "abc [+120 chars]");
/// assert_eq!(apply_truncation("abc…[+120 chars]", TruncationMode::Strip), "abc");
/// ```
pub fn apply_truncation(content: &str, mode: TruncationMode) -> String {
    if mode == TruncationMode::Preserve {
        return content.to_string();
    }
    let Some(found) = TRUNCATION_MARKER.find(content) else {
        return content.to_string();
    };

    let marker = found.as_str().trim_end();
    let head = &content[..found.start()];
    let kept = match head.find(ELLIPSIS) {
        Some(idx) => &head[..idx],
        None => head,
    }
    .trim_end();

    match mode {
        TruncationMode::TruncateAware if kept.is_empty() => marker.to_string(),
        TruncationMode::TruncateAware => format!("{} {}", kept, marker),
        _ => kept.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended. Cuts always fall on a character boundary.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Detect if a serde_json error means the document ended early.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Sync probe: simpler error surface than the async API
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
