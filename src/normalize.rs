//! Normalization of raw source payloads into [`CanonicalArticle`] records.
//!
//! Every source is mapped with the same field rules:
//!
//! | Field | Taken from |
//! |-------|------------|
//! | `title` | `title` |
//! | `description` | `description` |
//! | `publishedAt` | first non-empty of `publishedAt`, `published` |
//! | `source` | `source.name`, else `"Unknown"` |
//! | `url` | `url` |
//! | `content` | first non-empty of `content`, `body`, then truncation policy, then trimmed |
//!
//! Bad data never aborts a batch. Entries that are not JSON objects are
//! skipped and reported as a [`Diagnostic`]; missing fields are defaulted.

use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::models::{CanonicalArticle, TruncationMode, UNKNOWN_SOURCE};
use crate::sources::{SourceJob, SourceKind};
use crate::utils::{apply_truncation, truncate_for_log};

const PREVIEW_CHARS: usize = 80;

/// A recoverable problem found while normalizing a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The source name matched no [`SourceKind`]; nothing was normalized.
    UnknownSourceKind { name: String },
    /// The payload has no article list where the source keeps one.
    MissingArticleList { source: SourceKind },
    /// An entry in the article list is not a record and was skipped.
    MalformedEntry {
        source: SourceKind,
        index: usize,
        preview: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownSourceKind { name } => write!(f, "unknown source: {}", name),
            Diagnostic::MissingArticleList { source } => match source.list_key() {
                Some(key) => write!(f, "{}: payload has no `{}` list", source, key),
                None => write!(f, "{}: payload is not a list", source),
            },
            Diagnostic::MalformedEntry { source, index, preview } => {
                write!(f, "{}: unexpected article format at #{}: {}", source, index, preview)
            }
        }
    }
}

/// Records and diagnostics from one normalization pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    pub articles: Vec<CanonicalArticle>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Normalize one source's raw payload, keeping the diagnostics.
///
/// # Arguments
///
/// * `raw` - The decoded payload exactly as the source delivered it
/// * `kind` - Which source the payload came from
/// * `mode` - Truncation marker policy applied to `content`
///
/// # Returns
///
/// A [`Normalized`] holding one record per well-formed entry, in payload
/// order, and one [`Diagnostic`] per skipped entry or missing list.
pub fn normalize_report(raw: &Value, kind: SourceKind, mode: TruncationMode) -> Normalized {
    let mut report = Normalized::default();

    let Some(entries) = kind.articles(raw) else {
        report
            .diagnostics
            .push(Diagnostic::MissingArticleList { source: kind });
        return report;
    };

    for (index, entry) in entries.iter().enumerate() {
        match entry.as_object() {
            Some(record) => report.articles.push(normalize_entry(record, mode)),
            None => report.diagnostics.push(Diagnostic::MalformedEntry {
                source: kind,
                index,
                preview: truncate_for_log(&entry.to_string(), PREVIEW_CHARS),
            }),
        }
    }

    report
}

/// Normalize one source's raw payload.
///
/// Diagnostics are logged at `warn` level and dropped.
#[instrument(level = "debug", skip(raw), fields(source = %kind))]
pub fn normalize(raw: &Value, kind: SourceKind, mode: TruncationMode) -> Vec<CanonicalArticle> {
    let report = normalize_report(raw, kind, mode);
    log_diagnostics(&report.diagnostics);
    debug!(
        articles = report.articles.len(),
        skipped = report.diagnostics.len(),
        "Normalized payload"
    );
    report.articles
}

/// Normalize a payload for a source given by name.
///
/// An unrecognized name yields no records and a logged
/// [`Diagnostic::UnknownSourceKind`], whatever the payload holds.
pub fn normalize_named(raw: &Value, name: &str, mode: TruncationMode) -> Vec<CanonicalArticle> {
    match name.parse::<SourceKind>() {
        Ok(kind) => normalize(raw, kind, mode),
        Err(e) => {
            log_diagnostics(&[Diagnostic::UnknownSourceKind { name: e.0 }]);
            Vec::new()
        }
    }
}

/// Normalize every loaded source into one output sequence.
///
/// Records are concatenated in job order. A source that yields nothing, or
/// is unknown, leaves the others untouched.
///
/// # Arguments
///
/// * `jobs` - The configured sources, in processing order
/// * `payloads` - One slot per job, as returned by [`crate::sources::load_all`];
///   `None` marks a job whose source name is unknown
/// * `mode` - Truncation marker policy applied to `content`
///
/// # Returns
///
/// The concatenated records and the article URLs of every known source.
pub fn normalize_all(
    jobs: &[SourceJob],
    payloads: &[Option<Value>],
    mode: TruncationMode,
) -> (Vec<CanonicalArticle>, Vec<String>) {
    let mut articles = Vec::new();
    let mut urls = Vec::new();
    let null = Value::Null;

    for (job, payload) in jobs.iter().zip(payloads) {
        info!(source = %job.name, "Processing raw payload");
        let payload = payload.as_ref().unwrap_or(&null);
        let normalized = normalize_named(payload, &job.name, mode);
        info!(source = %job.name, count = normalized.len(), "Normalized articles");
        articles.extend(normalized);

        if let Some(kind) = job.kind() {
            urls.extend(kind.extract_urls(payload));
        }
    }

    (articles, urls)
}

fn log_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        warn!(%diagnostic, "Skipped data while normalizing");
    }
}

fn normalize_entry(record: &Map<String, Value>, mode: TruncationMode) -> CanonicalArticle {
    let content = first_non_empty(record, "content", "body")
        .map(|body| apply_truncation(&body, mode).trim().to_string());

    CanonicalArticle {
        title: text(record, "title"),
        description: text(record, "description"),
        publishedAt: first_non_empty(record, "publishedAt", "published"),
        source: source_name(record),
        url: text(record, "url"),
        content,
    }
}

/// Scalar field as text. Objects, arrays and `null` count as absent.
fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn first_non_empty(record: &Map<String, Value>, primary: &str, fallback: &str) -> Option<String> {
    text(record, primary)
        .filter(|s| !s.is_empty())
        .or_else(|| text(record, fallback).filter(|s| !s.is_empty()))
}

/// Publisher name from `source.name`. Feed entries sometimes carry a bare
/// string instead of an object.
fn source_name(record: &Map<String, Value>) -> String {
    let name = match record.get("source") {
        Some(Value::Object(source)) => text(source, "name"),
        Some(Value::String(name)) => Some(name.clone()),
        _ => None,
    };
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}
