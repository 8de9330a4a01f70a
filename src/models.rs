//! Data models for normalized news articles.
//!
//! This module defines the record shape every source is mapped into:
//! - [`CanonicalArticle`]: one normalized article, source-agnostic
//! - [`TruncationMode`]: how provider truncation markers in `content` are handled
//!
//! The canonical record keeps the camelCase `publishedAt` key used by the
//! upstream APIs and by downstream consumers of the processed JSON, hence the
//! `#[allow(non_snake_case)]` attribute.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Source name used when a raw entry carries no usable `source.name`.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// A news article normalized from any supported source.
///
/// Records are built once by a normalization pass, serialized by the output
/// writer and never mutated afterwards. Field order here is the key order of
/// the processed JSON file.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CanonicalArticle {
    /// The article headline, if the source provided one.
    pub title: Option<String>,
    /// Short description or standfirst.
    pub description: Option<String>,
    /// Publication timestamp as text, exactly as the source wrote it.
    pub publishedAt: Option<String>,
    /// Publisher name, `"Unknown"` when the source gave none.
    pub source: String,
    /// Link to the full article.
    pub url: Option<String>,
    /// Article body, trimmed, with the configured [`TruncationMode`] applied.
    pub content: Option<String>,
}

/// Policy for trailing `[+<N> chars]` truncation markers in article content.
///
/// Providers such as NewsAPI cut long bodies and append a marker telling how
/// many characters were dropped, usually after an ellipsis:
/// `"The storm moved east… [+2140 chars]"`.
///
/// | Mode | `"abc…[+120 chars]"` becomes |
/// |------|------------------------------|
/// | `Preserve` | `"abc…[+120 chars]"` |
/// | `TruncateAware` | `"abc [+120 chars]"` |
/// | `Strip` | `"abc"` |
///
/// Content without a trailing marker is left alone by every mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TruncationMode {
    /// Keep content exactly as delivered ("no-truncate").
    #[default]
    Preserve,
    /// Cut at the first ellipsis and re-append the marker.
    TruncateAware,
    /// Cut at the first ellipsis and drop the marker.
    Strip,
}
