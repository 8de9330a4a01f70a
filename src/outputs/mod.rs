//! Output generation for processed data.
//!
//! # Submodules
//!
//! - [`json`]: Writes canonical articles and the article URL index as JSON
//!
//! Field order and indentation of the written files are decided here, not
//! by the normalizer.

pub mod json;
