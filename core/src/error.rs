#![deny(missing_docs)]

//! # Error Handling
//!
//! Error and result types shared across the workspace.
//!
//! Resolution itself never fails — classification is total and a mapping
//! miss is ordinary control flow — so everything here comes from the
//! process boundary: reading the metadata document, parsing it, or writing
//! the generated TypeScript.

use derive_more::{Display, From};

/// Workspace-wide error enum.
#[derive(Debug, Display, From)]
pub enum MapperError {
    /// Reading an input document or writing generated output failed.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A JSON document could not be parsed.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// A YAML document could not be parsed.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// The metadata document parsed but its cross-references are broken
    /// (e.g. a member pointing at a type id the universe does not have).
    /// Excluded from `From<String>` so plain strings keep converting to
    /// `General`.
    #[from(ignore)]
    #[display("Metadata Error: {_0}")]
    Metadata(String),

    /// Anything else.
    #[display("General Error: {_0}")]
    General(String),
}

/// `derive(Error)` would generate `source()` for the `String`-carrying
/// variants, and `String` is not an error type; implementing the trait by
/// hand sidesteps that.
impl std::error::Error for MapperError {}

/// Result alias used throughout the workspace.
pub type MapperResult<T> = Result<T, MapperError>;
