//! # Error Types / 错误类型
//!
//! Typed errors raised by the core pipeline. The CLI layer wraps these in
//! `anyhow` with extra context; the library keeps them structured so callers
//! can tell a bad source apart from a bad mapping rule.
//!
//! 核心流水线产生的类型化错误。CLI 层使用 `anyhow` 附加上下文，
//! 库层保持结构化，以便调用方区分损坏的输入源和错误的映射规则。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to open or read one input source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A plain XML file could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A zip archive could not be opened or an entry could not be located.
    #[error("cannot read archive {name}: {source}")]
    Archive {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// The bytes of an already opened source could not be read.
    #[error("cannot read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Failure to load or apply the class-name mapping table.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("cannot read mapping file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed escape in mapping file at line {line}: {detail}")]
    Escape { line: usize, detail: String },

    #[error("cannot parse TOML mapping file {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A TOML mapping whose replacement is not a string.
    #[error("replacement for pattern `{pattern}` must be a string")]
    NonStringReplacement { pattern: String },

    #[error("invalid mapping pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The pattern matched but capture group 1 is undefined or did not participate.
    #[error("mapping pattern `{pattern}` matched `{class_name}` but has no capture group 1")]
    MissingGroup { pattern: String, class_name: String },
}

/// Failure while reading one report into the model.
///
/// Results committed before the failure stay in the model.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("malformed XML in {source_name}: {message}")]
    Xml {
        source_name: String,
        message: String,
    },

    #[error("non-numeric time `{value}` for {test} in {source_name}")]
    InvalidDuration {
        source_name: String,
        test: String,
        value: String,
    },

    #[error("name mapping failed in {source_name}: {error}")]
    Mapping {
        source_name: String,
        #[source]
        error: MappingError,
    },
}

impl ReportError {
    /// Builds an [`ReportError::Xml`] from any displayable `quick-xml` error.
    pub(crate) fn xml(source_name: &str, err: impl std::fmt::Display) -> Self {
        ReportError::Xml {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }
    }
}

/// A held resource that could not be released cleanly.
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("{resource} is still referenced by {holders} other owner(s); closing deferred")]
    StillInUse { resource: String, holders: usize },
}
