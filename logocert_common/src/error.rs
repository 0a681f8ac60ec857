//! Error types for configuration loading and registry queries.
//!
//! Two families:
//! - [`SchemaError`] - structural problems found while loading. Always fatal,
//!   no registry is produced.
//! - [`QueryError`] - a collaborator asked for a key the loaded
//!   configuration does not define. These are programming errors on the
//!   caller's side and are never retried.
//!
//! [`ExportError`] covers the way back, rendering a loaded registry as its
//! source.

use std::path::PathBuf;
use thiserror::Error;

use crate::duration::DurationTableKind;

/// Error returned by [`ConfigRegistry::load`](crate::registry::ConfigRegistry::load).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Configuration file not found at the given path.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Configuration file exists but could not be read.
    #[error("failed to read configuration {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },

    /// TOML syntax error, wrong value type, missing record field, or an
    /// unknown group/field rejected by the record schema.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A required key of a closed key set is absent.
    #[error("missing key {group}.{key}")]
    MissingKey { group: &'static str, key: String },

    /// A key outside the closed key set of its group.
    #[error("unknown key {group}.{key}")]
    UnknownKey { group: &'static str, key: String },

    /// A string field that must carry a value is empty.
    #[error("{group}.{key} must not be empty")]
    EmptyValue { group: &'static str, key: String },

    /// Duration is negative, NaN or infinite.
    #[error("{group}.{key} must be a finite, non-negative number of seconds, got {value}")]
    InvalidDuration {
        group: &'static str,
        key: String,
        value: f64,
    },

    /// Asset file name does not stay inside the base directory.
    #[error("asset {name} has malformed path {path:?}: {reason}")]
    InvalidAssetPath {
        name: String,
        path: String,
        reason: &'static str,
    },

    /// A derived asset (PWG1/PWG2) was supplied explicitly.
    #[error("asset {0} is derived from PRINTER.MODEL and PRINTER.NAME and cannot be set")]
    DerivedAsset(String),

    /// A URL or URI field is not well formed.
    #[error("{group}.{key} is not a well-formed URI: {value:?}")]
    InvalidUri {
        group: &'static str,
        key: String,
        value: String,
    },

    /// `AUTH.SCOPE` holds no scope URIs.
    #[error("AUTH.SCOPE must list at least one scope URI")]
    EmptyScope,

    /// Run order names a test class that does not exist.
    #[error("TEST.RUN entry {0:?} is not a known test class")]
    UnknownTestClass(String),

    /// Run order names the same test class twice.
    #[error("TEST.RUN lists {0} more than once")]
    DuplicateTestClass(String),
}

/// Error returned by registry lookups with a string key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Capability name outside the fixed enumeration.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    /// Duration key not defined for the given table.
    #[error("unknown duration key {table}.{name}")]
    UnknownDurationKey {
        table: DurationTableKind,
        name: String,
    },

    /// Asset name not present in the asset table.
    #[error("unknown asset: {0}")]
    UnknownAsset(String),
}

/// Error returned by [`ConfigRegistry::to_source`](crate::registry::ConfigRegistry::to_source).
#[derive(Debug, Error)]
pub enum ExportError {
    /// A path holds bytes a TOML string cannot carry unchanged.
    #[error("{group}.{key} path {} is not valid UTF-8", .path.display())]
    NonUtf8Path {
        group: &'static str,
        key: String,
        path: PathBuf,
    },

    /// TOML rendering failed.
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

impl From<toml::de::Error> for SchemaError {
    fn from(e: toml::de::Error) -> Self {
        SchemaError::Parse(e.to_string())
    }
}
