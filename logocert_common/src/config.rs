//! Source schema and loading.
//!
//! [`RawConfig`] mirrors the TOML source one to one. Record groups reject
//! unknown fields; map groups (`CAPS`, `SLEEP`, `TIMEOUT`, `IMAGES`) are
//! kept as ordered maps and checked against their closed key sets when the
//! [`ConfigRegistry`](crate::registry::ConfigRegistry) is built.
//!
//! # TOML Example
//!
//! ```toml
//! [SLEEP]
//! POLL = 1
//! REG_CANCEL = 5
//!
//! [TEST]
//! RUN = ["SystemUnderTest", "#Privet"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::EMBEDDED_CONFIG;
use crate::error::{ExportError, SchemaError};

/// Where a configuration comes from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// TOML file. Relative paths inside resolve against its directory.
    File(&'a Path),
    /// In-memory TOML. Relative paths inside resolve against `anchor`.
    Toml { text: &'a str, anchor: &'a Path },
    /// Defaults compiled into the crate. Relative paths resolve against
    /// the working directory.
    Embedded,
}

impl Source<'_> {
    /// Parse the source and return it with its absolute anchor directory.
    pub fn read(&self) -> Result<(RawConfig, PathBuf), SchemaError> {
        match *self {
            Source::File(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        SchemaError::NotFound(path.to_path_buf())
                    } else {
                        SchemaError::Io {
                            path: path.to_path_buf(),
                            reason: e.to_string(),
                        }
                    }
                })?;
                let dir = path.parent().unwrap_or(Path::new(""));
                Ok((RawConfig::from_toml(&content)?, absolute(dir)?))
            }
            Source::Toml { text, anchor } => Ok((RawConfig::from_toml(text)?, absolute(anchor)?)),
            Source::Embedded => Ok((RawConfig::from_toml(EMBEDDED_CONFIG)?, absolute(Path::new(""))?)),
        }
    }
}

/// `dir` joined onto the working directory when relative.
pub(crate) fn absolute(dir: &Path) -> Result<PathBuf, SchemaError> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| SchemaError::Io {
        path: dir.to_path_buf(),
        reason: format!("cannot resolve working directory: {e}"),
    })?;
    Ok(if dir.as_os_str().is_empty() {
        cwd
    } else {
        cwd.join(dir)
    })
}

/// `path` as a source string, refusing lossy conversion.
pub(crate) fn path_to_source(
    group: &'static str,
    key: &str,
    path: &Path,
) -> Result<String, ExportError> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| ExportError::NonUtf8Path {
            group,
            key: key.to_string(),
            path: path.to_path_buf(),
        })
}

/// Whole configuration source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RawConfig {
    pub auth: RawAuth,
    pub caps: BTreeMap<String, bool>,
    pub sleep: BTreeMap<String, f64>,
    pub timeout: BTreeMap<String, f64>,
    pub gcp: RawGcp,
    pub printer: RawPrinter,
    pub images: RawImages,
    pub test: RawTest,
    pub url: RawUrl,
    pub user: RawUser,
    pub user2: RawUser2,
}

impl RawConfig {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// `[AUTH]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RawAuth {
    pub accounts: String,
    pub oauth: String,
    pub oauth_token: String,
    pub cred_file: String,
    pub redirect: String,
    /// Space-delimited scope URIs.
    pub scope: String,
    pub user_agent: String,
}

/// `[GCP]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RawGcp {
    pub mgt: String,
}

/// `[PRINTER]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RawPrinter {
    pub certid: String,
    pub firmware: String,
    pub ip: String,
    pub manufacturer: String,
    pub model: String,
    pub name: String,
    pub port: String,
    pub serial: String,
    pub status: String,
}

/// `[IMAGES]`: `BASE_DIR` plus one `NAME = "file"` entry per asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImages {
    #[serde(rename = "BASE_DIR")]
    pub base_dir: String,
    #[serde(flatten)]
    pub files: BTreeMap<String, String>,
}

/// `[TEST]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RawTest {
    /// Results sheet name. Derived from the printer when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Results sheet header row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<String>>,
    pub spreadsheet: bool,
    pub share_sheet_with_google: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_team_email: Option<String>,
    pub force_color_output: bool,
    /// False when a person must judge printed output.
    pub automode: bool,
    pub log_dir: String,
    /// Run order; `#` prefix skips an entry.
    pub run: Vec<String>,
}

/// `[URL]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RawUrl {
    /// HTTP request timeout in seconds.
    pub timeout: f64,
}

/// `[USER]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RawUser {
    pub client_id: String,
    pub client_secret: String,
    pub email: String,
}

/// `[USER2]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct RawUser2 {
    pub email: String,
}
