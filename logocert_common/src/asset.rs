//! Test asset table (`[IMAGES]`).
//!
//! Every asset is a file name relative to one base directory. The base is
//! made absolute at load time; files are not required to exist, the test
//! that prints them checks that lazily. File names may only contain normal
//! path components so an asset can never point outside the base.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::config::path_to_source;
use crate::error::{ExportError, SchemaError};

/// Derived PWG raster assets, generated once by the local printing suite
/// and named after the printer under test.
pub const DERIVED_ASSETS: [(&str, &str); 2] = [("PWG1", "testpage.pwg"), ("PWG2", "rosemary.pwg")];

#[derive(Debug, Clone, PartialEq, Eq)]
struct AssetEntry {
    file: PathBuf,
    derived: bool,
}

/// Logical asset name to file, all under [`base_dir`](Self::base_dir).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTable {
    base_dir: PathBuf,
    entries: BTreeMap<String, AssetEntry>,
}

impl AssetTable {
    /// Build the table.
    ///
    /// `base_dir` is joined onto `anchor` when relative. `model` and `name`
    /// come from the printer profile and name the derived PWG assets.
    pub fn from_raw(
        base_dir: &str,
        files: &BTreeMap<String, String>,
        anchor: &Path,
        model: &str,
        name: &str,
    ) -> Result<Self, SchemaError> {
        if base_dir.is_empty() {
            return Err(SchemaError::EmptyValue {
                group: "IMAGES",
                key: "BASE_DIR".to_string(),
            });
        }
        let base = Path::new(base_dir);
        let base_dir = if base.is_absolute() {
            base.to_path_buf()
        } else {
            anchor.join(base)
        };

        let mut entries = BTreeMap::new();
        for (asset, file) in files {
            if asset.is_empty() {
                return Err(SchemaError::EmptyValue {
                    group: "IMAGES",
                    key: asset.clone(),
                });
            }
            if DERIVED_ASSETS.iter().any(|(d, _)| *d == asset.as_str()) {
                return Err(SchemaError::DerivedAsset(asset.clone()));
            }
            let file = checked_file(asset, file)?;
            entries.insert(
                asset.clone(),
                AssetEntry {
                    file,
                    derived: false,
                },
            );
        }

        for (asset, suffix) in DERIVED_ASSETS {
            let file = [model, name, suffix].join("-");
            let file = checked_file(asset, &file)?;
            entries.insert(
                asset.to_string(),
                AssetEntry {
                    file,
                    derived: true,
                },
            );
        }

        Ok(Self { base_dir, entries })
    }

    /// Absolute base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Absolute path of `asset`, or `None` when not defined.
    pub fn resolve(&self, asset: &str) -> Option<PathBuf> {
        self.entries.get(asset).map(|e| self.base_dir.join(&e.file))
    }

    /// Whether `asset` is computed from the printer profile.
    pub fn is_derived(&self, asset: &str) -> bool {
        self.entries.get(asset).is_some_and(|e| e.derived)
    }

    /// Asset names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of assets, derived ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no asset is defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operator-supplied entries only; derived ones are recomputed on load.
    pub(crate) fn to_raw(&self) -> Result<BTreeMap<String, String>, ExportError> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.derived)
            .map(|(k, e)| path_to_source("IMAGES", k, &e.file).map(|file| (k.clone(), file)))
            .collect()
    }
}

/// Accept `file` only if it stays inside the base directory lexically.
fn checked_file(asset: &str, file: &str) -> Result<PathBuf, SchemaError> {
    let reject = |reason: &'static str| SchemaError::InvalidAssetPath {
        name: asset.to_string(),
        path: file.to_string(),
        reason,
    };

    if file.is_empty() {
        return Err(reject("empty file name"));
    }
    if file.contains('\0') {
        return Err(reject("contains a NUL byte"));
    }

    let mut path = PathBuf::new();
    for component in Path::new(file).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir => return Err(reject("leaves the base directory")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(reject("must be relative to the base directory"));
            }
        }
    }
    if path.file_name().is_none() {
        return Err(reject("does not name a file"));
    }

    Ok(path)
}
