//! Device capability flags (`[CAPS]`).
//!
//! Capabilities decide which certification tests apply to the device under
//! test. The key set is closed: every [`Capability`] must be present in the
//! source and nothing else may be.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::SchemaError;

const GROUP: &str = "CAPS";

/// A device feature the certification suite gates tests on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Collate,
    Color,
    /// Copies for local printing.
    CopiesLocal,
    /// Copies for cloud printing.
    CopiesCloud,
    /// Not all printers have a cover.
    Cover,
    Duplex,
    /// Printer must be told page orientation for local printing.
    LayoutIssue,
    /// Local printing without registration.
    LocalPrint,
    /// False for thermal printers or printers without toner.
    Toner,
    /// Senses an open paper tray.
    TraySensor,
    /// Senses an empty paper tray.
    MediaSensor,
    /// Honors margin specifications.
    Margin,
    /// Sends a Privet goodbye packet on power off.
    GoodbyePacket,
    /// Senses empty ink or toner.
    EmptyInkSensor,
    /// Registration confirmed on the printer panel.
    PrinterPanelUi,
    /// Registration confirmed through a web URL.
    WebUrlUi,
    /// Conversion printing for local jobs.
    ConversionPrint,
}

impl Capability {
    /// Source key, e.g. `"COPIES_LOCAL"`.
    pub fn key(self) -> &'static str {
        self.into()
    }
}

/// One boolean per [`Capability`]. Complete by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    flags: BTreeMap<Capability, bool>,
}

impl CapabilitySet {
    /// Build from the raw `[CAPS]` table, rejecting unknown and missing keys.
    pub fn from_raw(raw: &BTreeMap<String, bool>) -> Result<Self, SchemaError> {
        let mut flags = BTreeMap::new();
        for (key, value) in raw {
            let cap: Capability = key.parse().map_err(|_| SchemaError::UnknownKey {
                group: GROUP,
                key: key.clone(),
            })?;
            flags.insert(cap, *value);
        }

        if let Some(missing) = Capability::iter().find(|c| !flags.contains_key(c)) {
            return Err(SchemaError::MissingKey {
                group: GROUP,
                key: missing.key().to_string(),
            });
        }

        Ok(Self { flags })
    }

    /// Whether the device supports `cap`.
    pub fn get(&self, cap: Capability) -> bool {
        // Every variant is inserted by `from_raw`.
        self.flags.get(&cap).copied().unwrap_or(false)
    }

    /// Iterate `(capability, supported)` in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.flags.iter().map(|(c, v)| (*c, *v))
    }

    /// Capabilities the device supports.
    pub fn supported(&self) -> impl Iterator<Item = Capability> + '_ {
        self.iter().filter(|(_, v)| *v).map(|(c, _)| c)
    }

    pub(crate) fn to_raw(&self) -> BTreeMap<String, bool> {
        self.iter().map(|(c, v)| (c.key().to_string(), v)).collect()
    }
}
