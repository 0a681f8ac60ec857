//! Duration tables (`[SLEEP]`, `[TIMEOUT]`) and the single `URL.TIMEOUT`.
//!
//! Source values are seconds, integer or float. Zero is legal and disables
//! the wait; negative, NaN and infinite values are rejected at load time
//! rather than clamped.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::SchemaError;

/// Fixed waits between steps (`[SLEEP]`).
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
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SleepKey {
    /// Spacing between GCP/Privet API polls.
    Poll,
    /// After the operator cancels a registration request on the printer.
    RegCancel,
    /// After the printer state is changed physically (tray, cartridge).
    PrinterState,
    /// After the printer joins or leaves the network.
    NetworkDetection,
    /// 24 hours.
    OneDay,
    /// Between steps in automatic mode.
    AutoRun,
}

/// Upper bounds for event-driven polling waits (`[TIMEOUT]`).
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
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeoutKey {
    /// GCP update requests moving from pending to current.
    GcpUpdate,
    /// Printer reaching a Privet status (processing, idle, ...).
    PrinterStatus,
    /// Printer finishing a job.
    Printing,
}

/// Sealed over [`SleepKey`] and [`TimeoutKey`].
pub trait DurationKey:
    Copy + Ord + fmt::Display + FromStr + IntoEnumIterator + Into<&'static str> + private::Sealed
{
    /// Table this key belongs to.
    const TABLE: DurationTableKind;
}

impl DurationKey for SleepKey {
    const TABLE: DurationTableKind = DurationTableKind::Sleep;
}

impl DurationKey for TimeoutKey {
    const TABLE: DurationTableKind = DurationTableKind::Timeout;
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::SleepKey {}
    impl Sealed for super::TimeoutKey {}
}

/// Which duration table a string lookup targets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationTableKind {
    Sleep,
    Timeout,
}

impl DurationTableKind {
    /// Source group name.
    pub fn group(self) -> &'static str {
        self.into()
    }
}

/// Closed table of durations keyed by `K`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationTable<K: DurationKey> {
    values: BTreeMap<K, Duration>,
}

/// `[SLEEP]` table.
pub type SleepTable = DurationTable<SleepKey>;

/// `[TIMEOUT]` table.
pub type TimeoutTable = DurationTable<TimeoutKey>;

impl<K: DurationKey> DurationTable<K> {
    /// Build from a raw seconds table, rejecting unknown, missing and
    /// out-of-range entries.
    pub fn from_raw(raw: &BTreeMap<String, f64>) -> Result<Self, SchemaError> {
        let group = K::TABLE.group();
        let mut values = BTreeMap::new();
        for (name, secs) in raw {
            let key: K = name.parse().map_err(|_| SchemaError::UnknownKey {
                group,
                key: name.clone(),
            })?;
            values.insert(key, seconds(group, name, *secs)?);
        }

        if let Some(missing) = K::iter().find(|k| !values.contains_key(k)) {
            return Err(SchemaError::MissingKey {
                group,
                key: missing.to_string(),
            });
        }

        Ok(Self { values })
    }

    /// Duration for `key`.
    pub fn get(&self, key: K) -> Duration {
        self.values.get(&key).copied().unwrap_or_default()
    }

    /// Duration for a key given by source name.
    pub fn lookup(&self, name: &str) -> Option<Duration> {
        let key: K = name.parse().ok()?;
        self.values.get(&key).copied()
    }

    /// Iterate `(key, duration)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (K, Duration)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub(crate) fn to_raw(&self) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(k, v)| (Into::<&'static str>::into(k).to_string(), v.as_secs_f64()))
            .collect()
    }
}

/// Convert a seconds value from the source, rejecting negative and
/// non-finite input.
pub fn seconds(group: &'static str, key: &str, secs: f64) -> Result<Duration, SchemaError> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(SchemaError::InvalidDuration {
            group,
            key: key.to_string(),
            value: secs,
        });
    }
    Duration::try_from_secs_f64(secs).map_err(|_| SchemaError::InvalidDuration {
        group,
        key: key.to_string(),
        value: secs,
    })
}
