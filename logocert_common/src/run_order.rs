//! Test-class run order (`TEST.RUN`).
//!
//! Order matters. An entry prefixed with [`SKIP_MARKER`] stays in the list
//! for auditing but is left out of the effective order.

use std::collections::HashSet;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::SchemaError;

/// Prefix that disables a run-order entry.
pub const SKIP_MARKER: char = '#';

/// Certification test classes, in their canonical order.
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
pub enum TestClass {
    SystemUnderTest,
    Privet,
    PreRegistration,
    Registration,
    PostRegistration,
    LocalDiscovery,
    Printer,
    PrinterState,
    JobState,
    CloudPrinting,
    LocalPrinting,
    RunAfter24Hours,
    Unregister,
    PostUnregistration,
}

/// One line of the run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunEntry {
    pub test: TestClass,
    pub skipped: bool,
}

impl RunEntry {
    fn to_raw(self) -> String {
        if self.skipped {
            format!("{SKIP_MARKER}{}", self.test)
        } else {
            self.test.to_string()
        }
    }
}

/// Parsed `TEST.RUN`. Every entry names a known class, each at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOrder {
    entries: Vec<RunEntry>,
}

impl RunOrder {
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(raw.len());

        for line in raw {
            let line = line.as_ref();
            let (name, skipped) = split_skip(line);
            let test: TestClass = name
                .parse()
                .map_err(|_| SchemaError::UnknownTestClass(line.to_string()))?;
            if !seen.insert(test) {
                return Err(SchemaError::DuplicateTestClass(test.to_string()));
            }
            entries.push(RunEntry { test, skipped });
        }

        Ok(Self { entries })
    }

    /// All entries, skipped ones included, in source order.
    pub fn entries(&self) -> &[RunEntry] {
        &self.entries
    }

    /// Tests to run, in order.
    pub fn effective(&self) -> Vec<TestClass> {
        self.entries
            .iter()
            .filter(|e| !e.skipped)
            .map(|e| e.test)
            .collect()
    }

    /// Tests disabled with the skip marker, in order.
    pub fn skipped(&self) -> Vec<TestClass> {
        self.entries
            .iter()
            .filter(|e| e.skipped)
            .map(|e| e.test)
            .collect()
    }

    /// Whether `test` is part of the effective order.
    pub fn runs(&self, test: TestClass) -> bool {
        self.entries.iter().any(|e| e.test == test && !e.skipped)
    }

    pub(crate) fn to_raw(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_raw()).collect()
    }
}

/// Drop skip-marked entries, keeping the relative order of the rest.
///
/// ```
/// use logocert_common::run_order::strip_skipped;
///
/// assert_eq!(strip_skipped(&["#A", "B", "C"]), vec!["B", "C"]);
/// ```
pub fn strip_skipped<S: AsRef<str>>(entries: &[S]) -> Vec<&str> {
    entries
        .iter()
        .map(AsRef::as_ref)
        .filter(|e| !split_skip(e).1)
        .collect()
}

fn split_skip(entry: &str) -> (&str, bool) {
    match entry.strip_prefix(SKIP_MARKER) {
        Some(rest) => (rest.trim_start(), true),
        None => (entry, false),
    }
}
