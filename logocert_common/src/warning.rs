//! Non-fatal configuration checks.
//!
//! A warning never stops a load. It points at setup that is probably
//! incomplete; the caller decides whether to abort the run.

use std::fmt;

use crate::capability::Capability;
use crate::run_order::TestClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Field still holds its `<...>` template value.
    Placeholder {
        group: &'static str,
        key: &'static str,
        value: String,
    },
    /// Sheet sharing is on but nobody to share with.
    SharingWithoutTeamEmail,
    /// Sheet sharing is on but no sheet is written.
    SharingWithoutSpreadsheet,
    /// `PRINTER.PORT` is not a TCP port number.
    NonNumericPort(String),
    /// Every run-order entry is skipped.
    EmptyRunOrder,
    /// A scheduled test needs a capability the device lacks.
    TestWithoutCapability {
        test: TestClass,
        capability: Capability,
    },
    /// HTTP requests would time out immediately.
    ZeroUrlTimeout,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder { group, key, value } => {
                write!(f, "{group}.{key} still holds placeholder {value:?}")
            }
            Self::SharingWithoutTeamEmail => write!(
                f,
                "TEST.SHARE_SHEET_WITH_GOOGLE is set but TEST.GCP_TEAM_EMAIL is empty"
            ),
            Self::SharingWithoutSpreadsheet => write!(
                f,
                "TEST.SHARE_SHEET_WITH_GOOGLE is set but TEST.SPREADSHEET is off"
            ),
            Self::NonNumericPort(port) => {
                write!(f, "PRINTER.PORT {port:?} is not a port number")
            }
            Self::EmptyRunOrder => write!(f, "TEST.RUN skips every test"),
            Self::TestWithoutCapability { test, capability } => write!(
                f,
                "TEST.RUN schedules {test} but CAPS.{capability} is false"
            ),
            Self::ZeroUrlTimeout => write!(f, "URL.TIMEOUT is 0"),
        }
    }
}
