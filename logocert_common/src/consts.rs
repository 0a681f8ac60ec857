//! Crate-wide constants.
//!
//! Single source of truth for default paths and fixed strings. Operator
//! tunables live in the configuration source, not here.

/// Default configuration file looked up by the CLI.
pub const DEFAULT_CONFIG_PATH: &str = "logocert.toml";

/// Configuration compiled into the crate, carrying the suite defaults.
pub const EMBEDDED_CONFIG: &str = include_str!("../config/logocert.toml");

/// Default results sheet header row.
pub const DEFAULT_RESULT_COLUMNS: [&str; 8] = [
    "Test Case ID",
    "Test Case Name",
    "Status",
    "Notes",
    "",
    "",
    "",
    "Re-run Cmd line",
];

/// Date format appended to derived sheet names.
pub const SHEET_DATE_FORMAT: &str = "%Y-%m-%d";

/// Highest TCP port a printer web service can listen on.
pub const MAX_PORT: u32 = 65_535;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_is_not_empty() {
        assert!(EMBEDDED_CONFIG.contains("[CAPS]"));
        assert!(EMBEDDED_CONFIG.contains("[USER2]"));
    }

    #[test]
    fn result_columns_keep_rerun_last() {
        assert_eq!(DEFAULT_RESULT_COLUMNS.len(), 8);
        assert_eq!(DEFAULT_RESULT_COLUMNS[7], "Re-run Cmd line");
    }
}
