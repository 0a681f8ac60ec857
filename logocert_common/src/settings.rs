//! Run and reporting settings (`[TEST]`).

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::{RawTest, path_to_source};
use crate::consts::{DEFAULT_RESULT_COLUMNS, SHEET_DATE_FORMAT};
use crate::error::{ExportError, SchemaError};
use crate::profile::{PrinterProfile, required};
use crate::run_order::RunOrder;

/// How a run is executed and how its results are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSettings {
    /// Results sheet name, e.g. `Model-PrinterName` or a firmware tag.
    pub sheet_name: String,
    /// Results sheet header row.
    pub result_columns: Vec<String>,
    /// Write results to a spreadsheet.
    pub spreadsheet: bool,
    /// Share the results sheet with the GCP certification team.
    pub share_sheet_with_google: bool,
    pub gcp_team_email: Option<String>,
    /// ANSI colors on consoles that do not advertise support.
    pub force_color_output: bool,
    /// Run without asking an operator to judge printed output.
    pub automode: bool,
    /// Directory for run logs.
    pub log_dir: PathBuf,
    pub run_order: RunOrder,
}

impl TestSettings {
    /// Build from the raw group. `today` dates a derived sheet name.
    pub fn from_raw(
        raw: &RawTest,
        printer: &PrinterProfile,
        today: NaiveDate,
    ) -> Result<Self, SchemaError> {
        let sheet_name = match &raw.name {
            Some(name) => required("TEST", "NAME", name)?,
            None => default_sheet_name(printer, today),
        };

        let result_columns = match &raw.results {
            Some(columns) => columns.clone(),
            None => DEFAULT_RESULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        };

        let log_dir = required("TEST", "LOG_DIR", &raw.log_dir)?;

        Ok(Self {
            sheet_name,
            result_columns,
            spreadsheet: raw.spreadsheet,
            share_sheet_with_google: raw.share_sheet_with_google,
            gcp_team_email: raw
                .gcp_team_email
                .as_ref()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            force_color_output: raw.force_color_output,
            automode: raw.automode,
            log_dir: PathBuf::from(log_dir),
            run_order: RunOrder::from_raw(&raw.run)?,
        })
    }

    pub(crate) fn to_raw(&self) -> Result<RawTest, ExportError> {
        Ok(RawTest {
            name: Some(self.sheet_name.clone()),
            results: Some(self.result_columns.clone()),
            spreadsheet: self.spreadsheet,
            share_sheet_with_google: self.share_sheet_with_google,
            gcp_team_email: self.gcp_team_email.clone(),
            force_color_output: self.force_color_output,
            automode: self.automode,
            log_dir: path_to_source("TEST", "LOG_DIR", &self.log_dir)?,
            run: self.run_order.to_raw(),
        })
    }
}

/// `MODEL_NAME_YYYY-MM-DD`.
pub fn default_sheet_name(printer: &PrinterProfile, today: NaiveDate) -> String {
    format!(
        "{}_{}_{}",
        printer.model,
        printer.name,
        today.format(SHEET_DATE_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawPrinter;
    use crate::run_order::TestClass;

    fn printer() -> PrinterProfile {
        PrinterProfile::from_raw(&RawPrinter {
            certid: "C".to_string(),
            firmware: "F".to_string(),
            ip: "10.0.0.2".to_string(),
            manufacturer: "Acme".to_string(),
            model: "LX-100".to_string(),
            name: "Office".to_string(),
            port: "80".to_string(),
            serial: "S".to_string(),
            status: "Released".to_string(),
        })
        .unwrap()
    }

    fn raw_test() -> RawTest {
        RawTest {
            name: None,
            results: None,
            spreadsheet: true,
            share_sheet_with_google: true,
            gcp_team_email: Some("team@example.com".to_string()),
            force_color_output: false,
            automode: false,
            log_dir: "/tmp/logocert/".to_string(),
            run: vec!["#SystemUnderTest".to_string(), "Privet".to_string()],
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    #[test]
    fn sheet_name_derived_from_printer() {
        let settings = TestSettings::from_raw(&raw_test(), &printer(), day()).unwrap();
        assert_eq!(settings.sheet_name, "LX-100_Office_2026-03-09");
        assert_eq!(settings.result_columns.len(), 8);
        assert_eq!(settings.run_order.effective(), vec![TestClass::Privet]);
    }

    #[test]
    fn explicit_sheet_name_kept() {
        let mut raw = raw_test();
        raw.name = Some("LX-100-fw1.0.3".to_string());
        let settings = TestSettings::from_raw(&raw, &printer(), day()).unwrap();
        assert_eq!(settings.sheet_name, "LX-100-fw1.0.3");
    }

    #[test]
    fn blank_team_email_is_unset() {
        let mut raw = raw_test();
        raw.gcp_team_email = Some("  ".to_string());
        let settings = TestSettings::from_raw(&raw, &printer(), day()).unwrap();
        assert_eq!(settings.gcp_team_email, None);
    }

    #[test]
    fn raw_is_explicit() {
        let settings = TestSettings::from_raw(&raw_test(), &printer(), day()).unwrap();
        let raw = settings.to_raw().unwrap();
        assert_eq!(raw.name.as_deref(), Some("LX-100_Office_2026-03-09"));
        assert_eq!(raw.run, vec!["#SystemUnderTest", "Privet"]);
        let again = TestSettings::from_raw(&raw, &printer(), day()).unwrap();
        assert_eq!(again, settings);
    }
}
