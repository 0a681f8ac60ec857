//! Configuration registry: validated, immutable view of every setting.
//!
//! Built once at startup from a [`Source`]. Immutable after construction:
//! a reload is a fresh [`ConfigRegistry::load`], never an in-place patch.
//! Loading is all-or-nothing; either every group validates or a
//! [`SchemaError`] is returned and no registry exists.
//!
//! Collaborators get the registry by reference (or `Arc`) at startup. All
//! queries are in-memory lookups with no I/O.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use static_assertions::assert_impl_all;
use tracing::{debug, info};

use crate::asset::AssetTable;
use crate::auth::{AuthConfig, GcpConfig};
use crate::capability::{Capability, CapabilitySet};
use crate::config::{RawConfig, RawImages, RawUrl, Source, absolute, path_to_source};
use crate::consts::MAX_PORT;
use crate::duration::{self, DurationTableKind, SleepKey, SleepTable, TimeoutKey, TimeoutTable};
use crate::error::{ExportError, QueryError, SchemaError};
use crate::profile::{PrinterProfile, SecondaryUser, UserCredentials, is_placeholder};
use crate::run_order::TestClass;
use crate::settings::TestSettings;
use crate::warning::ValidationWarning;

/// Tests that cannot pass without a capability.
const CAPABILITY_REQUIREMENTS: [(TestClass, Capability); 1] =
    [(TestClass::LocalPrinting, Capability::LocalPrint)];

/// Runtime configuration registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRegistry {
    auth: AuthConfig,
    caps: CapabilitySet,
    sleep: SleepTable,
    timeout: TimeoutTable,
    gcp: GcpConfig,
    printer: PrinterProfile,
    assets: AssetTable,
    test: TestSettings,
    url_timeout: Duration,
    user: UserCredentials,
    user2: SecondaryUser,
}

assert_impl_all!(ConfigRegistry: Send, Sync);

impl ConfigRegistry {
    /// Load and validate a configuration source.
    pub fn load(source: Source<'_>) -> Result<Self, SchemaError> {
        let (raw, anchor) = source.read()?;
        let today = chrono::Local::now().date_naive();
        Self::from_raw(&raw, &anchor, today)
    }

    /// Load a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        Self::load(Source::File(path))
    }

    /// Load the defaults compiled into the crate.
    pub fn embedded() -> Result<Self, SchemaError> {
        Self::load(Source::Embedded)
    }

    /// Build the registry from a parsed source, running every schema check.
    ///
    /// Relative paths in the source resolve against `anchor`, itself made
    /// absolute against the working directory when relative. `today` dates
    /// a derived results sheet name.
    ///
    /// Returns the first schema error encountered.
    pub fn from_raw(raw: &RawConfig, anchor: &Path, today: NaiveDate) -> Result<Self, SchemaError> {
        let anchor = absolute(anchor)?;
        let auth = AuthConfig::from_raw(&raw.auth)?;
        let gcp = GcpConfig::from_raw(&raw.gcp)?;
        debug!(scopes = auth.scopes.len(), "auth endpoints validated");

        let caps = CapabilitySet::from_raw(&raw.caps)?;
        let sleep = SleepTable::from_raw(&raw.sleep)?;
        let timeout = TimeoutTable::from_raw(&raw.timeout)?;
        let url_timeout = duration::seconds("URL", "TIMEOUT", raw.url.timeout)?;
        debug!(
            supported = caps.supported().count(),
            "capabilities and duration tables validated"
        );

        let printer = PrinterProfile::from_raw(&raw.printer)?;
        let user = UserCredentials::from_raw(&raw.user)?;
        let user2 = SecondaryUser::from_raw(&raw.user2)?;

        let assets = AssetTable::from_raw(
            &raw.images.base_dir,
            &raw.images.files,
            &anchor,
            &printer.model,
            &printer.name,
        )?;
        debug!(
            base_dir = %assets.base_dir().display(),
            count = assets.len(),
            "asset table resolved"
        );

        let test = TestSettings::from_raw(&raw.test, &printer, today)?;

        let registry = Self {
            auth,
            caps,
            sleep,
            timeout,
            gcp,
            printer,
            assets,
            test,
            url_timeout,
            user,
            user2,
        };
        info!(
            tests = registry.test.run_order.effective().len(),
            skipped = registry.test.run_order.skipped().len(),
            assets = registry.assets.len(),
            "configuration loaded"
        );
        Ok(registry)
    }

    // ─── Capabilities ───────────────────────────────────────────────

    /// Whether the device supports `cap`.
    #[inline]
    pub fn capability(&self, cap: Capability) -> bool {
        self.caps.get(cap)
    }

    /// Capability lookup by source name, e.g. `"DUPLEX"`.
    pub fn get_capability(&self, name: &str) -> Result<bool, QueryError> {
        let cap: Capability = name
            .parse()
            .map_err(|_| QueryError::UnknownCapability(name.to_string()))?;
        Ok(self.capability(cap))
    }

    /// Every capability flag.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.caps
    }

    // ─── Durations ──────────────────────────────────────────────────

    /// Fixed wait for `key`.
    #[inline]
    pub fn sleep(&self, key: SleepKey) -> Duration {
        self.sleep.get(key)
    }

    /// Polling bound for `key`.
    #[inline]
    pub fn timeout(&self, key: TimeoutKey) -> Duration {
        self.timeout.get(key)
    }

    /// Duration lookup by table and source name, e.g. `(Sleep, "POLL")`.
    pub fn get_duration(&self, table: DurationTableKind, name: &str) -> Result<Duration, QueryError> {
        let found = match table {
            DurationTableKind::Sleep => self.sleep.lookup(name),
            DurationTableKind::Timeout => self.timeout.lookup(name),
        };
        found.ok_or_else(|| QueryError::UnknownDurationKey {
            table,
            name: name.to_string(),
        })
    }

    /// The whole `[SLEEP]` table.
    pub fn sleep_table(&self) -> &SleepTable {
        &self.sleep
    }

    /// The whole `[TIMEOUT]` table.
    pub fn timeout_table(&self) -> &TimeoutTable {
        &self.timeout
    }

    /// HTTP request timeout.
    pub fn url_timeout(&self) -> Duration {
        self.url_timeout
    }

    // ─── Assets ─────────────────────────────────────────────────────

    /// Absolute path of a test asset. The file may not exist.
    pub fn resolve_asset(&self, name: &str) -> Result<PathBuf, QueryError> {
        self.assets
            .resolve(name)
            .ok_or_else(|| QueryError::UnknownAsset(name.to_string()))
    }

    /// The whole asset table.
    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    // ─── Run order ──────────────────────────────────────────────────

    /// Tests to run, skip-marked entries removed, source order kept.
    pub fn effective_test_order(&self) -> Vec<TestClass> {
        self.test.run_order.effective()
    }

    /// Skip-marked tests, kept for audit.
    pub fn skipped_tests(&self) -> Vec<TestClass> {
        self.test.run_order.skipped()
    }

    // ─── Records ────────────────────────────────────────────────────

    /// OAuth client settings.
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// Cloud Print endpoints.
    pub fn gcp(&self) -> &GcpConfig {
        &self.gcp
    }

    /// Printer under test.
    pub fn printer(&self) -> &PrinterProfile {
        &self.printer
    }

    /// Run and reporting settings.
    pub fn test(&self) -> &TestSettings {
        &self.test
    }

    /// Primary test account.
    pub fn user(&self) -> &UserCredentials {
        &self.user
    }

    /// Secondary test account.
    pub fn user2(&self) -> &SecondaryUser {
        &self.user2
    }

    // ─── Validation ─────────────────────────────────────────────────

    /// Non-fatal checks for likely misconfiguration.
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let placeholders = self
            .printer
            .fields()
            .into_iter()
            .map(|(key, value)| ("PRINTER", key, value))
            .chain(
                self.user
                    .fields()
                    .into_iter()
                    .map(|(key, value)| ("USER", key, value)),
            )
            .chain(std::iter::once(("USER2", "EMAIL", self.user2.email.as_str())));
        for (group, key, value) in placeholders {
            if is_placeholder(value) {
                warnings.push(ValidationWarning::Placeholder {
                    group,
                    key,
                    value: value.to_string(),
                });
            }
        }

        if self.test.share_sheet_with_google {
            if self.test.gcp_team_email.is_none() {
                warnings.push(ValidationWarning::SharingWithoutTeamEmail);
            }
            if !self.test.spreadsheet {
                warnings.push(ValidationWarning::SharingWithoutSpreadsheet);
            }
        }

        let port = self.printer.port.trim();
        if !is_placeholder(port) && !is_port(port) {
            warnings.push(ValidationWarning::NonNumericPort(port.to_string()));
        }

        if self.effective_test_order().is_empty() {
            warnings.push(ValidationWarning::EmptyRunOrder);
        }

        for (test, capability) in CAPABILITY_REQUIREMENTS {
            if self.test.run_order.runs(test) && !self.capability(capability) {
                warnings.push(ValidationWarning::TestWithoutCapability { test, capability });
            }
        }

        if self.url_timeout.is_zero() {
            warnings.push(ValidationWarning::ZeroUrlTimeout);
        }

        debug!(count = warnings.len(), "validation finished");
        warnings
    }

    // ─── Serialization ──────────────────────────────────────────────

    /// Source representation of this registry. Reloading it yields an
    /// equal registry: paths are absolute, derived values explicit.
    ///
    /// Fails on a path that is not valid UTF-8 rather than rewriting it.
    pub fn to_source(&self) -> Result<RawConfig, ExportError> {
        Ok(RawConfig {
            auth: self.auth.to_raw()?,
            caps: self.caps.to_raw(),
            sleep: self.sleep.to_raw(),
            timeout: self.timeout.to_raw(),
            gcp: self.gcp.to_raw(),
            printer: self.printer.to_raw(),
            images: RawImages {
                base_dir: path_to_source("IMAGES", "BASE_DIR", self.assets.base_dir())?,
                files: self.assets.to_raw()?,
            },
            test: self.test.to_raw()?,
            url: RawUrl {
                timeout: self.url_timeout.as_secs_f64(),
            },
            user: self.user.to_raw(),
            user2: self.user2.to_raw(),
        })
    }

    /// [`to_source`](Self::to_source) rendered as TOML.
    pub fn to_toml_string(&self) -> Result<String, ExportError> {
        Ok(self.to_source()?.to_toml()?)
    }
}

fn is_port(value: &str) -> bool {
    value.parse::<u32>().is_ok_and(|p| p > 0 && p <= MAX_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::EMBEDDED_CONFIG;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn embedded_raw() -> RawConfig {
        RawConfig::from_toml(EMBEDDED_CONFIG).unwrap()
    }

    fn build(raw: &RawConfig) -> Result<ConfigRegistry, SchemaError> {
        ConfigRegistry::from_raw(raw, Path::new("/opt/logocert"), day())
    }

    #[test]
    fn embedded_defaults_build() {
        let registry = build(&embedded_raw()).unwrap();
        assert!(registry.capability(Capability::Duplex));
        assert!(!registry.capability(Capability::Color));
        assert_eq!(registry.sleep(SleepKey::Poll), Duration::from_secs(1));
        assert_eq!(
            registry.timeout(TimeoutKey::Printing),
            Duration::from_secs(1000)
        );
        assert_eq!(registry.url_timeout(), Duration::from_secs(20));
        assert_eq!(registry.effective_test_order().len(), 14);
        assert_eq!(registry.gcp().mgt.as_str(), "https://www.google.com/cloudprint");
        assert_eq!(
            registry.test().sheet_name,
            "<Printer Model>_<Printer Name>_2026-10-14"
        );
    }

    #[test]
    fn string_lookups() {
        let registry = build(&embedded_raw()).unwrap();
        assert_eq!(registry.get_capability("TONER"), Ok(true));
        assert_eq!(
            registry.get_capability("STAPLER"),
            Err(QueryError::UnknownCapability("STAPLER".to_string()))
        );
        assert_eq!(
            registry.get_duration(DurationTableKind::Sleep, "ONE_DAY"),
            Ok(Duration::from_secs(86_400))
        );
        assert_eq!(
            registry.get_duration(DurationTableKind::Timeout, "POLL"),
            Err(QueryError::UnknownDurationKey {
                table: DurationTableKind::Timeout,
                name: "POLL".to_string(),
            })
        );
    }

    #[test]
    fn assets_resolve_against_anchor() {
        let registry = build(&embedded_raw()).unwrap();
        assert_eq!(
            registry.resolve_asset("JPG1"),
            Ok(PathBuf::from("/opt/logocert/images/b&w-test.jpg"))
        );
        assert_eq!(
            registry.resolve_asset("PWG1"),
            Ok(PathBuf::from(
                "/opt/logocert/images/<Printer Model>-<Printer Name>-testpage.pwg"
            ))
        );
        assert_eq!(
            registry.resolve_asset("JPG99"),
            Err(QueryError::UnknownAsset("JPG99".to_string()))
        );
    }

    #[test]
    fn embedded_defaults_warn_about_placeholders() {
        let registry = build(&embedded_raw()).unwrap();
        let warnings = registry.validate();
        let placeholders = warnings
            .iter()
            .filter(|w| matches!(w, ValidationWarning::Placeholder { .. }))
            .count();
        // 9 printer fields, 3 primary user fields, 1 secondary email.
        assert_eq!(placeholders, 13);
        assert!(!warnings.contains(&ValidationWarning::SharingWithoutTeamEmail));
        assert!(!warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::NonNumericPort(_))));
    }

    #[test]
    fn sharing_checks() {
        let mut raw = embedded_raw();
        raw.test.gcp_team_email = None;
        raw.test.spreadsheet = false;
        let warnings = build(&raw).unwrap().validate();
        assert!(warnings.contains(&ValidationWarning::SharingWithoutTeamEmail));
        assert!(warnings.contains(&ValidationWarning::SharingWithoutSpreadsheet));

        raw.test.share_sheet_with_google = false;
        let warnings = build(&raw).unwrap().validate();
        assert!(!warnings.contains(&ValidationWarning::SharingWithoutTeamEmail));
    }

    #[test]
    fn port_check() {
        let mut raw = embedded_raw();
        raw.printer.port = "http".to_string();
        let warnings = build(&raw).unwrap().validate();
        assert!(warnings.contains(&ValidationWarning::NonNumericPort("http".to_string())));

        raw.printer.port = "8080".to_string();
        let warnings = build(&raw).unwrap().validate();
        assert!(!warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::NonNumericPort(_))));
    }

    #[test]
    fn run_order_checks() {
        let mut raw = embedded_raw();
        raw.caps.insert("LOCAL_PRINT".to_string(), false);
        let warnings = build(&raw).unwrap().validate();
        assert!(warnings.contains(&ValidationWarning::TestWithoutCapability {
            test: TestClass::LocalPrinting,
            capability: Capability::LocalPrint,
        }));

        raw.test.run = vec!["#Privet".to_string(), "#LocalPrinting".to_string()];
        let registry = build(&raw).unwrap();
        let warnings = registry.validate();
        assert!(warnings.contains(&ValidationWarning::EmptyRunOrder));
        assert!(!warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::TestWithoutCapability { .. })));
        assert_eq!(
            registry.skipped_tests(),
            vec![TestClass::Privet, TestClass::LocalPrinting]
        );
    }

    #[test]
    fn zero_url_timeout_warns() {
        let mut raw = embedded_raw();
        raw.url.timeout = 0.0;
        let warnings = build(&raw).unwrap().validate();
        assert!(warnings.contains(&ValidationWarning::ZeroUrlTimeout));
    }

    #[test]
    fn negative_url_timeout_rejected() {
        let mut raw = embedded_raw();
        raw.url.timeout = -5.0;
        assert!(matches!(
            build(&raw),
            Err(SchemaError::InvalidDuration { group: "URL", .. })
        ));
    }

    #[test]
    fn source_round_trip() {
        let registry = build(&embedded_raw()).unwrap();
        let source = registry.to_source().unwrap();
        let again = ConfigRegistry::from_raw(&source, Path::new("/elsewhere"), day()).unwrap();
        assert_eq!(again, registry);
    }

    #[test]
    fn relative_anchor_made_absolute() {
        let registry = ConfigRegistry::from_raw(&embedded_raw(), Path::new("rel"), day()).unwrap();
        let path = registry.resolve_asset("JPG1").unwrap();
        assert!(path.is_absolute());
        assert_eq!(
            path,
            std::env::current_dir()
                .unwrap()
                .join("rel/images/b&w-test.jpg")
        );
        assert!(registry.assets().base_dir().is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_base_dir_refuses_export() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let anchor = Path::new(OsStr::from_bytes(b"/srv/cert\xff"));
        let registry = ConfigRegistry::from_raw(&embedded_raw(), anchor, day()).unwrap();
        assert!(registry.resolve_asset("JPG1").unwrap().starts_with(anchor));
        assert!(matches!(
            registry.to_source(),
            Err(ExportError::NonUtf8Path { group: "IMAGES", ref key, .. }) if key == "BASE_DIR"
        ));
        assert!(registry.to_toml_string().is_err());
    }
}
