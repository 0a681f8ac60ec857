//! Logo Certification Common Library
//!
//! Typed, validated configuration for the printer logo certification
//! suite. The test runner, the Privet/Cloud Print client and the results
//! reporter all read their settings from one [`ConfigRegistry`] built at
//! startup.
//!
//! # Module Structure
//!
//! - [`config`] - Source schema and loading
//! - [`registry`] - Validated, immutable registry and its query surface
//! - [`capability`], [`duration`], [`asset`], [`run_order`] - Closed tables
//! - [`auth`], [`profile`], [`settings`] - Record groups
//! - [`error`], [`warning`] - Fatal errors and non-fatal findings
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use logocert_common::prelude::*;
//!
//! let registry = ConfigRegistry::embedded()?;
//! let poll = registry.sleep(SleepKey::Poll);
//! for test in registry.effective_test_order() {
//!     println!("{test}: poll every {poll:?}");
//! }
//! # Ok::<(), SchemaError>(())
//! ```

pub mod asset;
pub mod auth;
pub mod capability;
pub mod config;
pub mod consts;
pub mod duration;
pub mod error;
pub mod prelude;
pub mod profile;
pub mod registry;
pub mod run_order;
pub mod settings;
pub mod warning;

pub use registry::ConfigRegistry;
