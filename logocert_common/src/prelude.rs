//! Prelude module for common re-exports.
//!
//! ```rust
//! use logocert_common::prelude::*;
//! ```

// ─── Registry ───────────────────────────────────────────────────────
pub use crate::config::Source;
pub use crate::registry::ConfigRegistry;

// ─── Keys ───────────────────────────────────────────────────────────
pub use crate::capability::Capability;
pub use crate::duration::{DurationTableKind, SleepKey, TimeoutKey};
pub use crate::run_order::TestClass;

// ─── Errors & Warnings ──────────────────────────────────────────────
pub use crate::error::{ExportError, QueryError, SchemaError};
pub use crate::warning::ValidationWarning;
