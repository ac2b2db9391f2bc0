// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the ORM instrumentor
//!
//! This module controls the optional parts of the instrumentation: whether
//! executed SQL carries a sqlcommenter comment, which keys go into that
//! comment, and whether the commented SQL is also what the span reports.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use orm_instrumentation::InstrumentorConfig;
//!
//! // Spans only, SQL is sent to the database untouched
//! let config = InstrumentorConfig::default();
//! assert!(!config.enable_commenter);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use orm_instrumentation::{CommenterOptions, InstrumentorConfigBuilder};
//!
//! let config = InstrumentorConfigBuilder::new()
//!     .enable_commenter(true)
//!     .commenter_options(CommenterOptions::default().with_db_framework(false))
//!     .build();
//!
//! assert!(config.enable_commenter);
//! assert!(!config.commenter_options.db_framework);
//! ```

use serde::Deserialize;

pub mod constants;

/// Configuration for the ORM instrumentor
///
/// Use [`InstrumentorConfigBuilder`] for a fluent API to construct instances.
/// The type also deserializes from any serde format, with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstrumentorConfig {
    /// Append a sqlcommenter comment to every executed statement
    /// Default: false
    pub enable_commenter: bool,

    /// Which keys the sqlcommenter comment carries
    pub commenter_options: CommenterOptions,

    /// Report the commented SQL (instead of the original) as `db.statement`
    /// Default: false
    pub enable_attribute_commenter: bool,
}

/// Selects the keys written into the sqlcommenter comment
///
/// Every key is included by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommenterOptions {
    /// Include `db_driver` (the database driver name)
    pub db_driver: bool,

    /// Include `db_framework` (this crate's name and version)
    pub db_framework: bool,

    /// Include OpenTelemetry context values (`traceparent`, `tracestate`)
    pub opentelemetry_values: bool,
}

impl Default for CommenterOptions {
    fn default() -> Self {
        Self {
            db_driver: true,
            db_framework: true,
            opentelemetry_values: true,
        }
    }
}

impl CommenterOptions {
    /// Toggle the `db_driver` key.
    pub fn with_db_driver(mut self, enabled: bool) -> Self {
        self.db_driver = enabled;
        self
    }

    /// Toggle the `db_framework` key.
    pub fn with_db_framework(mut self, enabled: bool) -> Self {
        self.db_framework = enabled;
        self
    }

    /// Toggle the OpenTelemetry context keys.
    pub fn with_opentelemetry_values(mut self, enabled: bool) -> Self {
        self.opentelemetry_values = enabled;
        self
    }

    /// Whether a given comment key should be kept.
    ///
    /// Keys without a dedicated switch are always kept.
    pub fn allows(&self, key: &str) -> bool {
        match key {
            "db_driver" => self.db_driver,
            "db_framework" => self.db_framework,
            _ => true,
        }
    }
}

/// Builder for [`InstrumentorConfig`]
///
/// # Example
///
/// ```rust
/// use orm_instrumentation::InstrumentorConfigBuilder;
///
/// let config = InstrumentorConfigBuilder::new()
///     .enable_commenter(true)
///     .enable_attribute_commenter(true)
///     .build();
///
/// assert!(config.enable_attribute_commenter);
/// ```
#[derive(Debug, Default)]
pub struct InstrumentorConfigBuilder {
    config: InstrumentorConfig,
}

impl InstrumentorConfigBuilder {
    /// Create a new builder with every option off
    pub fn new() -> Self {
        Self::default()
    }

    /// Append sqlcommenter comments to executed SQL
    pub fn enable_commenter(mut self, enabled: bool) -> Self {
        self.config.enable_commenter = enabled;
        self
    }

    /// Choose which keys the comment carries
    pub fn commenter_options(mut self, options: CommenterOptions) -> Self {
        self.config.commenter_options = options;
        self
    }

    /// Report the commented SQL as the span's statement
    ///
    /// Has no effect unless the commenter itself is enabled.
    pub fn enable_attribute_commenter(mut self, enabled: bool) -> Self {
        self.config.enable_attribute_commenter = enabled;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> InstrumentorConfig {
        self.config
    }
}
