// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known names and defaults
//!
//! This module centralizes the constants the instrumentation reports to
//! OpenTelemetry and the defaults it falls back to when a database does not
//! say otherwise.

/// Instrumentation scope name reported on every span and metric.
pub const INSTRUMENTATION_NAME: &str = env!("CARGO_PKG_NAME");

/// Instrumentation scope version reported on every span and metric.
pub const INSTRUMENTATION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Semantic conventions schema the emitted attributes follow.
pub const SCHEMA_URL: &str = "https://opentelemetry.io/schemas/1.11.0";

/// Name under which the ORM instrumentor is registered for discovery.
pub const REGISTRY_NAME: &str = "orm";

/// Port reported when the connect parameters do not carry one.
///
/// Matches the MySQL default.
pub const DEFAULT_PORT: u16 = 3306;

/// Environment variable holding a comma-separated list of instrumentor names
/// that [`auto_instrument`](crate::registry::auto_instrument) must skip.
pub const DISABLED_INSTRUMENTATIONS_ENV: &str = "OTEL_RUST_DISABLED_INSTRUMENTATIONS";
