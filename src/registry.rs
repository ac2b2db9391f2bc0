// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Instrumentor discovery.
//!
//! Instrumentors register themselves at link time with
//! [`inventory::submit!`], so a host process can enable them by name without
//! naming their types. This crate registers [`OrmInstrumentor::global`] as
//! `orm`.
//!
//! # Example
//!
//! ```rust,ignore
//! use orm_instrumentation::registry;
//!
//! // Enable everything linked in, except what
//! // OTEL_RUST_DISABLED_INSTRUMENTATIONS lists
//! let enabled = registry::auto_instrument();
//! tracing::info!(?enabled, "Instrumentation enabled");
//! ```

use crate::config::constants::REGISTRY_NAME;
use crate::errors::{InstrumentationError, RegistryError};
use crate::instrumentor::{Instrument, InstrumentOptions, OrmInstrumentor};

pub use crate::config::constants::DISABLED_INSTRUMENTATIONS_ENV;

/// A named instrumentor available for discovery.
pub struct InstrumentorRegistration {
    name: &'static str,
    instrumentor: fn() -> &'static dyn Instrument,
}

impl InstrumentorRegistration {
    /// Describe an instrumentor for [`inventory::submit!`].
    pub const fn new(name: &'static str, instrumentor: fn() -> &'static dyn Instrument) -> Self {
        Self { name, instrumentor }
    }

    /// Name the instrumentor is discovered by.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The registered instrumentor.
    pub fn instrumentor(&self) -> &'static dyn Instrument {
        (self.instrumentor)()
    }
}

inventory::collect!(InstrumentorRegistration);

fn orm_instrumentor() -> &'static dyn Instrument {
    OrmInstrumentor::global()
}

inventory::submit! {
    InstrumentorRegistration::new(REGISTRY_NAME, orm_instrumentor)
}

/// All instrumentors linked into the process.
pub fn registered() -> impl Iterator<Item = &'static InstrumentorRegistration> {
    inventory::iter::<InstrumentorRegistration>.into_iter()
}

/// Look up an instrumentor by name.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownInstrumentor`] when nothing is registered
/// under `name`.
pub fn find(name: &str) -> Result<&'static dyn Instrument, RegistryError> {
    registered()
        .find(|registration| registration.name() == name)
        .map(InstrumentorRegistration::instrumentor)
        .ok_or_else(|| RegistryError::unknown(name))
}

/// Instrument the instrumentor registered under `name`.
///
/// # Errors
///
/// Returns [`InstrumentationError::Registry`] when nothing is registered under
/// `name`.
pub fn instrument_by_name(
    name: &str,
    options: InstrumentOptions,
) -> Result<(), InstrumentationError> {
    find(name)?.instrument(options);
    Ok(())
}

/// Uninstrument the instrumentor registered under `name`.
///
/// # Errors
///
/// Returns [`InstrumentationError::Registry`] when nothing is registered under
/// `name`.
pub fn uninstrument_by_name(name: &str) -> Result<(), InstrumentationError> {
    find(name)?.uninstrument();
    Ok(())
}

/// Parse a comma-separated list of instrumentor names.
///
/// Whitespace around names and empty entries are ignored.
pub fn parse_disabled(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names listed in `OTEL_RUST_DISABLED_INSTRUMENTATIONS`.
pub fn disabled_instrumentations() -> Vec<String> {
    std::env::var(DISABLED_INSTRUMENTATIONS_ENV)
        .map(|raw| parse_disabled(&raw))
        .unwrap_or_default()
}

/// Instrument every registered instrumentor not listed as disabled, using the
/// global providers.
///
/// Returns the names that were instrumented.
pub fn auto_instrument() -> Vec<&'static str> {
    let disabled = disabled_instrumentations();
    let mut enabled = Vec::new();

    for registration in registered() {
        let name = registration.name();
        if disabled.iter().any(|skip| skip == name) {
            tracing::debug!(instrumentor = name, "Instrumentation disabled by environment");
            continue;
        }

        registration.instrumentor().instrument(InstrumentOptions::new());
        enabled.push(name);
    }

    enabled
}
