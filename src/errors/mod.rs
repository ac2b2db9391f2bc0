// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the orm-instrumentation library.
//!
//! Errors raised by the instrumented database itself never appear here: the
//! decorator hands them back to the caller unchanged. The types below only
//! cover the instrumentation's own failure modes.
//!
//! - [`VendorError`] - The database driver does not map to a known `db.system`
//! - [`RegistryError`] - Instrumentor discovery by name failed
//!
//! [`InstrumentationError`] unifies both for callers that do not need to
//! tell them apart.

mod registry;
mod vendor;

pub use registry::RegistryError;
pub use vendor::VendorError;

/// Unified error type for all instrumentation operations.
///
/// Module-specific errors convert into it via `From`, so `?` works across
/// module boundaries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstrumentationError {
    /// Error from database system identification.
    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorError),

    /// Error from instrumentor discovery.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_error_converts() {
        let err: InstrumentationError = VendorError::unsupported("FooDatabase").into();
        assert_eq!(
            err.to_string(),
            "Vendor error: Unsupported database driver: FooDatabase"
        );
    }

    #[test]
    fn test_registry_error_converts() {
        let err: InstrumentationError = RegistryError::unknown("redis").into();
        assert!(matches!(
            err,
            InstrumentationError::Registry(RegistryError::UnknownInstrumentor { ref name }) if name == "redis"
        ));
    }
}
