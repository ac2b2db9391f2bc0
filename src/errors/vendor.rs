// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors from mapping a database driver to a `db.system` value.

/// Errors that can occur while identifying the database system.
///
/// # Examples
///
/// ```rust
/// use orm_instrumentation::{DbSystem, VendorError};
///
/// let err = DbSystem::from_driver_name("OracleDatabase").unwrap_err();
/// assert!(matches!(err, VendorError::Unsupported { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VendorError {
    /// The driver name does not identify a supported database system.
    ///
    /// Only SQLite, MySQL and PostgreSQL drivers are recognised.
    #[error("Unsupported database driver: {driver}")]
    Unsupported {
        /// The driver name that was not recognised
        driver: String,
    },
}

impl VendorError {
    /// Create an unsupported-driver error.
    pub fn unsupported(driver: impl Into<String>) -> Self {
        Self::Unsupported {
            driver: driver.into(),
        }
    }
}
