// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors from instrumentor discovery.

/// Errors that can occur while looking up registered instrumentors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No instrumentor is registered under the requested name.
    #[error("No instrumentor registered under '{name}'")]
    UnknownInstrumentor {
        /// The name that was looked up
        name: String,
    },
}

impl RegistryError {
    /// Create an unknown-instrumentor error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownInstrumentor { name: name.into() }
    }
}
