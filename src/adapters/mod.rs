// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Ready-made [`Database`](crate::Database) implementations.
//!
//! Each adapter sits behind its own feature flag.

#[cfg(feature = "sqlite")]
pub mod sqlite;
