// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Decorators applied at the ORM integration point.
//!
//! [`InstrumentedDatabase`] wraps any [`Database`](crate::Database) and is a
//! `Database` itself, so it slots in wherever the original was used.
//! [`InstrumentationLayer`] produces it as a Tower `Layer`, which lets the
//! instrumentation compose with other database middleware.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orm_instrumentation::OrmInstrumentor;
//! use tower::ServiceBuilder;
//!
//! let db = ServiceBuilder::new()
//!     .layer(OrmInstrumentor::global().layer())
//!     .service(SqliteDatabase::new(":memory:"));
//! ```

mod instrumented;

pub use instrumented::{InstrumentationLayer, InstrumentedDatabase};
