// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # orm-instrumentation
//!
//! OpenTelemetry instrumentation for ORM database-execution entry points.
//!
//! Any ORM handle implementing [`Database`] can be wrapped so that every
//! executed statement emits one client span (named after the statement verb
//! and database, e.g. `SELECT shop`) carrying the database system, statement
//! text and table name. Errors raised by the database are recorded on the span
//! and returned to the caller unchanged.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use orm_instrumentation::{Database, Instrument, InstrumentOptions, OrmInstrumentor};
//!
//! let instrumentor = OrmInstrumentor::global();
//! instrumentor.instrument(InstrumentOptions::new().with_tracer_provider(&provider));
//!
//! let db = instrumentor.wrap(my_database);
//! let rows = db.execute_sql("SELECT * FROM users WHERE id = ?", &[42.into()]).await?;
//!
//! // later, at shutdown
//! instrumentor.uninstrument();
//! ```
//!
//! ## Span Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `db.system` | `sqlite`, `mysql`, `postgresql` or `other_sql` |
//! | `db.statement` | SQL text (with the sqlcommenter comment if configured) |
//! | `db.sql.table` | Target table name (when detectable) |
//! | `db.name` | Database name (when set) |
//! | `net.host.name` / `net.host.port` / `db.user` | From the connect parameters |
//!
//! ## Metrics
//!
//! - `db.client.operation.duration` (ms histogram)
//! - `db.client.connections.usage` (up/down counter of open connections)
//!
//! ## Features
//!
//! - `sqlite`: [`adapters::sqlite::SqliteDatabase`], a `Database` over an sqlx pool

pub mod adapters;
pub mod attributes;
pub mod commenter;
pub mod config;
mod database;
mod errors;
mod instrumentor;
mod layer;
pub mod metrics;
pub mod registry;
pub mod semconv;
mod spans;

pub use attributes::{DatabaseAttributes, DbSystem};
pub use config::{CommenterOptions, InstrumentorConfig, InstrumentorConfigBuilder};
pub use database::{ConnectParams, Database};
pub use errors::{InstrumentationError, RegistryError, VendorError};
pub use instrumentor::{instrumentation_scope, Instrument, InstrumentOptions, OrmInstrumentor};
pub use layer::{InstrumentationLayer, InstrumentedDatabase};
