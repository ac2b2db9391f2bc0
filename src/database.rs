// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The ORM integration point.
//!
//! [`Database`] is the surface the instrumentation wraps. Any ORM or driver
//! that exposes statement execution, connection management and a little
//! metadata about itself can implement it, and then be traced by wrapping it
//! with [`OrmInstrumentor::wrap`](crate::OrmInstrumentor::wrap) or
//! [`OrmInstrumentor::layer`](crate::OrmInstrumentor::layer).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::instrumentor::OrmInstrumentor;

/// Connection parameters a database was configured with.
///
/// Only the fields the instrumentation reports are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectParams {
    /// Server host name or address
    pub host: Option<String>,
    /// Server port
    pub port: Option<u16>,
    /// User the connection authenticates as
    pub user: Option<String>,
}

impl ConnectParams {
    /// Create empty connection parameters (e.g. for embedded databases).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// A database handle as exposed by an ORM.
///
/// The instrumentation reads the metadata methods to build span attributes
/// and wraps the three lifecycle methods. Implementations must be cheap to
/// share across tasks; the decorator only ever borrows them.
#[async_trait]
pub trait Database: Send + Sync {
    /// Result of a successfully executed statement (cursor, rows, row count...).
    type Output: Send;

    /// Error raised by the database.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Name of the driver, e.g. `SqliteDatabase` or `PostgresqlDatabase`.
    ///
    /// Used to derive `db.system`.
    fn driver_name(&self) -> &str;

    /// Database name (or file path for embedded databases), if any.
    fn database(&self) -> Option<&str>;

    /// Parameters the connection was configured with.
    fn connect_params(&self) -> &ConnectParams;

    /// Open the connection.
    ///
    /// Returns `true` if a new connection was opened, `false` if an open one was
    /// reused (only possible with `reuse_if_open`).
    async fn connect(&self, reuse_if_open: bool) -> Result<bool, Self::Error>;

    /// Execute a SQL statement with positional parameters.
    async fn execute_sql(&self, sql: &str, params: &[Value])
        -> Result<Self::Output, Self::Error>;

    /// Close the connection.
    ///
    /// Returns `true` if an open connection was closed.
    async fn close(&self) -> Result<bool, Self::Error>;

    /// Whether this database is already traced by `instrumentor`.
    ///
    /// Plain databases never are. Decorators report their own instrumentor and
    /// delegate to what they wrap, so wrapping twice with the same
    /// instrumentor still yields a single span per call.
    fn instrumented_by(&self, _instrumentor: &OrmInstrumentor) -> bool {
        false
    }
}
