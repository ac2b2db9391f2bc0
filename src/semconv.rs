// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! OpenTelemetry semantic convention keys used by the instrumentation.
//!
//! Span attributes follow the 1.11 schema ([`SCHEMA_URL`](crate::config::constants::SCHEMA_URL)),
//! most of which later schema versions deprecate; they are re-exported here
//! under stable local names so call sites stay free of deprecation noise. The
//! metric attributes use the newer `db.*` names the database client metrics
//! are defined with. Only keys `opentelemetry-semantic-conventions` does not
//! provide are spelled out locally.

use opentelemetry_semantic_conventions::attribute;

pub use opentelemetry_semantic_conventions::attribute::{DB_QUERY_TEXT, DB_SYSTEM};
pub use opentelemetry_semantic_conventions::metric::DB_CLIENT_OPERATION_DURATION;

/// The database statement being executed.
#[allow(deprecated)]
pub const DB_STATEMENT: &str = attribute::DB_STATEMENT;

/// Name of the primary table the statement operates on.
#[allow(deprecated)]
pub const DB_SQL_TABLE: &str = attribute::DB_SQL_TABLE;

/// Name of the database being accessed.
#[allow(deprecated)]
pub const DB_NAME: &str = attribute::DB_NAME;

/// Username for accessing the database.
#[allow(deprecated)]
pub const DB_USER: &str = attribute::DB_USER;

/// Host name of the database server.
#[allow(deprecated)]
pub const NET_HOST_NAME: &str = attribute::NET_HOST_NAME;

/// Port of the database server.
#[allow(deprecated)]
pub const NET_HOST_PORT: &str = attribute::NET_HOST_PORT;

/// Up/down counter of connections by state.
#[allow(deprecated)]
pub const DB_CLIENT_CONNECTIONS_USAGE: &str =
    opentelemetry_semantic_conventions::metric::DB_CLIENT_CONNECTIONS_USAGE;

/// Metric attribute: database system.
pub const DB_SYSTEM_NAME: &str = "db.system.name";

/// Metric attribute: server address.
pub const DB_SERVER_ADDRESS: &str = "db.server.address";

/// Metric attribute: connection pool identifier.
pub const POOL_NAME: &str = "pool.name";

/// Metric attribute: connection state.
pub const STATE: &str = "state";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_keys() {
        assert_eq!(DB_SYSTEM, "db.system");
        assert_eq!(DB_STATEMENT, "db.statement");
        assert_eq!(DB_SQL_TABLE, "db.sql.table");
        assert_eq!(DB_NAME, "db.name");
        assert_eq!(DB_USER, "db.user");
        assert_eq!(NET_HOST_NAME, "net.host.name");
        assert_eq!(NET_HOST_PORT, "net.host.port");
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(DB_CLIENT_OPERATION_DURATION, "db.client.operation.duration");
        assert_eq!(DB_CLIENT_CONNECTIONS_USAGE, "db.client.connections.usage");
        assert_eq!(DB_QUERY_TEXT, "db.query.text");
    }
}
