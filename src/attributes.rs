// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Derivation of span names and attributes from a database and its SQL.
//!
//! Nothing in here parses SQL properly. The operation name is the first word
//! of the statement, and the table name is the identifier following the first
//! `FROM`/`INTO`/`UPDATE`/`JOIN`/`TABLE` keyword. That covers the statements
//! ORMs generate; for anything stranger the attribute is simply omitted.

use std::fmt;

use opentelemetry::KeyValue;

use crate::config::constants::DEFAULT_PORT;
use crate::database::{ConnectParams, Database};
use crate::errors::VendorError;
use crate::semconv;

/// Database systems the instrumentation can identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbSystem {
    /// SQLite
    Sqlite,
    /// MySQL (and MariaDB drivers speaking the MySQL protocol)
    Mysql,
    /// PostgreSQL
    Postgresql,
    /// Any other SQL database
    OtherSql,
}

impl DbSystem {
    /// Identify the database system from a driver name.
    ///
    /// Matching is case-insensitive and by substring, so `SqliteDatabase`,
    /// `SqliteExtDatabase` and `sqlite3` all map to [`DbSystem::Sqlite`].
    ///
    /// # Errors
    ///
    /// Returns [`VendorError::Unsupported`] when the name contains none of
    /// `sqlite`, `mysql` or `postgresql`.
    pub fn from_driver_name(driver: &str) -> Result<Self, VendorError> {
        let lower = driver.to_ascii_lowercase();
        if lower.contains("sqlite") {
            Ok(Self::Sqlite)
        } else if lower.contains("mysql") {
            Ok(Self::Mysql)
        } else if lower.contains("postgresql") {
            Ok(Self::Postgresql)
        } else {
            Err(VendorError::unsupported(driver))
        }
    }

    /// The `db.system` attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
            Self::Postgresql => "postgresql",
            Self::OtherSql => "other_sql",
        }
    }
}

impl fmt::Display for DbSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip a single leading `/* ... */` comment from a statement.
///
/// Only a comment at the very start is removed; an unterminated comment
/// leaves the statement as is.
pub fn strip_leading_comment(sql: &str) -> &str {
    sql.strip_prefix("/*")
        .and_then(|rest| rest.find("*/").map(|end| &rest[end + 2..]))
        .unwrap_or(sql)
}

/// Span name for a statement.
///
/// The first word of the statement (after a leading comment) followed by the
/// database name, e.g. `SELECT :memory:`. Falls back to the system name when
/// neither is available.
pub fn operation_name(system: DbSystem, database: Option<&str>, sql: &str) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(verb) = strip_leading_comment(sql).split_whitespace().next() {
        parts.push(verb);
    }
    if let Some(name) = database.filter(|name| !name.is_empty()) {
        parts.push(name);
    }

    if parts.is_empty() {
        system.as_str().to_string()
    } else {
        parts.join(" ")
    }
}

const TABLE_KEYWORDS: [&str; 5] = ["FROM", "INTO", "UPDATE", "JOIN", "TABLE"];
const TABLE_MODIFIERS: [&str; 5] = ["IF", "NOT", "EXISTS", "ONLY", "IGNORE"];
const SUBQUERY_STARTS: [&str; 3] = ["SELECT", "WITH", "VALUES"];

/// Primary table a statement operates on, when detectable.
///
/// ```rust
/// use orm_instrumentation::attributes::table_name;
///
/// assert_eq!(table_name("SELECT id FROM users WHERE id = ?").as_deref(), Some("users"));
/// assert_eq!(table_name("INSERT INTO \"public\".\"orders\" VALUES (?)").as_deref(), Some("public.orders"));
/// assert_eq!(table_name("SELECT 1 + 1"), None);
/// ```
pub fn table_name(sql: &str) -> Option<String> {
    let mut tokens = strip_leading_comment(sql)
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')' | ';'))
        .filter(|token| !token.is_empty());

    while let Some(token) = tokens.next() {
        if !is_one_of(token, &TABLE_KEYWORDS) {
            continue;
        }

        let candidate = tokens
            .by_ref()
            .find(|token| !is_one_of(token, &TABLE_MODIFIERS));

        match candidate {
            Some(name) if is_one_of(name, &SUBQUERY_STARTS) => continue,
            Some(name) => return normalize_identifier(name),
            None => return None,
        }
    }

    None
}

fn is_one_of(token: &str, words: &[&str]) -> bool {
    words.iter().any(|word| token.eq_ignore_ascii_case(word))
}

fn normalize_identifier(raw: &str) -> Option<String> {
    let name = raw
        .split('.')
        .map(|part| part.trim_matches(|c| matches!(c, '"' | '`' | '[' | ']' | '\'')))
        .collect::<Vec<_>>()
        .join(".");

    if name.is_empty() || name.starts_with(['?', '$', ':']) {
        None
    } else {
        Some(name)
    }
}

/// Span attributes derived from connection parameters.
///
/// `net.host.port` is always present and defaults to 3306.
pub fn connect_attributes(params: &ConnectParams) -> Vec<KeyValue> {
    let mut attrs = Vec::with_capacity(3);
    if let Some(host) = &params.host {
        attrs.push(KeyValue::new(semconv::NET_HOST_NAME, host.clone()));
    }
    if let Some(user) = &params.user {
        attrs.push(KeyValue::new(semconv::DB_USER, user.clone()));
    }
    attrs.push(KeyValue::new(
        semconv::NET_HOST_PORT,
        i64::from(params.port.unwrap_or(DEFAULT_PORT)),
    ));
    attrs
}

/// Identifier of the connection pool a database belongs to.
///
/// `sqlite://<database>` for SQLite, `<system>://<host>:<port>/<database>`
/// for server databases, empty for unknown systems.
pub fn pool_name(system: DbSystem, database: Option<&str>, params: &ConnectParams) -> String {
    let name = database.unwrap_or_default();
    match system {
        DbSystem::Sqlite => format!("sqlite://{name}"),
        DbSystem::Mysql | DbSystem::Postgresql => format!(
            "{system}://{host}:{port}/{name}",
            host = params.host.as_deref().unwrap_or_default(),
            port = params.port.unwrap_or(DEFAULT_PORT),
        ),
        DbSystem::OtherSql => String::new(),
    }
}

/// Everything the instrumentation needs to know about a database, computed
/// once when the database is wrapped.
#[derive(Debug, Clone)]
pub struct DatabaseAttributes {
    /// Identified database system
    pub system: DbSystem,
    /// Driver name as reported by the database
    pub driver: String,
    /// Database name, if any
    pub database: Option<String>,
    /// Server host, if known
    pub host: Option<String>,
    /// Pool identifier for connection metrics
    pub pool_name: String,
    /// Connection attributes (host, user, port) plus `db.name`
    pub connection: Vec<KeyValue>,
}

impl DatabaseAttributes {
    /// Derive the attributes of a database.
    ///
    /// An unrecognised driver is logged and reported as `other_sql`; it never
    /// prevents the database from being used.
    pub fn from_database<D: Database + ?Sized>(db: &D) -> Self {
        let driver = db.driver_name().to_string();
        let system = DbSystem::from_driver_name(&driver).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Falling back to other_sql for db.system");
            DbSystem::OtherSql
        });

        let params = db.connect_params();
        let database = db.database().map(str::to_string);

        let mut connection = connect_attributes(params);
        if let Some(name) = &database {
            connection.push(KeyValue::new(semconv::DB_NAME, name.clone()));
        }

        Self {
            system,
            pool_name: pool_name(system, database.as_deref(), params),
            host: params.host.clone(),
            driver,
            database,
            connection,
        }
    }

    /// Span name for a statement against this database.
    pub fn operation_name(&self, sql: &str) -> String {
        operation_name(self.system, self.database.as_deref(), sql)
    }
}
