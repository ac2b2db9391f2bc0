// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! SQLite [`Database`] backed by an sqlx pool.
//!
//! Mirrors the connect/execute/close lifecycle ORMs expose: statements fail
//! with [`SqliteError::NotConnected`] until [`Database::connect`] succeeds.

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Sqlite;
use tokio::sync::Mutex;

use crate::database::{ConnectParams, Database};

/// In-memory database path.
pub const MEMORY: &str = ":memory:";

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Errors from [`SqliteDatabase`].
#[derive(Debug, thiserror::Error)]
pub enum SqliteError {
    /// `connect` was called on an open database without `reuse_if_open`.
    #[error("Connection already opened")]
    AlreadyOpen,

    /// A statement was executed before `connect`.
    #[error("Database connection not opened")]
    NotConnected,

    /// Error reported by SQLite.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A SQLite database file (or `:memory:`).
#[derive(Debug)]
pub struct SqliteDatabase {
    path: String,
    params: ConnectParams,
    pool: Mutex<Option<SqlitePool>>,
}

impl SqliteDatabase {
    /// A database at `path`, not yet connected.
    ///
    /// The file is created on connect if it does not exist.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: ConnectParams::new(),
            pool: Mutex::new(None),
        }
    }

    /// A private in-memory database, not yet connected.
    pub fn memory() -> Self {
        Self::new(MEMORY)
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
        if self.path == MEMORY {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else {
            Ok(SqliteConnectOptions::new()
                .filename(&self.path)
                .create_if_missing(true))
        }
    }
}

fn bind_value<'q>(query: SqliteQuery<'q>, value: &Value) -> SqliteQuery<'q> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(flag) => query.bind(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(int) => query.bind(int),
            None => query.bind(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(text) => query.bind(text.clone()),
        other => query.bind(other.to_string()),
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    type Output = Vec<SqliteRow>;
    type Error = SqliteError;

    fn driver_name(&self) -> &str {
        "SqliteDatabase"
    }

    fn database(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn connect_params(&self) -> &ConnectParams {
        &self.params
    }

    async fn connect(&self, reuse_if_open: bool) -> Result<bool, SqliteError> {
        let mut pool = self.pool.lock().await;
        if pool.is_some() {
            return if reuse_if_open {
                Ok(false)
            } else {
                Err(SqliteError::AlreadyOpen)
            };
        }

        // one connection: every connection to :memory: is a separate database
        let opened = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(self.connect_options()?)
            .await?;
        *pool = Some(opened);

        Ok(true)
    }

    async fn execute_sql(&self, sql: &str, params: &[Value]) -> Result<Vec<SqliteRow>, SqliteError> {
        let pool = self
            .pool
            .lock()
            .await
            .clone()
            .ok_or(SqliteError::NotConnected)?;

        let query = params
            .iter()
            .fold(sqlx::query(sql), |query, value| bind_value(query, value));

        Ok(query.fetch_all(&pool).await?)
    }

    async fn close(&self) -> Result<bool, SqliteError> {
        let Some(pool) = self.pool.lock().await.take() else {
            return Ok(false);
        };

        pool.close().await;
        Ok(true)
    }
}
