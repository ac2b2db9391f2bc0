// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests against a real SQLite database
//!
//! Run with `cargo test --features sqlite`.

#![cfg(feature = "sqlite")]

mod helpers;

use helpers::{string_attribute, TestTelemetry};
use opentelemetry::trace::Status;
use orm_instrumentation::adapters::sqlite::{SqliteDatabase, SqliteError};
use orm_instrumentation::{Database, Instrument, OrmInstrumentor};
use sqlx::Row;

fn instrumented(telemetry: &TestTelemetry) -> OrmInstrumentor {
    let instrumentor = OrmInstrumentor::new();
    instrumentor.instrument(telemetry.options());
    instrumentor
}

/// Test connect plus a select against an in-memory database
#[tokio::test]
async fn test_memory_database_select() {
    let telemetry = TestTelemetry::new();
    let db = instrumented(&telemetry).wrap(SqliteDatabase::memory());

    db.connect(false).await.unwrap();
    let rows = db.execute_sql("SELECT 1 + 1", &[]).await.unwrap();
    assert_eq!(rows[0].get::<i64, _>(0), 2);

    let spans = telemetry.finished_spans();
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].name, "connect");
    assert_eq!(spans[1].name, "SELECT :memory:");
    assert_eq!(string_attribute(&spans[1], "db.system").as_deref(), Some("sqlite"));

    assert!(db.close().await.unwrap());
}

/// Test that two databases are traced independently
#[tokio::test]
async fn test_two_databases() {
    let telemetry = TestTelemetry::new();
    let instrumentor = instrumented(&telemetry);
    let first = instrumentor.wrap(SqliteDatabase::memory());
    let second = instrumentor.wrap(SqliteDatabase::memory());

    first.connect(false).await.unwrap();
    second.connect(false).await.unwrap();
    first.execute_sql("SELECT 1", &[]).await.unwrap();
    second.execute_sql("SELECT 2", &[]).await.unwrap();

    let spans = telemetry.finished_spans();
    assert_eq!(spans.len(), 4);
    assert_eq!(spans.iter().filter(|span| span.name == "connect").count(), 2);
}

/// Test that SQLite errors reach the caller and the span
#[tokio::test]
async fn test_sqlite_error() {
    let telemetry = TestTelemetry::new();
    let db = instrumented(&telemetry).wrap(SqliteDatabase::memory());

    db.connect(false).await.unwrap();
    let Err(err) = db.execute_sql("SELECT * FROM missing", &[]).await else {
        panic!("Query against a missing table should fail");
    };
    assert!(matches!(err, SqliteError::Sqlx(_)));

    let span = telemetry.finished_spans().pop().unwrap();
    assert_eq!(span.name, "SELECT :memory:");
    assert_eq!(string_attribute(&span, "db.sql.table").as_deref(), Some("missing"));
    assert!(matches!(span.status, Status::Error { .. }));
}

/// Test that sqlcommenter comments are valid SQL for SQLite
#[tokio::test]
async fn test_commented_statements_execute() {
    let telemetry = TestTelemetry::new();
    let instrumentor = OrmInstrumentor::new();
    instrumentor.instrument(
        telemetry.options().with_config(
            orm_instrumentation::InstrumentorConfigBuilder::new()
                .enable_commenter(true)
                .build(),
        ),
    );
    let db = instrumentor.wrap(SqliteDatabase::memory());

    db.connect(false).await.unwrap();
    db.execute_sql("CREATE TABLE notes (id INTEGER, body TEXT);", &[])
        .await
        .unwrap();
    db.execute_sql(
        "INSERT INTO notes (id, body) VALUES (?, ?)",
        &[1.into(), "hello".into()],
    )
    .await
    .unwrap();
    let rows = db
        .execute_sql("SELECT body FROM notes WHERE id = ?", &[1.into()])
        .await
        .unwrap();

    assert_eq!(rows[0].get::<String, _>("body"), "hello");
    assert_eq!(telemetry.finished_spans().len(), 4);
}
