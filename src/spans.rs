// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! OpenTelemetry span creation helpers for instrumented database operations.
//!
//! Telemetry concerns stay out of the decorator: each instrumented operation
//! has a corresponding span helper here, and the decorator only decides when
//! to call it.
//!
//! Usage pattern:
//! ```rust,ignore
//! let cx = spans::execute_sql(&tracer, &db_attributes, sql);
//! let result = inner.execute_sql(sql, params).with_context(cx.clone()).await;
//! spans::finish(&cx.span(), &result);
//! ```

use opentelemetry::global::BoxedTracer;
use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};

use crate::attributes::{table_name, DatabaseAttributes};
use crate::semconv;

/// Start the span for a single statement.
///
/// Parent: whatever span is current when the statement is issued
/// Children: spans the database implementation itself emits
///
/// Returns a context holding the new span so the statement can run inside it.
pub(crate) fn execute_sql(tracer: &BoxedTracer, db: &DatabaseAttributes, sql: &str) -> Context {
    let span = tracer
        .span_builder(db.operation_name(sql))
        .with_kind(SpanKind::Client)
        .start(tracer);

    Context::current_with_span(span)
}

/// Start the span for opening a connection.
///
/// Parent: whatever span is current when the connection is opened
pub(crate) fn connect(tracer: &BoxedTracer, db: &DatabaseAttributes) -> Context {
    let span = tracer
        .span_builder("connect")
        .with_kind(SpanKind::Client)
        .start(tracer);
    let cx = Context::current_with_span(span);

    {
        let span = cx.span();
        if span.is_recording() {
            span.set_attributes(db.connection.iter().cloned());
            span.set_attribute(KeyValue::new(semconv::DB_SYSTEM, db.system.as_str()));
        }
    }

    cx
}

/// Attach the statement attributes to a statement span.
///
/// Skipped entirely when the span is not recording.
pub(crate) fn record_statement(cx: &Context, db: &DatabaseAttributes, statement: &str) {
    let span = cx.span();
    if !span.is_recording() {
        return;
    }

    span.set_attribute(KeyValue::new(semconv::DB_STATEMENT, statement.to_string()));
    span.set_attribute(KeyValue::new(semconv::DB_SYSTEM, db.system.as_str()));
    if let Some(table) = table_name(statement) {
        span.set_attribute(KeyValue::new(semconv::DB_SQL_TABLE, table));
    }
    span.set_attributes(db.connection.iter().cloned());
}

/// Record the outcome of an operation and end its span.
///
/// An error is recorded as an exception event plus an error status; success
/// marks the span OK. The span is ended either way.
pub(crate) fn finish<T, E>(cx: &Context, result: &Result<T, E>)
where
    E: std::error::Error + 'static,
{
    let span = cx.span();
    match result {
        Ok(_) => {
            if span.is_recording() {
                span.set_status(Status::Ok);
            }
        }
        Err(err) => {
            span.record_error(err);
            span.set_status(Status::error(err.to_string()));
        }
    }
    span.end();
}
