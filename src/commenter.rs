// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! sqlcommenter support.
//!
//! Appends a comment such as
//! `/*db_driver='SqliteDatabase',traceparent='00-...-01'*/` to executed SQL so
//! that database-side logs and slow-query reports can be joined back to the
//! trace that issued the statement.
//!
//! Keys are sorted, keys and values are URL-quoted, and every `%` produced by
//! quoting is doubled so drivers using `%s` placeholders leave it alone.

use std::collections::{BTreeMap, HashMap};

use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;

use crate::config::constants::{INSTRUMENTATION_NAME, INSTRUMENTATION_VERSION};
use crate::config::CommenterOptions;

/// Key/value pairs written into a comment, in output order.
pub type CommenterData = BTreeMap<String, String>;

/// Build the comment contents for a statement.
///
/// `db_driver` and `db_framework` are always computed, the trace context only
/// when `opentelemetry_values` is on; the result is then filtered through
/// `options`.
pub fn commenter_data(driver: &str, options: &CommenterOptions, cx: &Context) -> CommenterData {
    let mut data = CommenterData::new();
    data.insert("db_driver".to_string(), driver.to_string());
    data.insert(
        "db_framework".to_string(),
        format!("{INSTRUMENTATION_NAME}:{INSTRUMENTATION_VERSION}"),
    );

    if options.opentelemetry_values {
        data.extend(opentelemetry_values(cx));
    }

    data.retain(|key, _| options.allows(key));
    data
}

/// W3C trace-context values (`traceparent`, `tracestate`) for a context.
///
/// Empty when the context carries no valid span.
pub fn opentelemetry_values(cx: &Context) -> CommenterData {
    let mut carrier = HashMap::new();
    TraceContextPropagator::new().inject_context(cx, &mut carrier);
    carrier
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

/// Render comment data as `/*key='value',...*/`.
///
/// Returns an empty string for empty data.
pub fn format_sql_comment(data: &CommenterData) -> String {
    if data.is_empty() {
        return String::new();
    }

    let pairs = data
        .iter()
        .map(|(key, value)| format!("{}='{}'", url_quote(key), url_quote(value)))
        .collect::<Vec<_>>()
        .join(",");

    format!("/*{pairs}*/")
}

/// Append a comment built from `data` to `sql`.
///
/// The comment goes after the right-trimmed statement, or before its trailing
/// semicolon. SQL is returned unchanged when there is nothing to add.
///
/// ```rust
/// use orm_instrumentation::commenter::{add_sql_comment, CommenterData};
///
/// let mut data = CommenterData::new();
/// data.insert("db_driver".into(), "SqliteDatabase".into());
///
/// assert_eq!(
///     add_sql_comment("SELECT 1;", &data),
///     "SELECT 1 /*db_driver='SqliteDatabase'*/;"
/// );
/// ```
pub fn add_sql_comment(sql: &str, data: &CommenterData) -> String {
    let comment = format_sql_comment(data);
    if comment.is_empty() {
        return sql.to_string();
    }

    let trimmed = sql.trim_end();
    match trimmed.strip_suffix(';') {
        Some(statement) => format!("{statement} {comment};"),
        None => format!("{trimmed} {comment}"),
    }
}

/// Percent-encode everything but ASCII alphanumerics and `_.-~/`, then double
/// every `%`.
///
/// `form_urlencoded` keeps `*` and encodes `~`, `/` and spaces (as `+`); the
/// fixups below bring it to the usual sqlcommenter safe set.
fn url_quote(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
        .replace("%2F", "/")
        .replace('%', "%%")
}
