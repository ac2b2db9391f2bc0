// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Database client metrics.
//!
//! Naming follows the OTel database client conventions (dot-separated).

use std::time::Duration;

use opentelemetry::metrics::{Histogram, Meter, UpDownCounter};
use opentelemetry::KeyValue;

use crate::attributes::DatabaseAttributes;
use crate::semconv;

/// Metric instruments recorded by the instrumented database.
#[derive(Clone)]
pub struct DbClientMetrics {
    operation_duration: Histogram<u64>,
    connection_usage: UpDownCounter<i64>,
}

impl DbClientMetrics {
    /// Create the instruments on a meter.
    pub fn new(meter: &Meter) -> Self {
        Self {
            operation_duration: meter
                .u64_histogram(semconv::DB_CLIENT_OPERATION_DURATION)
                .with_description("The duration of the operation")
                .with_unit("ms")
                .build(),
            connection_usage: meter
                .i64_up_down_counter(semconv::DB_CLIENT_CONNECTIONS_USAGE)
                .with_description(
                    "The number of connections that are currently in state described by the state attribute.",
                )
                .with_unit("connection")
                .build(),
        }
    }

    /// Record how long a statement took.
    pub fn record_operation(&self, db: &DatabaseAttributes, sql: &str, elapsed: Duration) {
        self.operation_duration.record(
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            &operation_attributes(db, sql),
        );
    }

    /// A connection was opened and is now in use.
    pub fn connection_opened(&self, db: &DatabaseAttributes) {
        self.connection_usage.add(1, &connection_attributes(db));
    }

    /// A connection in use was closed.
    pub fn connection_closed(&self, db: &DatabaseAttributes) {
        self.connection_usage.add(-1, &connection_attributes(db));
    }
}

/// Attributes of a `db.client.operation.duration` measurement.
pub fn operation_attributes(db: &DatabaseAttributes, sql: &str) -> Vec<KeyValue> {
    let mut attrs = vec![
        KeyValue::new(semconv::DB_SYSTEM_NAME, db.system.as_str()),
        KeyValue::new(semconv::DB_QUERY_TEXT, sql.to_string()),
    ];
    if let Some(host) = &db.host {
        attrs.push(KeyValue::new(semconv::DB_SERVER_ADDRESS, host.clone()));
    }
    attrs
}

/// Attributes of a `db.client.connections.usage` measurement.
///
/// The shim only observes connect and close, never pool checkout, so the state
/// is always `used`.
pub fn connection_attributes(db: &DatabaseAttributes) -> Vec<KeyValue> {
    vec![
        KeyValue::new(semconv::POOL_NAME, db.pool_name.clone()),
        KeyValue::new(semconv::STATE, "used"),
    ]
}
