// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for orm-instrumentation integration tests
//!
//! Provides a mock [`Database`] and an in-memory OpenTelemetry pipeline so
//! spans can be inspected without a real database or collector.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use opentelemetry::trace::{SpanId, TraceContextExt};
use opentelemetry::{Context, KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::metrics::data::{Histogram, Metric, ResourceMetrics, Sum};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::testing::metrics::InMemoryMetricExporter;
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::{Config, Sampler, TracerProvider};
use orm_instrumentation::{ConnectParams, Database, InstrumentOptions};

/// Error raised by [`MockDatabase`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// Mock Database for testing the instrumentation
///
/// Records every statement it receives and the span that was current while
/// executing it. Tracks whether it is connected the way ORMs do: a second
/// `connect` reuses the open connection or fails. Failures are configured up
/// front.
///
/// # Example
///
/// ```rust,ignore
/// let mock = MockDatabase::sqlite(":memory:")
///     .failing_with("no such table: users");
///
/// let db = instrumentor.wrap(mock);
/// assert!(db.execute_sql("SELECT * FROM users", &[]).await.is_err());
/// ```
pub struct MockDatabase {
    driver: String,
    database: Option<String>,
    params: ConnectParams,
    execute_error: Option<String>,
    connect_error: Option<String>,
    connected: Mutex<bool>,
    executed: Mutex<Vec<String>>,
    observed_spans: Mutex<Vec<SpanId>>,
}

impl MockDatabase {
    /// Create a mock with the given driver name and database name
    pub fn new(driver: &str, database: Option<&str>) -> Self {
        Self {
            driver: driver.to_string(),
            database: database.map(str::to_string),
            params: ConnectParams::new(),
            execute_error: None,
            connect_error: None,
            connected: Mutex::new(false),
            executed: Mutex::new(Vec::new()),
            observed_spans: Mutex::new(Vec::new()),
        }
    }

    /// A SQLite mock
    pub fn sqlite(database: &str) -> Self {
        Self::new("SqliteDatabase", Some(database))
    }

    /// A PostgreSQL mock
    pub fn postgres(database: &str) -> Self {
        Self::new("PostgresqlDatabase", Some(database))
    }

    /// Set connection parameters
    pub fn with_params(mut self, params: ConnectParams) -> Self {
        self.params = params;
        self
    }

    /// Make every `execute_sql` fail with this message
    pub fn failing_with(mut self, message: &str) -> Self {
        self.execute_error = Some(message.to_string());
        self
    }

    /// Make every `connect` fail with this message
    pub fn failing_connect_with(mut self, message: &str) -> Self {
        self.connect_error = Some(message.to_string());
        self
    }

    /// Statements received so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Span ids that were current while statements executed
    pub fn observed_spans(&self) -> Vec<SpanId> {
        self.observed_spans.lock().unwrap().clone()
    }
}

#[async_trait]
impl Database for MockDatabase {
    type Output = usize;
    type Error = MockError;

    fn driver_name(&self) -> &str {
        &self.driver
    }

    fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    fn connect_params(&self) -> &ConnectParams {
        &self.params
    }

    async fn connect(&self, reuse_if_open: bool) -> Result<bool, MockError> {
        if let Some(message) = &self.connect_error {
            return Err(MockError(message.clone()));
        }

        let mut connected = self.connected.lock().unwrap();
        match (*connected, reuse_if_open) {
            (true, true) => Ok(false),
            (true, false) => Err(MockError("Connection already opened".to_string())),
            (false, _) => {
                *connected = true;
                Ok(true)
            }
        }
    }

    async fn execute_sql(
        &self,
        sql: &str,
        params: &[serde_json::Value],
    ) -> Result<usize, MockError> {
        self.executed.lock().unwrap().push(sql.to_string());
        self.observed_spans
            .lock()
            .unwrap()
            .push(Context::current().span().span_context().span_id());

        match &self.execute_error {
            Some(message) => Err(MockError(message.clone())),
            None => Ok(params.len()),
        }
    }

    async fn close(&self) -> Result<bool, MockError> {
        let mut connected = self.connected.lock().unwrap();
        let was_open = *connected;
        *connected = false;
        Ok(was_open)
    }
}

/// In-memory tracing pipeline
pub struct TestTelemetry {
    pub exporter: InMemorySpanExporter,
    pub provider: TracerProvider,
}

impl TestTelemetry {
    /// A pipeline that samples and exports every span
    pub fn new() -> Self {
        Self::with_sampler(Sampler::AlwaysOn)
    }

    /// A pipeline whose spans are never recorded
    pub fn not_recording() -> Self {
        Self::with_sampler(Sampler::AlwaysOff)
    }

    #[allow(deprecated)]
    fn with_sampler(sampler: Sampler) -> Self {
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_config(Config::default().with_sampler(sampler))
            .with_simple_exporter(exporter.clone())
            .build();

        Self { exporter, provider }
    }

    /// Instrument options wired to this pipeline
    pub fn options(&self) -> InstrumentOptions {
        InstrumentOptions::new().with_tracer_provider(&self.provider)
    }

    /// Spans that have ended so far
    pub fn finished_spans(&self) -> Vec<SpanData> {
        self.exporter.get_finished_spans().unwrap()
    }
}

/// Look up a span attribute by key
pub fn attribute<'a>(span: &'a SpanData, key: &str) -> Option<&'a Value> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| &kv.value)
}

/// Look up a string span attribute by key
pub fn string_attribute(span: &SpanData, key: &str) -> Option<String> {
    attribute(span, key).map(|value| value.as_str().into_owned())
}

/// In-memory metrics pipeline
///
/// The periodic reader needs a multi-threaded runtime to make progress on
/// flush, so tests using this must run with `flavor = "multi_thread"`.
pub struct TestMetrics {
    pub exporter: InMemoryMetricExporter,
    pub provider: SdkMeterProvider,
}

impl TestMetrics {
    pub fn new() -> Self {
        let exporter = InMemoryMetricExporter::default();
        let reader = PeriodicReader::builder(exporter.clone(), runtime::Tokio).build();
        let provider = SdkMeterProvider::builder().with_reader(reader).build();

        Self { exporter, provider }
    }

    /// Flush and return the cumulative state of every instrument
    pub fn collect(&self) -> Vec<ResourceMetrics> {
        self.exporter.reset();
        self.provider.force_flush().unwrap();
        self.exporter.get_finished_metrics().unwrap()
    }
}

/// Find an exported metric by name
pub fn find_metric<'a>(metrics: &'a [ResourceMetrics], name: &str) -> Option<&'a Metric> {
    metrics
        .iter()
        .flat_map(|resource| &resource.scope_metrics)
        .flat_map(|scope| &scope.metrics)
        .find(|metric| metric.name == name)
}

/// The data of a `u64` histogram metric
pub fn u64_histogram(metric: &Metric) -> &Histogram<u64> {
    metric
        .data
        .as_any()
        .downcast_ref::<Histogram<u64>>()
        .expect("metric should be a u64 histogram")
}

/// The data of an `i64` sum metric (counters and up/down counters)
pub fn i64_sum(metric: &Metric) -> &Sum<i64> {
    metric
        .data
        .as_any()
        .downcast_ref::<Sum<i64>>()
        .expect("metric should be an i64 sum")
}

/// Look up a metric data point attribute by key
pub fn point_attribute<'a>(attributes: &'a [KeyValue], key: &str) -> Option<&'a Value> {
    attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| &kv.value)
}
