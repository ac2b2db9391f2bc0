// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Instrumentor lifecycle.
//!
//! An [`OrmInstrumentor`] is a switch shared by every database it has wrapped.
//! [`Instrument::instrument`] turns telemetry on for all of them at once,
//! [`Instrument::uninstrument`] turns it off again, after which the wrapped
//! databases call straight through to the inner database.
//!
//! # Example
//!
//! ```rust,ignore
//! use orm_instrumentation::{Instrument, InstrumentOptions, OrmInstrumentor};
//!
//! let instrumentor = OrmInstrumentor::global();
//! instrumentor.instrument(InstrumentOptions::new().with_tracer_provider(&provider));
//!
//! let db = instrumentor.wrap(my_database);
//! db.execute_sql("SELECT 1", &[]).await?; // traced
//!
//! instrumentor.uninstrument();
//! db.execute_sql("SELECT 1", &[]).await?; // not traced
//! ```

use std::fmt;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwapOption;
use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::metrics::{Meter, MeterProvider};
use opentelemetry::trace::{Tracer, TracerProvider};
use opentelemetry::InstrumentationScope;
use tracing::{debug, warn};

use crate::config::constants::{
    INSTRUMENTATION_NAME, INSTRUMENTATION_VERSION, REGISTRY_NAME, SCHEMA_URL,
};
use crate::config::InstrumentorConfig;
use crate::database::Database;
use crate::layer::{InstrumentationLayer, InstrumentedDatabase};
use crate::metrics::DbClientMetrics;

/// Enable/disable lifecycle shared by every instrumentor.
///
/// Object safe, so instrumentors can be discovered and driven by name through
/// the [`registry`](crate::registry).
pub trait Instrument: Send + Sync {
    /// Name the instrumentor is registered under.
    fn name(&self) -> &'static str;

    /// Start emitting telemetry.
    ///
    /// Calling this while already instrumented logs a warning and changes
    /// nothing.
    fn instrument(&self, options: InstrumentOptions);

    /// Stop emitting telemetry.
    ///
    /// Calling this while not instrumented logs a warning and changes nothing.
    fn uninstrument(&self);

    /// Whether telemetry is currently being emitted.
    fn is_instrumented(&self) -> bool;
}

/// Options for [`Instrument::instrument`].
///
/// Providers default to the globally registered ones.
#[derive(Default)]
pub struct InstrumentOptions {
    tracer: Option<BoxedTracer>,
    meter: Option<Meter>,
    config: InstrumentorConfig,
}

impl InstrumentOptions {
    /// Options using the global providers and the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain the tracer from a specific provider.
    pub fn with_tracer_provider<P>(mut self, provider: &P) -> Self
    where
        P: TracerProvider,
        P::Tracer: Send + Sync + 'static,
        <P::Tracer as Tracer>::Span: Send + Sync + 'static,
    {
        let tracer = provider.tracer_with_scope(instrumentation_scope());
        self.tracer = Some(BoxedTracer::new(Box::new(tracer)));
        self
    }

    /// Obtain the meter from a specific provider.
    pub fn with_meter_provider<M: MeterProvider + ?Sized>(mut self, provider: &M) -> Self {
        self.meter = Some(provider.meter_with_scope(instrumentation_scope()));
        self
    }

    /// Use a specific configuration.
    pub fn with_config(mut self, config: InstrumentorConfig) -> Self {
        self.config = config;
        self
    }
}

impl fmt::Debug for InstrumentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentOptions")
            .field("tracer", &self.tracer.is_some())
            .field("meter", &self.meter.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// Scope reported on every span and metric this crate emits.
pub fn instrumentation_scope() -> InstrumentationScope {
    InstrumentationScope::builder(INSTRUMENTATION_NAME)
        .with_version(INSTRUMENTATION_VERSION)
        .with_schema_url(SCHEMA_URL)
        .build()
}

/// Everything an active instrumentor hands to its wrapped databases.
pub(crate) struct Telemetry {
    pub(crate) tracer: BoxedTracer,
    pub(crate) metrics: DbClientMetrics,
    pub(crate) config: InstrumentorConfig,
}

impl Telemetry {
    fn from_options(options: InstrumentOptions) -> Self {
        let tracer = options
            .tracer
            .unwrap_or_else(|| global::tracer_provider().tracer_with_scope(instrumentation_scope()));
        let meter = options
            .meter
            .unwrap_or_else(|| global::meter_provider().meter_with_scope(instrumentation_scope()));

        Self {
            tracer,
            metrics: DbClientMetrics::new(&meter),
            config: options.config,
        }
    }
}

static GLOBAL: LazyLock<OrmInstrumentor> = LazyLock::new(OrmInstrumentor::new);

/// Instrumentor for [`Database`] implementations.
///
/// Cloning is cheap and clones share the same switch. The process-wide
/// instance is [`OrmInstrumentor::global`]; standalone instances are useful
/// when different databases need independent telemetry.
#[derive(Clone, Default)]
pub struct OrmInstrumentor {
    state: Arc<ArcSwapOption<Telemetry>>,
}

impl OrmInstrumentor {
    /// Create a standalone, uninstrumented instrumentor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instrumentor, also the one registered for discovery.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Wrap a database so its calls are traced while this instrumentor is
    /// instrumented.
    pub fn wrap<D: Database>(&self, db: D) -> InstrumentedDatabase<D> {
        InstrumentedDatabase::new(db, self.clone())
    }

    /// A [`tower::Layer`] that wraps databases with this instrumentor.
    pub fn layer(&self) -> InstrumentationLayer {
        InstrumentationLayer::new(self.clone())
    }

    pub(crate) fn telemetry(&self) -> Option<Arc<Telemetry>> {
        self.state.load_full()
    }

    /// Whether both handles share the same switch.
    pub(crate) fn same_as(&self, other: &OrmInstrumentor) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Instrument for OrmInstrumentor {
    fn name(&self) -> &'static str {
        REGISTRY_NAME
    }

    fn instrument(&self, options: InstrumentOptions) {
        let telemetry = Arc::new(Telemetry::from_options(options));

        let previous = self.state.rcu(|current| match current {
            Some(active) => Some(Arc::clone(active)),
            None => Some(Arc::clone(&telemetry)),
        });

        if previous.is_some() {
            warn!(
                instrumentor = REGISTRY_NAME,
                "Attempting to instrument while already instrumented"
            );
            return;
        }

        debug!(
            instrumentor = REGISTRY_NAME,
            commenter = telemetry.config.enable_commenter,
            "Instrumentation enabled"
        );
    }

    fn uninstrument(&self) {
        if self.state.swap(None).is_none() {
            warn!(
                instrumentor = REGISTRY_NAME,
                "Attempting to uninstrument while already uninstrumented"
            );
            return;
        }

        debug!(instrumentor = REGISTRY_NAME, "Instrumentation disabled");
    }

    fn is_instrumented(&self) -> bool {
        self.state.load().is_some()
    }
}

impl fmt::Debug for OrmInstrumentor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrmInstrumentor")
            .field("instrumented", &self.is_instrumented())
            .finish()
    }
}
