// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based tracing layer for ORM databases.
//!
//! This module implements the decorator that turns every statement executed
//! through a [`Database`] into an OpenTelemetry client span, and records the
//! database client metrics alongside it.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use opentelemetry::trace::FutureExt;
use serde_json::Value;
use tower::Layer;
use tracing::{debug, trace};

use crate::attributes::DatabaseAttributes;
use crate::commenter::{add_sql_comment, commenter_data};
use crate::database::{ConnectParams, Database};
use crate::instrumentor::{OrmInstrumentor, Telemetry};
use crate::spans;

/// A Tower layer that wraps databases in an [`InstrumentedDatabase`].
///
/// Applying the layer of one instrumentor more than once to the same stack is
/// harmless: only the innermost wrapper traces.
///
/// # Example
///
/// ```rust,ignore
/// use orm_instrumentation::OrmInstrumentor;
/// use tower::Layer;
///
/// let layer = OrmInstrumentor::global().layer();
/// let db = layer.layer(my_database);
/// ```
#[derive(Clone, Debug)]
pub struct InstrumentationLayer {
    instrumentor: OrmInstrumentor,
}

impl InstrumentationLayer {
    /// Creates a layer bound to an instrumentor.
    pub fn new(instrumentor: OrmInstrumentor) -> Self {
        Self { instrumentor }
    }
}

impl<D: Database> Layer<D> for InstrumentationLayer {
    type Service = InstrumentedDatabase<D>;

    fn layer(&self, db: D) -> Self::Service {
        InstrumentedDatabase::new(db, self.instrumentor.clone())
    }
}

/// A [`Database`] that traces the database it wraps.
///
/// While its instrumentor is instrumented, every `execute_sql` and `connect`
/// produces exactly one span, and errors are recorded on it before being
/// returned unchanged. While it is not, calls go straight to the inner
/// database.
///
/// A wrapper around a database already traced by the same instrumentor stays
/// a passthrough.
#[derive(Clone)]
pub struct InstrumentedDatabase<D> {
    inner: D,
    instrumentor: OrmInstrumentor,
    attributes: DatabaseAttributes,
    nested: bool,
}

impl<D: Database> InstrumentedDatabase<D> {
    pub(crate) fn new(inner: D, instrumentor: OrmInstrumentor) -> Self {
        let attributes = DatabaseAttributes::from_database(&inner);
        let nested = inner.instrumented_by(&instrumentor);
        if nested {
            debug!(
                driver = %attributes.driver,
                "Database already instrumented, outer wrapper will not trace"
            );
        }
        Self {
            inner,
            instrumentor,
            attributes,
            nested,
        }
    }

    fn telemetry(&self) -> Option<Arc<Telemetry>> {
        if self.nested {
            return None;
        }
        self.instrumentor.telemetry()
    }

    /// The wrapped database.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Unwrap, returning the original database.
    pub fn into_inner(self) -> D {
        self.inner
    }

    /// Attributes derived from the wrapped database.
    pub fn attributes(&self) -> &DatabaseAttributes {
        &self.attributes
    }
}

#[async_trait]
impl<D: Database> Database for InstrumentedDatabase<D> {
    type Output = D::Output;
    type Error = D::Error;

    fn driver_name(&self) -> &str {
        self.inner.driver_name()
    }

    fn database(&self) -> Option<&str> {
        self.inner.database()
    }

    fn connect_params(&self) -> &ConnectParams {
        self.inner.connect_params()
    }

    async fn connect(&self, reuse_if_open: bool) -> Result<bool, Self::Error> {
        let Some(telemetry) = self.telemetry() else {
            return self.inner.connect(reuse_if_open).await;
        };

        let cx = spans::connect(&telemetry.tracer, &self.attributes);
        let result = self
            .inner
            .connect(reuse_if_open)
            .with_context(cx.clone())
            .await;

        if let Ok(true) = result {
            telemetry.metrics.connection_opened(&self.attributes);
        }
        spans::finish(&cx, &result);

        result
    }

    async fn execute_sql(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Self::Output, Self::Error> {
        let Some(telemetry) = self.telemetry() else {
            return self.inner.execute_sql(sql, params).await;
        };

        let start = Instant::now();
        let cx = spans::execute_sql(&telemetry.tracer, &self.attributes, sql);
        let config = &telemetry.config;

        let statement: Cow<'_, str> = if config.enable_commenter {
            let data = commenter_data(&self.attributes.driver, &config.commenter_options, &cx);
            let commented = add_sql_comment(sql, &data);
            if config.enable_attribute_commenter {
                spans::record_statement(&cx, &self.attributes, &commented);
            } else {
                spans::record_statement(&cx, &self.attributes, sql);
            }
            Cow::Owned(commented)
        } else {
            spans::record_statement(&cx, &self.attributes, sql);
            Cow::Borrowed(sql)
        };

        trace!(system = %self.attributes.system, statement = %statement, "Executing statement");

        let result = self
            .inner
            .execute_sql(&statement, params)
            .with_context(cx.clone())
            .await;

        telemetry
            .metrics
            .record_operation(&self.attributes, sql, start.elapsed());
        spans::finish(&cx, &result);

        result
    }

    async fn close(&self) -> Result<bool, Self::Error> {
        let result = self.inner.close().await;

        if let Ok(true) = result {
            if let Some(telemetry) = self.telemetry() {
                telemetry.metrics.connection_closed(&self.attributes);
            }
        }

        result
    }

    fn instrumented_by(&self, instrumentor: &OrmInstrumentor) -> bool {
        self.instrumentor.same_as(instrumentor) || self.inner.instrumented_by(instrumentor)
    }
}

impl<D: fmt::Debug> fmt::Debug for InstrumentedDatabase<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedDatabase")
            .field("inner", &self.inner)
            .field("instrumentor", &self.instrumentor)
            .field("system", &self.attributes.system)
            .field("nested", &self.nested)
            .finish()
    }
}
