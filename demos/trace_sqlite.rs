/// Trace SQLite statements with an in-memory span exporter
///
/// This example demonstrates:
/// 1. Instrumenting the global instrumentor with an explicit tracer provider
/// 2. Wrapping a SQLite database and running statements through it
/// 3. Turning on sqlcommenter so statements carry their traceparent
///
/// Run with:
/// ```bash
/// cargo run --example trace_sqlite --features sqlite
/// ```
use anyhow::{Context, Result};
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::TracerProvider;
use orm_instrumentation::adapters::sqlite::SqliteDatabase;
use orm_instrumentation::{
    Database, Instrument, InstrumentOptions, InstrumentorConfigBuilder, OrmInstrumentor,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let exporter = InMemorySpanExporter::default();
    let provider = TracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();

    let instrumentor = OrmInstrumentor::global();
    instrumentor.instrument(
        InstrumentOptions::new()
            .with_tracer_provider(&provider)
            .with_config(InstrumentorConfigBuilder::new().enable_commenter(true).build()),
    );

    let db = instrumentor.wrap(SqliteDatabase::memory());
    db.connect(false).await.context("Failed to open database")?;
    db.execute_sql("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)", &[])
        .await?;
    db.execute_sql("INSERT INTO notes (body) VALUES (?)", &["hello".into()])
        .await?;
    let rows = db.execute_sql("SELECT body FROM notes", &[]).await?;
    info!(rows = rows.len(), "Query finished");
    db.close().await?;

    instrumentor.uninstrument();

    for span in exporter
        .get_finished_spans()
        .context("Failed to read exported spans")?
    {
        let attributes: Vec<String> = span
            .attributes
            .iter()
            .map(|kv| format!("{}={}", kv.key, kv.value))
            .collect();
        info!(name = %span.name, status = ?span.status, attributes = ?attributes, "Span");
    }

    Ok(())
}
