/*!
 * Run Tracing
 * Structured logging for supervisor runs using the tracing crate
 *
 * Features:
 * - Trace ID per run for correlating supervisor and worker output
 * - JSON-formatted logs for structured parsing
 * - Run duration and result recorded when the span closes
 */

use std::time::Instant;
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Environment variable selecting JSON log output
pub const TRACE_JSON_ENV: &str = "FANOUT_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - FANOUT_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        debug!("Tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .init();
        debug!("Tracing initialized");
    }
}

/// Generate a unique trace ID for a run
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one supervisor run
pub struct RunSpan {
    span: Span,
    start: Instant,
    trace_id: String,
}

impl RunSpan {
    pub fn new(workers: usize) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::INFO,
            "run",
            trace_id = %trace_id,
            workers = workers,
            collected = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn record_collected(&self, count: usize) {
        self.span.record("collected", count);
    }

    pub fn record_success(&self) {
        self.span.record("result", "success");
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_ms", duration.as_millis() as u64);
        info!(
            trace_id = %self.trace_id,
            duration_ms = duration.as_millis() as u64,
            "Run finished"
        );
    }
}
