/*!
 * Monitoring
 * Structured tracing for supervisor runs
 */

mod tracer;

pub use tracer::{generate_trace_id, init_tracing, RunSpan, TRACE_JSON_ENV};
