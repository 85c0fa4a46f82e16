//! Observability: in-memory counters for compilation and procedure calls.
//!
//! Events carry names and counts only; call results and errors are never
//! recorded here.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, ModelCounters, ModelSummary};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
