//! Metrics sink boundary.
//!
//! Compiler and binding code MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics::{self, EventReport};
use std::{cell::RefCell, sync::Arc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Arc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    ModelCompiled {
        type_tag: &'a str,
        methods: u64,
        statics: u64,
        procedures: u64,
    },
    ProcedureBound {
        type_tag: &'a str,
        procedure: &'a str,
    },
    ProcedureShadowing {
        type_tag: &'a str,
        name: &'a str,
    },
    ProcedureInvoked {
        type_tag: &'a str,
        procedure: &'a str,
    },
    ScanRejected,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::ModelCompiled {
                type_tag,
                methods,
                statics,
                procedures,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.models_compiled = m.ops.models_compiled.saturating_add(1);

                    let entry = m.models.entry(type_tag.to_string()).or_default();
                    entry.compiles = entry.compiles.saturating_add(1);
                    entry.methods = methods;
                    entry.statics = statics;
                    entry.procedures = procedures;
                });
            }

            MetricsEvent::ProcedureBound { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.procedures_bound = m.ops.procedures_bound.saturating_add(1);
                });
            }

            MetricsEvent::ProcedureShadowing { type_tag, name } => {
                metrics::with_state_mut(|m| {
                    m.ops.procedures_shadowing = m.ops.procedures_shadowing.saturating_add(1);

                    let entry = m.models.entry(type_tag.to_string()).or_default();
                    if !entry.shadowed.iter().any(|n| n == name) {
                        entry.shadowed.push(name.to_string());
                    }
                });
            }

            MetricsEvent::ProcedureInvoked { type_tag, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.procedure_calls = m.ops.procedure_calls.saturating_add(1);

                    let entry = m.models.entry(type_tag.to_string()).or_default();
                    entry.procedure_calls = entry.procedure_calls.saturating_add(1);
                });
            }

            MetricsEvent::ScanRejected => {
                metrics::with_state_mut(|m| {
                    m.ops.scans_rejected = m.ops.scans_rejected.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: Arc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Arc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
