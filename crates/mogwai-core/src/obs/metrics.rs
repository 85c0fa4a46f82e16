use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for compiler and binding activity.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub models: BTreeMap<String, ModelCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Compiler
    pub models_compiled: u64,
    pub scans_rejected: u64,

    // Members
    pub procedures_bound: u64,
    pub procedures_shadowing: u64,

    // Calls
    pub procedure_calls: u64,
}

///
/// ModelCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ModelCounters {
    pub compiles: u64,
    pub methods: u64,
    pub statics: u64,
    pub procedures: u64,
    pub shadowed: Vec<String>,
    pub procedure_calls: u64,
}

///
/// EventReport
/// Snapshot handed to callers; counters keyed by type tag.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub model_counters: Vec<ModelSummary>,
}

///
/// ModelSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ModelSummary {
    pub type_tag: String,
    pub compiles: u64,
    pub procedures: u64,
    pub procedure_calls: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Build a report from the current state, busiest models first.
pub(crate) fn report() -> EventReport {
    with_state(|m| {
        let mut model_counters: Vec<ModelSummary> = m
            .models
            .iter()
            .map(|(type_tag, c)| ModelSummary {
                type_tag: type_tag.clone(),
                compiles: c.compiles,
                procedures: c.procedures,
                procedure_calls: c.procedure_calls,
            })
            .collect();
        model_counters.sort_by(|a, b| {
            b.procedure_calls
                .cmp(&a.procedure_calls)
                .then_with(|| a.type_tag.cmp(&b.type_tag))
        });

        EventReport {
            ops: m.ops.clone(),
            model_counters,
        }
    })
}
