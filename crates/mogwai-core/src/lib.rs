//! Core runtime for Mogwai: the model compiler, remote-procedure bindings,
//! the shared base context, and the observability sink.
//!
//! A compiled model is assembled from three independent inputs:
//! - a [`schema::Schema`] carrying instance methods and statics,
//! - a shared [`context::BaseContext`] holding the graph connection and client,
//! - Groovy script text scanned into named remote procedures.
#![warn(unreachable_pub)]

pub mod context;
pub mod error;
pub mod model;
pub mod obs;
pub mod procedure;
pub mod schema;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default property key used to tag vertices with their model type.
pub const DEFAULT_TYPE_KEY: &str = "$type";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or transport helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        context::{BaseContext, Client, GraphHandle},
        model::{Binding, CompiledModel, Instance, ModelCompiler, ModelSurface},
        procedure::Procedure,
        schema::Schema,
        value::{Arg, Callback, Value},
    };
}
