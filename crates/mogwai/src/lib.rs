//! ## Crate layout
//! - `core`: model compiler, procedure scanner, context, values, and observability.
//! - `error`: public error type with a stable kind + origin taxonomy.
//!
//! The `prelude` module mirrors the surface used by application code.

pub use mogwai_core as core;

pub mod error;

pub use error::Error;

use mogwai_core::{
    context::{BaseContext, ContextConfig, GremlinClient, Transport},
    model::ModelCompiler,
};
use std::sync::Arc;

/// Build a shared context over a Gremlin client and return a compiler bound
/// to it.
pub fn connect<T: Transport + 'static>(config: ContextConfig, transport: T) -> ModelCompiler {
    let client = Arc::new(GremlinClient::new(transport));
    let context = Arc::new(BaseContext::new(config, client));

    ModelCompiler::new(context)
}

/// Like [`connect`], reading the config from JSON text.
pub fn connect_json<T: Transport + 'static>(
    config: &str,
    transport: T,
) -> Result<ModelCompiler, Error> {
    let config = ContextConfig::from_json(config)?;

    Ok(connect(config, transport))
}

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Error,
        core::{
            context::{BaseContext, Client, ContextConfig, GraphHandle},
            model::{Binding, CompiledModel, Instance, ModelCompiler, ModelSurface as _},
            procedure::Procedure,
            schema::{MethodError, Schema},
            value::{Arg, Callback, Value},
        },
    };
}
