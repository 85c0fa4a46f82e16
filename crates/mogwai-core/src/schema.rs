//! Declarative schema: the instance methods and statics attached to a model.
//!
//! The compiler consumes only the two namespaces exposed here and never
//! inspects or validates the functions themselves.

use crate::{
    context::ClientError,
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{CompiledModel, Instance},
    value::{Arg, Value},
};
use std::{collections::BTreeMap, fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// MethodError
///
/// Failure raised by a schema-defined method or static.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MethodError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl MethodError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<MethodError> for InternalError {
    fn from(err: MethodError) -> Self {
        match err {
            MethodError::Failed(message) => {
                Self::new(ErrorClass::Internal, ErrorOrigin::Schema, message)
            }
            MethodError::Client(err) => err.into(),
        }
    }
}

/// Instance-level function; receives the instance it was called on.
pub type InstanceFn = Arc<dyn Fn(&Instance, Vec<Arg>) -> Result<Value, MethodError> + Send + Sync>;

/// Type-level function; receives the compiled model it was called on.
pub type StaticFn =
    Arc<dyn Fn(&CompiledModel, Vec<Arg>) -> Result<Value, MethodError> + Send + Sync>;

///
/// Schema
///

#[derive(Clone, Default)]
pub struct Schema {
    pub methods: BTreeMap<String, InstanceFn>,
    pub statics: BTreeMap<String, StaticFn>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance method.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Instance, Vec<Arg>) -> Result<Value, MethodError> + Send + Sync + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Add a static.
    #[must_use]
    pub fn static_fn(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&CompiledModel, Vec<Arg>) -> Result<Value, MethodError> + Send + Sync + 'static,
    ) -> Self {
        self.statics.insert(name.into(), Arc::new(f));
        self
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("statics", &self.statics.keys().collect::<Vec<_>>())
            .finish()
    }
}
