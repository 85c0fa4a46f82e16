//! Compiled models.
//!
//! A [`CompiledModel`] is the runtime type produced by [`ModelCompiler`]:
//! identity metadata, an alias of the shared context, schema members, and one
//! lazily read accessor per remote procedure. Members live in two namespaces:
//! - type side: schema statics and procedures,
//! - instance side: schema methods and procedures.

mod base;
mod binding;
mod compiler;
mod instance;
mod merge;


pub use base::{BaseModel, Vertex, VertexModel};
pub use binding::{Binding, ProcedureAccessor, bind_procedure, normalize_args};
pub use compiler::{CompileError, ModelCompiler};
pub use instance::Instance;
pub use merge::{attach_procedures, merge_schema};

use crate::{
    context::{BaseContext, ClientError, Execution, GraphHandle},
    error::{ErrorOrigin, InternalError},
    schema::{InstanceFn, MethodError, Schema, StaticFn},
    value::{Arg, Value},
};
use std::{collections::BTreeMap, fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// CallError
///

#[derive(Debug, ThisError)]
pub enum CallError {
    #[error("model '{type_tag}' has no member '{name}'")]
    UnknownMember { type_tag: String, name: String },

    #[error(transparent)]
    Method(#[from] MethodError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<CallError> for InternalError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::UnknownMember { type_tag, name } => Self::unknown_member(&type_tag, &name),
            CallError::Method(err) => err.into(),
            CallError::Client(err) => err.into(),
        }
    }
}

impl CallError {
    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::UnknownMember { .. } => ErrorOrigin::Model,
            Self::Method(_) => ErrorOrigin::Schema,
            Self::Client(_) => ErrorOrigin::Client,
        }
    }
}

///
/// ModelSurface
///
/// Identity and connection metadata shared by a compiled model and its
/// instances. Accessors resolve against the context on every call.
///

pub trait ModelSurface {
    fn type_tag(&self) -> &str;

    fn context(&self) -> &Arc<BaseContext>;

    /// Current graph handle.
    fn connection(&self) -> GraphHandle {
        self.context().graph_handle()
    }

    /// Execution entry point bound to the current client.
    fn execution(&self) -> Execution {
        self.context().execution()
    }
}

///
/// MemberKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemberKind {
    Method,
    Static,
    Procedure,
}

///
/// TypeMember
///

#[derive(Clone)]
pub enum TypeMember {
    Static(StaticFn),
    Procedure(ProcedureAccessor),
}

///
/// InstanceMember
///

#[derive(Clone)]
pub enum InstanceMember {
    Method(InstanceFn),
    Procedure(ProcedureAccessor),
}

///
/// CompiledModel
///

pub struct CompiledModel {
    name: String,
    type_tag: Arc<str>,
    context: Arc<BaseContext>,
    schema: Arc<Schema>,
    base: Arc<dyn BaseModel>,
    pub(crate) statics: BTreeMap<String, TypeMember>,
    pub(crate) methods: BTreeMap<String, InstanceMember>,
}

impl CompiledModel {
    /// Derive a fresh model from `base`, stamped with identity metadata and
    /// no members.
    pub(crate) fn derive(
        name: &str,
        context: Arc<BaseContext>,
        base: Arc<dyn BaseModel>,
        schema: Arc<Schema>,
    ) -> Self {
        Self {
            name: name.to_string(),
            type_tag: Arc::from(name.to_lowercase()),
            context,
            schema,
            base,
            statics: BTreeMap::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Name as passed to the compiler.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Construct an instance through the base construction contract.
    #[must_use]
    pub fn instantiate(self: &Arc<Self>, properties: BTreeMap<String, Value>) -> Instance {
        let vertex = self.base.construct(properties);

        Instance::new(Arc::clone(self), vertex)
    }

    #[must_use]
    pub fn member_kind(&self, name: &str) -> Option<MemberKind> {
        self.statics.get(name).map(|member| match member {
            TypeMember::Static(_) => MemberKind::Static,
            TypeMember::Procedure(_) => MemberKind::Procedure,
        })
    }

    #[must_use]
    pub fn instance_member_kind(&self, name: &str) -> Option<MemberKind> {
        self.instance_member(name).map(|member| match member {
            InstanceMember::Method(_) => MemberKind::Method,
            InstanceMember::Procedure(_) => MemberKind::Procedure,
        })
    }

    pub(crate) fn instance_member(&self, name: &str) -> Option<&InstanceMember> {
        self.methods.get(name)
    }

    /// Schema static registered under `name`, unless a procedure replaced it.
    #[must_use]
    pub fn static_fn(&self, name: &str) -> Option<&StaticFn> {
        match self.statics.get(name)? {
            TypeMember::Static(f) => Some(f),
            TypeMember::Procedure(_) => None,
        }
    }

    /// Schema instance method registered under `name`, unless a procedure
    /// replaced it.
    #[must_use]
    pub fn method_fn(&self, name: &str) -> Option<&InstanceFn> {
        match self.methods.get(name)? {
            InstanceMember::Method(f) => Some(f),
            InstanceMember::Procedure(_) => None,
        }
    }

    /// Read a procedure member; a fresh binding is built on every read.
    #[must_use]
    pub fn procedure(&self, name: &str) -> Option<Binding> {
        match self.statics.get(name)? {
            TypeMember::Procedure(accessor) => Some(accessor.read(self)),
            TypeMember::Static(_) => None,
        }
    }

    /// Names of every attached procedure, in name order.
    pub fn procedure_names(&self) -> impl Iterator<Item = &str> {
        self.statics.iter().filter_map(|(name, member)| match member {
            TypeMember::Procedure(_) => Some(name.as_str()),
            TypeMember::Static(_) => None,
        })
    }

    /// Call a type-side member by name.
    pub fn call(&self, name: &str, args: Vec<Arg>) -> Result<Value, CallError> {
        match self.statics.get(name) {
            Some(TypeMember::Static(f)) => Ok(f(self, args)?),
            Some(TypeMember::Procedure(accessor)) => Ok(accessor.read(self).invoke(args)?),
            None => Err(CallError::UnknownMember {
                type_tag: self.type_tag.to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Add or replace a static after compilation. Affects this model only.
    pub fn define_static(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Self, Vec<Arg>) -> Result<Value, MethodError> + Send + Sync + 'static,
    ) {
        self.statics
            .insert(name.into(), TypeMember::Static(Arc::new(f)));
    }

    /// Add or replace an instance method after compilation. Affects this
    /// model only.
    pub fn define_method(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Instance, Vec<Arg>) -> Result<Value, MethodError> + Send + Sync + 'static,
    ) {
        self.methods
            .insert(name.into(), InstanceMember::Method(Arc::new(f)));
    }
}

impl ModelSurface for CompiledModel {
    fn type_tag(&self) -> &str {
        &self.type_tag
    }

    fn context(&self) -> &Arc<BaseContext> {
        &self.context
    }
}

impl fmt::Debug for CompiledModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledModel")
            .field("name", &self.name)
            .field("type_tag", &self.type_tag)
            .field("statics", &self.statics.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
