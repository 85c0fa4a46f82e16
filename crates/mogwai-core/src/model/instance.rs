use crate::{
    context::BaseContext,
    model::{Binding, CallError, CompiledModel, InstanceMember, ModelSurface, base::Vertex},
    schema::InstanceFn,
    value::{Arg, Value},
};
use std::sync::Arc;

///
/// Instance
///
/// One vertex of a compiled model. Identity and connection metadata are
/// read through the owning model so they stay identical to the type's.
///

#[derive(Clone)]
pub struct Instance {
    model: Arc<CompiledModel>,
    vertex: Vertex,
}

impl Instance {
    pub(crate) const fn new(model: Arc<CompiledModel>, vertex: Vertex) -> Self {
        Self { model, vertex }
    }

    #[must_use]
    pub const fn model(&self) -> &Arc<CompiledModel> {
        &self.model
    }

    #[must_use]
    pub const fn vertex(&self) -> &Vertex {
        &self.vertex
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.vertex.properties.get(key)
    }

    /// Schema instance method registered under `name`, unless a procedure
    /// replaced it.
    #[must_use]
    pub fn method_fn(&self, name: &str) -> Option<&InstanceFn> {
        self.model.method_fn(name)
    }

    /// Read a procedure member through this instance.
    #[must_use]
    pub fn procedure(&self, name: &str) -> Option<Binding> {
        match self.model.instance_member(name)? {
            InstanceMember::Procedure(accessor) => Some(accessor.read(self)),
            InstanceMember::Method(_) => None,
        }
    }

    /// Call an instance-side member by name.
    pub fn call(&self, name: &str, args: Vec<Arg>) -> Result<Value, CallError> {
        match self.model.instance_member(name) {
            Some(InstanceMember::Method(f)) => Ok(f(self, args)?),
            Some(InstanceMember::Procedure(accessor)) => Ok(accessor.read(self).invoke(args)?),
            None => Err(CallError::UnknownMember {
                type_tag: self.type_tag().to_string(),
                name: name.to_string(),
            }),
        }
    }
}

impl ModelSurface for Instance {
    fn type_tag(&self) -> &str {
        self.model.type_tag()
    }

    fn context(&self) -> &Arc<BaseContext> {
        self.model.context()
    }
}
