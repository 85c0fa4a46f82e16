use crate::{
    context::ContextError,
    model::{CompiledModel, ModelSurface},
    value::Value,
};
use std::collections::BTreeMap;

///
/// Vertex
/// Property bag backing one model instance.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub id: Option<Value>,
    pub properties: BTreeMap<String, Value>,
}

impl Vertex {
    #[must_use]
    pub const fn new(properties: BTreeMap<String, Value>) -> Self {
        Self {
            id: None,
            properties,
        }
    }
}

///
/// BaseModel
///
/// Shared behavior every compiled model derives from.
///
/// `construct` is the construction contract; compiled models hand it their
/// arguments unchanged. `init` runs exactly once per compile, after every
/// member is attached, and must be idempotent across models.
///

pub trait BaseModel: Send + Sync {
    fn construct(&self, properties: BTreeMap<String, Value>) -> Vertex;

    fn init(&self, model: &CompiledModel) -> Result<(), ContextError>;
}

///
/// VertexModel
/// Default base: plain vertices, with the type key indexed on init.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct VertexModel;

impl BaseModel for VertexModel {
    fn construct(&self, properties: BTreeMap<String, Value>) -> Vertex {
        Vertex::new(properties)
    }

    fn init(&self, model: &CompiledModel) -> Result<(), ContextError> {
        let context = model.context();
        context.ensure_index(&context.config().type_key)?;

        Ok(())
    }
}
