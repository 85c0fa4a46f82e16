use crate::{
    context::{BaseContext, ContextError},
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{BaseModel, CompiledModel, ModelSurface, VertexModel, attach_procedures, merge_schema},
    obs::sink::{self, MetricsEvent},
    procedure::{GroovyScanner, ProcedureScanner, ScanError},
    schema::Schema,
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// CompileError
///
/// Collaborator failures are carried transparently: the message and source
/// are exactly those of the scanner or init hook that failed.
///

#[derive(Debug, ThisError)]
pub enum CompileError {
    #[error("model name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Init(#[from] ContextError),
}

impl From<CompileError> for InternalError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::EmptyName => {
                Self::new(ErrorClass::InvalidInput, ErrorOrigin::Compile, err.to_string())
            }
            CompileError::Scan(err) => err.into(),
            CompileError::Init(err) => err.into(),
        }
    }
}

///
/// ModelCompiler
///
/// Builds [`CompiledModel`]s against one shared context. Holds no per-model
/// state; every `compile` call derives an independent model.
///

pub struct ModelCompiler<S = GroovyScanner> {
    context: Arc<BaseContext>,
    base: Arc<dyn BaseModel>,
    scanner: S,
}

impl ModelCompiler {
    /// Compiler using the default vertex base and the Groovy scanner.
    #[must_use]
    pub fn new(context: Arc<BaseContext>) -> Self {
        Self::with_parts(context, Arc::new(VertexModel), GroovyScanner)
    }
}

impl<S: ProcedureScanner> ModelCompiler<S> {
    #[must_use]
    pub fn with_parts(context: Arc<BaseContext>, base: Arc<dyn BaseModel>, scanner: S) -> Self {
        Self {
            context,
            base,
            scanner,
        }
    }

    #[must_use]
    pub const fn context(&self) -> &Arc<BaseContext> {
        &self.context
    }

    #[must_use]
    pub const fn scanner(&self) -> &S {
        &self.scanner
    }

    /// Compile a model from a schema and script text.
    ///
    /// Schema members are attached first, then one accessor per scanned
    /// procedure, so a procedure replaces a schema member of the same name.
    /// The base init hook runs last. Nothing escapes on failure.
    pub fn compile(
        &self,
        name: &str,
        schema: Arc<Schema>,
        script: &str,
    ) -> Result<CompiledModel, CompileError> {
        if name.is_empty() {
            return Err(CompileError::EmptyName);
        }

        let mut model = CompiledModel::derive(
            name,
            Arc::clone(&self.context),
            Arc::clone(&self.base),
            Arc::clone(&schema),
        );

        merge_schema(&mut model, &schema);

        let procedures = self.scanner.scan(script).inspect_err(|_| {
            sink::record(MetricsEvent::ScanRejected);
        })?;
        let procedure_count = procedures.len() as u64;
        attach_procedures(&mut model, procedures);

        self.base.init(&model)?;

        sink::record(MetricsEvent::ModelCompiled {
            type_tag: model.type_tag(),
            methods: schema.methods.len() as u64,
            statics: schema.statics.len() as u64,
            procedures: procedure_count,
        });

        Ok(model)
    }
}
