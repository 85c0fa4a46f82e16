use crate::{
    context::{BaseContext, ClientError, Execution},
    model::ModelSurface,
    obs::sink::{self, MetricsEvent},
    procedure::Procedure,
    value::{Arg, Callback, Value},
};
use std::sync::Arc;

///
/// ProcedureAccessor
///
/// Lazily evaluated member standing in for one remote procedure.
/// Every read builds a fresh [`Binding`] for the surface it was read from.
///

#[derive(Clone, Debug)]
pub struct ProcedureAccessor {
    procedure: Arc<Procedure>,
}

/// Build the accessor for one scanned procedure.
#[must_use]
pub const fn bind_procedure(procedure: Arc<Procedure>) -> ProcedureAccessor {
    ProcedureAccessor { procedure }
}

impl ProcedureAccessor {
    #[must_use]
    pub const fn procedure(&self) -> &Arc<Procedure> {
        &self.procedure
    }

    /// Produce the callable for a read through `surface`.
    pub fn read<S: ModelSurface + ?Sized>(&self, surface: &S) -> Binding {
        Binding {
            type_tag: Arc::from(surface.type_tag()),
            procedure: Arc::clone(&self.procedure),
            context: Arc::clone(surface.context()),
        }
    }
}

///
/// Binding
///
/// Callable forwarding function for one remote procedure.
///

#[derive(Clone)]
pub struct Binding {
    type_tag: Arc<str>,
    procedure: Arc<Procedure>,
    context: Arc<BaseContext>,
}

impl Binding {
    #[must_use]
    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    #[must_use]
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Execution accessor of the surface this binding was read from.
    #[must_use]
    pub fn execution(&self) -> Execution {
        self.context.execution()
    }

    /// Invoke the procedure with the trailing-callback calling convention.
    ///
    /// Client errors are returned exactly as the client produced them. A
    /// misplaced callback fails with `InvalidArguments` before the client is
    /// reached.
    pub fn invoke(&self, args: Vec<Arg>) -> Result<Value, ClientError> {
        let (params, callback) = normalize_args(&self.procedure.name, args)?;

        sink::record(MetricsEvent::ProcedureInvoked {
            type_tag: &self.type_tag,
            procedure: &self.procedure.name,
        });

        self.execution()
            .execute(&self.procedure, params, callback)
    }
}

/// Split invocation arguments into positional parameters and an optional
/// trailing callback.
///
/// A single non-callable argument is always a parameter. Otherwise a callable
/// last argument becomes the callback. A callable anywhere else cannot be a
/// parameter and is rejected.
pub fn normalize_args(
    procedure: &str,
    mut args: Vec<Arg>,
) -> Result<(Vec<Value>, Option<Callback>), ClientError> {
    let callback = match args.last() {
        Some(Arg::Callback(_)) => match args.pop() {
            Some(Arg::Callback(cb)) => Some(cb),
            _ => None,
        },
        _ => None,
    };

    let params = args
        .into_iter()
        .enumerate()
        .map(|(position, arg)| match arg {
            Arg::Value(value) => Ok(value),
            Arg::Callback(_) => Err(ClientError::InvalidArguments {
                procedure: procedure.to_string(),
                message: format!("callback at position {position} is not the last argument"),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((params, callback))
}
