use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    procedure::Procedure,
    value::{Callback, Value},
};
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// ClientError
///
/// Failures of a remote-procedure call. Errors from the execution client are
/// handed back to the caller unchanged. `InvalidArguments` is raised by the
/// binding itself when a callback is misplaced; the client is never contacted.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ClientError {
    #[error("invalid arguments for '{procedure}': {message}")]
    InvalidArguments { procedure: String, message: String },

    #[error("failed to encode request for '{procedure}': {message}")]
    Encode { procedure: String, message: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("script error in '{procedure}': {message}")]
    Script { procedure: String, message: String },
}

impl ClientError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidArguments { .. } => ErrorClass::InvalidInput,
            Self::Encode { .. } => ErrorClass::Internal,
            Self::Transport(_) | Self::Script { .. } => ErrorClass::Downstream,
        }
    }
}

impl From<ClientError> for InternalError {
    fn from(err: ClientError) -> Self {
        Self::new(err.class(), ErrorOrigin::Client, err.to_string())
    }
}

///
/// Client
///
/// The single sanctioned way remote procedures are executed.
/// Implementations own any asynchrony; when a callback is supplied they
/// invoke it with the outcome of the call.
///

pub trait Client: Send + Sync {
    fn execute(
        &self,
        procedure: &Procedure,
        params: Vec<Value>,
        callback: Option<Callback>,
    ) -> Result<Value, ClientError>;
}

///
/// ScriptRequest
///
/// Wire request for one procedure call: the procedure definition followed by
/// an invocation, with positional parameters bound as `p0..pn`.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScriptRequest {
    pub gremlin: String,
    pub bindings: serde_json::Map<String, serde_json::Value>,
}

impl ScriptRequest {
    #[must_use]
    pub fn new(procedure: &Procedure, params: &[Value]) -> Self {
        let mut bindings = serde_json::Map::new();
        let mut names = Vec::with_capacity(params.len());

        for (i, param) in params.iter().enumerate() {
            let name = format!("p{i}");
            bindings.insert(name.clone(), serde_json::Value::from(param));
            names.push(name);
        }

        let gremlin = format!(
            "{}\n{}({})",
            procedure.definition(),
            procedure.name,
            names.join(", ")
        );

        Self { gremlin, bindings }
    }

    /// Encode the request as a JSON body.
    pub fn to_json(&self, procedure: &str) -> Result<String, ClientError> {
        serde_json::to_string(self).map_err(|err| ClientError::Encode {
            procedure: procedure.to_string(),
            message: err.to_string(),
        })
    }
}

///
/// Transport
///
/// Delivers a script request to the graph server and returns the raw reply.
///

pub trait Transport: Send + Sync {
    fn submit(&self, request: &ScriptRequest) -> Result<serde_json::Value, ClientError>;
}

///
/// GremlinClient
///
/// Client that renders procedure calls as Gremlin script requests and hands
/// them to a transport.
///

pub struct GremlinClient<T> {
    transport: T,
}

impl<T: Transport> GremlinClient<T> {
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Client for GremlinClient<T> {
    fn execute(
        &self,
        procedure: &Procedure,
        params: Vec<Value>,
        callback: Option<Callback>,
    ) -> Result<Value, ClientError> {
        let request = ScriptRequest::new(procedure, &params);
        let outcome = self.transport.submit(&request).map(Value::from);

        if let Some(callback) = callback {
            callback(&outcome);
        }

        outcome
    }
}
