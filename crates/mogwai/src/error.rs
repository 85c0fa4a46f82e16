use derive_more::Display;
use mogwai_core::{
    context::{ClientError, ContextError},
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
    model::{CallError, CompileError},
    procedure::ScanError,
    schema::MethodError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

macro_rules! impl_from_core {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Self {
                    InternalError::from(err).into()
                }
            }
        )*
    };
}

impl_from_core!(
    CallError,
    ClientError,
    CompileError,
    ContextError,
    MethodError,
    ScanError,
);

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// The caller supplied something malformed (script text, arguments, config).
    #[display("invalid")]
    Invalid,

    /// A named member or resource does not exist.
    #[display("not_found")]
    NotFound,

    /// The graph server or transport failed.
    #[display("remote")]
    Remote,

    /// The caller cannot remediate this.
    #[display("internal")]
    Internal,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::InvalidInput => Self::Invalid,
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::Downstream => Self::Remote,
            ErrorClass::Internal => Self::Internal,
        }
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    #[display("client")]
    Client,
    #[display("compile")]
    Compile,
    #[display("context")]
    Context,
    #[display("model")]
    Model,
    #[display("scan")]
    Scan,
    #[display("schema")]
    Schema,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Client => Self::Client,
            CoreErrorOrigin::Compile => Self::Compile,
            CoreErrorOrigin::Context => Self::Context,
            CoreErrorOrigin::Model => Self::Model,
            CoreErrorOrigin::Scan => Self::Scan,
            CoreErrorOrigin::Schema => Self::Schema,
        }
    }
}
