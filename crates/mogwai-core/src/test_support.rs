use crate::{
    context::{BaseContext, Client, ClientError, ContextConfig},
    procedure::Procedure,
    value::{Callback, Value},
};
use std::sync::{Arc, Mutex};

///
/// RecordedCall
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RecordedCall {
    pub(crate) procedure: String,
    pub(crate) body: String,
    pub(crate) params: Vec<Value>,
    pub(crate) has_callback: bool,
}

///
/// RecordingClient
/// Client double that records every forwarded call and replies with a
/// fixed outcome.
///

pub(crate) struct RecordingClient {
    calls: Mutex<Vec<RecordedCall>>,
    reply: Result<Value, ClientError>,
}

impl RecordingClient {
    pub(crate) const fn new() -> Self {
        Self::replying(Ok(Value::Null))
    }

    pub(crate) const fn replying(reply: Result<Value, ClientError>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply,
        }
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Client for RecordingClient {
    fn execute(
        &self,
        procedure: &Procedure,
        params: Vec<Value>,
        callback: Option<Callback>,
    ) -> Result<Value, ClientError> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            procedure: procedure.name.clone(),
            body: procedure.body.clone(),
            params,
            has_callback: callback.is_some(),
        });

        if let Some(callback) = callback {
            callback(&self.reply);
        }

        self.reply.clone()
    }
}

/// Shared context over a fresh recording client.
pub(crate) fn recording_context() -> (Arc<BaseContext>, Arc<RecordingClient>) {
    let client = Arc::new(RecordingClient::new());
    let context = Arc::new(BaseContext::new(
        ContextConfig::default(),
        Arc::clone(&client) as Arc<dyn Client>,
    ));

    (context, client)
}
