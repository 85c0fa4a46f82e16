//! Shared base runtime context.
//!
//! One context is shared by every compiled model. It owns the current graph
//! connection and the execution client; both can be swapped at runtime and
//! compiled models observe the swap on their next accessor read.

mod client;
mod config;

pub use client::{Client, ClientError, GremlinClient, ScriptRequest, Transport};
pub use config::ContextConfig;

use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    procedure::Procedure,
    value::{Callback, Value},
};
use derive_more::Display;
use std::{
    collections::BTreeSet,
    sync::{Arc, RwLock},
};
use thiserror::Error as ThisError;

///
/// ContextError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ContextError {
    #[error("invalid context config: {0}")]
    Config(String),

    #[error("index key must not be empty")]
    EmptyIndexKey,
}

impl ContextError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Config(_) | Self::EmptyIndexKey => ErrorClass::InvalidInput,
        }
    }
}

impl From<ContextError> for InternalError {
    fn from(err: ContextError) -> Self {
        Self::new(err.class(), ErrorOrigin::Context, err.to_string())
    }
}

///
/// GraphHandle
///
/// Identifies the live graph a connection is bound to.
/// `generation` increments on every reconnect.
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("{host}:{port}/{graph}#{generation}")]
pub struct GraphHandle {
    pub host: String,
    pub port: u16,
    pub graph: String,
    pub generation: u64,
}

///
/// Connection
///

#[derive(Clone, Debug)]
pub struct Connection {
    graph: GraphHandle,
}

impl Connection {
    #[must_use]
    pub const fn new(graph: GraphHandle) -> Self {
        Self { graph }
    }

    #[must_use]
    pub const fn graph_handle(&self) -> &GraphHandle {
        &self.graph
    }
}

///
/// Execution
///
/// Call-forwarding entry point bound to the client that was current when the
/// execution accessor was read.
///

#[derive(Clone)]
pub struct Execution {
    client: Arc<dyn Client>,
}

impl Execution {
    #[must_use]
    pub fn new(client: Arc<dyn Client>) -> Self {
        Self { client }
    }

    /// Forward one remote-procedure call to the bound client.
    pub fn execute(
        &self,
        procedure: &Procedure,
        params: Vec<Value>,
        callback: Option<Callback>,
    ) -> Result<Value, ClientError> {
        self.client.execute(procedure, params, callback)
    }

    #[must_use]
    pub const fn client(&self) -> &Arc<dyn Client> {
        &self.client
    }
}

///
/// BaseContext
///
/// Externally owned runtime context. Compiled models alias it through an
/// `Arc` and never mutate it, apart from the idempotent index bookkeeping
/// performed by the base model's init hook.
///

pub struct BaseContext {
    config: ContextConfig,
    connection: RwLock<Connection>,
    client: RwLock<Arc<dyn Client>>,
    indexes: RwLock<BTreeSet<String>>,
}

impl BaseContext {
    #[must_use]
    pub fn new(config: ContextConfig, client: Arc<dyn Client>) -> Self {
        let graph = GraphHandle {
            host: config.host.clone(),
            port: config.port,
            graph: config.graph.clone(),
            generation: 0,
        };

        Self {
            config,
            connection: RwLock::new(Connection::new(graph)),
            client: RwLock::new(client),
            indexes: RwLock::new(BTreeSet::new()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Snapshot the current connection.
    #[must_use]
    pub fn connection(&self) -> Connection {
        self.connection
            .read()
            .expect("connection RwLock poisoned while acquiring read lock")
            .clone()
    }

    /// Current graph handle; re-read on every call.
    #[must_use]
    pub fn graph_handle(&self) -> GraphHandle {
        self.connection().graph_handle().clone()
    }

    /// Build an execution entry point bound to the current client.
    #[must_use]
    pub fn execution(&self) -> Execution {
        let client = self
            .client
            .read()
            .expect("client RwLock poisoned while acquiring read lock");

        Execution::new(Arc::clone(&client))
    }

    /// Rebind the connection, bumping the handle generation.
    pub fn reconnect(&self) -> GraphHandle {
        let mut connection = self
            .connection
            .write()
            .expect("connection RwLock poisoned while acquiring write lock");
        let mut graph = connection.graph.clone();
        graph.generation = graph.generation.saturating_add(1);
        *connection = Connection::new(graph.clone());

        graph
    }

    /// Swap the execution client; returns the previous one.
    pub fn replace_client(&self, client: Arc<dyn Client>) -> Arc<dyn Client> {
        let mut slot = self
            .client
            .write()
            .expect("client RwLock poisoned while acquiring write lock");

        std::mem::replace(&mut *slot, client)
    }

    /// Record that a vertex property key must be indexed.
    /// Returns `true` when the key was not already recorded.
    pub fn ensure_index(&self, key: &str) -> Result<bool, ContextError> {
        if key.is_empty() {
            return Err(ContextError::EmptyIndexKey);
        }

        let mut indexes = self
            .indexes
            .write()
            .expect("index RwLock poisoned while acquiring write lock");

        Ok(indexes.insert(key.to_string()))
    }

    #[must_use]
    pub fn indexed_keys(&self) -> Vec<String> {
        self.indexes
            .read()
            .expect("index RwLock poisoned while acquiring read lock")
            .iter()
            .cloned()
            .collect()
    }
}
