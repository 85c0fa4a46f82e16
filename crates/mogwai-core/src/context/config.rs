use crate::{DEFAULT_TYPE_KEY, context::ContextError};
use serde::{Deserialize, Serialize};

///
/// ContextConfig
///
/// Connection settings for the shared base context.
/// Every field is optional in serialized form and falls back to its default.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ContextConfig {
    pub host: String,
    pub port: u16,
    pub graph: String,

    /// Vertex property carrying the lower-cased model name.
    pub type_key: String,
}

impl ContextConfig {
    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ContextError> {
        serde_json::from_str(text).map_err(|err| ContextError::Config(err.to_string()))
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8182,
            graph: "graph".to_string(),
            type_key: DEFAULT_TYPE_KEY.to_string(),
        }
    }
}
