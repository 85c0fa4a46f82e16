//! Remote procedures and the scanner that extracts them from script text.

mod groovy;

#[cfg(test)]
mod tests;

pub use groovy::{GroovyScanner, ScanError};

use derive_more::{Deref, IntoIterator};
use std::{collections::BTreeMap, sync::Arc};

///
/// Procedure
///
/// One named server-side function. `body` is the raw text between the
/// outer braces of its definition.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

impl Procedure {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params,
            body: body.into(),
        }
    }

    /// Render the procedure back into a `def` declaration.
    #[must_use]
    pub fn definition(&self) -> String {
        format!(
            "def {}({}) {{{}}}",
            self.name,
            self.params.join(", "),
            self.body
        )
    }
}

///
/// ProcedureMap
///
/// Name-ordered procedures produced by one scan.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator)]
pub struct ProcedureMap(BTreeMap<String, Arc<Procedure>>);

impl ProcedureMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a procedure, returning the one it replaced.
    pub fn insert(&mut self, procedure: Procedure) -> Option<Arc<Procedure>> {
        self.0.insert(procedure.name.clone(), Arc::new(procedure))
    }
}

///
/// ProcedureScanner
///
/// Turns raw script text into procedures. Must fail on malformed input
/// without returning partial results.
///

pub trait ProcedureScanner {
    fn scan(&self, text: &str) -> Result<ProcedureMap, ScanError>;
}
