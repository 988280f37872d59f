//! Definitions of errors that can occur during the execution of the
//! contract deployment scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use itertools::Itertools;

/// Errors that can occur while validating or executing a rollout plan
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading or parsing the rollout plan
    PlanParsing(String),
    /// A component id appears more than once in the plan
    DuplicateComponent(String),
    /// An argument or wiring call references a component absent from the plan
    UnknownReference {
        /// The component or wiring call holding the dangling reference
        component: String,
        /// The id the reference points at
        missing: String,
    },
    /// The component reference graph contains a cycle
    DependencyCycle(Vec<String>),
    /// Error reading the deployments file
    LedgerRead(String),
    /// Error writing the deployments file
    LedgerWrite(String),
    /// A deployment or its confirmation failed
    Deployment {
        /// The component being deployed
        component: String,
        /// The underlying client error
        detail: String,
    },
    /// A wiring call or its confirmation failed
    WiringCall {
        /// The wiring call's index in the plan
        index: u32,
        /// The method the call invokes
        method: String,
        /// The underlying client error
        detail: String,
    },
    /// An internal invariant was violated; signals a bug, not a remote failure
    Consistency(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::PlanParsing(s) => write!(f, "error parsing plan: {}", s),
            ScriptError::DuplicateComponent(id) => {
                write!(f, "duplicate component id in plan: {}", id)
            }
            ScriptError::UnknownReference { component, missing } => {
                write!(f, "{} references unknown component {}", component, missing)
            }
            ScriptError::DependencyCycle(ids) => {
                write!(f, "dependency cycle between components: {}", ids.iter().join(", "))
            }
            ScriptError::LedgerRead(s) => write!(f, "error reading deployments file: {}", s),
            ScriptError::LedgerWrite(s) => write!(f, "error writing deployments file: {}", s),
            ScriptError::Deployment { component, detail } => {
                write!(f, "error deploying {}: {}", component, detail)
            }
            ScriptError::WiringCall { index, method, detail } => {
                write!(f, "error in wiring call {} ({}): {}", index, method, detail)
            }
            ScriptError::Consistency(s) => write!(f, "internal consistency error: {}", s),
        }
    }
}

impl Error for ScriptError {}
