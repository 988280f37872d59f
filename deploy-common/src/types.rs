//! Type definitions for rollout plans, run ledgers, and run reports

use core::fmt::{self, Display};

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a component is deployed on-chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// A plain, non-upgradeable contract
    Plain,
    /// A contract deployed behind an upgradeable proxy
    UpgradeableProxy,
}

/// A single constructor, initializer, or wiring-call argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgTemplate {
    /// A literal value passed through unchanged
    Literal(String),
    /// The produced address of another component in the plan
    Reference(String),
}

/// A deployable component of the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// The component's id, unique within a plan
    pub id: String,
    /// The artifact identifier the ledger client resolves to compiled code
    pub contract: String,
    /// How the component is deployed
    pub kind: ComponentKind,
    /// Constructor arguments for plain components, initializer arguments
    /// for upgradeable ones
    #[serde(default)]
    pub args: Vec<ArgTemplate>,
}

/// A post-deployment configuration call linking deployed components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringCall {
    /// The id of the component the call targets
    pub target: String,
    /// The method to invoke on the target
    pub method: String,
    /// The call arguments
    #[serde(default)]
    pub args: Vec<ArgTemplate>,
}

/// A declarative rollout plan: the components to deploy and the wiring
/// calls to issue once all of them are confirmed.
///
/// The plan is read-only during a run. Component declaration order is the
/// tie-break used when deriving the deployment order, so reordering the
/// plan reorders otherwise-independent deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// The components to deploy
    pub components: Vec<ComponentSpec>,
    /// The wiring calls to issue, in execution order
    #[serde(default)]
    pub wiring: Vec<WiringCall>,
}

impl Plan {
    /// Look up a component by id
    pub fn component(&self, id: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|component| component.id == id)
    }
}

/// The lifecycle status of a deployment or wiring step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The step has not been attempted
    Pending,
    /// The step's transaction was submitted but not yet confirmed
    InFlight,
    /// The step's transaction confirmed
    Confirmed,
    /// The step's transaction failed or failed to confirm
    Failed,
}

impl Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::InFlight => write!(f, "in flight"),
            StepStatus::Confirmed => write!(f, "confirmed"),
            StepStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A confirmed deployment and the identifier it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedInstance {
    /// The id of the deployed component
    pub component: String,
    /// The address the component landed at
    pub address: Address,
    /// When the deployment confirmed
    pub confirmed_at: DateTime<Utc>,
}

/// The recorded state of a single step in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLedgerEntry {
    /// The step's lifecycle status
    pub status: StepStatus,
    /// The produced address, for confirmed deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// The error detail, for failed steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the step confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl RunLedgerEntry {
    /// An entry for a step whose transaction was just submitted
    pub fn in_flight() -> Self {
        Self { status: StepStatus::InFlight, address: None, error: None, confirmed_at: None }
    }

    /// An entry for a confirmed deployment
    pub fn confirmed_deployment(address: Address, confirmed_at: DateTime<Utc>) -> Self {
        Self {
            status: StepStatus::Confirmed,
            address: Some(address),
            error: None,
            confirmed_at: Some(confirmed_at),
        }
    }

    /// An entry for a confirmed wiring call
    pub fn confirmed_call(confirmed_at: DateTime<Utc>) -> Self {
        Self {
            status: StepStatus::Confirmed,
            address: None,
            error: None,
            confirmed_at: Some(confirmed_at),
        }
    }

    /// An entry for a failed step
    pub fn failed(error: String) -> Self {
        Self { status: StepStatus::Failed, address: None, error: Some(error), confirmed_at: None }
    }
}

/// The outcome of a single component in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentOutcome {
    /// The component's id
    pub id: String,
    /// The component's recorded status
    pub status: StepStatus,
    /// The produced address, if the component confirmed
    pub address: Option<Address>,
    /// The error detail, if the component failed
    pub error: Option<String>,
}

/// The outcome of a single wiring call in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringOutcome {
    /// The wiring call's index in the plan's declaration order
    pub index: u32,
    /// The method the call invokes
    pub method: String,
    /// The call's recorded status
    pub status: StepStatus,
    /// The error detail, if the call failed
    pub error: Option<String>,
}

/// The user-facing summary of a run: every component's produced address and
/// every wiring call's status, in plan declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-component outcomes
    pub components: Vec<ComponentOutcome>,
    /// Per-wiring-call outcomes
    pub wiring: Vec<WiringOutcome>,
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "deployments:")?;
        for component in &self.components {
            match (component.address, &component.error) {
                (Some(address), _) => {
                    writeln!(f, "  {}: {:#x} ({})", component.id, address, component.status)?
                }
                (None, Some(error)) => {
                    writeln!(f, "  {}: {} ({})", component.id, component.status, error)?
                }
                (None, None) => writeln!(f, "  {}: {}", component.id, component.status)?,
            }
        }
        writeln!(f, "wiring calls:")?;
        for call in &self.wiring {
            match &call.error {
                Some(error) => {
                    writeln!(f, "  {} {}: {} ({})", call.index, call.method, call.status, error)?
                }
                None => writeln!(f, "  {} {}: {}", call.index, call.method, call.status)?,
            }
        }
        Ok(())
    }
}
