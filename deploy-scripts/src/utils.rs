//! Utilities for the deploy scripts

use std::fs;

use alloy_primitives::Address;
use deploy_common::types::Plan;

use crate::{errors::ScriptError, ledger::RunLedger};

/// Read and parse the rollout plan at `path`
pub fn read_plan_from_file(path: &str) -> Result<Plan, ScriptError> {
    let contents =
        fs::read_to_string(path).map_err(|e| ScriptError::PlanParsing(format!("{path}: {e}")))?;

    serde_json::from_str(&contents).map_err(|e| ScriptError::PlanParsing(format!("{path}: {e}")))
}

/// Parse a component's confirmed address out of the deployments file.
///
/// For downstream tooling that consumes produced addresses without loading
/// the full ledger API.
pub fn parse_addr_from_deployments_file(
    file_path: &str,
    component: &str,
) -> Result<Address, ScriptError> {
    let ledger = RunLedger::load_or_create(file_path)?;

    ledger.confirmed_address(component).ok_or_else(|| {
        ScriptError::LedgerRead(format!("no confirmed address for {component} in {file_path}"))
    })
}
