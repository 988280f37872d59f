//! The execution engine: walks the resolved deployment order, drives the
//! ledger client, and records every step transition in the run ledger.
//!
//! Steps execute strictly sequentially. Each deployment or wiring call is
//! submitted, then awaited to confirmation, before the next step begins;
//! later steps' arguments depend on earlier steps' produced addresses and
//! wiring order is semantically significant, so nothing is speculated or
//! reordered. The first failure is recorded and aborts the run; a later
//! invocation with the same ledger resumes at the first unconfirmed step.

use deploy_common::types::{
    ArgTemplate, ComponentKind, ComponentOutcome, DeployedInstance, Plan, RunLedgerEntry,
    RunReport, StepStatus, WiringCall, WiringOutcome,
};
use tracing::info;

use crate::{client::LedgerClient, errors::ScriptError, ledger::RunLedger};

/// Execute (or resume) `plan` in the order produced by the resolver,
/// returning the run report once every step is confirmed
pub async fn execute<C: LedgerClient + Sync>(
    plan: &Plan,
    order: &[String],
    client: &C,
    ledger: &mut RunLedger,
) -> Result<RunReport, ScriptError> {
    for id in order {
        deploy_component(plan, id, client, ledger).await?;
    }

    for (index, call) in plan.wiring.iter().enumerate() {
        run_wiring_call(index as u32, call, client, ledger).await?;
    }

    Ok(build_report(plan, ledger))
}

/// Build the run report for `plan` from the ledger's current state.
///
/// Usable mid-run: steps the ledger has no entry for are reported `Pending`.
pub fn build_report(plan: &Plan, ledger: &RunLedger) -> RunReport {
    let components = plan
        .components
        .iter()
        .map(|component| {
            let entry = ledger.component(&component.id);
            ComponentOutcome {
                id: component.id.clone(),
                status: entry.map(|e| e.status).unwrap_or(StepStatus::Pending),
                address: entry.and_then(|e| e.address),
                error: entry.and_then(|e| e.error.clone()),
            }
        })
        .collect();

    let wiring = plan
        .wiring
        .iter()
        .enumerate()
        .map(|(index, call)| {
            let entry = ledger.wiring(index as u32);
            WiringOutcome {
                index: index as u32,
                method: call.method.clone(),
                status: entry.map(|e| e.status).unwrap_or(StepStatus::Pending),
                error: entry.and_then(|e| e.error.clone()),
            }
        })
        .collect();

    RunReport { components, wiring }
}

/// Deploy a single component, or reuse its previously confirmed address
async fn deploy_component<C: LedgerClient + Sync>(
    plan: &Plan,
    id: &str,
    client: &C,
    ledger: &mut RunLedger,
) -> Result<(), ScriptError> {
    let component = plan
        .component(id)
        .ok_or_else(|| ScriptError::Consistency(format!("ordered component {id} not in plan")))?;

    if let Some(address) = ledger.confirmed_address(id) {
        info!("{} already deployed at {:#x}, skipping", id, address);
        return Ok(());
    }

    let args = resolve_args(&component.args, ledger)?;
    ledger.record_component(id, RunLedgerEntry::in_flight())?;

    let submitted = match component.kind {
        ComponentKind::Plain => client.deploy(&component.contract, &args).await,
        ComponentKind::UpgradeableProxy => {
            client.deploy_upgradeable(&component.contract, &args).await
        }
    };
    let handle = match submitted {
        Ok(handle) => handle,
        Err(e) => return fail_component(id, e.to_string(), ledger),
    };

    let receipt = match client.await_confirmation(handle).await {
        Ok(receipt) => receipt,
        Err(e) => return fail_component(id, e.to_string(), ledger),
    };
    let address = match receipt.contract_address {
        Some(address) => address,
        None => return fail_component(id, "receipt carries no contract address".to_string(), ledger),
    };

    let instance = DeployedInstance {
        component: id.to_string(),
        address,
        confirmed_at: receipt.confirmed_at,
    };
    ledger.record_deployment(&instance)?;
    info!("{} deployed at {:#x}", instance.component, instance.address);

    Ok(())
}

/// Record a component failure and abort the run
fn fail_component(id: &str, detail: String, ledger: &mut RunLedger) -> Result<(), ScriptError> {
    ledger.record_component(id, RunLedgerEntry::failed(detail.clone()))?;
    Err(ScriptError::Deployment { component: id.to_string(), detail })
}

/// Issue a single wiring call, or skip it if already confirmed
async fn run_wiring_call<C: LedgerClient + Sync>(
    index: u32,
    call: &WiringCall,
    client: &C,
    ledger: &mut RunLedger,
) -> Result<(), ScriptError> {
    if let Some(entry) = ledger.wiring(index) {
        if entry.status == StepStatus::Confirmed {
            info!("wiring call {} ({}) already confirmed, skipping", index, call.method);
            return Ok(());
        }
    }

    let target = ledger.confirmed_address(&call.target).ok_or_else(|| {
        ScriptError::Consistency(format!("wiring target {} has no confirmed address", call.target))
    })?;
    let args = resolve_args(&call.args, ledger)?;
    ledger.record_wiring(index, RunLedgerEntry::in_flight())?;

    let handle = match client.call(target, &call.method, &args).await {
        Ok(handle) => handle,
        Err(e) => return fail_wiring(index, call, e.to_string(), ledger),
    };
    let receipt = match client.await_confirmation(handle).await {
        Ok(receipt) => receipt,
        Err(e) => return fail_wiring(index, call, e.to_string(), ledger),
    };

    ledger.record_wiring(index, RunLedgerEntry::confirmed_call(receipt.confirmed_at))?;
    info!("{}.{} wired", call.target, call.method);

    Ok(())
}

/// Record a wiring-call failure and abort the run
fn fail_wiring(
    index: u32,
    call: &WiringCall,
    detail: String,
    ledger: &mut RunLedger,
) -> Result<(), ScriptError> {
    ledger.record_wiring(index, RunLedgerEntry::failed(detail.clone()))?;
    Err(ScriptError::WiringCall { index, method: call.method.clone(), detail })
}

/// Resolve argument templates against the ledger's confirmed addresses.
///
/// A reference that cannot be resolved here escaped the resolver's
/// validation or the topological order, so it is reported as an internal
/// consistency error rather than a remote failure.
fn resolve_args(args: &[ArgTemplate], ledger: &RunLedger) -> Result<Vec<String>, ScriptError> {
    args.iter()
        .map(|arg| match arg {
            ArgTemplate::Literal(value) => Ok(value.clone()),
            ArgTemplate::Reference(id) => ledger
                .confirmed_address(id)
                .map(|address| format!("{address:#x}"))
                .ok_or_else(|| {
                    ScriptError::Consistency(format!("reference to {id} has no confirmed address"))
                }),
        })
        .collect()
}
