//! Failure-injection tests covering abort, resume, and no-rollback semantics

use deploy_common::constants::{
    LOGGER_CONTRACT, LOGGER_KEY, PERMISSIONS_KEY, REWARD_MANAGER_KEY, REWARD_TOKEN_CONTRACT,
    REWARD_TOKEN_KEY, SET_REWARD_TOKEN_METHOD, SET_UCPI_CONTRACT_METHOD, UCPI_KEY,
};
use deploy_common::types::StepStatus;
use deploy_scripts::{devnet::DevnetClient, errors::ScriptError};
use eyre::Result;

use crate::{
    integration_test,
    test_inventory::TestArgs,
    utils::{address_of, report_from_ledger, run_expecting_failure, run_to_completion, status_of},
};

/// Tests that a failed deployment aborts the run with earlier components
/// confirmed, and that a later invocation resumes without redeploying them
async fn test_resume_after_deploy_failure(args: TestArgs) -> Result<()> {
    let client = DevnetClient::new();
    client.fail_deploys_of(LOGGER_CONTRACT);

    let err = run_expecting_failure(&args, &client).await?;
    assert!(matches!(err, ScriptError::Deployment { ref component, .. } if component == LOGGER_KEY));

    let report = report_from_ledger(&args)?;
    assert_eq!(status_of(&report, REWARD_TOKEN_KEY)?, StepStatus::Confirmed);
    assert_eq!(status_of(&report, PERMISSIONS_KEY)?, StepStatus::Confirmed);
    assert_eq!(status_of(&report, LOGGER_KEY)?, StepStatus::Failed);
    assert_eq!(status_of(&report, REWARD_MANAGER_KEY)?, StepStatus::Pending);
    assert_eq!(status_of(&report, UCPI_KEY)?, StepStatus::Pending);
    assert!(report.wiring.iter().all(|w| w.status == StepStatus::Pending));

    let token_address = address_of(&report, REWARD_TOKEN_KEY)?;

    client.clear_failures();
    let resumed = run_to_completion(&args, &client).await?;
    assert!(resumed.components.iter().all(|c| c.status == StepStatus::Confirmed));
    assert!(resumed.wiring.iter().all(|w| w.status == StepStatus::Confirmed));

    // The token deployed in the first attempt was reused, not re-issued
    let deployed = client.deployed();
    assert_eq!(deployed.iter().filter(|d| d.contract == REWARD_TOKEN_CONTRACT).count(), 1);
    assert_eq!(address_of(&resumed, REWARD_TOKEN_KEY)?, token_address);

    Ok(())
}
integration_test!(test_resume_after_deploy_failure);

/// Tests that a wiring-call failure aborts the remaining calls without
/// undoing the one that confirmed, and that resume re-issues only the
/// failed call
async fn test_resume_after_wiring_failure(args: TestArgs) -> Result<()> {
    let client = DevnetClient::new();
    client.fail_calls_to(SET_UCPI_CONTRACT_METHOD);

    let err = run_expecting_failure(&args, &client).await?;
    assert!(matches!(err, ScriptError::WiringCall { index: 1, .. }));

    let methods: Vec<String> = client.calls().iter().map(|c| c.method.clone()).collect();
    assert_eq!(methods, vec![SET_REWARD_TOKEN_METHOD]);

    let report = report_from_ledger(&args)?;
    assert_eq!(report.wiring[0].status, StepStatus::Confirmed);
    assert_eq!(report.wiring[1].status, StepStatus::Failed);

    client.clear_failures();
    run_to_completion(&args, &client).await?;

    // The confirmed call was not re-issued; only the failed one ran again
    let methods: Vec<String> = client.calls().iter().map(|c| c.method.clone()).collect();
    assert_eq!(methods, vec![SET_REWARD_TOKEN_METHOD, SET_UCPI_CONTRACT_METHOD]);

    Ok(())
}
integration_test!(test_resume_after_wiring_failure);

/// Tests that a confirmation timeout is recorded as a failure and the run
/// can be resumed once the devnet recovers
async fn test_resume_after_confirmation_timeout(args: TestArgs) -> Result<()> {
    let client = DevnetClient::new();
    client.time_out_confirmations_of(LOGGER_CONTRACT);

    let err = run_expecting_failure(&args, &client).await?;
    assert!(matches!(err, ScriptError::Deployment { ref component, .. } if component == LOGGER_KEY));

    let report = report_from_ledger(&args)?;
    assert_eq!(status_of(&report, LOGGER_KEY)?, StepStatus::Failed);

    client.clear_failures();
    let resumed = run_to_completion(&args, &client).await?;
    assert!(resumed.components.iter().all(|c| c.status == StepStatus::Confirmed));

    Ok(())
}
integration_test!(test_resume_after_confirmation_timeout);
