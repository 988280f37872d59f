//! Full-rollout tests against the shipped UCPI plan

use deploy_common::constants::{
    LOGGER_CONTRACT, LOGGER_KEY, PERMISSIONS_CONTRACT, PERMISSIONS_KEY, REWARD_MANAGER_CONTRACT,
    REWARD_MANAGER_KEY, REWARD_TOKEN_KEY, SET_REWARD_TOKEN_METHOD, SET_UCPI_CONTRACT_METHOD,
    UCPI_CONTRACT, UCPI_KEY,
};
use deploy_common::types::StepStatus;
use deploy_scripts::devnet::DevnetClient;
use eyre::{eyre, Result};

use crate::{
    integration_test,
    test_inventory::TestArgs,
    utils::{address_of, run_to_completion},
};

/// Tests that a full rollout confirms every step, deploys dependencies
/// before the coordinator, and wires the reward manager with the produced
/// addresses
async fn test_full_rollout(args: TestArgs) -> Result<()> {
    let client = DevnetClient::new();
    let report = run_to_completion(&args, &client).await?;

    assert!(report.components.iter().all(|c| c.status == StepStatus::Confirmed));
    assert!(report.wiring.iter().all(|w| w.status == StepStatus::Confirmed));

    let deployed = client.deployed();
    let position = |contract: &str| {
        deployed
            .iter()
            .position(|d| d.contract == contract)
            .ok_or_else(|| eyre!("{contract} not deployed"))
    };
    let ucpi = position(UCPI_CONTRACT)?;
    for dependency in [PERMISSIONS_CONTRACT, REWARD_MANAGER_CONTRACT, LOGGER_CONTRACT] {
        assert!(position(dependency)? < ucpi, "{dependency} deployed after the coordinator");
    }

    // The coordinator's initializer received the three proxy addresses
    let expected_init_args: Vec<String> = [PERMISSIONS_KEY, REWARD_MANAGER_KEY, LOGGER_KEY]
        .iter()
        .map(|id| address_of(&report, id).map(|address| format!("{address:#x}")))
        .collect::<Result<_>>()?;
    assert_eq!(deployed[ucpi].args, expected_init_args);

    // Both wiring calls hit the reward manager, in declaration order
    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, SET_REWARD_TOKEN_METHOD);
    assert_eq!(calls[1].method, SET_UCPI_CONTRACT_METHOD);

    let manager = address_of(&report, REWARD_MANAGER_KEY)?;
    assert_eq!(calls[0].target, manager);
    assert_eq!(calls[1].target, manager);
    assert_eq!(calls[0].args, vec![format!("{:#x}", address_of(&report, REWARD_TOKEN_KEY)?)]);
    assert_eq!(calls[1].args, vec![format!("{:#x}", address_of(&report, UCPI_KEY)?)]);

    Ok(())
}
integration_test!(test_full_rollout);

/// Tests that rerunning a completed rollout issues no further devnet
/// requests and reproduces the identical report
async fn test_idempotent_rerun(args: TestArgs) -> Result<()> {
    let client = DevnetClient::new();

    let first = run_to_completion(&args, &client).await?;
    let requests = client.request_count();

    let second = run_to_completion(&args, &client).await?;
    assert_eq!(client.request_count(), requests, "rerun issued client requests");
    assert_eq!(first, second);

    Ok(())
}
integration_test!(test_idempotent_rerun);
