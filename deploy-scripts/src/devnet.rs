//! An in-process devnet simulation implementing [`LedgerClient`].
//!
//! Used to rehearse rollouts and to back the test suites. Contract addresses
//! are derived from the deployer address and an incrementing nonce the same
//! way a real node would assign them, so a rehearsal predicts the addresses
//! an identical run against a fresh devnet produces.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use alloy_primitives::{keccak256, Address, B256};
use async_trait::async_trait;
use chrono::Utc;

use crate::client::{ClientError, LedgerClient, Receipt, TxHandle};

/// A contract deployment recorded by the devnet
#[derive(Debug, Clone)]
pub struct DeployedContract {
    /// The address the contract landed at
    pub address: Address,
    /// The artifact identifier the deployment was issued for
    pub contract: String,
    /// Whether the contract sits behind an upgradeable proxy
    pub upgradeable: bool,
    /// The resolved constructor or initializer arguments
    pub args: Vec<String>,
}

/// A contract method call recorded by the devnet
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The contract the call targeted
    pub target: Address,
    /// The method invoked
    pub method: String,
    /// The resolved call arguments
    pub args: Vec<String>,
}

/// A transaction submitted to the devnet but not yet confirmed
enum PendingTx {
    /// A deployment awaiting confirmation
    Deploy(DeployedContract),
    /// A method call awaiting confirmation
    Call(RecordedCall),
}

/// The devnet's mutable state, guarded by the client's lock
#[derive(Default)]
struct DevnetState {
    /// The deployer account's next nonce
    nonce: u64,
    /// Submitted transactions awaiting confirmation, keyed by tx hash
    pending: HashMap<B256, PendingTx>,
    /// Confirmed deployments, in confirmation order
    deployed: Vec<DeployedContract>,
    /// Confirmed method calls, in confirmation order
    calls: Vec<RecordedCall>,
    /// Total number of client requests served
    requests: u64,
    /// Artifacts whose deployments are rejected at submission
    fail_contracts: HashSet<String>,
    /// Methods whose calls are rejected at submission
    fail_methods: HashSet<String>,
    /// Artifacts whose deployments time out at confirmation
    timeout_contracts: HashSet<String>,
}

/// A deterministic in-process devnet
pub struct DevnetClient {
    /// The address submitting every transaction
    deployer: Address,
    /// The devnet's mutable state
    state: Mutex<DevnetState>,
}

impl DevnetClient {
    /// Create a devnet with a fresh deployer account
    pub fn new() -> Self {
        Self { deployer: Address::random(), state: Mutex::new(DevnetState::default()) }
    }

    /// The address submitting every transaction
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// The deployments confirmed so far, in confirmation order
    pub fn deployed(&self) -> Vec<DeployedContract> {
        self.lock_state().deployed.clone()
    }

    /// The method calls confirmed so far, in confirmation order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_state().calls.clone()
    }

    /// Total number of client requests served across all trait methods
    pub fn request_count(&self) -> u64 {
        self.lock_state().requests
    }

    /// Reject all subsequent deployments of the given artifact at submission
    pub fn fail_deploys_of(&self, contract: &str) {
        self.lock_state().fail_contracts.insert(contract.to_string());
    }

    /// Reject all subsequent calls to the given method at submission
    pub fn fail_calls_to(&self, method: &str) {
        self.lock_state().fail_methods.insert(method.to_string());
    }

    /// Time out the confirmation of all subsequent deployments of the
    /// given artifact
    pub fn time_out_confirmations_of(&self, contract: &str) {
        self.lock_state().timeout_contracts.insert(contract.to_string());
    }

    /// Clear all injected failures and timeouts
    pub fn clear_failures(&self) {
        let mut state = self.lock_state();
        state.fail_contracts.clear();
        state.fail_methods.clear();
        state.timeout_contracts.clear();
    }

    /// Lock the devnet state.
    ///
    /// The lock is never held across an await point, so it cannot be poisoned
    /// by a cancelled task; a poisoned lock here means a panicked test thread.
    fn lock_state(&self) -> MutexGuard<'_, DevnetState> {
        self.state.lock().expect("devnet state lock poisoned")
    }

    /// Hash identifying the transaction submitted at the given nonce
    fn tx_hash(&self, nonce: u64) -> B256 {
        let mut preimage = self.deployer.to_vec();
        preimage.extend_from_slice(&nonce.to_be_bytes());
        keccak256(&preimage)
    }
}

impl Default for DevnetClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for DevnetClient {
    async fn deploy(&self, contract: &str, args: &[String]) -> Result<TxHandle, ClientError> {
        let mut state = self.lock_state();
        state.requests += 1;

        if state.fail_contracts.contains(contract) {
            return Err(ClientError::Rejected(format!("node rejected deployment of {contract}")));
        }

        let address = self.deployer.create(state.nonce);
        let tx = self.tx_hash(state.nonce);
        state.nonce += 1;

        state.pending.insert(
            tx,
            PendingTx::Deploy(DeployedContract {
                address,
                contract: contract.to_string(),
                upgradeable: false,
                args: args.to_vec(),
            }),
        );

        Ok(TxHandle(tx))
    }

    async fn deploy_upgradeable(
        &self,
        contract: &str,
        init_args: &[String],
    ) -> Result<TxHandle, ClientError> {
        let mut state = self.lock_state();
        state.requests += 1;

        if state.fail_contracts.contains(contract) {
            return Err(ClientError::Rejected(format!("node rejected deployment of {contract}")));
        }

        // The implementation contract is deployed first, then the proxy
        // wrapping it; the proxy address is the component's identifier
        let proxy_nonce = state.nonce + 1;
        let address = self.deployer.create(proxy_nonce);
        let tx = self.tx_hash(proxy_nonce);
        state.nonce += 2;

        state.pending.insert(
            tx,
            PendingTx::Deploy(DeployedContract {
                address,
                contract: contract.to_string(),
                upgradeable: true,
                args: init_args.to_vec(),
            }),
        );

        Ok(TxHandle(tx))
    }

    async fn call(
        &self,
        target: Address,
        method: &str,
        args: &[String],
    ) -> Result<TxHandle, ClientError> {
        let mut state = self.lock_state();
        state.requests += 1;

        if state.fail_methods.contains(method) {
            return Err(ClientError::Rejected(format!("node rejected call to {method}")));
        }

        let tx = self.tx_hash(state.nonce);
        state.nonce += 1;

        state.pending.insert(
            tx,
            PendingTx::Call(RecordedCall {
                target,
                method: method.to_string(),
                args: args.to_vec(),
            }),
        );

        Ok(TxHandle(tx))
    }

    async fn await_confirmation(&self, handle: TxHandle) -> Result<Receipt, ClientError> {
        let mut state = self.lock_state();
        state.requests += 1;

        let pending = state
            .pending
            .remove(&handle.0)
            .ok_or_else(|| ClientError::UnknownHandle(format!("{:#x}", handle.0)))?;

        match pending {
            PendingTx::Deploy(deployment) => {
                if state.timeout_contracts.contains(&deployment.contract) {
                    return Err(ClientError::ConfirmationTimeout(format!(
                        "deployment of {} did not confirm",
                        deployment.contract
                    )));
                }
                let address = deployment.address;
                state.deployed.push(deployment);
                Ok(Receipt { tx: handle.0, contract_address: Some(address), confirmed_at: Utc::now() })
            }
            PendingTx::Call(call) => {
                state.calls.push(call);
                Ok(Receipt { tx: handle.0, contract_address: None, confirmed_at: Utc::now() })
            }
        }
    }
}

/// Devnet client behavior tests
#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that deployments land at distinct, nonce-derived addresses
    #[tokio::test]
    async fn test_deploy_addresses_distinct() {
        let client = DevnetClient::new();

        let first = client.deploy("Foo", &[]).await.unwrap();
        let second = client.deploy_upgradeable("Bar", &[]).await.unwrap();
        let first = client.await_confirmation(first).await.unwrap();
        let second = client.await_confirmation(second).await.unwrap();

        assert_ne!(first.contract_address, second.contract_address);

        let deployed = client.deployed();
        assert_eq!(deployed.len(), 2);
        assert!(!deployed[0].upgradeable);
        assert!(deployed[1].upgradeable);
    }

    /// Tests that confirming an unknown handle is an error
    #[tokio::test]
    async fn test_unknown_handle() {
        let client = DevnetClient::new();
        let bogus = TxHandle(B256::ZERO);
        assert!(matches!(
            client.await_confirmation(bogus).await,
            Err(ClientError::UnknownHandle(_))
        ));
    }
}
