//! The client interface through which the orchestrator reaches the chain.
//!
//! The scripts never speak RPC themselves: everything chain-facing goes
//! through [`LedgerClient`], so the same engine drives a real node client or
//! the in-process devnet used for rehearsals and tests.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A handle to a submitted, not yet confirmed, transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHandle(
    /// The submitted transaction's hash
    pub B256,
);

/// The receipt returned once a transaction confirms
#[derive(Debug, Clone)]
pub struct Receipt {
    /// The hash of the confirmed transaction
    pub tx: B256,
    /// The deployed contract address, for deployment transactions
    pub contract_address: Option<Address>,
    /// When the confirmation was observed
    pub confirmed_at: DateTime<Utc>,
}

/// Errors surfaced by a [`LedgerClient`] implementation
#[derive(Debug)]
pub enum ClientError {
    /// The node rejected the transaction
    Rejected(String),
    /// The transaction did not confirm within the client's deadline
    ConfirmationTimeout(String),
    /// The handle does not correspond to a submitted transaction
    UnknownHandle(String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Rejected(s) => write!(f, "transaction rejected: {}", s),
            ClientError::ConfirmationTimeout(s) => write!(f, "confirmation timed out: {}", s),
            ClientError::UnknownHandle(s) => write!(f, "unknown transaction handle: {}", s),
        }
    }
}

impl Error for ClientError {}

/// The chain-facing collaborator performing deployments and contract calls.
///
/// `contract` is an opaque artifact identifier the implementation resolves
/// to compiled code; the orchestrator never inspects contract internals.
/// Submission and confirmation are split so the engine can record a step as
/// in flight before it blocks on the chain.
#[async_trait]
pub trait LedgerClient {
    /// Deploy a plain contract with the given constructor arguments
    async fn deploy(&self, contract: &str, args: &[String]) -> Result<TxHandle, ClientError>;

    /// Deploy a contract behind an upgradeable proxy, passing the given
    /// arguments to its initializer
    async fn deploy_upgradeable(
        &self,
        contract: &str,
        init_args: &[String],
    ) -> Result<TxHandle, ClientError>;

    /// Invoke a method on an already-deployed contract
    async fn call(
        &self,
        target: Address,
        method: &str,
        args: &[String],
    ) -> Result<TxHandle, ClientError>;

    /// Block until the transaction behind `handle` confirms or fails
    async fn await_confirmation(&self, handle: TxHandle) -> Result<Receipt, ClientError>;
}
