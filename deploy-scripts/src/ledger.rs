//! The run ledger: durable, per-step progress records backing idempotent
//! resume of a deployment run.
//!
//! The ledger is the generalization of a keyed `deployments.json` file:
//! instead of bare addresses it records a status-tagged entry per component
//! and per wiring call, written through to disk after every transition so a
//! crashed run can be resumed.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use deploy_common::types::{DeployedInstance, RunLedgerEntry, StepStatus};
use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;

/// The serialized layout of the deployments file
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerState {
    /// Per-component entries keyed by component id
    #[serde(default)]
    components: BTreeMap<String, RunLedgerEntry>,
    /// Per-wiring-call entries keyed by declaration index
    #[serde(default)]
    wiring: BTreeMap<u32, RunLedgerEntry>,
}

/// The durable record of a deployment run's progress
pub struct RunLedger {
    /// Path of the backing deployments file
    path: PathBuf,
    /// In-memory copy of the persisted state
    state: LedgerState,
}

impl RunLedger {
    /// Open the ledger at `path`, starting empty if the file does not exist
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents =
                fs::read_to_string(&path).map_err(|e| ScriptError::LedgerRead(e.to_string()))?;
            serde_json::from_str(&contents).map_err(|e| ScriptError::LedgerRead(e.to_string()))?
        } else {
            LedgerState::default()
        };

        Ok(Self { path, state })
    }

    /// The recorded entry for a component, if any
    pub fn component(&self, id: &str) -> Option<&RunLedgerEntry> {
        self.state.components.get(id)
    }

    /// The recorded entry for a wiring call, if any
    pub fn wiring(&self, index: u32) -> Option<&RunLedgerEntry> {
        self.state.wiring.get(&index)
    }

    /// The confirmed address of a component, if it reached `Confirmed`
    pub fn confirmed_address(&self, id: &str) -> Option<Address> {
        self.component(id)
            .filter(|entry| entry.status == StepStatus::Confirmed)
            .and_then(|entry| entry.address)
    }

    /// Record a component transition and persist it
    pub fn record_component(&mut self, id: &str, entry: RunLedgerEntry) -> Result<(), ScriptError> {
        self.state.components.insert(id.to_string(), entry);
        self.write()
    }

    /// Record a confirmed deployment and persist it
    pub fn record_deployment(&mut self, instance: &DeployedInstance) -> Result<(), ScriptError> {
        self.record_component(
            &instance.component,
            RunLedgerEntry::confirmed_deployment(instance.address, instance.confirmed_at),
        )
    }

    /// Record a wiring-call transition and persist it
    pub fn record_wiring(&mut self, index: u32, entry: RunLedgerEntry) -> Result<(), ScriptError> {
        self.state.wiring.insert(index, entry);
        self.write()
    }

    /// Remove the deployments file at `path`, discarding recorded progress
    pub fn reset(path: impl AsRef<Path>) -> Result<(), ScriptError> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_file(path).map_err(|e| ScriptError::LedgerWrite(e.to_string()))?;
        }
        Ok(())
    }

    /// Path of the backing deployments file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full ledger state through to disk
    fn write(&self) -> Result<(), ScriptError> {
        let contents = serde_json::to_string_pretty(&self.state)
            .map_err(|e| ScriptError::LedgerWrite(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| ScriptError::LedgerWrite(e.to_string()))
    }
}

/// Run ledger persistence tests
#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;

    /// Open a ledger backed by a scratch file
    fn make_ledger() -> (RunLedger, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        (RunLedger::load_or_create(path).unwrap(), dir)
    }

    /// Tests that a fresh ledger has no entries
    #[test]
    fn test_empty_ledger() {
        let (ledger, _dir) = make_ledger();
        assert!(ledger.component("reward_token").is_none());
        assert!(ledger.wiring(0).is_none());
        assert!(ledger.confirmed_address("reward_token").is_none());
    }

    /// Tests that recorded entries survive reopening the same file
    #[test]
    fn test_recovery_after_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        let address = Address::random();

        {
            let mut ledger = RunLedger::load_or_create(&path).unwrap();
            ledger
                .record_component(
                    "reward_token",
                    RunLedgerEntry::confirmed_deployment(address, Utc::now()),
                )
                .unwrap();
            ledger.record_wiring(0, RunLedgerEntry::in_flight()).unwrap();
        }

        {
            let ledger = RunLedger::load_or_create(&path).unwrap();
            assert_eq!(ledger.confirmed_address("reward_token"), Some(address));
            assert_eq!(ledger.wiring(0).unwrap().status, StepStatus::InFlight);
        }
    }

    /// Tests that only confirmed entries expose an address
    #[test]
    fn test_confirmed_address_requires_confirmed_status() {
        let (mut ledger, _dir) = make_ledger();
        ledger.record_component("logger", RunLedgerEntry::in_flight()).unwrap();
        assert!(ledger.confirmed_address("logger").is_none());

        ledger
            .record_component("logger", RunLedgerEntry::failed("node rejected".to_string()))
            .unwrap();
        assert!(ledger.confirmed_address("logger").is_none());
    }

    /// Tests that reset removes the backing file
    #[test]
    fn test_reset_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");

        let mut ledger = RunLedger::load_or_create(&path).unwrap();
        ledger.record_wiring(1, RunLedgerEntry::in_flight()).unwrap();
        assert!(path.exists());

        RunLedger::reset(&path).unwrap();
        assert!(!path.exists());

        let reopened = RunLedger::load_or_create(&path).unwrap();
        assert!(reopened.wiring(1).is_none());
    }
}
