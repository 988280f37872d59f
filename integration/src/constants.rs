//! Constants used in the integration tests

/// The default path to the UCPI rollout plan, relative to this crate's
/// manifest so the harness can run from any working directory
pub(crate) const DEFAULT_PLAN_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/../plans/ucpi_system.json");
