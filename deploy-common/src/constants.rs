//! Constants describing the UCPI contract system rollout

/// The reward token component key in the rollout plan and deployments file
pub const REWARD_TOKEN_KEY: &str = "reward_token";

/// The permissions component key in the rollout plan and deployments file
pub const PERMISSIONS_KEY: &str = "permissions";

/// The logger component key in the rollout plan and deployments file
pub const LOGGER_KEY: &str = "logger";

/// The reward manager component key in the rollout plan and deployments file
pub const REWARD_MANAGER_KEY: &str = "reward_manager";

/// The UCPI coordinator component key in the rollout plan and deployments file
pub const UCPI_KEY: &str = "ucpi";

/// The reward token contract artifact name
pub const REWARD_TOKEN_CONTRACT: &str = "RewardToken";

/// The permissions contract artifact name
pub const PERMISSIONS_CONTRACT: &str = "Permissions";

/// The logger contract artifact name
pub const LOGGER_CONTRACT: &str = "Logger";

/// The reward manager contract artifact name
pub const REWARD_MANAGER_CONTRACT: &str = "RewardManager";

/// The UCPI coordinator contract artifact name
pub const UCPI_CONTRACT: &str = "UCPI";

/// The reward manager method wiring in the reward token address
pub const SET_REWARD_TOKEN_METHOD: &str = "setRewardToken";

/// The reward manager method wiring in the UCPI coordinator address
pub const SET_UCPI_CONTRACT_METHOD: &str = "setUCPIContract";

/// The platform fee the reward manager is initialized with, in basis points
pub const DEFAULT_PLATFORM_FEE_BPS: &str = "500";

/// The maximum points balance the reward manager is initialized with,
/// denominated in the token's 18-decimal base units
pub const DEFAULT_MAX_POINTS: &str = "1000000000000000000000";
