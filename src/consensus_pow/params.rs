//! Consensus parameters.

use serde::{Deserialize, Serialize};

use crate::consensus_pow::compact::{self, CompactTarget};

/// Whether `permitted_difficulty_transition` enforces the legacy
/// retarget bounds or always returns `true`. The reference source ships
/// the check commented out; we default to the conservative `Strict`
/// behavior and expose `AlwaysPermit` only under the
/// `permissive-transition` feature so a network can't silently inherit
/// the relaxed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPolicy {
    Strict,
    #[cfg(feature = "permissive-transition")]
    AlwaysPermit,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        TransitionPolicy::Strict
    }
}

/// Configuration parameterizing retargeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusParams {
    pub pow_limit: CompactTarget,
    pub pow_target_spacing: i64,
    pub pow_target_timespan: i64,
    #[serde(default)]
    pub allow_min_difficulty_blocks: bool,
    #[serde(default)]
    pub no_retargeting: bool,
    pub lwma_averaging_window: i64,
    #[serde(default)]
    pub transition_policy: TransitionPolicy,
}

impl ConsensusParams {
    /// `difficulty_adjustment_interval = pow_target_timespan / pow_target_spacing`.
    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    pub fn pow_limit_target(&self) -> crate::consensus_pow::arith256::U256 {
        compact::decode(self.pow_limit).target
    }

    /// Mainnet-like preset: `T=600`, `timespan=1209600` (14 days),
    /// `pow_limit=0x1d00ffff`.
    pub fn mainnet() -> Self {
        ConsensusParams {
            pow_limit: CompactTarget(0x1d00ffff),
            pow_target_spacing: 600,
            pow_target_timespan: 14 * 24 * 60 * 60,
            allow_min_difficulty_blocks: false,
            no_retargeting: false,
            lwma_averaging_window: 144,
            transition_policy: TransitionPolicy::Strict,
        }
    }

    /// Regtest preset: retargeting disabled, min-difficulty blocks
    /// allowed, matching how Bitcoin-derived nodes configure local
    /// development networks.
    pub fn regtest() -> Self {
        ConsensusParams {
            pow_limit: CompactTarget(0x207fffff),
            pow_target_spacing: 600,
            pow_target_timespan: 14 * 24 * 60 * 60,
            allow_min_difficulty_blocks: true,
            no_retargeting: true,
            lwma_averaging_window: 45,
            transition_policy: TransitionPolicy::Strict,
        }
    }
}

impl ConsensusParams {
    /// Serialize to TOML, for a network operator to drop into the
    /// node's config directory alongside its other `*.toml` files.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("failed to serialize consensus params to TOML: {e}"))
    }

    /// Parse from TOML, following the same `from_toml`/`to_toml` pair
    /// the node's own per-subsystem config types expose.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse consensus params TOML: {e}"))
    }
}
