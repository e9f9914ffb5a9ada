//! Transition guard. Ported from `PermittedDifficultyTransition` in
//! `original_source/src/pow.cpp`, where the body is shipped commented
//! out and the function always returns `true`.
//!
//! This crate treats that as a bug, not a feature: [`TransitionPolicy::Strict`]
//! enforces the bounds below by default, and the relaxed behavior is only
//! reachable through the `permissive-transition` feature, so a network
//! can't silently inherit it.

use crate::consensus_pow::compact::{self, CompactTarget};
use crate::consensus_pow::error::ConsensusError;
use crate::consensus_pow::params::{ConsensusParams, TransitionPolicy};
use crate::consensus_pow::retarget_legacy::calculate_next_work_required;

/// `(height, old_bits, new_bits, params) -> bool`.
///
/// - `allow_min_difficulty_blocks`: any transition is permitted.
/// - At a retarget boundary (`height mod interval == 0`): `new_bits`'s
///   target must fall within `[min_new, max_new]`, the legacy retarget
///   bounds (÷4 and ×4 respectively) applied to `old_bits` and clamped
///   to `pow_limit`, each round-tripped through compact form so the
///   comparison is against what a real retarget could actually produce.
/// - Otherwise: `new_bits` must equal `old_bits` exactly.
pub fn permitted_difficulty_transition(
    height: i32,
    old_bits: CompactTarget,
    new_bits: CompactTarget,
    params: &ConsensusParams,
) -> Result<bool, ConsensusError> {
    match params.transition_policy {
        TransitionPolicy::Strict => {}
        #[cfg(feature = "permissive-transition")]
        TransitionPolicy::AlwaysPermit => return Ok(true),
    }

    if params.allow_min_difficulty_blocks {
        return Ok(true);
    }

    let interval = params.difficulty_adjustment_interval();
    if i64::from(height) % interval != 0 {
        return Ok(new_bits.to_u32() == old_bits.to_u32());
    }

    // The bound math only depends on `last.time - first_block_time`, so
    // any pair realizing exactly `timespan * 4` (max) and `timespan / 4`
    // (min) gives the legacy retarget's extremes for `old_bits`.
    let timespan = params.pow_target_timespan;

    let max_entry = crate::consensus_pow::chain_index::ChainIndexEntry {
        height,
        time: (4 * timespan) as u32,
        bits: old_bits.to_u32(),
    };
    let max_new_bits = calculate_next_work_required(max_entry, 0, params)?;

    let min_entry = crate::consensus_pow::chain_index::ChainIndexEntry {
        height,
        time: timespan as u32,
        bits: old_bits.to_u32(),
    };
    let min_new_bits =
        calculate_next_work_required(min_entry, (timespan - timespan / 4) as u32, params)?;

    let max_new = compact::decode(max_new_bits).target;
    let min_new = compact::decode(min_new_bits).target;
    let new_target = compact::decode(new_bits).target;

    Ok(new_target >= min_new && new_target <= max_new)
}
