//! Legacy per-interval retarget. Ported from
//! `GetNextWorkRequired`/`CalculateNextWorkRequired` in
//! `original_source/src/pow.cpp`.

use tracing::{debug, error, trace};

use crate::consensus_pow::arith256::mul_div;
use crate::consensus_pow::chain_index::{AncestorSource, ChainIndexEntry};
use crate::consensus_pow::compact::{self, CompactTarget};
use crate::consensus_pow::error::ConsensusError;
use crate::consensus_pow::params::ConsensusParams;

/// `GetNextWorkRequired`: the entry point used at a candidate block's
/// validation time. `last` is the chain tip the candidate extends;
/// `new_block_time` is the candidate's own claimed timestamp.
pub fn next_work_required_legacy<C: AncestorSource>(
    chain: &C,
    last: ChainIndexEntry,
    new_block_time: u32,
    params: &ConsensusParams,
) -> Result<CompactTarget, ConsensusError> {
    let limit_bits = params.pow_limit;
    let interval = params.difficulty_adjustment_interval();

    if i64::from(last.height + 1) % interval != 0 {
        if params.allow_min_difficulty_blocks {
            if i64::from(new_block_time) > i64::from(last.time) + 2 * params.pow_target_spacing {
                debug!(height = last.height, "testnet min-difficulty rule: gap exceeds 2x spacing");
                return Ok(limit_bits);
            }

            // Walk backward to the last non-special-min-difficulty block.
            let mut cur = last;
            loop {
                if cur.height == 0 {
                    break;
                }
                let prev = match chain.ancestor(cur.height - 1) {
                    Some(p) => p,
                    None => break,
                };
                if i64::from(cur.height) % interval == 0 || cur.bits != limit_bits.to_u32() {
                    break;
                }
                cur = prev;
            }
            return Ok(CompactTarget(cur.bits));
        }
        return Ok(CompactTarget(last.bits));
    }

    let first_height = last.height - (interval as i32 - 1);
    if first_height < 0 {
        error!(
            height = last.height,
            interval, "retarget boundary height underflows the adjustment interval"
        );
        return Err(ConsensusError::NegativeFirstHeight {
            height: last.height,
            interval,
        });
    }

    let first = chain.ancestor(first_height).ok_or_else(|| {
        error!(
            height = first_height,
            "chain index missing the retarget window's first block"
        );
        ConsensusError::MissingAncestor(first_height)
    })?;

    calculate_next_work_required(last, first.time, params)
}

/// `CalculateNextWorkRequired`: the retarget boundary math, callable
/// directly when the caller already knows the window's first
/// timestamp (e.g. from [`crate::consensus_pow::transition`]).
pub fn calculate_next_work_required(
    last: ChainIndexEntry,
    first_block_time: u32,
    params: &ConsensusParams,
) -> Result<CompactTarget, ConsensusError> {
    if params.no_retargeting {
        return Ok(CompactTarget(last.bits));
    }

    let timespan = params.pow_target_timespan;
    let mut actual = i64::from(last.time) - i64::from(first_block_time);
    trace!(actual_timespan = actual, "raw timespan before clamp");

    if actual < timespan / 4 {
        actual = timespan / 4;
    }
    if actual > timespan * 4 {
        actual = timespan * 4;
    }
    trace!(clamped_timespan = actual, "timespan after clamp");

    let decoded = compact::decode(CompactTarget(last.bits));
    // actual is in [timespan/4, timespan*4], both non-negative given a
    // sane ConsensusParams, so this cast is exact.
    let mut new_target = mul_div(decoded.target, actual as u64, timespan as u64)?;

    let pow_limit = params.pow_limit_target();
    if new_target > pow_limit {
        new_target = pow_limit;
    }

    Ok(compact::encode(new_target))
}
