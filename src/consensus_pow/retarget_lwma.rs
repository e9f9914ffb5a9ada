//! LWMA-3 retarget. Ported from `Lwma3CalculateNextWorkRequired` in
//! `original_source/src/pow.cpp` (credited there to Zawy / the Bitcoin
//! Gold and MicroBitcoin developers).

use tracing::{error, trace};

use crate::consensus_pow::arith256::U256;
use crate::consensus_pow::chain_index::{AncestorSource, ChainIndexEntry};
use crate::consensus_pow::compact::{self, CompactTarget};
use crate::consensus_pow::error::ConsensusError;
use crate::consensus_pow::params::ConsensusParams;

/// Bootstrap window: new chains "give away" the first `L` blocks at
/// `pow_limit` rather than computing a (meaningless) average over a
/// history shorter than the averaging window.
const BOOTSTRAP_HEIGHT: i32 = 1000;

/// `Lwma3CalculateNextWorkRequired`.
///
/// Negative-solvetime defense: each block's *virtual* timestamp is
/// `max(actual_time, previous_virtual_time + 1)`, strictly increasing
/// even when on-chain timestamps regress. This must not be replaced
/// with `solvetime = max(1, actual_time - previous_time)` applied
/// after the subtraction — that changes which timestamp becomes "the"
/// previous one for the *next* block's solvetime and desynchronizes
/// the whole weighted average from the reference algorithm.
pub fn lwma3_next_work_required<C: AncestorSource>(
    chain: &C,
    last: ChainIndexEntry,
    params: &ConsensusParams,
) -> Result<CompactTarget, ConsensusError> {
    let n = params.lwma_averaging_window;
    let t = params.pow_target_spacing;
    let k = n * (n + 1) * t / 2;

    if i64::from(last.height) <= i64::from(BOOTSTRAP_HEIGHT) {
        return Ok(params.pow_limit);
    }

    let window_start_height = last.height - n as i32;
    let mut prev_time = i64::from(
        chain
            .ancestor(window_start_height)
            .ok_or_else(|| {
                error!(
                    height = window_start_height,
                    "chain index missing the LWMA window's starting block"
                );
                ConsensusError::MissingAncestor(window_start_height)
            })?
            .time,
    );

    let mut avg_target = U256::zero();
    let mut sum_weighted: i64 = 0;
    let mut j: i64 = 0;

    for i in (last.height - n as i32 + 1)..=last.height {
        let b = chain.ancestor(i).ok_or_else(|| {
            error!(height = i, "chain index missing a block inside the LWMA window");
            ConsensusError::MissingAncestor(i)
        })?;

        let this_time = std::cmp::max(i64::from(b.time), prev_time + 1);
        let solvetime = std::cmp::min(6 * t, this_time - prev_time);
        prev_time = this_time;

        j += 1;
        sum_weighted += solvetime * j;

        let target = compact::decode(CompactTarget(b.bits)).target;
        // Per-term division prevents overflow in `avg_target * sum_weighted`
        // below; this is a deliberate, deterministic truncation and must be
        // reproduced in this exact order to match the reference algorithm.
        avg_target += target / U256::from(n as u64) / U256::from(k as u64);
    }

    trace!(sum_weighted, j, "lwma accumulation complete");

    let mut next_target = avg_target * U256::from(sum_weighted as u64);

    let pow_limit = params.pow_limit_target();
    if next_target > pow_limit {
        next_target = pow_limit;
    }

    Ok(compact::encode(next_target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus_pow::chain_index::VecChainIndex;

    fn chain_with_spacing(n_blocks: i32, spacing: i64, bits: u32) -> VecChainIndex {
        let mut t: i64 = 1_600_000_000;
        let mut entries = Vec::with_capacity(n_blocks as usize);
        for h in 0..n_blocks {
            entries.push(ChainIndexEntry {
                height: h,
                time: t as u32,
                bits,
            });
            t += spacing;
        }
        VecChainIndex::new(entries).unwrap()
    }

    #[test]
    fn bootstrap_returns_pow_limit() {
        let params = ConsensusParams::mainnet();
        let chain = chain_with_spacing(2, 600, 0x1d00ffff);
        let last = chain.ancestor(1).unwrap();
        let got = lwma3_next_work_required(&chain, last, &params).unwrap();
        assert_eq!(got, params.pow_limit);
    }

    #[test]
    fn steady_state_spacing_is_approximately_a_fixed_point() {
        // Per-term division before the final multiply is a deliberate,
        // deterministic truncation, not bit-exact recovery of the input
        // target. At N=144 with every solvetime equal to T, the output
        // should sit within a few compact-mantissa ULPs of the input,
        // not drift meaningfully.
        let mut params = ConsensusParams::mainnet();
        params.lwma_averaging_window = 144;
        let n = params.lwma_averaging_window as i32;
        let total = BOOTSTRAP_HEIGHT + n + 10;
        let chain = chain_with_spacing(total, params.pow_target_spacing, 0x1d00ffff);
        let last = chain.ancestor(total - 1).unwrap();
        let got = lwma3_next_work_required(&chain, last, &params).unwrap();
        let got_target = compact::decode(got).target;
        let input_target = compact::decode(CompactTarget(0x1d00ffff)).target;
        let diff = if got_target > input_target {
            got_target - input_target
        } else {
            input_target - got_target
        };
        assert!(diff * U256::from(10_000u64) < input_target, "drifted too far: {got} vs 0x1d00ffff");
    }

    #[test]
    fn one_slow_block_raises_target() {
        let mut params = ConsensusParams::mainnet();
        params.lwma_averaging_window = 144;
        let n = params.lwma_averaging_window as i32;
        let total = BOOTSTRAP_HEIGHT + n + 10;
        let mut chain = chain_with_spacing(total, params.pow_target_spacing, 0x1d00ffff);

        // Replace the most recent solvetime with 12*T (clamped to 6*T).
        {
            let last_idx = (total - 1) as usize;
            let mut entries: Vec<ChainIndexEntry> = (0..total).map(|h| chain.ancestor(h).unwrap()).collect();
            let bump = 12 * params.pow_target_spacing as u32;
            for e in entries.iter_mut().skip(last_idx) {
                e.time += bump;
            }
            chain = VecChainIndex::new(entries).unwrap();
        }

        let baseline_chain = chain_with_spacing(total, params.pow_target_spacing, 0x1d00ffff);
        let baseline_last = baseline_chain.ancestor(total - 1).unwrap();
        let baseline = lwma3_next_work_required(&baseline_chain, baseline_last, &params).unwrap();

        let last = chain.ancestor(total - 1).unwrap();
        let got = lwma3_next_work_required(&chain, last, &params).unwrap();

        let baseline_target = compact::decode(baseline).target;
        let got_target = compact::decode(got).target;
        assert!(
            got_target > baseline_target,
            "a single slow solvetime should ease (raise) the target"
        );
    }

    #[test]
    fn solvetime_floor_is_one_when_timestamp_regresses() {
        let mut params = ConsensusParams::mainnet();
        params.lwma_averaging_window = 10;
        let n = params.lwma_averaging_window as i32;
        let total = BOOTSTRAP_HEIGHT + n + 5;
        let mut entries: Vec<ChainIndexEntry> = (0..total)
            .map(|h| ChainIndexEntry {
                height: h,
                time: 1_600_000_000 + (h as u32) * 600,
                bits: 0x1d00ffff,
            })
            .collect();
        // Force the last block's timestamp to regress behind its parent.
        let last_idx = (total - 1) as usize;
        entries[last_idx].time = entries[last_idx - 1].time - 1000;
        let chain = VecChainIndex::new(entries).unwrap();
        let last = chain.ancestor(total - 1).unwrap();

        // Must not panic and must still produce a well-formed target.
        let got = lwma3_next_work_required(&chain, last, &params).unwrap();
        let target = compact::decode(got).target;
        assert!(target > U256::zero());
        assert!(target <= params.pow_limit_target());
    }

    #[test]
    fn never_exceeds_pow_limit() {
        let mut params = ConsensusParams::mainnet();
        params.lwma_averaging_window = 45;
        let n = params.lwma_averaging_window as i32;
        let total = BOOTSTRAP_HEIGHT + n + 5;
        // Extremely fast blocks (1 second apart) would push the target
        // down, not up, so instead verify the clamp via an already
        // maximal pow_limit target with fast blocks (target can't rise
        // above pow_limit even though the average solves slower than T).
        let chain = chain_with_spacing(total, 10 * params.pow_target_spacing, 0x1d00ffff);
        let last = chain.ancestor(total - 1).unwrap();
        let got = lwma3_next_work_required(&chain, last, &params).unwrap();
        assert_eq!(got, params.pow_limit);
    }
}
