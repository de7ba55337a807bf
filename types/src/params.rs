//! Chain parameters: the committee-tunable values every node must agree on.

use crate::amount::{ShareType, BLOCKCHAIN_PRECISION};
use serde::{Deserialize, Serialize};

/// 100% in basis points.
pub const HUNDRED_PERCENT: u32 = 10_000;

/// Default numerator of the reserve pool release rate (per second, over `2^bits`).
pub const DEFAULT_CORE_ASSET_CYCLE_RATE: u32 = 17;

/// Default denominator exponent of the reserve pool release rate.
pub const DEFAULT_CORE_ASSET_CYCLE_RATE_BITS: u32 = 32;

/// Parameters stored by every node.
///
/// Missing fields in a config document fall back to [`ChainParameters::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParameters {
    // ── Scheduling ───────────────────────────────────────────────────────
    /// Seconds between blocks.
    pub block_interval: u32,

    /// Seconds between maintenance boundaries.
    pub maintenance_interval: u32,

    // ── Witness pay ──────────────────────────────────────────────────────
    /// Pay (CORE) for each produced block, drawn from the interval budget.
    pub witness_pay_per_block: ShareType,

    /// Maturation period of the CDD vesting balance that receives witness pay.
    pub witness_pay_vesting_seconds: u32,

    /// Release rate numerator applied to the reserve pool when sizing a budget.
    pub core_asset_cycle_rate: u32,

    /// Release rate is `core_asset_cycle_rate / 2^core_asset_cycle_rate_bits` per second.
    pub core_asset_cycle_rate_bits: u32,

    // ── Fees ─────────────────────────────────────────────────────────────
    /// Share of collected CORE fees (basis points) kept for the witness-pay pool.
    /// The rest is retired into the reserve fund.
    pub network_percent_of_fee: u32,

    /// Largest accepted serialized transaction, in bytes.
    pub maximum_transaction_size: u32,
}

impl ChainParameters {
    /// Whole blocks that fit in one maintenance interval.
    pub fn blocks_per_maintenance(&self) -> u64 {
        u64::from(self.maintenance_interval) / u64::from(self.block_interval.max(1))
    }
}

impl Default for ChainParameters {
    fn default() -> Self {
        Self {
            block_interval: 5,
            maintenance_interval: 86_400,
            witness_pay_per_block: 10 * BLOCKCHAIN_PRECISION,
            witness_pay_vesting_seconds: 86_400,
            core_asset_cycle_rate: DEFAULT_CORE_ASSET_CYCLE_RATE,
            core_asset_cycle_rate_bits: DEFAULT_CORE_ASSET_CYCLE_RATE_BITS,
            network_percent_of_fee: 20 * HUNDRED_PERCENT / 100,
            maximum_transaction_size: 2048,
        }
    }
}
