//! Assets, witnesses and the process-wide singletons.

use duo_types::{AccountId, AssetId, ShareType, Timestamp, VestingBalanceId, WitnessId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    pub precision: u8,
    pub issuer: AccountId,
    pub max_supply: ShareType,
    pub current_supply: ShareType,
    /// The issuer may move this asset out of holders' accounts.
    pub override_authority: bool,
}

/// A block producer and where its pay accumulates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub id: WitnessId,
    pub witness_account: AccountId,
    /// CDD vesting balance receiving block pay, created on first pay.
    pub pay_vb: Option<VestingBalanceId>,
    pub total_produced: u64,
}

/// Ledger-wide mutable state: head position, schedule and pay pools.
///
/// The witness budget is reset once per maintenance interval and drawn down
/// once per block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalDynamicProperties {
    pub head_block_number: u64,
    pub head_block_time: Timestamp,
    pub next_maintenance_time: Timestamp,
    /// When the witness budget was last recomputed; `None` before the first run.
    pub last_budget_time: Option<Timestamp>,
    /// Pay remaining for the current interval.
    pub witness_budget: ShareType,
    /// Network share of collected CORE fees, from which budgets are drawn.
    pub accumulated_fees: ShareType,
    /// Collected SDR fees.
    pub accumulated_ufees: ShareType,
}

/// Permanently retired supply. Only ever grows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveFund {
    pub reserved: ShareType,
    pub reserved_ufees: ShareType,
}
