//! The maintenance-boundary run: fee distribution, schedule advance and the
//! new witness budget.

use crate::error::BudgetError;
use duo_store::{AccountStatistics, ObjectStore};
use duo_types::{ChainParameters, ShareType, Timestamp, HUNDRED_PERCENT};
use tracing::{debug, info};

/// Totals moved out of the per-account pending counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeDistribution {
    pub fees_collected: ShareType,
    pub ufees_collected: ShareType,
    /// Network share credited to the witness-pay pool.
    pub network_share: ShareType,
    /// Remainder retired into the reserve fund.
    pub retired: ShareType,
}

/// What one maintenance run did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetRecord {
    pub time: Timestamp,
    pub distribution: FeeDistribution,
    /// Unspent budget of the previous interval, returned to the pool.
    pub returned_budget: ShareType,
    /// Pool size the new budget was drawn from.
    pub pool: ShareType,
    /// Seconds since the previous budget.
    pub elapsed_seconds: u64,
    /// Budget before the pool and per-block caps.
    pub requested_budget: ShareType,
    pub witness_budget: ShareType,
    pub next_maintenance_time: Timestamp,
}

/// `ceil(x / 2^bits)` for unsigned 128-bit `x`.
pub fn ceil_shift(x: u128, bits: u32) -> u128 {
    if bits >= 128 {
        return u128::from(x != 0);
    }
    let mask = (1u128 << bits) - 1;
    (x >> bits) + u128::from(x & mask != 0)
}

/// First multiple of `interval` strictly after `now`.
pub fn next_maintenance_after(now: Timestamp, interval: u32) -> Timestamp {
    let interval = u64::from(interval.max(1));
    let next = (now.as_secs() / interval).saturating_add(1).saturating_mul(interval);
    Timestamp::new(next)
}

/// Drain every account's pending fees.
///
/// CORE fees are split per account: `network_percent_of_fee` (rounded down)
/// goes to `accumulated_fees`, the remainder to the reserve fund. SDR fees go
/// to `accumulated_ufees` whole.
pub fn distribute_fees<S: ObjectStore>(
    store: &mut S,
    params: &ChainParameters,
) -> Result<FeeDistribution, BudgetError> {
    let mut totals = FeeDistribution::default();
    for id in store.ids::<AccountStatistics>() {
        let stats = store.get::<AccountStatistics>(id)?;
        let (fees, ufees) = (stats.pending_fees, stats.pending_ufees);
        if fees == 0 && ufees == 0 {
            continue;
        }
        let network = network_share(fees, params.network_percent_of_fee);
        totals.fees_collected = add(totals.fees_collected, fees)?;
        totals.ufees_collected = add(totals.ufees_collected, ufees)?;
        totals.network_share = add(totals.network_share, network)?;
        totals.retired = add(totals.retired, fees - network)?;
        store.modify::<AccountStatistics>(id, |s| {
            s.pending_fees = 0;
            s.pending_ufees = 0;
        })?;
    }

    let dynamic = store.dynamic_properties();
    let accumulated_fees = add(dynamic.accumulated_fees, totals.network_share)?;
    let accumulated_ufees = add(dynamic.accumulated_ufees, totals.ufees_collected)?;
    let reserved = add(store.reserve_fund().reserved, totals.retired)?;
    store.modify_dynamic_properties(|d| {
        d.accumulated_fees = accumulated_fees;
        d.accumulated_ufees = accumulated_ufees;
    });
    store.modify_reserve_fund(|r| r.reserved = reserved);
    debug!(?totals, "pending fees distributed");
    Ok(totals)
}

/// Run the maintenance boundary at block time `now`.
pub fn run_maintenance<S: ObjectStore>(
    store: &mut S,
    params: &ChainParameters,
    now: Timestamp,
) -> Result<BudgetRecord, BudgetError> {
    let distribution = distribute_fees(store, params)?;
    let next_maintenance_time = next_maintenance_after(now, params.maintenance_interval);

    let dynamic = store.dynamic_properties();
    let returned_budget = dynamic.witness_budget;
    let pool = add(dynamic.accumulated_fees, returned_budget)?;
    let elapsed_seconds = dynamic.last_budget_time.map_or(0, |last| last.elapsed_since(now));

    let requested = ceil_shift(
        u128::try_from(pool)
            .unwrap_or(0)
            .saturating_mul(u128::from(params.core_asset_cycle_rate))
            .saturating_mul(u128::from(elapsed_seconds)),
        params.core_asset_cycle_rate_bits,
    );
    let requested_budget = ShareType::try_from(requested).unwrap_or(ShareType::MAX);
    let blocks = next_maintenance_time.as_secs().saturating_sub(now.as_secs())
        / u64::from(params.block_interval.max(1));
    let per_block_cap = i128::from(params.witness_pay_per_block.max(0)) * i128::from(blocks);
    let witness_budget = requested_budget.min(pool).min(clamp(per_block_cap)).max(0);

    store.modify_dynamic_properties(|d| {
        d.accumulated_fees = pool - witness_budget;
        d.witness_budget = witness_budget;
        d.last_budget_time = Some(now);
        d.next_maintenance_time = next_maintenance_time;
    });

    let record = BudgetRecord {
        time: now,
        distribution,
        returned_budget,
        pool,
        elapsed_seconds,
        requested_budget,
        witness_budget,
        next_maintenance_time,
    };
    info!(
        time = %now,
        pool,
        elapsed = elapsed_seconds,
        witness_budget,
        retired = distribution.retired,
        next = %next_maintenance_time,
        "maintenance complete"
    );
    Ok(record)
}

fn network_share(fees: ShareType, percent: u32) -> ShareType {
    let percent = i128::from(percent.min(HUNDRED_PERCENT));
    // The share never exceeds `fees`, so it fits back into i64.
    (i128::from(fees) * percent / i128::from(HUNDRED_PERCENT)) as ShareType
}

fn clamp(value: i128) -> ShareType {
    ShareType::try_from(value).unwrap_or(ShareType::MAX)
}

fn add(a: ShareType, b: ShareType) -> Result<ShareType, BudgetError> {
    a.checked_add(b).ok_or(BudgetError::Overflow("fee pool"))
}
