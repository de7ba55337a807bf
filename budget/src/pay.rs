//! Per-block witness pay.

use crate::error::BudgetError;
use duo_store::{ObjectStore, Witness};
use duo_types::{AssetAmount, ChainParameters, ShareType, Timestamp, WitnessId};
use duo_vesting::{VestingBalance, VestingPolicyInitializer};
use tracing::debug;

/// Pay `producer` for one block out of the current witness budget.
///
/// Pays `min(witness_pay_per_block, witness_budget)` into the witness's CDD
/// vesting balance, creating that balance on the first non-zero payment.
/// Returns the amount paid, which is 0 once the budget is exhausted.
pub fn pay_block_producer<S: ObjectStore>(
    store: &mut S,
    producer: WitnessId,
    params: &ChainParameters,
    now: Timestamp,
) -> Result<ShareType, BudgetError> {
    let witness = store.get::<Witness>(producer)?.clone();
    let budget = store.dynamic_properties().witness_budget;
    let pay = params.witness_pay_per_block.min(budget).max(0);

    if pay > 0 {
        deposit_witness_pay(store, &witness, pay, params, now)?;
        store.modify_dynamic_properties(|d| d.witness_budget -= pay);
    }
    store.modify::<Witness>(producer, |w| w.total_produced += 1)?;

    debug!(witness = %producer, pay, remaining = budget - pay, "block producer paid");
    Ok(pay)
}

fn deposit_witness_pay<S: ObjectStore>(
    store: &mut S,
    witness: &Witness,
    pay: ShareType,
    params: &ChainParameters,
    now: Timestamp,
) -> Result<(), BudgetError> {
    let amount = AssetAmount::core(pay);
    match witness.pay_vb.filter(|id| store.exists::<VestingBalance>(*id)) {
        Some(vb) => store.try_modify::<VestingBalance, (), BudgetError>(vb, |vb| {
            vb.deposit(now, amount).map_err(Into::into)
        }),
        None => {
            let policy = VestingPolicyInitializer::cdd(params.witness_pay_vesting_seconds);
            let owner = witness.witness_account;
            let vb = store.create(|id| VestingBalance::new(id, owner, amount, &policy, now));
            store.modify::<Witness>(witness.id, |w| w.pay_vb = Some(vb))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duo_store::MemoryStore;
    use duo_types::{AccountId, VestingBalanceId};

    fn setup(budget: ShareType) -> (MemoryStore, WitnessId) {
        let mut store = MemoryStore::new();
        let witness = store.create(|id| Witness {
            id,
            witness_account: AccountId::new(3),
            pay_vb: None,
            total_produced: 0,
        });
        store.modify_dynamic_properties(|d| d.witness_budget = budget);
        (store, witness)
    }

    fn params() -> ChainParameters {
        ChainParameters {
            witness_pay_per_block: 259,
            witness_pay_vesting_seconds: 1_000,
            ..ChainParameters::default()
        }
    }

    #[test]
    fn pays_until_the_budget_runs_out() {
        let (mut store, witness) = setup(594);
        let pays: Vec<_> = (0..4)
            .map(|i| pay_block_producer(&mut store, witness, &params(), Timestamp::new(10 + i)).unwrap())
            .collect();

        assert_eq!(pays, vec![259, 259, 76, 0]);
        assert_eq!(store.dynamic_properties().witness_budget, 0);
        let w = store.get::<Witness>(witness).unwrap();
        assert_eq!(w.total_produced, 4);
        let vb = store.get::<VestingBalance>(w.pay_vb.unwrap()).unwrap();
        assert_eq!(vb.balance, AssetAmount::core(594));
        assert_eq!(vb.owner, AccountId::new(3));
    }

    #[test]
    fn zero_pay_creates_nothing() {
        let (mut store, witness) = setup(0);
        assert_eq!(pay_block_producer(&mut store, witness, &params(), Timestamp::new(1)).unwrap(), 0);
        assert_eq!(store.get::<Witness>(witness).unwrap().pay_vb, None);
        assert_eq!(store.count::<VestingBalance>(), 0);
    }

    #[test]
    fn pay_vests_under_cdd() {
        let (mut store, witness) = setup(259);
        pay_block_producer(&mut store, witness, &params(), Timestamp::new(0)).unwrap();
        let vb = store.get::<VestingBalance>(VestingBalanceId::new(0)).unwrap();
        assert_eq!(vb.withdrawable(Timestamp::new(0)).unwrap().amount, 0);
        assert_eq!(vb.withdrawable(Timestamp::new(500)).unwrap().amount, 129);
        assert_eq!(vb.withdrawable(Timestamp::new(1_000)).unwrap().amount, 259);
    }

    #[test]
    fn failed_deposit_leaves_the_budget_alone() {
        let (mut store, witness) = setup(594);
        let policy = VestingPolicyInitializer::cdd(1_000);
        let sdr_vb = store.create(|id| {
            VestingBalance::new(id, AccountId::new(3), AssetAmount::sdr(5), &policy, Timestamp::new(0))
        });
        store.modify::<Witness>(witness, |w| w.pay_vb = Some(sdr_vb)).unwrap();

        let err = pay_block_producer(&mut store, witness, &params(), Timestamp::new(1)).unwrap_err();

        assert!(matches!(err, BudgetError::Vesting(_)));
        assert_eq!(store.dynamic_properties().witness_budget, 594);
        assert_eq!(store.get::<Witness>(witness).unwrap().total_produced, 0);
        assert_eq!(store.get::<VestingBalance>(sdr_vb).unwrap().balance, AssetAmount::sdr(5));
    }

    #[test]
    fn unknown_witness_is_an_error() {
        let (mut store, _) = setup(100);
        assert!(pay_block_producer(&mut store, WitnessId::new(7), &params(), Timestamp::new(1)).is_err());
        assert_eq!(store.dynamic_properties().witness_budget, 100);
    }
}
