use super::require_account;
use crate::error::EvaluationError;
use crate::{Evaluator, OperationResult, TransactionEvaluationState};
use duo_operations::AccountUpgradeOperation;
use duo_store::{Account, Membership, ObjectStore};
use duo_types::Timestamp;

/// Length of one annual membership.
pub const ANNUAL_MEMBERSHIP_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Default)]
pub struct AccountUpgradeEvaluator {
    membership: Membership,
}

impl<S: ObjectStore> Evaluator<S> for AccountUpgradeEvaluator {
    type Operation = AccountUpgradeOperation;

    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &AccountUpgradeOperation,
    ) -> Result<(), EvaluationError> {
        let account = require_account(&*state.store, op.account_to_upgrade)?;
        if account.membership.is_lifetime() {
            return Err(EvaluationError::AlreadyLifetimeMember(account.id));
        }
        self.membership = if op.upgrade_to_lifetime_member {
            Membership::Lifetime
        } else {
            Membership::Annual {
                expires: annual_expiry(account.membership, state.now),
            }
        };
        Ok(())
    }

    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &AccountUpgradeOperation,
    ) -> Result<OperationResult, EvaluationError> {
        let membership = self.membership;
        state
            .store
            .modify::<Account>(op.account_to_upgrade, |a| a.membership = membership)?;
        Ok(OperationResult::Void)
    }
}

/// An unexpired annual membership is extended from its expiry, anything
/// else from `now`.
fn annual_expiry(current: Membership, now: Timestamp) -> Timestamp {
    let start = match current {
        Membership::Annual { expires } if expires > now => expires,
        _ => now,
    };
    start.saturating_add(ANNUAL_MEMBERSHIP_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::test_support::{balance, state, store_with};
    use crate::run_evaluator;
    use duo_fees::FeeSchedule;
    use duo_operations::Operation;
    use duo_store::MemoryStore;
    use duo_types::{AccountId, AssetAmount, AssetId, DualFee, BLOCKCHAIN_PRECISION as P};

    fn upgrade(account: AccountId, lifetime: bool, fee: i64) -> Operation {
        AccountUpgradeOperation {
            fee: AssetAmount::core(fee),
            ufee: AssetAmount::sdr(0),
            account_to_upgrade: account,
            upgrade_to_lifetime_member: lifetime,
        }
        .into()
    }

    fn run(store: &mut MemoryStore, schedule: &FeeSchedule, op: &Operation, now: u64) -> Result<crate::OperationOutcome, EvaluationError> {
        run_evaluator::<MemoryStore, AccountUpgradeEvaluator>(&mut state(store, schedule, now), op, true)
    }

    fn membership(store: &MemoryStore, id: AccountId) -> Membership {
        store.get::<Account>(id).unwrap().membership
    }

    #[test]
    fn lifetime_upgrade_charges_the_lifetime_fee() {
        let (mut store, ids) = store_with(&[("nathan", 20_000 * P, 0)]);
        let schedule = FeeSchedule::default();
        let outcome = run(&mut store, &schedule, &upgrade(ids[0], true, 10_000 * P), 0).unwrap();

        assert_eq!(outcome.fee_paid, DualFee::new(10_000 * P, 0));
        assert_eq!(membership(&store, ids[0]), Membership::Lifetime);
        assert_eq!(balance(&store, ids[0], AssetId::CORE), 10_000 * P);
        assert_eq!(store.account_statistics(ids[0]).unwrap().pending_fees, 10_000 * P);

        let again = run(&mut store, &schedule, &upgrade(ids[0], true, 10_000 * P), 0).unwrap_err();
        assert_eq!(again, EvaluationError::AlreadyLifetimeMember(ids[0]));
    }

    #[test]
    fn annual_membership_extends_from_expiry() {
        let (mut store, ids) = store_with(&[("nathan", 0, 0)]);
        let schedule = FeeSchedule::free();

        run(&mut store, &schedule, &upgrade(ids[0], false, 0), 100).unwrap();
        let first = Timestamp::new(100 + ANNUAL_MEMBERSHIP_SECONDS);
        assert_eq!(membership(&store, ids[0]), Membership::Annual { expires: first });

        run(&mut store, &schedule, &upgrade(ids[0], false, 0), 200).unwrap();
        assert_eq!(
            membership(&store, ids[0]),
            Membership::Annual {
                expires: first.saturating_add(ANNUAL_MEMBERSHIP_SECONDS)
            }
        );
    }

    #[test]
    fn lapsed_membership_restarts_from_now() {
        assert_eq!(
            annual_expiry(
                Membership::Annual {
                    expires: Timestamp::new(50)
                },
                Timestamp::new(1_000)
            ),
            Timestamp::new(1_000 + ANNUAL_MEMBERSHIP_SECONDS)
        );
    }
}
