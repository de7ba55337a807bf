use super::{adjust_balance, require_account, require_asset, require_balance};
use crate::error::EvaluationError;
use crate::{Evaluator, OperationResult, TransactionEvaluationState};
use duo_operations::{VestingBalanceCreateOperation, VestingBalanceWithdrawOperation};
use duo_store::ObjectStore;
use duo_types::{AssetAmount, ObjectId};
use duo_vesting::{VestingBalance, VestingError};

/// Escrows part of the creator's balance for `owner` under a vesting policy.
#[derive(Debug, Default)]
pub struct VestingBalanceCreateEvaluator;

impl<S: ObjectStore> Evaluator<S> for VestingBalanceCreateEvaluator {
    type Operation = VestingBalanceCreateOperation;

    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &VestingBalanceCreateOperation,
    ) -> Result<(), EvaluationError> {
        let store = &*state.store;
        require_account(store, op.creator)?;
        require_account(store, op.owner)?;
        require_asset(store, op.amount.asset_id)?;
        require_balance(store, op.creator, op.amount)
    }

    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &VestingBalanceCreateOperation,
    ) -> Result<OperationResult, EvaluationError> {
        let now = state.now;
        adjust_balance(
            state.store,
            op.creator,
            AssetAmount::new(-op.amount.amount, op.amount.asset_id),
        )?;
        let id = state
            .store
            .create(|id| VestingBalance::new(id, op.owner, op.amount, &op.policy, now));
        Ok(OperationResult::NewObject(ObjectId::VestingBalance(id)))
    }

    fn payer_debit(&self, op: &VestingBalanceCreateOperation) -> Option<AssetAmount> {
        Some(op.amount)
    }
}

/// Releases vested funds back to the owner's balance.
#[derive(Debug, Default)]
pub struct VestingBalanceWithdrawEvaluator;

impl<S: ObjectStore> Evaluator<S> for VestingBalanceWithdrawEvaluator {
    type Operation = VestingBalanceWithdrawOperation;

    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &VestingBalanceWithdrawOperation,
    ) -> Result<(), EvaluationError> {
        let vb = state.store.get::<VestingBalance>(op.vesting_balance)?;
        if vb.owner != op.owner {
            return Err(EvaluationError::NotOwner {
                owner: vb.owner,
                claimed: op.owner,
            });
        }
        require_account(&*state.store, op.owner)?;
        vb.is_withdraw_allowed(state.now, op.amount)?;
        Ok(())
    }

    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &VestingBalanceWithdrawOperation,
    ) -> Result<OperationResult, EvaluationError> {
        let now = state.now;
        state
            .store
            .try_modify::<VestingBalance, (), EvaluationError>(op.vesting_balance, |vb| {
                vb.withdraw(now, op.amount).map_err(VestingError::into)
            })?;
        adjust_balance(state.store, op.owner, op.amount)?;
        Ok(OperationResult::Void)
    }
}
