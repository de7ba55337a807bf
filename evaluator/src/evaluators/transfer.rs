use super::{move_balance, require_account, require_asset, require_balance};
use crate::error::EvaluationError;
use crate::{Evaluator, OperationResult, TransactionEvaluationState};
use duo_operations::{OverrideTransferOperation, TransferOperation};
use duo_store::ObjectStore;
use duo_types::AssetAmount;

#[derive(Debug, Default)]
pub struct TransferEvaluator;

impl<S: ObjectStore> Evaluator<S> for TransferEvaluator {
    type Operation = TransferOperation;

    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &TransferOperation,
    ) -> Result<(), EvaluationError> {
        let store = &*state.store;
        require_account(store, op.from)?;
        require_account(store, op.to)?;
        require_asset(store, op.amount.asset_id)?;
        require_balance(store, op.from, op.amount)
    }

    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &TransferOperation,
    ) -> Result<OperationResult, EvaluationError> {
        move_balance(state.store, op.from, op.to, op.amount)?;
        Ok(OperationResult::Void)
    }

    fn payer_debit(&self, op: &TransferOperation) -> Option<AssetAmount> {
        Some(op.amount)
    }
}

/// Issuer-forced transfer of an asset that carries override authority.
#[derive(Debug, Default)]
pub struct OverrideTransferEvaluator;

impl<S: ObjectStore> Evaluator<S> for OverrideTransferEvaluator {
    type Operation = OverrideTransferOperation;

    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &OverrideTransferOperation,
    ) -> Result<(), EvaluationError> {
        let store = &*state.store;
        require_account(store, op.issuer)?;
        let asset = require_asset(store, op.amount.asset_id)?;
        if asset.issuer != op.issuer {
            return Err(EvaluationError::NotIssuer {
                account: op.issuer,
                asset: asset.id,
            });
        }
        if !asset.override_authority {
            return Err(EvaluationError::OverrideNotPermitted(asset.id));
        }
        require_account(store, op.from)?;
        require_account(store, op.to)?;
        require_balance(store, op.from, op.amount)
    }

    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &OverrideTransferOperation,
    ) -> Result<OperationResult, EvaluationError> {
        move_balance(state.store, op.from, op.to, op.amount)?;
        Ok(OperationResult::Void)
    }
}
