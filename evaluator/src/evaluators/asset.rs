use super::{adjust_balance, require_account, require_asset};
use crate::error::EvaluationError;
use crate::{Evaluator, OperationResult, TransactionEvaluationState};
use duo_operations::{AssetCreateOperation, AssetIssueOperation};
use duo_store::{Asset, ObjectStore};
use duo_types::ObjectId;

#[derive(Debug, Default)]
pub struct AssetCreateEvaluator;

impl<S: ObjectStore> Evaluator<S> for AssetCreateEvaluator {
    type Operation = AssetCreateOperation;

    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &AssetCreateOperation,
    ) -> Result<(), EvaluationError> {
        require_account(&*state.store, op.issuer)?;
        if state.store.find_asset_by_symbol(&op.symbol).is_some() {
            return Err(EvaluationError::SymbolTaken(op.symbol.clone()));
        }
        Ok(())
    }

    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &AssetCreateOperation,
    ) -> Result<OperationResult, EvaluationError> {
        let id = state.store.create(|id| Asset {
            id,
            symbol: op.symbol.clone(),
            precision: op.precision,
            issuer: op.issuer,
            max_supply: op.max_supply,
            current_supply: 0,
            override_authority: op.override_authority,
        });
        Ok(OperationResult::NewObject(ObjectId::Asset(id)))
    }
}

/// Mints new supply of a user asset into an account.
#[derive(Debug, Default)]
pub struct AssetIssueEvaluator;

impl<S: ObjectStore> Evaluator<S> for AssetIssueEvaluator {
    type Operation = AssetIssueOperation;

    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &AssetIssueOperation,
    ) -> Result<(), EvaluationError> {
        let store = &*state.store;
        require_account(store, op.issuer)?;
        let asset = require_asset(store, op.asset_to_issue.asset_id)?;
        if asset.issuer != op.issuer {
            return Err(EvaluationError::NotIssuer {
                account: op.issuer,
                asset: asset.id,
            });
        }
        require_account(store, op.issue_to_account)?;
        let within_cap = asset
            .current_supply
            .checked_add(op.asset_to_issue.amount)
            .is_some_and(|supply| supply <= asset.max_supply);
        if !within_cap {
            return Err(EvaluationError::MaxSupplyExceeded {
                asset: asset.id,
                requested: op.asset_to_issue.amount,
                max_supply: asset.max_supply,
            });
        }
        Ok(())
    }

    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &AssetIssueOperation,
    ) -> Result<OperationResult, EvaluationError> {
        let amount = op.asset_to_issue;
        adjust_balance(state.store, op.issue_to_account, amount)?;
        state
            .store
            .modify::<Asset>(amount.asset_id, |a| a.current_supply += amount.amount)?;
        Ok(OperationResult::Void)
    }
}
