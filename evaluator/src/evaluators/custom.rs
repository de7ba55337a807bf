use super::require_account;
use crate::error::EvaluationError;
use crate::{Evaluator, OperationResult, TransactionEvaluationState};
use duo_operations::CustomOperation;
use duo_store::ObjectStore;

/// Custom data changes no ledger state beyond the fee.
#[derive(Debug, Default)]
pub struct CustomEvaluator;

impl<S: ObjectStore> Evaluator<S> for CustomEvaluator {
    type Operation = CustomOperation;

    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &CustomOperation,
    ) -> Result<(), EvaluationError> {
        require_account(&*state.store, op.payer)?;
        for account in &op.required_auths {
            require_account(&*state.store, *account)?;
        }
        Ok(())
    }

    fn apply(
        &mut self,
        _state: &mut TransactionEvaluationState<'_, S>,
        _op: &CustomOperation,
    ) -> Result<OperationResult, EvaluationError> {
        Ok(OperationResult::Void)
    }
}
