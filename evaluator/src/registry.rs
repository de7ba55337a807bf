//! Static dispatch table from operation kind to evaluator.

use crate::error::EvaluationError;
use crate::evaluators::{
    AccountUpgradeEvaluator, AssetCreateEvaluator, AssetIssueEvaluator, CustomEvaluator,
    OverrideTransferEvaluator, TransferEvaluator, VestingBalanceCreateEvaluator,
    VestingBalanceWithdrawEvaluator,
};
use crate::lifecycle::run_evaluator;
use crate::{Evaluator, OperationOutcome, TransactionEvaluationState};
use duo_operations::{Operation, OperationBody, OperationKind};
use duo_store::ObjectStore;
use std::collections::BTreeMap;
use std::fmt;

type EvaluateFn<S> =
    fn(&mut TransactionEvaluationState<'_, S>, &Operation, bool) -> Result<OperationOutcome, EvaluationError>;

/// Maps each user operation kind to its evaluator.
///
/// Virtual kinds are never registered.
pub struct EvaluatorRegistry<S> {
    evaluators: BTreeMap<OperationKind, EvaluateFn<S>>,
}

impl<S: ObjectStore> EvaluatorRegistry<S> {
    pub fn new() -> Self {
        Self {
            evaluators: BTreeMap::new(),
        }
    }

    /// A registry with every built-in evaluator.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<TransferEvaluator>();
        registry.register::<OverrideTransferEvaluator>();
        registry.register::<AssetCreateEvaluator>();
        registry.register::<AssetIssueEvaluator>();
        registry.register::<AccountUpgradeEvaluator>();
        registry.register::<VestingBalanceCreateEvaluator>();
        registry.register::<VestingBalanceWithdrawEvaluator>();
        registry.register::<CustomEvaluator>();
        registry
    }

    /// Install `E` for its operation kind, replacing any earlier entry.
    /// Virtual kinds are ignored.
    pub fn register<E: Evaluator<S>>(&mut self) {
        let kind = <E::Operation as OperationBody>::KIND;
        if kind.is_virtual() {
            return;
        }
        self.evaluators.insert(kind, run_evaluator::<S, E>);
    }

    pub fn is_registered(&self, kind: OperationKind) -> bool {
        self.evaluators.contains_key(&kind)
    }

    /// Run `op` through the evaluator registered for its kind.
    pub fn evaluate(
        &self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &Operation,
        apply: bool,
    ) -> Result<OperationOutcome, EvaluationError> {
        let kind = op.kind();
        if kind.is_virtual() {
            return Err(EvaluationError::VirtualOperationMisuse { kind });
        }
        let evaluate = self
            .evaluators
            .get(&kind)
            .ok_or(EvaluationError::UnsupportedOperation(kind))?;
        evaluate(state, op, apply)
    }
}

impl<S: ObjectStore> Default for EvaluatorRegistry<S> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<S> fmt::Debug for EvaluatorRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatorRegistry")
            .field("kinds", &self.evaluators.keys().collect::<Vec<_>>())
            .finish()
    }
}
