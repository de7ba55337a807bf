//! The per-operation state-transition engine.
//!
//! Every operation runs the same lifecycle:
//!
//! 1. `validate`: stateless well-formedness (in `duo-operations`)
//! 2. `evaluate`: semantic checks against the store, read-only
//! 3. `prepare_fee`: resolve the payer, check fee assets, coverage and funds
//! 4. `apply`: mutate the ledger (only when application was requested)
//! 5. `pay_fee`: debit the dual fee and book it as pending, unless `skip_fee`
//!
//! Steps 1 to 3 never mutate. A failure in step 4 or 5 means evaluation
//! missed a precondition and is reported as
//! [`EvaluationError::InternalInvariantViolation`].

pub mod error;
pub mod evaluators;
pub mod lifecycle;
pub mod registry;
pub mod transaction;

pub use error::{EvaluationError, TransactionError};
pub use lifecycle::{calculate_fee_for_operation, run_evaluator, FeeContext};
pub use registry::EvaluatorRegistry;
pub use transaction::TransactionProcessor;

use duo_fees::FeeSchedule;
use duo_operations::OperationBody;
use duo_types::{AssetAmount, DualFee, ObjectId, Timestamp};

/// Everything an evaluator may see while processing one operation.
pub struct TransactionEvaluationState<'a, S> {
    pub store: &'a mut S,
    pub fee_schedule: &'a FeeSchedule,
    /// Fee checks and fee payment are skipped (simulation and estimation).
    pub skip_fee: bool,
    /// Head block time the operation executes at.
    pub now: Timestamp,
}

impl<'a, S> TransactionEvaluationState<'a, S> {
    pub fn new(store: &'a mut S, fee_schedule: &'a FeeSchedule, now: Timestamp) -> Self {
        Self {
            store,
            fee_schedule,
            skip_fee: false,
            now,
        }
    }

    pub fn skipping_fees(mut self) -> Self {
        self.skip_fee = true;
        self
    }
}

/// The state-dependent half of an operation kind.
///
/// A fresh evaluator is built for every operation, so values resolved in
/// `evaluate` can be kept on `self` for `apply`.
pub trait Evaluator<S>: Default {
    type Operation: OperationBody;

    /// Check `op` against the ledger. Must not mutate.
    fn evaluate(
        &mut self,
        state: &TransactionEvaluationState<'_, S>,
        op: &Self::Operation,
    ) -> Result<(), EvaluationError>;

    /// Perform the mutation. Only called after `evaluate` succeeded.
    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, S>,
        op: &Self::Operation,
    ) -> Result<OperationResult, EvaluationError>;

    /// Amount `apply` takes from the fee payer's own balance, counted
    /// together with the fee when checking funds.
    fn payer_debit(&self, _op: &Self::Operation) -> Option<AssetAmount> {
        None
    }
}

/// What applying an operation produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OperationResult {
    #[default]
    Void,
    NewObject(ObjectId),
}

/// Result of running one operation through the lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperationOutcome {
    pub result: OperationResult,
    /// Fee the schedule asks for.
    pub required_fee: DualFee,
    /// Fee actually debited: the declared fee, or zero when fees are skipped
    /// or the operation was not applied.
    pub fee_paid: DualFee,
}
