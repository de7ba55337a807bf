//! All-or-nothing application of whole transactions.

use crate::error::{EvaluationError, TransactionError};
use crate::registry::EvaluatorRegistry;
use crate::{OperationOutcome, TransactionEvaluationState};
use duo_fees::FeeSchedule;
use duo_operations::Transaction;
use duo_store::{Session, UndoableStore};
use duo_types::{ChainParameters, Timestamp};
use tracing::{debug, warn};

/// Applies transactions against an undoable store.
pub struct TransactionProcessor<'a, S> {
    pub registry: &'a EvaluatorRegistry<S>,
    pub fee_schedule: &'a FeeSchedule,
    pub parameters: &'a ChainParameters,
}

impl<'a, S: UndoableStore> TransactionProcessor<'a, S> {
    pub fn new(
        registry: &'a EvaluatorRegistry<S>,
        fee_schedule: &'a FeeSchedule,
        parameters: &'a ChainParameters,
    ) -> Self {
        Self {
            registry,
            fee_schedule,
            parameters,
        }
    }

    /// Apply every operation of `tx` in order at time `now`.
    ///
    /// On the first failure every change made by the transaction is rolled
    /// back and the failing operation's index is reported.
    pub fn apply(
        &self,
        store: &mut S,
        tx: &Transaction,
        now: Timestamp,
    ) -> Result<Vec<OperationOutcome>, TransactionError> {
        let mut session = Session::begin(store);
        let outcomes = self.run(&mut session, tx, now, false)?;
        session.commit().map_err(|e| TransactionError {
            op_index: None,
            source: e.into(),
        })?;
        debug!(operations = outcomes.len(), "transaction applied");
        Ok(outcomes)
    }

    /// Run `tx` with fees skipped and discard every change.
    ///
    /// Operations still see the effects of earlier operations in the same
    /// transaction. The outcomes carry the fee each operation would require.
    pub fn simulate(
        &self,
        store: &mut S,
        tx: &Transaction,
        now: Timestamp,
    ) -> Result<Vec<OperationOutcome>, TransactionError> {
        let mut session = Session::begin(store);
        let outcomes = self.run(&mut session, tx, now, true);
        session.rollback().map_err(|e| TransactionError {
            op_index: None,
            source: e.into(),
        })?;
        outcomes
    }

    fn run(
        &self,
        store: &mut S,
        tx: &Transaction,
        now: Timestamp,
        skip_fee: bool,
    ) -> Result<Vec<OperationOutcome>, TransactionError> {
        // Virtual operations are reported as misuse rather than as a
        // validation failure.
        if let Some((index, op)) = tx.operations.iter().enumerate().find(|(_, op)| op.is_virtual()) {
            return Err(reject(
                Some(index),
                EvaluationError::VirtualOperationMisuse { kind: op.kind() },
            ));
        }
        tx.validate(self.parameters)
            .map_err(|(index, e)| reject(index, e.into()))?;

        let mut state = TransactionEvaluationState {
            store,
            fee_schedule: self.fee_schedule,
            skip_fee,
            now,
        };
        tx.operations
            .iter()
            .enumerate()
            .map(|(index, op)| {
                self.registry
                    .evaluate(&mut state, op, true)
                    .map_err(|e| reject(Some(index), e))
            })
            .collect()
    }
}

fn reject(op_index: Option<usize>, source: EvaluationError) -> TransactionError {
    if source.is_fatal() {
        warn!(?op_index, error = %source, "transaction hit a fatal error");
    } else {
        debug!(?op_index, error = %source, "transaction rejected");
    }
    TransactionError { op_index, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::test_support::{balance, store_with};
    use crate::{Evaluator, OperationResult};
    use duo_operations::{
        CustomOperation, FeePayOperation, FillOrderOperation, Operation, OperationKind,
        TransferOperation, ValidationError,
    };
    use duo_store::{MemoryStore, ObjectStore};
    use duo_types::{AccountId, AssetAmount, AssetId, DualFee, ObjectId, BLOCKCHAIN_PRECISION as P};

    fn transfer(schedule: &FeeSchedule, from: AccountId, to: AccountId, amount: i64) -> Operation {
        let mut op: Operation = TransferOperation::new(from, to, AssetAmount::core(amount)).into();
        schedule.set_fee(&mut op);
        op
    }

    /// Passes evaluation, then writes to the reserve and fails in `apply`.
    #[derive(Default)]
    struct FailingApplyEvaluator;

    impl<S: ObjectStore> Evaluator<S> for FailingApplyEvaluator {
        type Operation = CustomOperation;

        fn evaluate(
            &mut self,
            _state: &TransactionEvaluationState<'_, S>,
            _op: &CustomOperation,
        ) -> Result<(), EvaluationError> {
            Ok(())
        }

        fn apply(
            &mut self,
            state: &mut TransactionEvaluationState<'_, S>,
            _op: &CustomOperation,
        ) -> Result<OperationResult, EvaluationError> {
            state.store.modify_reserve_fund(|r| r.reserved = 77);
            Err(EvaluationError::ObjectNotFound(ObjectId::Account(AccountId::new(99))))
        }
    }

    fn custom(schedule: &FeeSchedule, payer: AccountId) -> Operation {
        let mut op: Operation = CustomOperation {
            fee: AssetAmount::core(0),
            ufee: AssetAmount::sdr(0),
            payer,
            required_auths: vec![],
            id: 1,
            data: vec![1, 2, 3],
        }
        .into();
        schedule.set_fee(&mut op);
        op
    }

    struct Fixture {
        registry: EvaluatorRegistry<MemoryStore>,
        schedule: FeeSchedule,
        params: ChainParameters,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: EvaluatorRegistry::with_defaults(),
                schedule: FeeSchedule::default(),
                params: ChainParameters::default(),
            }
        }

        fn processor(&self) -> TransactionProcessor<'_, MemoryStore> {
            TransactionProcessor::new(&self.registry, &self.schedule, &self.params)
        }
    }

    #[test]
    fn failing_operation_rolls_back_earlier_ones() {
        let f = Fixture::new();
        let (mut store, ids) = store_with(&[("alice", 1_000 * P, 0), ("bob", 0, 0)]);
        let tx = Transaction::new(vec![
            transfer(&f.schedule, ids[0], ids[1], 100 * P),
            transfer(&f.schedule, ids[1], ids[0], 500 * P),
        ]);

        let err = f.processor().apply(&mut store, &tx, Timestamp::new(5)).unwrap_err();

        assert_eq!(err.op_index, Some(1));
        assert!(matches!(err.source, EvaluationError::InsufficientFunds { .. }));
        assert!(!err.is_fatal());
        assert_eq!(balance(&store, ids[0], AssetId::CORE), 1_000 * P);
        assert_eq!(balance(&store, ids[1], AssetId::CORE), 0);
        assert_eq!(store.account_statistics(ids[0]).unwrap().pending_fees, 0);
        assert_eq!(store.session_depth(), 0);
    }

    #[test]
    fn later_operations_see_earlier_effects() {
        let f = Fixture::new();
        let (mut store, ids) = store_with(&[("alice", 1_000 * P, 0), ("bob", 0, 0)]);
        let tx = Transaction::new(vec![
            transfer(&f.schedule, ids[0], ids[1], 100 * P),
            transfer(&f.schedule, ids[1], ids[0], 50 * P),
        ]);

        let outcomes = f.processor().apply(&mut store, &tx, Timestamp::new(5)).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.fee_paid == DualFee::new(20 * P, 0)));
        assert_eq!(balance(&store, ids[0], AssetId::CORE), 930 * P);
        assert_eq!(balance(&store, ids[1], AssetId::CORE), 30 * P);
    }

    #[test]
    fn virtual_operation_is_misuse() {
        let f = Fixture::new();
        let (mut store, ids) = store_with(&[("alice", 1_000 * P, 0), ("bob", 0, 0)]);
        let fill = FillOrderOperation {
            fee: AssetAmount::core(0),
            ufee: AssetAmount::sdr(0),
            order_id: 1,
            account_id: ids[0],
            pays: AssetAmount::core(1),
            receives: AssetAmount::sdr(1),
        };
        let fee_pay = FeePayOperation {
            fee: AssetAmount::core(0),
            ufee: AssetAmount::sdr(0),
            paid_fee: AssetAmount::core(P),
            paid_ufee: AssetAmount::sdr(0),
            fee_from_account: ids[0],
            fee_to_account: ids[1],
        };

        for virtual_op in [Operation::from(fill), Operation::from(fee_pay)] {
            let kind = virtual_op.kind();
            let tx = Transaction::new(vec![transfer(&f.schedule, ids[0], ids[1], P), virtual_op]);

            let err = f.processor().apply(&mut store, &tx, Timestamp::new(5)).unwrap_err();

            assert_eq!(err.op_index, Some(1));
            assert_eq!(err.source, EvaluationError::VirtualOperationMisuse { kind });
            assert_eq!(balance(&store, ids[1], AssetId::CORE), 0);
        }
    }

    #[test]
    fn apply_failure_after_evaluation_is_fatal_and_rolled_back() {
        let mut f = Fixture::new();
        f.registry.register::<FailingApplyEvaluator>();
        let (mut store, ids) = store_with(&[("alice", 1_000 * P, 0), ("bob", 0, 0)]);
        let tx = Transaction::new(vec![
            transfer(&f.schedule, ids[0], ids[1], 100 * P),
            custom(&f.schedule, ids[0]),
        ]);

        let err = f.processor().apply(&mut store, &tx, Timestamp::new(5)).unwrap_err();

        assert_eq!(err.op_index, Some(1));
        assert!(err.is_fatal());
        assert!(matches!(
            err.source,
            EvaluationError::InternalInvariantViolation { kind: OperationKind::Custom, .. }
        ));
        assert_eq!(store.reserve_fund().reserved, 0);
        assert_eq!(balance(&store, ids[0], AssetId::CORE), 1_000 * P);
        assert_eq!(balance(&store, ids[1], AssetId::CORE), 0);
        assert_eq!(store.session_depth(), 0);
    }

    #[test]
    fn empty_transaction_is_rejected_as_a_whole() {
        let f = Fixture::new();
        let (mut store, _) = store_with(&[]);
        let err = f
            .processor()
            .apply(&mut store, &Transaction::default(), Timestamp::new(5))
            .unwrap_err();
        assert_eq!(err.op_index, None);
        assert_eq!(
            err.source,
            EvaluationError::Validation(ValidationError::EmptyTransaction)
        );
    }

    #[test]
    fn simulation_reports_fees_and_changes_nothing() {
        let f = Fixture::new();
        let (mut store, ids) = store_with(&[("alice", 1_000 * P, 0), ("bob", 0, 0)]);
        // Fees left at zero: simulation does not check them.
        let tx = Transaction::new(vec![
            TransferOperation::new(ids[0], ids[1], AssetAmount::core(100 * P)).into(),
        ]);

        let outcomes = f.processor().simulate(&mut store, &tx, Timestamp::new(5)).unwrap();

        assert_eq!(outcomes[0].required_fee, DualFee::new(20 * P, 0));
        assert_eq!(outcomes[0].fee_paid, DualFee::ZERO);
        assert_eq!(balance(&store, ids[0], AssetId::CORE), 1_000 * P);
        assert_eq!(store.session_depth(), 0);
    }
}
