//! The fixed validate / evaluate / prepare_fee / apply / pay_fee sequence.

use crate::error::EvaluationError;
use crate::{Evaluator, OperationOutcome, OperationResult, TransactionEvaluationState};
use duo_fees::FeeSchedule;
use duo_operations::fee::check_fee_fields;
use duo_operations::{Operation, OperationBody};
use duo_store::{Account, AccountStatistics, ObjectStore};
use duo_types::{AccountId, AccountStatisticsId, AssetAmount, AssetId, DualFee, ShareType};
use tracing::{debug, error};

/// The fee payer resolved by `prepare_fee`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeContext {
    pub payer: AccountId,
    pub stats: AccountStatisticsId,
    /// The declared fee, which is what gets charged.
    pub fee: DualFee,
}

/// Fee the active schedule asks for `op`. No side effects.
pub fn calculate_fee_for_operation(schedule: &FeeSchedule, op: &Operation) -> DualFee {
    schedule.calculate_fee(op)
}

/// Run `op` through evaluator `E`.
///
/// With `apply == false` only the non-mutating steps run and nothing is
/// charged.
pub fn run_evaluator<S, E>(
    state: &mut TransactionEvaluationState<'_, S>,
    op: &Operation,
    apply: bool,
) -> Result<OperationOutcome, EvaluationError>
where
    S: ObjectStore,
    E: Evaluator<S>,
{
    let kind = op.kind();
    let body = <E::Operation as OperationBody>::from_operation(op)
        .ok_or(EvaluationError::UnsupportedOperation(kind))?;
    body.validate()?;

    let mut evaluator = E::default();
    evaluator.evaluate(state, body)?;

    let required_fee = calculate_fee_for_operation(state.fee_schedule, op);
    let fee = prepare_fee(
        state,
        body.fee_payer(),
        &body.fee(),
        &body.ufee(),
        required_fee,
        evaluator.payer_debit(body),
    )?;

    if !apply {
        return Ok(OperationOutcome {
            result: OperationResult::Void,
            required_fee,
            fee_paid: DualFee::ZERO,
        });
    }

    let result = evaluator.apply(state, body).map_err(|e| {
        let e = e.into_invariant_violation(kind);
        error!(%kind, error = %e, "apply failed after evaluation passed");
        e
    })?;

    let fee_paid = if state.skip_fee {
        DualFee::ZERO
    } else {
        pay_fee(state.store, &fee).map_err(|e| {
            let e = e.into_invariant_violation(kind);
            error!(%kind, error = %e, "fee payment failed after evaluation passed");
            e
        })?;
        fee.fee
    };

    debug!(%kind, payer = %fee.payer, fee = %fee_paid, ?result, "operation applied");
    Ok(OperationOutcome {
        result,
        required_fee,
        fee_paid,
    })
}

/// Bind and check the fee payer.
///
/// Fee assets and signs are always checked and the payer must exist. Unless
/// fees are skipped, the declared fee must cover `required` and the payer
/// must hold the fee plus `debit` in each asset.
pub fn prepare_fee<S: ObjectStore>(
    state: &TransactionEvaluationState<'_, S>,
    payer: AccountId,
    fee: &AssetAmount,
    ufee: &AssetAmount,
    required: DualFee,
    debit: Option<AssetAmount>,
) -> Result<FeeContext, EvaluationError> {
    check_fee_fields(fee, ufee)?;
    let account = state.store.get::<Account>(payer)?;
    let stats = state.store.get::<AccountStatistics>(account.statistics)?;
    let declared = DualFee::new(fee.amount, ufee.amount);

    if !state.skip_fee {
        if !declared.covers(&required) {
            return Err(EvaluationError::InsufficientFee {
                paid: declared,
                required,
            });
        }
        require_funds(stats, AssetId::CORE, declared.fee, debit)?;
        require_funds(stats, AssetId::SDR, declared.ufee, debit)?;
        if let Some(debit) = debit.filter(|d| d.asset_id != AssetId::CORE && d.asset_id != AssetId::SDR) {
            require_funds(stats, debit.asset_id, 0, Some(debit))?;
        }
    }

    Ok(FeeContext {
        payer,
        stats: stats.id,
        fee: declared,
    })
}

/// Debit the fee from the payer and book it as pending, in one modification.
pub fn pay_fee<S: ObjectStore>(store: &mut S, fee: &FeeContext) -> Result<(), EvaluationError> {
    store.try_modify::<AccountStatistics, (), EvaluationError>(fee.stats, |stats| {
        stats.pay_fee(fee.fee).map_err(Into::into)
    })
}

fn require_funds(
    stats: &AccountStatistics,
    asset: AssetId,
    fee: ShareType,
    debit: Option<AssetAmount>,
) -> Result<(), EvaluationError> {
    let extra = debit.filter(|d| d.asset_id == asset).map_or(0, |d| d.amount);
    let needed = fee.saturating_add(extra);
    let available = stats.balance(asset);
    if needed > available {
        return Err(EvaluationError::InsufficientFunds {
            account: stats.owner,
            asset,
            needed,
            available,
        });
    }
    Ok(())
}
