//! Evaluators for every user operation kind, plus the balance helpers they share.

mod account;
mod asset;
mod custom;
mod transfer;
mod vesting;

pub use account::AccountUpgradeEvaluator;
pub use asset::{AssetCreateEvaluator, AssetIssueEvaluator};
pub use custom::CustomEvaluator;
pub use transfer::{OverrideTransferEvaluator, TransferEvaluator};
pub use vesting::{VestingBalanceCreateEvaluator, VestingBalanceWithdrawEvaluator};

use crate::error::EvaluationError;
use duo_store::{Account, AccountStatistics, Asset, ObjectStore};
use duo_types::{AccountId, AssetAmount, AssetId};

pub(crate) fn require_account<S: ObjectStore>(store: &S, id: AccountId) -> Result<&Account, EvaluationError> {
    Ok(store.get::<Account>(id)?)
}

pub(crate) fn require_asset<S: ObjectStore>(store: &S, id: AssetId) -> Result<&Asset, EvaluationError> {
    Ok(store.get::<Asset>(id)?)
}

/// `account` must hold at least `amount`.
pub(crate) fn require_balance<S: ObjectStore>(
    store: &S,
    account: AccountId,
    amount: AssetAmount,
) -> Result<(), EvaluationError> {
    let available = store.account_statistics(account)?.balance(amount.asset_id);
    if available < amount.amount {
        return Err(EvaluationError::InsufficientFunds {
            account,
            asset: amount.asset_id,
            needed: amount.amount,
            available,
        });
    }
    Ok(())
}

/// Add `delta` to `account`'s balance. Leaves the store unchanged on failure.
pub(crate) fn adjust_balance<S: ObjectStore>(
    store: &mut S,
    account: AccountId,
    delta: AssetAmount,
) -> Result<(), EvaluationError> {
    let stats = store.get::<Account>(account)?.statistics;
    store.try_modify::<AccountStatistics, (), EvaluationError>(stats, |s| {
        s.adjust_balance(delta).map_err(Into::into)
    })
}

/// Move `amount` from one account to another, both or neither.
pub(crate) fn move_balance<S: ObjectStore>(
    store: &mut S,
    from: AccountId,
    to: AccountId,
    amount: AssetAmount,
) -> Result<(), EvaluationError> {
    let credit_stats = store.get::<Account>(to)?.statistics;
    adjust_balance(store, from, AssetAmount::new(-amount.amount, amount.asset_id))?;
    let credited = store.try_modify::<AccountStatistics, (), EvaluationError>(credit_stats, |s| {
        s.adjust_balance(amount).map_err(Into::into)
    });
    if let Err(e) = credited {
        // Restore the debit.
        adjust_balance(store, from, amount)?;
        return Err(e);
    }
    Ok(())
}
