//! The vesting balance escrow object.

use crate::error::VestingError;
use crate::policy::{VestingPolicy, VestingPolicyInitializer};
use duo_types::{AccountId, AssetAmount, Timestamp, VestingBalanceId};
use serde::{Deserialize, Serialize};

/// An escrowed amount of one asset, withdrawable by `owner` as `policy` allows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingBalance {
    pub id: VestingBalanceId,
    pub owner: AccountId,
    pub balance: AssetAmount,
    pub policy: VestingPolicy,
}

impl VestingBalance {
    pub fn new(
        id: VestingBalanceId,
        owner: AccountId,
        amount: AssetAmount,
        initializer: &VestingPolicyInitializer,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            balance: amount,
            policy: initializer.into_policy(amount.amount, now),
        }
    }

    /// Bring policy accrual up to `now`.
    pub fn on_access(&mut self, now: Timestamp) -> Result<(), VestingError> {
        self.policy.on_access(self.balance.amount, now)
    }

    /// How much could be withdrawn at `now`.
    pub fn withdrawable(&self, now: Timestamp) -> Result<AssetAmount, VestingError> {
        let allowed = self.policy.allowed_withdraw(self.balance.amount, now)?;
        Ok(AssetAmount::new(allowed, self.balance.asset_id))
    }

    /// Check a withdrawal without performing it.
    pub fn is_withdraw_allowed(&self, now: Timestamp, amount: AssetAmount) -> Result<(), VestingError> {
        self.check_amount(amount)?;
        let allowed = self.withdrawable(now)?;
        if amount.amount > allowed.amount {
            return Err(VestingError::InsufficientVested {
                requested: amount.amount,
                allowed: allowed.amount,
            });
        }
        Ok(())
    }

    /// Withdraw `amount`, consuming the policy's earned allowance.
    ///
    /// Either the whole withdrawal happens or nothing changes.
    pub fn withdraw(&mut self, now: Timestamp, amount: AssetAmount) -> Result<(), VestingError> {
        self.is_withdraw_allowed(now, amount)?;
        let remaining = self
            .balance
            .checked_sub(amount)
            .map_err(|_| VestingError::Overflow)?;
        self.policy.on_withdraw(self.balance.amount, now, amount.amount)?;
        self.balance = remaining;
        Ok(())
    }

    /// Add principal that must vest from scratch.
    pub fn deposit(&mut self, now: Timestamp, amount: AssetAmount) -> Result<(), VestingError> {
        self.check_amount(amount)?;
        let total = self
            .balance
            .checked_add(amount)
            .map_err(|_| VestingError::Overflow)?;
        self.policy.on_deposit(self.balance.amount, now)?;
        self.balance = total;
        Ok(())
    }

    /// Add principal that is immediately withdrawable.
    pub fn deposit_vested(&mut self, now: Timestamp, amount: AssetAmount) -> Result<(), VestingError> {
        self.check_amount(amount)?;
        let total = self
            .balance
            .checked_add(amount)
            .map_err(|_| VestingError::Overflow)?;
        self.policy
            .on_deposit_vested(self.balance.amount, now, amount.amount)?;
        self.balance = total;
        Ok(())
    }

    fn check_amount(&self, amount: AssetAmount) -> Result<(), VestingError> {
        if amount.asset_id != self.balance.asset_id {
            return Err(VestingError::AssetMismatch {
                expected: self.balance.asset_id,
                got: amount.asset_id,
            });
        }
        if amount.amount <= 0 {
            return Err(VestingError::NonPositiveAmount);
        }
        Ok(())
    }
}
