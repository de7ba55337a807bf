//! Coin-seconds (coin-days-destroyed) vesting.

use crate::error::VestingError;
use duo_types::{ShareType, Timestamp};
use serde::{Deserialize, Serialize};

/// Balance-and-time weighted accrual gating withdrawals.
///
/// `coin_seconds_earned` stays within `[0, balance × vesting_seconds]` and
/// `coin_seconds_earned_last_update` never moves backwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CddVestingPolicy {
    /// Seconds for a unit of principal to become fully withdrawable.
    pub vesting_seconds: u32,
    /// Withdrawals are refused until strictly after this time.
    pub start_claim: Timestamp,
    pub coin_seconds_earned: u128,
    pub coin_seconds_earned_last_update: Timestamp,
}

impl CddVestingPolicy {
    /// A fresh policy with nothing earned, starting its clock at `now`.
    pub fn new(vesting_seconds: u32, start_claim: Timestamp, now: Timestamp) -> Self {
        Self {
            vesting_seconds,
            start_claim,
            coin_seconds_earned: 0,
            coin_seconds_earned_last_update: now,
        }
    }

    /// Divisor used in every computation; a zero period behaves as one second.
    fn effective_seconds(&self) -> u128 {
        u128::from(self.vesting_seconds.max(1))
    }

    /// Coin-seconds earned as of `now`, without mutating.
    ///
    /// `min(earned + balance × elapsed, balance × vesting_seconds)`
    pub fn compute_coin_seconds_earned(
        &self,
        balance: ShareType,
        now: Timestamp,
    ) -> Result<u128, VestingError> {
        let principal = principal(balance)?;
        if now <= self.coin_seconds_earned_last_update {
            return Ok(self.coin_seconds_earned);
        }
        let elapsed = u128::from(self.coin_seconds_earned_last_update.elapsed_since(now));
        let delta = principal.checked_mul(elapsed).ok_or(VestingError::Overflow)?;
        let cap = principal
            .checked_mul(self.effective_seconds())
            .ok_or(VestingError::Overflow)?;
        Ok(self.coin_seconds_earned.saturating_add(delta).min(cap))
    }

    /// Bring the accrual up to `now`. Always performed before any read or
    /// mutation of the balance.
    pub fn update_coin_seconds_earned(
        &mut self,
        balance: ShareType,
        now: Timestamp,
    ) -> Result<(), VestingError> {
        self.coin_seconds_earned = self.compute_coin_seconds_earned(balance, now)?;
        if now > self.coin_seconds_earned_last_update {
            self.coin_seconds_earned_last_update = now;
        }
        Ok(())
    }

    /// `floor(earned / vesting_seconds)`, never more than the principal and
    /// zero until the claim start has passed.
    pub fn allowed_withdraw(&self, balance: ShareType, now: Timestamp) -> Result<ShareType, VestingError> {
        if now <= self.start_claim {
            return Ok(0);
        }
        let earned = self.compute_coin_seconds_earned(balance, now)?;
        let available = earned / self.effective_seconds();
        let capped = available.min(principal(balance)?);
        ShareType::try_from(capped).map_err(|_| VestingError::Overflow)
    }

    /// Consume `amount × vesting_seconds` coin-seconds for a withdrawal.
    ///
    /// The caller has already checked `amount` against [`Self::allowed_withdraw`]
    /// and passes the balance as it was before the withdrawal.
    pub fn on_withdraw(
        &mut self,
        balance: ShareType,
        now: Timestamp,
        amount: ShareType,
    ) -> Result<(), VestingError> {
        self.update_coin_seconds_earned(balance, now)?;
        let needed = principal(amount)?
            .checked_mul(self.effective_seconds())
            .ok_or(VestingError::Overflow)?;
        match self.coin_seconds_earned.checked_sub(needed) {
            Some(rest) => {
                self.coin_seconds_earned = rest;
                Ok(())
            }
            None => Err(VestingError::InsufficientVested {
                requested: amount,
                allowed: self.allowed_withdraw(balance, now)?,
            }),
        }
    }

    /// A plain deposit: accrue on the old balance, then the principal grows
    /// with no earned coin-seconds attached.
    pub fn on_deposit(&mut self, balance: ShareType, now: Timestamp) -> Result<(), VestingError> {
        self.update_coin_seconds_earned(balance, now)
    }

    /// A vested deposit: the deposited amount is immediately withdrawable.
    pub fn on_deposit_vested(
        &mut self,
        balance: ShareType,
        now: Timestamp,
        amount: ShareType,
    ) -> Result<(), VestingError> {
        self.update_coin_seconds_earned(balance, now)?;
        let earned = principal(amount)?
            .checked_mul(self.effective_seconds())
            .ok_or(VestingError::Overflow)?;
        self.coin_seconds_earned = self
            .coin_seconds_earned
            .checked_add(earned)
            .ok_or(VestingError::Overflow)?;
        Ok(())
    }
}

fn principal(balance: ShareType) -> Result<u128, VestingError> {
    u128::try_from(balance).map_err(|_| VestingError::NegativeBalance)
}
