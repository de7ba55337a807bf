//! Policy variants and the initializers carried by create operations.

use crate::cdd::CddVestingPolicy;
use crate::error::VestingError;
use crate::linear::LinearVestingPolicy;
use duo_types::{ShareType, Timestamp};
use serde::{Deserialize, Serialize};

/// The withdrawal policy attached to a vesting balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VestingPolicy {
    Cdd(CddVestingPolicy),
    Linear(LinearVestingPolicy),
}

impl VestingPolicy {
    /// Accrual update; a no-op for stateless policies.
    pub fn on_access(&mut self, balance: ShareType, now: Timestamp) -> Result<(), VestingError> {
        match self {
            Self::Cdd(p) => p.update_coin_seconds_earned(balance, now),
            Self::Linear(_) => Ok(()),
        }
    }

    pub fn allowed_withdraw(&self, balance: ShareType, now: Timestamp) -> Result<ShareType, VestingError> {
        match self {
            Self::Cdd(p) => p.allowed_withdraw(balance, now),
            Self::Linear(p) => p.allowed_withdraw(balance, now),
        }
    }

    pub fn on_withdraw(
        &mut self,
        balance: ShareType,
        now: Timestamp,
        amount: ShareType,
    ) -> Result<(), VestingError> {
        match self {
            Self::Cdd(p) => p.on_withdraw(balance, now, amount),
            Self::Linear(_) => Ok(()),
        }
    }

    pub fn on_deposit(&mut self, balance: ShareType, now: Timestamp) -> Result<(), VestingError> {
        match self {
            Self::Cdd(p) => p.on_deposit(balance, now),
            Self::Linear(_) => Err(VestingError::DepositNotAllowed),
        }
    }

    pub fn on_deposit_vested(
        &mut self,
        balance: ShareType,
        now: Timestamp,
        amount: ShareType,
    ) -> Result<(), VestingError> {
        match self {
            Self::Cdd(p) => p.on_deposit_vested(balance, now, amount),
            Self::Linear(_) => Err(VestingError::DepositNotAllowed),
        }
    }
}

/// The policy parameters a creator chooses when opening a vesting balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VestingPolicyInitializer {
    Cdd {
        vesting_seconds: u32,
        start_claim: Timestamp,
    },
    Linear {
        begin_timestamp: Timestamp,
        vesting_cliff_seconds: u32,
        vesting_duration_seconds: u32,
    },
}

impl VestingPolicyInitializer {
    /// A CDD initializer claimable immediately.
    pub fn cdd(vesting_seconds: u32) -> Self {
        Self::Cdd {
            vesting_seconds,
            start_claim: Timestamp::EPOCH,
        }
    }

    /// Stateless well-formedness check.
    pub fn validate(&self) -> Result<(), VestingError> {
        match self {
            Self::Cdd { vesting_seconds, .. } => {
                if *vesting_seconds == 0 {
                    return Err(VestingError::InvalidPolicy(
                        "vesting_seconds must be positive".into(),
                    ));
                }
            }
            Self::Linear {
                vesting_cliff_seconds,
                vesting_duration_seconds,
                ..
            } => {
                if *vesting_duration_seconds == 0 {
                    return Err(VestingError::InvalidPolicy(
                        "vesting_duration_seconds must be positive".into(),
                    ));
                }
                if vesting_cliff_seconds > vesting_duration_seconds {
                    return Err(VestingError::InvalidPolicy(format!(
                        "cliff {} exceeds duration {}",
                        vesting_cliff_seconds, vesting_duration_seconds
                    )));
                }
            }
        }
        Ok(())
    }

    /// Instantiate the policy for a balance opened with `amount` at `now`.
    pub fn into_policy(&self, amount: ShareType, now: Timestamp) -> VestingPolicy {
        match *self {
            Self::Cdd {
                vesting_seconds,
                start_claim,
            } => VestingPolicy::Cdd(CddVestingPolicy::new(vesting_seconds, start_claim, now)),
            Self::Linear {
                begin_timestamp,
                vesting_cliff_seconds,
                vesting_duration_seconds,
            } => VestingPolicy::Linear(LinearVestingPolicy {
                begin_timestamp,
                vesting_cliff_seconds,
                vesting_duration_seconds,
                begin_balance: amount,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initializer_validation() {
        assert!(VestingPolicyInitializer::cdd(1).validate().is_ok());
        assert!(VestingPolicyInitializer::cdd(0).validate().is_err());
        let linear = |cliff, duration| VestingPolicyInitializer::Linear {
            begin_timestamp: Timestamp::EPOCH,
            vesting_cliff_seconds: cliff,
            vesting_duration_seconds: duration,
        };
        assert!(linear(0, 10).validate().is_ok());
        assert!(linear(10, 10).validate().is_ok());
        assert!(linear(11, 10).validate().is_err());
        assert!(linear(0, 0).validate().is_err());
    }

    #[test]
    fn linear_policy_refuses_deposits() {
        let mut p = VestingPolicyInitializer::Linear {
            begin_timestamp: Timestamp::EPOCH,
            vesting_cliff_seconds: 0,
            vesting_duration_seconds: 10,
        }
        .into_policy(100, Timestamp::EPOCH);
        assert_eq!(
            p.on_deposit(100, Timestamp::new(1)),
            Err(VestingError::DepositNotAllowed)
        );
    }
}
