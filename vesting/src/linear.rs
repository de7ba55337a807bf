//! Linear vesting with a cliff.

use crate::error::VestingError;
use duo_types::{ShareType, Timestamp};
use serde::{Deserialize, Serialize};

/// Releases `begin_balance` in a straight line over `vesting_duration_seconds`
/// starting at `begin_timestamp`, with nothing released before the cliff.
///
/// The policy keeps no accrual state: what has already been withdrawn is
/// `begin_balance - balance`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearVestingPolicy {
    pub begin_timestamp: Timestamp,
    pub vesting_cliff_seconds: u32,
    pub vesting_duration_seconds: u32,
    pub begin_balance: ShareType,
}

impl LinearVestingPolicy {
    pub fn allowed_withdraw(&self, balance: ShareType, now: Timestamp) -> Result<ShareType, VestingError> {
        if now <= self.begin_timestamp {
            return Ok(0);
        }
        let elapsed = self.begin_timestamp.elapsed_since(now);
        if elapsed < u64::from(self.vesting_cliff_seconds) {
            return Ok(0);
        }

        let begin = i128::from(self.begin_balance);
        let total_vested = if elapsed < u64::from(self.vesting_duration_seconds) {
            begin * i128::from(elapsed) / i128::from(self.vesting_duration_seconds)
        } else {
            begin
        };
        let withdrawn_already = begin - i128::from(balance);
        let allowed = (total_vested - withdrawn_already).clamp(0, i128::from(balance.max(0)));
        ShareType::try_from(allowed).map_err(|_| VestingError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LinearVestingPolicy {
        LinearVestingPolicy {
            begin_timestamp: Timestamp::new(100),
            vesting_cliff_seconds: 10,
            vesting_duration_seconds: 100,
            begin_balance: 1_000,
        }
    }

    #[test]
    fn nothing_before_cliff() {
        let p = policy();
        assert_eq!(p.allowed_withdraw(1_000, Timestamp::new(50)).unwrap(), 0);
        assert_eq!(p.allowed_withdraw(1_000, Timestamp::new(109)).unwrap(), 0);
        assert_eq!(p.allowed_withdraw(1_000, Timestamp::new(110)).unwrap(), 100);
    }

    #[test]
    fn linear_release_minus_withdrawn() {
        let p = policy();
        assert_eq!(p.allowed_withdraw(1_000, Timestamp::new(150)).unwrap(), 500);
        // 300 already taken out.
        assert_eq!(p.allowed_withdraw(700, Timestamp::new(150)).unwrap(), 200);
        assert_eq!(p.allowed_withdraw(700, Timestamp::new(10_000)).unwrap(), 700);
    }
}
