//! Vesting balances.
//!
//! A vesting balance escrows an amount of one asset for an owner and gates
//! withdrawals through a policy:
//! - **CDD** (coin-seconds): every unit of principal earns one coin-second per
//!   second, capped at `balance × vesting_seconds`. Withdrawing `n` units
//!   consumes `n × vesting_seconds` earned coin-seconds.
//! - **Linear**: nothing before a cliff, then a straight-line release of the
//!   initial principal over a fixed duration.
//!
//! Every access first brings the accrual up to the access time, so deferred
//! updates never over-accrue.

pub mod balance;
pub mod cdd;
pub mod error;
pub mod linear;
pub mod policy;

pub use balance::VestingBalance;
pub use cdd::CddVestingPolicy;
pub use error::VestingError;
pub use linear::LinearVestingPolicy;
pub use policy::{VestingPolicy, VestingPolicyInitializer};
