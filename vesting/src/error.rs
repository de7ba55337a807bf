//! Vesting-specific errors.

use duo_types::{AssetId, ShareType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VestingError {
    #[error("requested {requested} but only {allowed} is withdrawable")]
    InsufficientVested {
        requested: ShareType,
        allowed: ShareType,
    },

    #[error("vesting balance holds {expected}, not {got}")]
    AssetMismatch { expected: AssetId, got: AssetId },

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("this policy does not accept deposits")]
    DepositNotAllowed,

    #[error("invalid vesting policy: {0}")]
    InvalidPolicy(String),

    #[error("vesting balance is negative")]
    NegativeBalance,

    #[error("arithmetic overflow in vesting computation")]
    Overflow,
}
