//! Errors raised by ledger primitive arithmetic.

use crate::ids::AssetId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("asset mismatch: {left} vs {right}")]
    AssetMismatch { left: AssetId, right: AssetId },

    #[error("arithmetic overflow in share amount")]
    Overflow,
}
