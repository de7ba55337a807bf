use crate::OperationKind;
use duo_types::AssetId;
use thiserror::Error;

/// A stateless check failed. No ledger state is consulted or modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("fee must be non-negative")]
    NegativeFee,

    #[error("fee must be positive")]
    NonPositiveFee,

    #[error("{field} must be paid in {expected}, not {got}")]
    WrongFeeAsset {
        field: &'static str,
        expected: AssetId,
        got: AssetId,
    },

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("sender and receiver must differ")]
    SelfTransfer,

    #[error("issuer cannot override a transfer from itself")]
    IssuerIsSender,

    #[error("invalid asset symbol {0:?}")]
    InvalidSymbol(String),

    #[error("precision {0} exceeds 12")]
    PrecisionTooHigh(u8),

    #[error("max supply must be in (0, MAX_SHARE_SUPPLY]")]
    InvalidMaxSupply,

    #[error("asset {0} cannot be issued")]
    ReservedAsset(AssetId),

    #[error("invalid vesting policy: {0}")]
    InvalidVestingPolicy(String),

    #[error("{kind} is a virtual operation and cannot be submitted")]
    VirtualOperation { kind: OperationKind },

    #[error("transaction has no operations")]
    EmptyTransaction,

    #[error("transaction is {size} bytes, maximum is {max}")]
    TransactionTooLarge { size: usize, max: usize },
}
