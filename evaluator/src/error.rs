use duo_operations::{OperationKind, ValidationError};
use duo_store::StoreError;
use duo_types::{AccountId, AssetId, DualFee, ObjectId, ShareType};
use duo_vesting::VestingError;
use std::fmt;
use thiserror::Error;

/// Why a single operation was rejected.
///
/// Every variant except [`EvaluationError::InternalInvariantViolation`] is
/// raised before any mutation, so the ledger is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("invalid operation: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} is a virtual operation and cannot be submitted")]
    VirtualOperationMisuse { kind: OperationKind },

    #[error("no evaluator registered for {0}")]
    UnsupportedOperation(OperationKind),

    #[error("insufficient funds: {account} needs {needed} of {asset}, has {available}")]
    InsufficientFunds {
        account: AccountId,
        asset: AssetId,
        needed: ShareType,
        available: ShareType,
    },

    #[error("declared fee {paid} does not cover required {required}")]
    InsufficientFee { paid: DualFee, required: DualFee },

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("{account} is not the issuer of {asset}")]
    NotIssuer { account: AccountId, asset: AssetId },

    #[error("asset {0} does not allow override transfers")]
    OverrideNotPermitted(AssetId),

    #[error("asset symbol {0} is already taken")]
    SymbolTaken(String),

    #[error("issuing {requested} of {asset} would exceed max supply {max_supply}")]
    MaxSupplyExceeded {
        asset: AssetId,
        requested: ShareType,
        max_supply: ShareType,
    },

    #[error("{0} is already a lifetime member")]
    AlreadyLifetimeMember(AccountId),

    #[error("{claimed} does not own vesting balance owned by {owner}")]
    NotOwner { owner: AccountId, claimed: AccountId },

    #[error("vesting: {0}")]
    Vesting(#[from] VestingError),

    #[error("store: {0}")]
    Store(StoreError),

    /// Apply or fee payment failed after evaluation passed. Fatal: the
    /// block must not be processed further.
    #[error("internal invariant violated in {kind}: {reason}")]
    InternalInvariantViolation { kind: OperationKind, reason: String },
}

impl From<StoreError> for EvaluationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => Self::ObjectNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl EvaluationError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InternalInvariantViolation { .. })
    }

    /// Recast a failure in a step that is not allowed to fail.
    pub(crate) fn into_invariant_violation(self, kind: OperationKind) -> Self {
        if self.is_fatal() {
            return self;
        }
        Self::InternalInvariantViolation {
            kind,
            reason: self.to_string(),
        }
    }
}

/// A rejected transaction: the failing operation's index and its error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionError {
    /// `None` when the transaction as a whole is malformed.
    pub op_index: Option<usize>,
    pub source: EvaluationError,
}

impl TransactionError {
    pub fn is_fatal(&self) -> bool {
        self.source.is_fatal()
    }
}

impl fmt::Display for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op_index {
            Some(index) => write!(f, "operation {index}: {}", self.source),
            None => write!(f, "transaction: {}", self.source),
        }
    }
}

impl std::error::Error for TransactionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
