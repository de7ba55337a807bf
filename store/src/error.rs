use duo_types::{AccountId, AssetId, ObjectId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("no undo session is open")]
    NoActiveSession,

    #[error("balance of {asset} for {account} would go negative")]
    NegativeBalance { account: AccountId, asset: AssetId },

    #[error("arithmetic overflow in stored balance")]
    Overflow,
}
