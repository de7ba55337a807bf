use duo_store::StoreError;
use duo_vesting::VestingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("witness pay vesting: {0}")]
    Vesting(#[from] VestingError),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}
