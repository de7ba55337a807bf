use duo_budget::BudgetError;
use duo_evaluator::TransactionError;
use duo_store::StoreError;
use duo_types::{Timestamp, WitnessId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain halted after a fatal error")]
    Halted,

    #[error("block timestamp {block} is not after head {head}")]
    NonIncreasingTimestamp { head: Timestamp, block: Timestamp },

    #[error("unknown witness {0}")]
    UnknownWitness(WitnessId),

    #[error("transaction {tx_index} rejected: {source}")]
    Transaction {
        tx_index: usize,
        source: TransactionError,
    },

    #[error("budget error: {0}")]
    Budget(#[from] BudgetError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid genesis: {0}")]
    Genesis(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
