use duo_budget::BudgetRecord;
use duo_evaluator::OperationOutcome;
use duo_operations::Transaction;
use duo_types::{Clock, ShareType, Timestamp, WitnessId};
use serde::{Deserialize, Serialize};

/// A produced block: who made it, when, and the transactions it carries.
///
/// Signatures and producer scheduling are checked before a block gets here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub timestamp: Timestamp,
    pub witness: WitnessId,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(timestamp: Timestamp, witness: WitnessId, transactions: Vec<Transaction>) -> Self {
        Self {
            timestamp,
            witness,
            transactions,
        }
    }

    /// A block stamped with `clock`'s current time.
    pub fn produce(clock: &impl Clock, witness: WitnessId, transactions: Vec<Transaction>) -> Self {
        Self::new(clock.now(), witness, transactions)
    }
}

/// What applying a block did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockOutcome {
    pub block_number: u64,
    /// Per transaction, the outcome of each operation.
    pub transactions: Vec<Vec<OperationOutcome>>,
    /// Pay credited to the producer.
    pub witness_pay: ShareType,
    /// Present when the block crossed a maintenance boundary.
    pub maintenance: Option<BudgetRecord>,
}
