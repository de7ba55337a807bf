//! Transactions: ordered operation lists applied all-or-nothing.

use crate::error::ValidationError;
use crate::fee::serialized_size;
use crate::Operation;
use duo_types::ChainParameters;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub operations: Vec<Operation>,
}

impl Transaction {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn push(&mut self, op: impl Into<Operation>) {
        self.operations.push(op.into());
    }

    /// Stateless checks for the whole transaction.
    ///
    /// On failure returns the index of the offending operation, or `None` when
    /// the transaction as a whole is malformed.
    pub fn validate(&self, params: &ChainParameters) -> Result<(), (Option<usize>, ValidationError)> {
        if self.operations.is_empty() {
            return Err((None, ValidationError::EmptyTransaction));
        }
        let size = serialized_size(self);
        let max = params.maximum_transaction_size as usize;
        if size > max {
            return Err((None, ValidationError::TransactionTooLarge { size, max }));
        }
        for (index, op) in self.operations.iter().enumerate() {
            op.validate().map_err(|e| (Some(index), e))?;
        }
        Ok(())
    }
}
