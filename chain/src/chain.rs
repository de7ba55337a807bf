//! The chain driver: applies blocks in order on top of a genesis state.

use crate::block::{Block, BlockOutcome};
use crate::config::ChainConfig;
use crate::ChainError;
use duo_budget::{pay_block_producer, run_maintenance, BudgetError};
use duo_evaluator::{
    calculate_fee_for_operation, EvaluatorRegistry, OperationOutcome, TransactionError,
    TransactionProcessor,
};
use duo_fees::FeeSchedule;
use duo_operations::{Operation, Transaction};
use duo_store::{
    Account, GlobalDynamicProperties, MemoryStore, ObjectStore, ReserveFund, Session, Witness,
};
use duo_types::{
    AccountId, AssetId, ChainParameters, DualFee, ShareType, Timestamp, VestingBalanceId, WitnessId,
};
use duo_vesting::VestingBalance;
use tracing::{error, info, warn};

/// A single-writer ledger that accepts blocks and standalone transactions.
#[derive(Debug)]
pub struct Chain {
    store: MemoryStore,
    registry: EvaluatorRegistry<MemoryStore>,
    parameters: ChainParameters,
    fee_schedule: FeeSchedule,
    halted: bool,
}

impl Chain {
    /// Build the genesis state described by `config`.
    pub fn from_config(config: &ChainConfig) -> Result<Self, ChainError> {
        Self::with_registry(config, EvaluatorRegistry::with_defaults())
    }

    /// Like [`Chain::from_config`], dispatching operations through `registry`.
    pub fn with_registry(
        config: &ChainConfig,
        registry: EvaluatorRegistry<MemoryStore>,
    ) -> Result<Self, ChainError> {
        Ok(Self {
            store: config.genesis.build()?,
            registry,
            parameters: config.parameters.clone(),
            fee_schedule: config.fee_schedule.clone(),
            halted: false,
        })
    }

    /// Apply `block` as the next head.
    ///
    /// Transactions run in order, then the producer is paid from the current
    /// budget, then maintenance runs if the block reached the boundary. Any
    /// failure leaves the chain as it was; a fatal one also halts it.
    pub fn apply_block(&mut self, block: &Block) -> Result<BlockOutcome, ChainError> {
        if self.halted {
            return Err(ChainError::Halted);
        }
        let head = self.store.dynamic_properties().head_block_time;
        if block.timestamp <= head {
            return Err(ChainError::NonIncreasingTimestamp {
                head,
                block: block.timestamp,
            });
        }
        if !self.store.exists::<Witness>(block.witness) {
            return Err(ChainError::UnknownWitness(block.witness));
        }

        let processor = TransactionProcessor::new(&self.registry, &self.fee_schedule, &self.parameters);
        let mut session = Session::begin(&mut self.store);

        let mut transactions = Vec::with_capacity(block.transactions.len());
        for (tx_index, tx) in block.transactions.iter().enumerate() {
            match processor.apply(&mut session, tx, block.timestamp) {
                Ok(outcomes) => transactions.push(outcomes),
                Err(source) => {
                    if source.is_fatal() {
                        error!(tx_index, error = %source, "fatal error, halting chain");
                        self.halted = true;
                    }
                    return Err(ChainError::Transaction { tx_index, source });
                }
            }
        }

        let timestamp = block.timestamp;
        session.modify_dynamic_properties(|d| {
            d.head_block_number += 1;
            d.head_block_time = timestamp;
        });
        let block_number = session.dynamic_properties().head_block_number;

        let witness_pay = match pay_block_producer(&mut *session, block.witness, &self.parameters, timestamp) {
            Ok(pay) => pay,
            Err(e) => {
                self.halted = true;
                return Err(halt(e));
            }
        };

        let maintenance = if session.dynamic_properties().next_maintenance_time <= timestamp {
            match run_maintenance(&mut *session, &self.parameters, timestamp) {
                Ok(record) => Some(record),
                Err(e) => {
                    self.halted = true;
                    return Err(halt(e));
                }
            }
        } else {
            None
        };

        session.commit()?;
        info!(
            block = block_number,
            time = %timestamp,
            transactions = transactions.len(),
            witness_pay,
            maintenance = maintenance.is_some(),
            "block applied"
        );
        Ok(BlockOutcome {
            block_number,
            transactions,
            witness_pay,
            maintenance,
        })
    }

    /// Apply one transaction outside a block, at the head block time.
    pub fn push_transaction(&mut self, tx: &Transaction) -> Result<Vec<OperationOutcome>, ChainError> {
        if self.halted {
            return Err(ChainError::Halted);
        }
        let now = self.head_block_time();
        let processor = TransactionProcessor::new(&self.registry, &self.fee_schedule, &self.parameters);
        let result = processor.apply(&mut self.store, tx, now);
        result.map_err(|source| self.reject(source))
    }

    /// Dry-run `tx` with fees skipped. Nothing is kept.
    pub fn simulate_transaction(&mut self, tx: &Transaction) -> Result<Vec<OperationOutcome>, ChainError> {
        if self.halted {
            return Err(ChainError::Halted);
        }
        let now = self.head_block_time();
        let processor = TransactionProcessor::new(&self.registry, &self.fee_schedule, &self.parameters);
        processor
            .simulate(&mut self.store, tx, now)
            .map_err(|source| ChainError::Transaction { tx_index: 0, source })
    }

    /// Fee the active schedule asks for `op`.
    pub fn estimate_fee(&self, op: &Operation) -> DualFee {
        calculate_fee_for_operation(&self.fee_schedule, op)
    }

    /// Fill in `op`'s fee fields from the active schedule.
    pub fn set_fee(&self, op: &mut Operation) -> DualFee {
        self.fee_schedule.set_fee(op)
    }

    pub fn balance(&self, account: AccountId, asset: AssetId) -> Result<ShareType, ChainError> {
        Ok(self.store.account_statistics(account)?.balance(asset))
    }

    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        self.store.find_account_by_name(name)
    }

    pub fn vesting_balance(&self, id: VestingBalanceId) -> Option<&VestingBalance> {
        self.store.find(id)
    }

    pub fn witness(&self, id: WitnessId) -> Option<&Witness> {
        self.store.find(id)
    }

    pub fn dynamic_properties(&self) -> &GlobalDynamicProperties {
        self.store.dynamic_properties()
    }

    pub fn reserve_fund(&self) -> &ReserveFund {
        self.store.reserve_fund()
    }

    pub fn head_block_time(&self) -> Timestamp {
        self.store.dynamic_properties().head_block_time
    }

    pub fn parameters(&self) -> &ChainParameters {
        &self.parameters
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fee_schedule
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn reject(&mut self, source: TransactionError) -> ChainError {
        if source.is_fatal() {
            error!(error = %source, "fatal error, halting chain");
            self.halted = true;
        }
        ChainError::Transaction { tx_index: 0, source }
    }
}

fn halt(e: BudgetError) -> ChainError {
    warn!(error = %e, "budget processing failed, halting chain");
    ChainError::Budget(e)
}
