//! Integration tests driving the whole pipeline through [`Chain`]:
//! genesis → transactions → fees → maintenance → witness pay.

use duo_chain::{Block, Chain, ChainConfig, ChainError, GenesisAccount, GenesisState};
use duo_evaluator::{
    EvaluationError, Evaluator, EvaluatorRegistry, OperationResult, TransactionEvaluationState,
};
use duo_nullables::NullClock;
use duo_operations::{
    AccountUpgradeFeeParameters, AccountUpgradeOperation, CustomOperation, FeeParameters,
    Operation, Transaction, TransferOperation, VestingBalanceCreateOperation,
    VestingBalanceWithdrawOperation,
};
use duo_store::{MemoryStore, ObjectStore, UndoableStore};
use duo_types::{
    AccountId, AssetAmount, AssetId, ChainParameters, DualFee, ObjectId, Timestamp, WitnessId,
    BLOCKCHAIN_PRECISION as P,
};
use duo_vesting::VestingPolicyInitializer;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const WITNESS: WitnessId = WitnessId::new(0);

fn account(name: &str, core: i64) -> GenesisAccount {
    GenesisAccount {
        name: name.into(),
        core_balance: core,
        sdr_balance: 0,
    }
}

/// Five-second blocks, 150-second maintenance intervals, one witness.
fn config() -> ChainConfig {
    let mut config = ChainConfig {
        parameters: ChainParameters {
            block_interval: 5,
            maintenance_interval: 150,
            witness_pay_per_block: 259,
            network_percent_of_fee: 2_000,
            ..ChainParameters::default()
        },
        genesis: GenesisState {
            witnesses: vec!["init0".into()],
            accounts: vec![
                account("init0", 0),
                account("nathan", 60_000 * P),
                account("dan", 0),
            ],
            ..GenesisState::default()
        },
        ..ChainConfig::default()
    };
    // Lifetime membership costs 50000 CORE, so its 20% network share is
    // exactly 10000 CORE.
    config.fee_schedule.set(FeeParameters::AccountUpgrade(AccountUpgradeFeeParameters {
        membership_lifetime_fee: 50_000 * P as u64,
        ..AccountUpgradeFeeParameters::default()
    }));
    config
}

fn id(chain: &Chain, name: &str) -> AccountId {
    chain.account_by_name(name).expect("genesis account").id
}

fn block(time: u64, transactions: Vec<Transaction>) -> Block {
    Block::new(Timestamp::new(time), WITNESS, transactions)
}

fn signed(chain: &Chain, op: impl Into<Operation>) -> Transaction {
    let mut op = op.into();
    chain.set_fee(&mut op);
    Transaction::new(vec![op])
}

fn transfer(chain: &Chain, from: &str, to: &str, amount: i64) -> Transaction {
    signed(
        chain,
        TransferOperation::new(id(chain, from), id(chain, to), AssetAmount::core(amount)),
    )
}

// ---------------------------------------------------------------------------
// Witness pay
// ---------------------------------------------------------------------------

#[test]
fn witness_pay_follows_the_interval_budget() {
    let mut chain = Chain::from_config(&config()).unwrap();
    let nathan = id(&chain, "nathan");

    // First block runs the genesis maintenance: no budget yet.
    let first = chain.apply_block(&block(150, vec![])).unwrap();
    assert_eq!(first.witness_pay, 0);
    assert_eq!(first.maintenance.unwrap().witness_budget, 0);
    assert_eq!(chain.dynamic_properties().next_maintenance_time, Timestamp::new(300));

    let upgrade = signed(
        &chain,
        AccountUpgradeOperation {
            fee: AssetAmount::core(0),
            ufee: AssetAmount::sdr(0),
            account_to_upgrade: nathan,
            upgrade_to_lifetime_member: true,
        },
    );
    let outcome = chain.apply_block(&block(155, vec![upgrade])).unwrap();
    assert_eq!(outcome.transactions[0][0].fee_paid, DualFee::new(50_000 * P, 0));
    assert_eq!(chain.balance(nathan, AssetId::CORE).unwrap(), 10_000 * P);

    // The boundary block pays from the stale (empty) budget, then sizes the
    // new one from 10000 CORE over 150 seconds.
    let boundary = chain.apply_block(&block(300, vec![])).unwrap();
    assert_eq!(boundary.witness_pay, 0);
    let record = boundary.maintenance.unwrap();
    assert_eq!(record.elapsed_seconds, 150);
    assert_eq!(record.witness_budget, 594);
    assert_eq!(chain.reserve_fund().reserved, 40_000 * P);
    assert_eq!(chain.dynamic_properties().accumulated_fees, 10_000 * P - 594);

    let pays: Vec<_> = [305, 310, 315, 320]
        .into_iter()
        .map(|t| chain.apply_block(&block(t, vec![])).unwrap().witness_pay)
        .collect();
    assert_eq!(pays, vec![259, 259, 76, 0]);
    assert_eq!(chain.dynamic_properties().witness_budget, 0);

    let witness = chain.witness(WITNESS).unwrap();
    assert_eq!(witness.total_produced, 7);
    let pay_vb = chain.vesting_balance(witness.pay_vb.unwrap()).unwrap();
    assert_eq!(pay_vb.balance, AssetAmount::core(594));
    assert_eq!(pay_vb.owner, id(&chain, "init0"));
}

// ---------------------------------------------------------------------------
// Block atomicity and ordering
// ---------------------------------------------------------------------------

#[test]
fn failed_transaction_rejects_the_whole_block() {
    let mut chain = Chain::from_config(&config()).unwrap();
    chain.apply_block(&block(150, vec![])).unwrap();
    let good = transfer(&chain, "nathan", "dan", 100 * P);
    let bad = transfer(&chain, "dan", "nathan", 1_000 * P);

    let err = chain.apply_block(&block(155, vec![good, bad])).unwrap_err();

    match err {
        ChainError::Transaction { tx_index, source } => {
            assert_eq!(tx_index, 1);
            assert_eq!(source.op_index, Some(0));
            assert!(matches!(source.source, EvaluationError::InsufficientFunds { .. }));
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(chain.balance(id(&chain, "dan"), AssetId::CORE).unwrap(), 0);
    assert_eq!(chain.dynamic_properties().head_block_number, 1);
    assert!(!chain.is_halted());
}

#[test]
fn blocks_must_move_forward_and_come_from_witnesses() {
    let mut chain = Chain::from_config(&config()).unwrap();
    chain.apply_block(&block(150, vec![])).unwrap();

    assert!(matches!(
        chain.apply_block(&block(150, vec![])),
        Err(ChainError::NonIncreasingTimestamp { .. })
    ));
    assert!(matches!(
        chain.apply_block(&Block::new(Timestamp::new(155), WitnessId::new(9), vec![])),
        Err(ChainError::UnknownWitness(_))
    ));
}

/// Custom-data evaluator whose `apply` breaks after evaluation passed.
#[derive(Default)]
struct BrokenCustomEvaluator;

impl Evaluator<MemoryStore> for BrokenCustomEvaluator {
    type Operation = CustomOperation;

    fn evaluate(
        &mut self,
        _state: &TransactionEvaluationState<'_, MemoryStore>,
        _op: &CustomOperation,
    ) -> Result<(), EvaluationError> {
        Ok(())
    }

    fn apply(
        &mut self,
        state: &mut TransactionEvaluationState<'_, MemoryStore>,
        _op: &CustomOperation,
    ) -> Result<OperationResult, EvaluationError> {
        state.store.modify_reserve_fund(|r| r.reserved = 77);
        Err(EvaluationError::ObjectNotFound(ObjectId::Account(AccountId::new(99))))
    }
}

#[test]
fn fatal_apply_failure_halts_the_chain() {
    let mut registry = EvaluatorRegistry::with_defaults();
    registry.register::<BrokenCustomEvaluator>();
    let mut chain = Chain::with_registry(&config(), registry).unwrap();
    chain.apply_block(&block(150, vec![])).unwrap();
    let nathan = id(&chain, "nathan");
    let reserved = chain.reserve_fund().reserved;

    let good = transfer(&chain, "nathan", "dan", 100 * P);
    let broken = signed(
        &chain,
        CustomOperation {
            fee: AssetAmount::core(0),
            ufee: AssetAmount::sdr(0),
            payer: nathan,
            required_auths: vec![],
            id: 1,
            data: vec![0; 16],
        },
    );
    let err = chain.apply_block(&block(155, vec![good, broken])).unwrap_err();

    match err {
        ChainError::Transaction { tx_index, source } => {
            assert_eq!(tx_index, 1);
            assert_eq!(source.op_index, Some(0));
            assert!(source.is_fatal());
            assert!(matches!(
                source.source,
                EvaluationError::InternalInvariantViolation { .. }
            ));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(chain.is_halted());
    assert_eq!(chain.reserve_fund().reserved, reserved);
    assert_eq!(chain.balance(nathan, AssetId::CORE).unwrap(), 60_000 * P);
    assert_eq!(chain.balance(id(&chain, "dan"), AssetId::CORE).unwrap(), 0);
    assert_eq!(chain.dynamic_properties().head_block_number, 1);
    assert_eq!(chain.head_block_time(), Timestamp::new(150));
    assert_eq!(chain.store().session_depth(), 0);

    let next = transfer(&chain, "nathan", "dan", P);
    assert!(matches!(
        chain.apply_block(&block(160, vec![])),
        Err(ChainError::Halted)
    ));
    assert!(matches!(chain.push_transaction(&next), Err(ChainError::Halted)));
    assert!(matches!(chain.simulate_transaction(&next), Err(ChainError::Halted)));
    assert_eq!(chain.dynamic_properties().head_block_number, 1);
}

#[test]
fn clock_driven_production() {
    let mut chain = Chain::from_config(&config()).unwrap();
    let clock = NullClock::new(150);
    for _ in 0..3 {
        chain.apply_block(&Block::produce(&clock, WITNESS, vec![])).unwrap();
        clock.advance(5);
    }
    assert_eq!(chain.dynamic_properties().head_block_number, 3);
    assert_eq!(chain.head_block_time(), Timestamp::new(160));
}

// ---------------------------------------------------------------------------
// Standalone transactions
// ---------------------------------------------------------------------------

#[test]
fn simulation_estimates_fees_without_side_effects() {
    let mut chain = Chain::from_config(&config()).unwrap();
    let nathan = id(&chain, "nathan");
    let op: Operation = TransferOperation::new(nathan, id(&chain, "dan"), AssetAmount::core(P)).into();

    let outcomes = chain.simulate_transaction(&Transaction::new(vec![op.clone()])).unwrap();

    assert_eq!(outcomes[0].required_fee, chain.estimate_fee(&op));
    assert_eq!(outcomes[0].required_fee, DualFee::new(20 * P, 0));
    assert_eq!(chain.balance(nathan, AssetId::CORE).unwrap(), 60_000 * P);
}

#[test]
fn vesting_round_trip() {
    let mut chain = Chain::from_config(&config()).unwrap();
    chain.apply_block(&block(150, vec![])).unwrap();
    let nathan = id(&chain, "nathan");
    let dan = id(&chain, "dan");

    let create = signed(
        &chain,
        VestingBalanceCreateOperation {
            fee: AssetAmount::core(0),
            ufee: AssetAmount::sdr(0),
            creator: nathan,
            owner: dan,
            amount: AssetAmount::core(10_000),
            policy: VestingPolicyInitializer::cdd(1_000),
        },
    );
    let outcome = chain.apply_block(&block(155, vec![create])).unwrap();
    let OperationResult::NewObject(ObjectId::VestingBalance(vb)) = outcome.transactions[0][0].result else {
        panic!("expected a vesting balance");
    };

    // Dan has no CORE for the fee yet.
    chain.apply_block(&block(160, vec![transfer(&chain, "nathan", "dan", 100 * P)])).unwrap();

    let withdraw = |chain: &Chain, amount: i64| {
        signed(
            chain,
            VestingBalanceWithdrawOperation {
                fee: AssetAmount::core(0),
                ufee: AssetAmount::sdr(0),
                vesting_balance: vb,
                owner: dan,
                amount: AssetAmount::core(amount),
            },
        )
    };

    // 500 seconds after creation half has vested.
    let early = withdraw(&chain, 5_001);
    assert!(chain.apply_block(&block(655, vec![early])).is_err());
    let exact = withdraw(&chain, 5_000);
    chain.apply_block(&block(655, vec![exact])).unwrap();

    let dan_core = chain.balance(dan, AssetId::CORE).unwrap();
    assert_eq!(dan_core, 100 * P + 5_000 - P);
    assert_eq!(
        chain.vesting_balance(vb).unwrap().balance,
        AssetAmount::core(5_000)
    );
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn chain_starts_from_a_toml_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("duo.toml");
    std::fs::write(&path, config().to_toml_string().unwrap()).unwrap();

    let loaded = ChainConfig::from_toml_file(&path).unwrap();
    assert_eq!(loaded, config());

    let chain = Chain::from_config(&loaded).unwrap();
    assert_eq!(chain.parameters().maintenance_interval, 150);
    assert_eq!(chain.balance(id(&chain, "nathan"), AssetId::CORE).unwrap(), 60_000 * P);
}
