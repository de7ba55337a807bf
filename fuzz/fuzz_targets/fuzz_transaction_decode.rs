#![no_main]

use libfuzzer_sys::fuzz_target;

use duo_fees::FeeSchedule;
use duo_operations::Transaction;
use duo_types::ChainParameters;

// Decode arbitrary bytes as a transaction, then validate and price whatever
// decodes. None of it may panic, and fees are never negative.
fuzz_target!(|data: &[u8]| {
    let Ok(tx) = bincode::deserialize::<Transaction>(data) else {
        return;
    };
    let _ = tx.validate(&ChainParameters::default());

    let schedule = FeeSchedule::default();
    for op in &tx.operations {
        let _ = op.validate();
        let fee = schedule.calculate_fee(op);
        assert!(fee.fee >= 0 && fee.ufee >= 0);
    }
});
