use proptest::prelude::*;

use duo_fees::FeeSchedule;
use duo_operations::{FeeParameters, Memo, Operation, TransferFeeParameters, TransferOperation};
use duo_types::{AccountId, AssetAmount, MAX_SHARE_SUPPLY};

fn transfer_with_memo(len: usize) -> Operation {
    let mut op = TransferOperation::new(AccountId::new(1), AccountId::new(2), AssetAmount::core(1));
    op.memo = Some(Memo {
        nonce: 0,
        message: vec![1; len],
    });
    op.into()
}

proptest! {
    /// Scaled fees stay monotonic in payload size, in both denominations.
    #[test]
    fn scheduled_fee_monotonic_in_size(
        fee in 0u64..1_000_000,
        ufee in 0u64..1_000_000,
        pkb in 0u64..1_000_000,
        ufee_pkb in 0u64..1_000_000,
        scale in 0u32..100_000,
        a in 0usize..8_192,
        b in 0usize..8_192,
    ) {
        let mut schedule = FeeSchedule::default();
        schedule.scale = scale;
        schedule.set(FeeParameters::Transfer(TransferFeeParameters { fee, ufee, price_per_kbyte: pkb, ufee_pkb }));
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let f_small = schedule.calculate_fee(&transfer_with_memo(small));
        let f_large = schedule.calculate_fee(&transfer_with_memo(large));
        prop_assert!(f_small.fee <= f_large.fee);
        prop_assert!(f_small.ufee <= f_large.ufee);
    }

    /// Computed fees are never negative and never exceed the share cap.
    #[test]
    fn fees_are_bounded(fee in any::<u64>(), pkb in any::<u64>(), scale in any::<u32>(), len in 0usize..4_096) {
        let mut schedule = FeeSchedule::default();
        schedule.scale = scale;
        schedule.set(FeeParameters::Transfer(TransferFeeParameters { fee, ufee: fee, price_per_kbyte: pkb, ufee_pkb: pkb }));
        let f = schedule.calculate_fee(&transfer_with_memo(len));
        prop_assert!((0..=MAX_SHARE_SUPPLY).contains(&f.fee));
        prop_assert!((0..=MAX_SHARE_SUPPLY).contains(&f.ufee));
    }
}
