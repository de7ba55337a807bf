#![no_main]

use libfuzzer_sys::fuzz_target;

use duo_types::{AccountId, AssetAmount, Timestamp, VestingBalanceId};
use duo_vesting::{VestingBalance, VestingPolicyInitializer};

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let n = bytes.len().min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(buf)
}

// Drive a CDD vesting balance through arbitrary withdrawals and deposits.
// Withdrawable never exceeds the balance and the balance never goes negative.
fuzz_target!(|data: &[u8]| {
    if data.len() < 12 {
        return;
    }
    let principal = (read_u64(&data[0..8]) % 1_000_000_000_000) as i64 + 1;
    let vesting_seconds = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);

    let mut vb = VestingBalance::new(
        VestingBalanceId::new(0),
        AccountId::new(1),
        AssetAmount::core(principal),
        &VestingPolicyInitializer::cdd(vesting_seconds),
        Timestamp::EPOCH,
    );

    let mut now = 0u64;
    for step in data[12..].chunks_exact(9) {
        let value = read_u64(&step[1..9]);
        now = now.saturating_add(value % 1_000_000);
        let t = Timestamp::new(now);
        let amount = AssetAmount::core((value % 1_000_000) as i64 + 1);
        let _ = match step[0] % 3 {
            0 => vb.withdraw(t, amount),
            1 => vb.deposit(t, amount),
            _ => vb.deposit_vested(t, amount),
        };

        let Ok(allowed) = vb.withdrawable(t) else {
            continue;
        };
        assert!(allowed.amount <= vb.balance.amount);
        assert!(vb.balance.amount >= 0);
    }
});
