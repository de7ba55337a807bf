use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use duo_types::{AccountId, AssetAmount, Timestamp, VestingBalanceId};
use duo_vesting::{CddVestingPolicy, VestingBalance, VestingPolicyInitializer};

fn bench_cdd_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("cdd_compute");
    let policy = CddVestingPolicy::new(86_400, Timestamp::EPOCH, Timestamp::EPOCH);

    for elapsed in [1u64, 86_400, 31_536_000] {
        group.bench_with_input(BenchmarkId::new("coin_seconds_earned", elapsed), &elapsed, |b, &e| {
            b.iter(|| {
                black_box(policy.compute_coin_seconds_earned(
                    black_box(1_000_000_000),
                    black_box(Timestamp::new(e)),
                ))
            });
        });
    }

    group.finish();
}

fn bench_withdraw_cycle(c: &mut Criterion) {
    c.bench_function("cdd_withdraw_cycle", |b| {
        b.iter(|| {
            let mut vb = VestingBalance::new(
                VestingBalanceId::new(0),
                AccountId::new(0),
                AssetAmount::core(10_000),
                &VestingPolicyInitializer::cdd(1_000),
                Timestamp::EPOCH,
            );
            for step in 1..=10u64 {
                let now = Timestamp::new(step * 100);
                let allowed = vb.withdrawable(now).unwrap_or_default();
                if allowed.amount > 0 {
                    let _ = vb.withdraw(now, allowed);
                }
            }
            black_box(vb.balance)
        });
    });
}

criterion_group!(benches, bench_cdd_compute, bench_withdraw_cycle);
criterion_main!(benches);
