use std::hint::black_box;

use clmm_router::{
    search::{best_trade_exact_in, best_trade_exact_out, BestTradeOptions},
    TokenAmount, U256,
};
use criterion::{criterion_group, criterion_main, Criterion};

mod common;

fn bench_pool_swap(c: &mut Criterion) {
    let (t0, t1) = (common::token(0), common::token(1));
    let pool = common::v2_style_pool(&t0, 1_000_000, &t1, 1_200_000);
    let amount_in = TokenAmount::new(t0, U256::from(10_000u64));
    let amount_out = TokenAmount::new(t1, U256::from(10_000u64));

    c.bench_function("pool_get_output_amount", |b| {
        b.iter(|| black_box(pool.get_output_amount(black_box(&amount_in), None).unwrap()))
    });
    c.bench_function("pool_get_input_amount", |b| {
        b.iter(|| black_box(pool.get_input_amount(black_box(&amount_out), None).unwrap()))
    });
}

fn bench_best_trade(c: &mut Criterion) {
    let pools = common::pool_mesh(5);
    let (t0, t4) = (common::token(0), common::token(4));
    let amount_in = TokenAmount::new(t0.clone(), U256::from(10_000u64));
    let amount_out = TokenAmount::new(t4.clone(), U256::from(10_000u64));

    let mut group = c.benchmark_group("best_trade");
    for max_hops in [1, 2, 3] {
        let options = BestTradeOptions {
            max_num_results: 3,
            max_hops,
        };
        group.bench_function(format!("exact_in/{max_hops}_hops"), |b| {
            b.iter(|| black_box(best_trade_exact_in(&pools, &amount_in, &t4, options).unwrap()))
        });
        group.bench_function(format!("exact_out/{max_hops}_hops"), |b| {
            b.iter(|| black_box(best_trade_exact_out(&pools, &t0, &amount_out, options).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(search_benches, bench_pool_swap, bench_best_trade);
criterion_main!(search_benches);
