#![allow(dead_code)]

use std::hint::black_box;

use clmm_router::{
    math::{
        bit_math::most_significant_bit,
        math_helpers::{mul_div, mul_div_rounding_up},
        sqrt_price_math::{
            amount_0_delta, amount_1_delta, get_next_sqrt_price_from_input,
            get_next_sqrt_price_from_output,
        },
        swap_math::compute_swap_step,
        tick_list::{next_initialized_tick_within_one_word, Tick},
        tick_math::{
            encode_sqrt_ratio_x96, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio,
            nearest_usable_tick, MAX_TICK, MIN_TICK,
        },
    },
    Address, Currency, FeeAmount, Pool, Token, I256, U256,
};
use criterion::Criterion;
use num_integer::Roots;

const TICKS: [i32; 7] = [-887272, -276324, -1000, 0, 1000, 276324, 887272];

pub fn token(i: u8) -> Token {
    Token::new(
        1,
        Address::with_last_byte(i + 1),
        Currency::new(18, format!("t{i}"), format!("token{i}")),
    )
}

pub fn full_range_ticks(fee: FeeAmount, liquidity: u128) -> Vec<Tick> {
    let spacing = fee.tick_spacing();
    vec![
        Tick::new(nearest_usable_tick(MIN_TICK, spacing).unwrap(), liquidity as i128, liquidity),
        Tick::new(nearest_usable_tick(MAX_TICK, spacing).unwrap(), -(liquidity as i128), liquidity),
    ]
}

pub fn v2_style_pool(token0: &Token, reserve0: u64, token1: &Token, reserve1: u64) -> Pool {
    let fee = FeeAmount::Medium;
    let sqrt_price = encode_sqrt_ratio_x96(U256::from(reserve1), U256::from(reserve0)).unwrap();
    let liquidity = Roots::sqrt(&(u128::from(reserve0) * u128::from(reserve1)));
    Pool::new(
        token0.clone(),
        token1.clone(),
        fee,
        sqrt_price,
        liquidity,
        get_tick_at_sqrt_ratio(sqrt_price).unwrap(),
        full_range_ticks(fee, liquidity),
    )
    .unwrap()
}

/// Every pair of `tokens` tokens, with slightly different reserves.
pub fn pool_mesh(tokens: u8) -> Vec<Pool> {
    let tokens: Vec<Token> = (0..tokens).map(token).collect();
    let mut pools = Vec::new();
    for (i, a) in tokens.iter().enumerate() {
        for (j, b) in tokens.iter().enumerate().skip(i + 1) {
            let reserve1 = 100_000 + 10_000 * (i as u64 + 2 * j as u64);
            pools.push(v2_style_pool(a, 100_000, b, reserve1));
        }
    }
    pools
}

pub fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");
    group.bench_function("get_sqrt_ratio_at_tick", |b| {
        b.iter(|| {
            for tick in TICKS {
                black_box(get_sqrt_ratio_at_tick(black_box(tick)).unwrap());
            }
        })
    });
    let ratios: Vec<U256> = TICKS.iter().map(|&t| get_sqrt_ratio_at_tick(t).unwrap()).collect();
    group.bench_function("get_tick_at_sqrt_ratio", |b| {
        b.iter(|| {
            for ratio in &ratios {
                black_box(get_tick_at_sqrt_ratio(black_box(*ratio)).unwrap());
            }
        })
    });
    group.finish();
}

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqrt_price_math");
    let price = get_sqrt_ratio_at_tick(0).unwrap();
    let upper = get_sqrt_ratio_at_tick(1000).unwrap();
    let liquidity = 1_000_000_000_000_000_000u128;
    let amount = U256::from(1_000_000_000_000_000u64);

    group.bench_function("get_next_sqrt_price_from_input", |b| {
        b.iter(|| {
            black_box(
                get_next_sqrt_price_from_input(black_box(price), liquidity, black_box(amount), true)
                    .unwrap(),
            )
        })
    });
    group.bench_function("get_next_sqrt_price_from_output", |b| {
        b.iter(|| {
            black_box(
                get_next_sqrt_price_from_output(black_box(price), liquidity, black_box(amount), false)
                    .unwrap(),
            )
        })
    });
    group.bench_function("get_amount_deltas", |b| {
        b.iter(|| {
            black_box(amount_0_delta(black_box(price), upper, liquidity, true).unwrap());
            black_box(amount_1_delta(black_box(price), upper, liquidity, false).unwrap());
        })
    });
    group.finish();
}

pub fn bench_swap_math(c: &mut Criterion) {
    let current = get_sqrt_ratio_at_tick(0).unwrap();
    let target = get_sqrt_ratio_at_tick(-600).unwrap();
    let liquidity = 2_000_000_000_000_000_000u128;
    let exact_in = I256::from_raw(U256::from(1_000_000_000_000_000u64));

    c.bench_function("compute_swap_step", |b| {
        b.iter(|| {
            black_box(
                compute_swap_step(black_box(current), target, liquidity, black_box(exact_in), 3000)
                    .unwrap(),
            );
            black_box(
                compute_swap_step(black_box(current), target, liquidity, -black_box(exact_in), 3000)
                    .unwrap(),
            );
        })
    });
}

pub fn bench_math_helpers(c: &mut Criterion) {
    let a = U256::MAX / U256::from(3);
    let b = U256::from(1_000_000_007u64);
    let d = U256::MAX / U256::from(7);
    c.bench_function("mul_div", |bench| {
        bench.iter(|| {
            black_box(mul_div(black_box(a), black_box(b), black_box(d)).unwrap());
            black_box(mul_div_rounding_up(black_box(a), black_box(b), black_box(d)).unwrap());
        })
    });
}

pub fn bench_tick_list(c: &mut Criterion) {
    let liquidity = 1_000_000u128;
    let ticks: Vec<Tick> = (-500..500)
        .map(|i| {
            let net = if i < 0 { liquidity as i128 } else { -(liquidity as i128) };
            Tick::new(i * 60, net, liquidity)
        })
        .collect();
    c.bench_function("next_initialized_tick_within_one_word", |b| {
        b.iter(|| {
            black_box(next_initialized_tick_within_one_word(&ticks, black_box(125), true, 60).unwrap());
            black_box(next_initialized_tick_within_one_word(&ticks, black_box(-7000), false, 60).unwrap());
        })
    });
}

pub fn bench_bit_math(c: &mut Criterion) {
    let values = [U256::from(1), U256::from(u64::MAX), U256::MAX >> 3, U256::MAX];
    c.bench_function("most_significant_bit", |b| {
        b.iter(|| {
            for value in values {
                black_box(most_significant_bit(black_box(value)).unwrap());
            }
        })
    });
}
