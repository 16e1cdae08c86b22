use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{thread_rng, Rng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;
use uuid::Uuid;

use ultimate_matching::{EngineConfig, EventBus, MatchingEngine, Order, OrderType, Pair, Side, TimeInForce};

fn test_order(pair: &Pair, side: Side, price: Decimal, amount: Decimal) -> Order {
    Order {
        id: Uuid::new_v4(),
        pair: pair.clone(),
        side,
        order_type: OrderType::Limit,
        time_in_force: TimeInForce::default(),
        price,
        amount,
        filled_amount: Decimal::ZERO,
        status: ultimate_matching::OrderStatus::Pending,
        timestamp: Utc::now(),
        user_id: "bench".to_string(),
    }
}

fn random_order(pair: &Pair, side: Side, price_levels: i64) -> Order {
    let mut rng = thread_rng();
    let offset = rng.gen_range(0..price_levels);
    let price = match side {
        Side::Buy => Decimal::from(10_000 - offset),
        Side::Sell => Decimal::from(10_000 + offset),
    };
    let amount = Decimal::from(1 + rng.gen_range(1..100));
    test_order(pair, side, price, amount)
}

fn new_engine() -> (MatchingEngine, Pair) {
    let engine = MatchingEngine::new(EngineConfig::new(dec!(0.001), dec!(0.002)), EventBus::new());
    (engine, Pair::new("BTC-USDT"))
}

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_submit");
    group.measurement_time(Duration::from_secs(10));

    for size in [1_000u64, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*size));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (engine, pair) = new_engine();
            let orders: Vec<Order> = (0..size)
                .map(|i| {
                    let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                    random_order(&pair, side, 100)
                })
                .collect();

            b.iter(|| {
                for order in &orders {
                    black_box(engine.submit(order.clone()));
                }
            });
        });
    }

    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_matching");
    group.measurement_time(Duration::from_secs(10));

    for num_matches in [100u64, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*num_matches));

        group.bench_with_input(
            BenchmarkId::from_parameter(num_matches),
            num_matches,
            |b, &num_matches| {
                b.iter(|| {
                    let (engine, pair) = new_engine();

                    for i in 0..num_matches {
                        let buy = test_order(&pair, Side::Buy, Decimal::from(9_900 - i as i64), dec!(10));
                        let sell = test_order(&pair, Side::Sell, Decimal::from(10_100 + i as i64), dec!(10));
                        engine.submit(buy);
                        engine.submit(sell);
                    }

                    for _ in 0..num_matches {
                        let crossing = test_order(&pair, Side::Buy, dec!(10200), dec!(10));
                        black_box(engine.submit(crossing));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_cancel");
    group.measurement_time(Duration::from_secs(10));

    for size in [1_000u64, 10_000].iter() {
        group.throughput(Throughput::Elements(*size));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let (engine, pair) = new_engine();
            let order_ids: Vec<Uuid> = (0..size)
                .map(|i| {
                    let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                    let order = random_order(&pair, side, 100);
                    let id = order.id;
                    engine.submit(order);
                    id
                })
                .collect();

            b.iter(|| {
                for id in &order_ids {
                    black_box(engine.cancel(*id, &pair));
                }
            });
        });
    }

    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_mixed_workload");
    group.measurement_time(Duration::from_secs(15));

    for ops in [1_000u64, 10_000].iter() {
        group.throughput(Throughput::Elements(*ops));

        group.bench_with_input(BenchmarkId::from_parameter(ops), ops, |b, &ops| {
            b.iter(|| {
                let (engine, pair) = new_engine();
                let mut order_ids = Vec::with_capacity(ops as usize);
                let mut rng = thread_rng();

                for i in 0..ops {
                    match i % 10 {
                        0..=5 => {
                            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                            let order = random_order(&pair, side, 100);
                            let id = order.id;
                            black_box(engine.submit(order));
                            order_ids.push(id);
                        }
                        6..=7 => {
                            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                            let price = match side {
                                Side::Buy => dec!(10100),
                                Side::Sell => dec!(9900),
                            };
                            let amount = Decimal::from(1 + rng.gen_range(1..50));
                            black_box(engine.submit(test_order(&pair, side, price, amount)));
                        }
                        8..=9 => {
                            if !order_ids.is_empty() {
                                let idx = rng.gen_range(0..order_ids.len());
                                black_box(engine.cancel(order_ids[idx], &pair));
                            }
                        }
                        _ => {}
                    }
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_submit,
    bench_matching,
    bench_cancel,
    bench_mixed_workload
);
criterion_main!(benches);
