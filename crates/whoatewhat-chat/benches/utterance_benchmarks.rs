//! Benchmarks for utterance processing against receipts of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use whoatewhat_chat::{AssignmentStore, ConversationEngine};
use whoatewhat_core::{Receipt, ReceiptItem, SplitConfig};

const DISHES: &[&str] = &[
    "Burger", "Fries", "Coke", "Caesar Salad", "House Wine", "Nachos", "Tacos", "Ramen",
];

fn receipt(items: usize) -> Receipt {
    let items = (0..items)
        .map(|i| ReceiptItem::new(format!("{} {}", DISHES[i % DISHES.len()], i), 9.5, 1))
        .collect();
    Receipt::new(items, 4.0, 6.0, 100.0, "USD")
}

fn bench_process(c: &mut Criterion) {
    let engine = ConversationEngine::new(&SplitConfig::default());
    let utterance = "Julia got the burger, Peter got the fries and Anna had the caesar salad with a coke";

    let mut group = c.benchmark_group("process_utterance");
    for size in [5usize, 20, 100] {
        let base = AssignmentStore::with_receipt(receipt(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &base, |b, base| {
            b.iter(|| {
                let mut store = base.clone();
                black_box(engine.process(&mut store, black_box(utterance)).ok());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_process);
criterion_main!(benches);
