use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vitrine::Controller;
use vitrine::catalogue::{CatalogueFilter, filter_games};
use vitrine::storage::MemoryStore;
use vitrine::types::CategoryId;

// Full catalogue, no search
fn bench_filter_all(c: &mut Criterion) {
    c.bench_function("filter_all", |b| {
        b.iter(|| black_box(filter_games(CategoryId::Pop, "")))
    });
}

// Category plus a case-insensitive title search
fn bench_filter_category_and_query(c: &mut Criterion) {
    let filter = CatalogueFilter::new(CategoryId::Live, "ROULETTE");
    c.bench_function("filter_category_and_query", |b| {
        b.iter(|| black_box(filter.apply()))
    });
}

// Register, gate, deposit and resume on a fresh in-memory store
fn bench_deposit_flow(c: &mut Criterion) {
    c.bench_function("register_play_deposit", |b| {
        b.iter_with_setup(
            || Controller::new(MemoryStore::new()),
            |mut controller| {
                let _ = controller.register("bench@example.com", "pw", "");
                let _ = controller.play("g1");
                black_box(controller.deposit(50))
            },
        )
    });
}

criterion_group!(
    benches,
    bench_filter_all,
    bench_filter_category_and_query,
    bench_deposit_flow
);
criterion_main!(benches);
