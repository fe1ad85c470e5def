use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use storehouse_core::managers::MemoryManager;
use storehouse_core::{Registry, RegistryEventKind};

fn populated_registry(count: usize) -> Registry {
    let registry = Registry::new();
    for i in 0..count {
        let name = format!("manager-{i}");
        registry
            .add_manager(name.clone(), Arc::new(MemoryManager::new(name)))
            .unwrap();
    }
    registry
}

fn benchmark_add_managers(c: &mut Criterion) {
    c.bench_function("add_100_managers", |b| {
        b.iter(|| black_box(populated_registry(100)))
    });
}

fn benchmark_connection_lookup(c: &mut Criterion) {
    let registry = populated_registry(100);
    c.bench_function("get_connection_named", |b| {
        b.iter(|| registry.get_connection(black_box(Some("manager-50"))))
    });
    c.bench_function("get_connection_default", |b| {
        b.iter(|| registry.get_default_connection())
    });
}

fn benchmark_lookup_with_listeners(c: &mut Criterion) {
    let registry = populated_registry(10);
    for _ in 0..8 {
        registry.on(RegistryEventKind::ConnectionAccessed, |event| {
            black_box(event.name());
        });
    }
    c.bench_function("get_connection_8_listeners", |b| {
        b.iter(|| registry.get_connection(black_box(Some("manager-5"))))
    });
}

fn benchmark_model_lookup(c: &mut Criterion) {
    let registry = populated_registry(10);
    c.bench_function("get_model_implicit", |b| {
        b.iter(|| registry.get_model(black_box("users"), None))
    });
}

fn benchmark_health_check_all(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let registry = populated_registry(20);
    c.bench_function("health_check_all_20", |b| {
        b.iter(|| runtime.block_on(registry.health_check_all()))
    });
}

criterion_group!(
    benches,
    benchmark_add_managers,
    benchmark_connection_lookup,
    benchmark_lookup_with_listeners,
    benchmark_model_lookup,
    benchmark_health_check_all
);
criterion_main!(benches);
