//! 注册表解析路径的性能基准测试

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use typereg::{FromDeps, ServiceRegistry};

/// 测试用的简单配置
#[derive(Clone)]
struct Settings {
    retries: u32,
}

/// 一级依赖服务
struct Transport {
    retries: u32,
}

typereg::from_deps!(Transport, |settings: Settings| Transport {
    retries: settings.retries
});

/// 二级依赖服务
struct Client {
    retries: u32,
}

typereg::from_deps!(Client, |transport: Transport| Client {
    retries: transport.retries
});

type Services = typereg::type_set![Settings, Transport, Client];

fn registered_registry() -> ServiceRegistry<Services> {
    let mut registry = ServiceRegistry::<Services>::new();
    registry.register_instance(Settings { retries: 3 });
    registry
        .with_params::<(Settings,), _>()
        .register_type::<Transport, Transport, _>();
    registry
        .with_params::<(Transport,), _>()
        .register_type::<Client, Client, _>();
    registry
}

/// 基准测试：固定实例解析
fn bench_resolve_instance(c: &mut Criterion) {
    let registry = registered_registry();

    c.bench_function("resolve_instance", |b| {
        b.iter(|| black_box(registry.resolve::<Settings, _>().unwrap().retries))
    });
}

/// 基准测试：委托工厂解析
fn bench_resolve_factory(c: &mut Criterion) {
    let mut registry = ServiceRegistry::<Services>::new();
    registry.register_factory(|| Settings { retries: 7 });

    c.bench_function("resolve_factory", |b| {
        b.iter(|| black_box(registry.resolve::<Settings, _>().unwrap().retries))
    });
}

/// 基准测试：不同深度的递归构造链
fn bench_resolve_constructed(c: &mut Criterion) {
    let registry = registered_registry();

    let mut group = c.benchmark_group("resolve_constructed");
    group.bench_function(BenchmarkId::from_parameter("depth_1"), |b| {
        b.iter(|| black_box(registry.resolve::<Transport, _>().unwrap().retries))
    });
    group.bench_function(BenchmarkId::from_parameter("depth_2"), |b| {
        b.iter(|| black_box(registry.resolve::<Client, _>().unwrap().retries))
    });
    group.finish();
}

/// 基准测试：注册表构造与槽位绑定
fn bench_registration(c: &mut Criterion) {
    c.bench_function("seed_and_register", |b| {
        b.iter(|| black_box(registered_registry()))
    });
}

criterion_group!(
    benches,
    bench_resolve_instance,
    bench_resolve_factory,
    bench_resolve_constructed,
    bench_registration
);

criterion_main!(benches);
