use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cradle_di::*;
use std::sync::Arc;

// ===== Micro Benchmarks =====

struct Config {
    port: u16,
}

struct Service {
    config: Arc<Config>,
}

fn container() -> Container {
    let registry = Arc::new(MetadataRegistry::new());
    Annotate::<Service>::on(&registry).initializer(
        vec![ParameterDescriptor::new(0, "config").of_type::<Config>()],
        |args| Ok(Service { config: args.get(0)? }),
    );
    let container = Container::with_registry(registry);
    container.register_value(Arc::new(Config { port: 8080 }));
    container
}

fn bench_value_hit(c: &mut Criterion) {
    let container = container();

    c.bench_function("value_hit", |b| {
        b.iter(|| {
            let v = container.get::<Config>().unwrap();
            black_box(v.port);
        })
    });
}

fn bench_singleton_hit(c: &mut Criterion) {
    let container = container();
    container.register_class::<Service>(Lifecycle::Singleton);
    let _ = container.get::<Service>().unwrap();

    c.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = container.get::<Service>().unwrap();
            black_box(v);
        })
    });
}

fn bench_transient_construct(c: &mut Criterion) {
    let container = container();

    c.bench_function("transient_construct", |b| {
        b.iter(|| {
            let v = container.get::<Service>().unwrap();
            black_box(v.config.port);
        })
    });
}

fn bench_contextual(c: &mut Criterion) {
    let container = container();
    container.register_value_in(Arc::new(Config { port: 1 }), "one");
    container.register_value_in(Arc::new(Config { port: 2 }), "two");

    c.bench_function("contextual_list_lookup", |b| {
        b.iter(|| {
            let v = container.get_in::<Config>(["missing", "two"]).unwrap();
            black_box(v.port);
        })
    });
}

fn bench_hierarchy_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy_depth");

    for depth in [1usize, 4, 16] {
        let root = container();
        let mut leaf = root.clone();
        for _ in 0..depth {
            leaf = leaf.create_child_container();
        }

        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, leaf| {
            b.iter(|| black_box(leaf.get::<Config>().unwrap()))
        });
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    struct Handler;

    let container = container();
    container.metadata().register_method_fn::<Handler, _>(
        "handle",
        vec![
            ParameterDescriptor::new(0, "config").of_type::<Config>(),
            ParameterDescriptor::new(1, "path").of_primitive::<String>(),
        ],
        |_, args| -> DiResult<Value> { Ok(Arc::new(args.get::<Config>(0)?.port)) },
    );

    let mut dispatcher = container.create_tied_dispatcher(Arc::new(Handler), "handle");
    dispatcher.set_named_parameter("path", Arc::new("/".to_string()));

    c.bench_function("tied_dispatch", |b| {
        b.iter(|| black_box(dispatcher.invoke().unwrap()))
    });
}

criterion_group!(
    benches,
    bench_value_hit,
    bench_singleton_hit,
    bench_transient_construct,
    bench_contextual,
    bench_hierarchy_depth,
    bench_dispatch
);
criterion_main!(benches);
