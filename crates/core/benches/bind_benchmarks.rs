//! Benchmarks for bind calls over module sets of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use modbind_core::modules::{Field, Module, Tag};
use modbind_core::Binder;

/// Provides one named value and injects the value provided by its predecessor
struct Link {
    index: usize,
    provided: String,
    injected: String,
}

impl Link {
    fn new(index: usize) -> Self {
        Self {
            index,
            provided: format!("value-{}", index),
            injected: String::new(),
        }
    }
}

impl Module for Link {
    fn fields(&mut self) -> Vec<Field<'_>> {
        let mut fields = vec![Field::new(
            "provided",
            Tag::provide(format!("link{}", self.index)),
            &mut self.provided,
        )];
        if self.index > 0 {
            fields.push(Field::new(
                "injected",
                Tag::inject(format!("link{}", self.index - 1)),
                &mut self.injected,
            ));
        }
        fields
    }
}

fn benchmark_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_chain");
    let binder = Binder::new();

    for size in [1usize, 10, 50, 100].iter() {
        group.bench_with_input(BenchmarkId::new("forward", size), size, |b, &size| {
            b.iter(|| {
                let mut links: Vec<Link> = (0..size).map(Link::new).collect();
                let mut modules: Vec<&mut dyn Module> =
                    links.iter_mut().map(|l| l as &mut dyn Module).collect();
                black_box(binder.bind(&mut modules).ok())
            })
        });

        group.bench_with_input(BenchmarkId::new("reversed", size), size, |b, &size| {
            b.iter(|| {
                let mut links: Vec<Link> = (0..size).rev().map(Link::new).collect();
                let mut modules: Vec<&mut dyn Module> =
                    links.iter_mut().map(|l| l as &mut dyn Module).collect();
                black_box(binder.bind(&mut modules).ok())
            })
        });
    }

    group.finish();
}

fn benchmark_literal_producers(c: &mut Criterion) {
    struct Settings {
        port: u16,
        hosts: Vec<String>,
        ratio: f64,
    }

    impl Module for Settings {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("port", Tag::provide("port").with("literal", "8080"), &mut self.port),
                Field::new(
                    "hosts",
                    Tag::provide("hosts").with("literal", "a,b,c,d"),
                    &mut self.hosts,
                ),
                Field::new("ratio", Tag::provide("ratio").with("literal", "0.75"), &mut self.ratio),
            ]
        }
    }

    let binder = Binder::new();
    c.bench_function("literal_settings", |b| {
        b.iter(|| {
            let mut settings = Settings {
                port: 0,
                hosts: Vec::new(),
                ratio: 0.0,
            };
            binder.bind(&mut [&mut settings]).ok();
            black_box(settings.port)
        })
    });
}

criterion_group!(benches, benchmark_chain, benchmark_literal_producers);
criterion_main!(benches);
