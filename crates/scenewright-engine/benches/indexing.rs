use criterion::{Criterion, criterion_group, criterion_main};
use scenewright_engine::{
    DocumentIndexer, StatisticsAggregator, index_document, plan_scene_insertion,
    validate_document,
};
use std::sync::Arc;
mod common;

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    group.sample_size(10);

    let content = common::generate_screenplay(40, 30);

    group.bench_function("full_index", |b| {
        b.iter(|| {
            let index = index_document(std::hint::black_box(&content));
            std::hint::black_box(index);
        });
    });

    let previous = Arc::new(index_document(&content));
    group.bench_function("unchanged_reindex", |b| {
        b.iter(|| {
            let index = DocumentIndexer.index(std::hint::black_box(&content), Some(&previous));
            std::hint::black_box(index);
        });
    });

    group.bench_function("validate_document", |b| {
        b.iter(|| {
            let diagnostics = validate_document(std::hint::black_box(&content));
            std::hint::black_box(diagnostics);
        });
    });

    group.finish();
}

fn bench_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("planning");
    group.sample_size(10);

    let content = common::generate_screenplay(40, 30);
    let index = index_document(&content);

    group.bench_function("insert_in_first_scene", |b| {
        b.iter(|| {
            let plan = plan_scene_insertion(&index, &content, std::hint::black_box(4)).unwrap();
            std::hint::black_box(plan);
        });
    });

    group.bench_function("statistics_uncached", |b| {
        b.iter(|| {
            let stats = StatisticsAggregator::new().summarize(std::hint::black_box(&index));
            std::hint::black_box(stats);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_indexing, bench_planning);
criterion_main!(benches);
