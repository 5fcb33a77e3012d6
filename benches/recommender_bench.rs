//! Benchmark for a full recommendation
//!
//! Measures:
//! - End-to-end recommendation for growing fleets
//! - Storage path search alone

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use twin_cost::graph::CostGraph;
use twin_cost::path::cheapest_path;
use twin_cost::pricing::parse_pricing_json;
use twin_cost::{ArchitectureRecommender, RecommenderOptions, StorageNode, StorageTier, WorkloadInput};

fn workload(devices: f64) -> WorkloadInput {
    WorkloadInput {
        devices,
        interval_minutes: 5.0,
        message_size_kb: 1.0,
        hot_months: 1.0,
        cool_months: 3.0,
        archive_months: 12.0,
        entity_count: None,
        editors: 2.0,
        viewers: 5.0,
        dashboard_refreshes_per_hour: 4.0,
        dashboard_active_hours_per_day: 8.0,
    }
}

fn bench_recommend(c: &mut Criterion) {
    let table = parse_pricing_json(include_str!("../pricing.json")).unwrap();
    let recommender = ArchitectureRecommender::new(&table, RecommenderOptions::default());

    let mut group = c.benchmark_group("recommend");
    for devices in [100.0, 10_000.0, 1_000_000.0] {
        let input = workload(devices);
        group.bench_with_input(BenchmarkId::from_parameter(devices), &input, |b, input| {
            b.iter(|| recommender.recommend(black_box(input)).unwrap())
        });
    }
    group.finish();
}

fn bench_cheapest_path(c: &mut Criterion) {
    let graph = CostGraph::from_costs([3.0, 1.0, 2.0, 2.5, 0.5, 0.7], |from, to| {
        if from.provider == to.provider {
            0.0
        } else {
            0.4
        }
    })
    .unwrap();
    let starts = StorageNode::in_tier(StorageTier::Hot);
    let ends = StorageNode::in_tier(StorageTier::Archive);

    c.bench_function("cheapest_path", |b| {
        b.iter(|| cheapest_path(black_box(&graph), &starts, &ends).unwrap())
    });
}

criterion_group!(benches, bench_recommend, bench_cheapest_path);
criterion_main!(benches);
