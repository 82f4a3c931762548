//! Attribution benchmark: closed-form linear vs exact coalition enumeration.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use turnover_insight::config::{AttributionConfig, AttributionMethod};
use turnover_insight::features::{Feature, FeatureVector, ReferencePopulation};
use turnover_insight::model::LogisticModel;
use turnover_insight::AttributionEngine;

fn model() -> LogisticModel {
    let names: Vec<String> = Feature::ALL.iter().map(|f| f.name().to_string()).collect();
    LogisticModel::new(names, &[-4.0, 0.5, 0.3, 0.01, 0.25, -1.5, -0.7], -1.0, None, 0.5).unwrap()
}

fn reference(n: usize) -> ReferencePopulation {
    let rows = (0..n)
        .map(|i| {
            let f = i as f64;
            FeatureVector::new([
                (f * 0.137) % 1.0,
                0.4 + (f * 0.071) % 0.6,
                (2 + i % 6) as f64,
                100.0 + (f * 17.0) % 200.0,
                (1 + i % 8) as f64,
                (i % 7 == 0) as u8 as f64,
                (i % 3) as f64,
            ])
            .unwrap()
        })
        .collect::<Vec<_>>();
    ReferencePopulation::from_vectors(&rows)
}

fn bench_attribution(c: &mut Criterion) {
    let model = model();
    let fv = FeatureVector::new([0.1, 0.85, 6.0, 280.0, 4.0, 0.0, 0.0]).unwrap();

    let mut g = c.benchmark_group("attribution_by_background");
    for n in [10usize, 50, 100] {
        let reference = reference(n);
        for method in [AttributionMethod::Linear, AttributionMethod::Exact] {
            let engine = AttributionEngine::new(AttributionConfig {
                method,
                timeout_ms: 0,
                ..AttributionConfig::default()
            });
            g.bench_function(format!("{:?}_{}", method, n).as_str(), |b| {
                b.iter(|| engine.explain(&model, &reference, black_box(&fv)))
            });
        }
    }
    g.finish();
}

criterion_group!(benches, bench_attribution);
criterion_main!(benches);
