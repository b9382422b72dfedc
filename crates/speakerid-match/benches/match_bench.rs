//! Criterion benchmarks for speakerid-match: one candidate against a 64-template bank.

use criterion::{Criterion, criterion_group, criterion_main};

use speakerid_dtw::{MFCC_DIM, Sequence};
use speakerid_match::{MatchConfig, SearchStrategy, SpeakerId, Template, TemplateBank, Variant};

fn make_utterance(n: usize, phase: f64) -> Sequence {
    let rows = (0..n)
        .map(|i| {
            (0..MFCC_DIM)
                .map(|k| (i as f64 * 0.1 + phase + k as f64 * 0.3).sin())
                .collect()
        })
        .collect();
    Sequence::from_rows(rows).unwrap()
}

fn make_bank() -> TemplateBank {
    let templates = (0..64)
        .map(|i| {
            let speaker = SpeakerId::new(format!("speaker{}", i % 8)).unwrap();
            Template::new(speaker, format!("take{i}"), make_utterance(180 + i % 20, i as f64 * 0.05))
        })
        .collect();
    TemplateBank::new(templates).unwrap()
}

fn bench_identify(c: &mut Criterion) {
    let bank = make_bank();
    let candidate = make_utterance(190, 1.0);
    let configs = [
        ("banded_exhaustive", MatchConfig::new(Variant::Banded { band: 24 })),
        (
            "thresholded_best_so_far",
            MatchConfig::new(Variant::Thresholded { band: 24 }).with_search(SearchStrategy::BestSoFar),
        ),
        (
            "banded_parallel",
            MatchConfig::new(Variant::Banded { band: 24 }).with_search(SearchStrategy::Parallel),
        ),
    ];

    let mut group = c.benchmark_group("identify_64x190");
    for (label, config) in &configs {
        group.bench_function(*label, |b| {
            b.iter(|| config.identify(&candidate, &bank).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_identify);
criterion_main!(benches);
