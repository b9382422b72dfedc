//! Criterion benchmarks for speakerid-dtw: full lattice, banded, and early-abandoning DTW.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use speakerid_dtw::{Dtw, MFCC_DIM, Sequence};

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

fn bench_full_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("dtw_full_lattice");

    for &len in &[64usize, 256] {
        let a = make_utterance(len, 0.0);
        let b = make_utterance(len, 1.0);
        group.bench_with_input(BenchmarkId::from_parameter(len), &(a, b), |bencher, (a, b)| {
            bencher.iter(|| Dtw::unconstrained().lattice(a, b).unwrap().outcome());
        });
    }

    group.finish();
}

fn bench_banded(c: &mut Criterion) {
    let lengths = [64usize, 256, 1024];
    let bands: &[(Option<usize>, &str)] = &[
        (None, "unconstrained"),
        (Some(4), "band_w4"),
        (Some(16), "band_w16"),
    ];

    let mut group = c.benchmark_group("dtw_banded");

    for &len in &lengths {
        for &(band, band_label) in bands {
            let id = BenchmarkId::new(format!("len{len}"), band_label);
            let a = make_utterance(len, 0.0);
            let b = make_utterance(len, 1.0);
            let dtw = match band {
                None => Dtw::unconstrained(),
                Some(w) => Dtw::with_sakoe_chiba(w),
            };

            group.bench_with_input(id, &(a, b, dtw), |bencher, (a, b, dtw)| {
                bencher.iter(|| dtw.distance(a, b).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_early_abandon(c: &mut Criterion) {
    let a = make_utterance(512, 0.0);
    let b = make_utterance(512, 1.0);
    let dtw = Dtw::with_sakoe_chiba(16);
    let exact = dtw.distance(&a, &b).unwrap().value_or_sentinel();

    let mut group = c.benchmark_group("dtw_threshold_len512_w16");
    for (label, threshold) in [("never_binding", exact), ("tenth", exact * 0.1)] {
        group.bench_function(label, |bencher| {
            bencher.iter(|| dtw.distance_with_threshold(&a, &b, threshold).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_lattice, bench_banded, bench_early_abandon);
criterion_main!(benches);
