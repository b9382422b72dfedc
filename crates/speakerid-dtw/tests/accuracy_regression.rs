//! Accuracy regression tests for speakerid-dtw.
//!
//! Synthetic 13-coefficient "utterances" stand in for MFCC output. Reference
//! values were computed from the recurrence and are hardcoded to catch
//! regressions in any of the three variants.

use speakerid_dtw::{Dtw, DtwOutcome, MFCC_DIM, Rejection, Sequence};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `n` frames of a smooth trajectory; `rate` stretches time, `phase` shifts it.
fn utterance(n: usize, phase: f64, rate: f64) -> Sequence {
    let rows = (0..n)
        .map(|i| {
            (0..MFCC_DIM)
                .map(|k| {
                    (rate * i as f64 * 0.35 + phase + 0.7 * k as f64).sin() * (1.0 + k as f64 * 0.5)
                })
                .collect()
        })
        .collect();
    Sequence::from_rows(rows).expect("valid synthetic utterance")
}

fn assert_cost(outcome: DtwOutcome, expected: f64, label: &str) {
    let got = outcome
        .distance()
        .unwrap_or_else(|| panic!("{label}: expected {expected}, got {outcome}"))
        .value();
    let tol = 1e-9 * expected.max(1.0);
    assert!(
        (got - expected).abs() < tol,
        "{label}: got {got:.15}, expected {expected:.15}"
    );
}

// ---------------------------------------------------------------------------
// a) full_dtw_matches_known_values
// ---------------------------------------------------------------------------

#[test]
fn full_dtw_matches_known_values() {
    let base = utterance(20, 0.0, 1.0);
    let cases = [
        ("same", utterance(20, 0.0, 1.0), 0.0),
        ("stretched", utterance(25, 0.0, 0.8), 30.679907960756214),
        ("phase shifted", utterance(20, 1.5, 1.0), 1077.7833364230114),
    ];

    for (label, template, expected) in cases {
        let outcome = Dtw::unconstrained().lattice(&base, &template).unwrap().outcome();
        assert_cost(outcome, expected, label);
    }

    let long = utterance(30, 0.0, 1.0);
    let short = utterance(24, 0.2, 1.25);
    let outcome = Dtw::unconstrained().lattice(&long, &short).unwrap().outcome();
    assert_cost(outcome, 59.4905068387352, "mixed");
}

// ---------------------------------------------------------------------------
// b) banded_dtw_matches_known_values
// ---------------------------------------------------------------------------

#[test]
fn banded_dtw_matches_known_values() {
    let base = utterance(20, 0.0, 1.0);
    let shifted = utterance(20, 1.5, 1.0);

    assert_cost(Dtw::with_sakoe_chiba(0).distance(&base, &shifted).unwrap(), 4751.632986178421, "r0");
    assert_cost(Dtw::with_sakoe_chiba(2).distance(&base, &shifted).unwrap(), 2221.290839195373, "r2");
    assert_cost(Dtw::with_sakoe_chiba(5).distance(&base, &shifted).unwrap(), 1077.7833364230114, "r5");
}

// ---------------------------------------------------------------------------
// c) band_too_narrow_for_length_gap
// ---------------------------------------------------------------------------

#[test]
fn band_too_narrow_for_length_gap() {
    let long = utterance(30, 0.0, 1.0);
    let short = utterance(24, 0.2, 1.25);

    for r in [0, 2, 5] {
        let outcome = Dtw::with_sakoe_chiba(r).distance(&long, &short).unwrap();
        assert_eq!(
            outcome,
            DtwOutcome::Rejected(Rejection::OutsideBand {
                band: r,
                length_gap: 6
            }),
            "radius {r}"
        );
    }
    assert_cost(Dtw::with_sakoe_chiba(6).distance(&long, &short).unwrap(), 59.4905068387352, "r6");
}

// ---------------------------------------------------------------------------
// d) early_abandonment_matches_known_rows
// ---------------------------------------------------------------------------

#[test]
fn early_abandonment_matches_known_rows() {
    let base = utterance(20, 0.0, 1.0);
    let shifted = utterance(20, 1.5, 1.0);
    let dtw = Dtw::with_sakoe_chiba(2);

    let tight = dtw.distance_with_threshold(&base, &shifted, 500.0).unwrap();
    assert_eq!(tight, DtwOutcome::Rejected(Rejection::ThresholdExceeded { row: 4 }));

    // Just below the banded cost: every row survives but the end cell does not.
    let near = dtw.distance_with_threshold(&base, &shifted, 2221.0).unwrap();
    assert_eq!(near, DtwOutcome::Rejected(Rejection::ThresholdExceeded { row: 20 }));

    let loose = dtw.distance_with_threshold(&base, &shifted, 2221.3).unwrap();
    assert_cost(loose, 2221.290839195373, "loose threshold");

    let long = utterance(30, 0.0, 1.0);
    let short = utterance(24, 0.2, 1.25);
    let dtw = Dtw::with_sakoe_chiba(6);
    assert_eq!(
        dtw.distance_with_threshold(&long, &short, 10.0).unwrap(),
        DtwOutcome::Rejected(Rejection::ThresholdExceeded { row: 6 })
    );
}

// ---------------------------------------------------------------------------
// e) rolling_matches_full_lattice
// ---------------------------------------------------------------------------

/// `distance()` (rolling rows) must match the materialized lattice for every band.
#[test]
fn rolling_matches_full_lattice() {
    let pairs = [
        (utterance(20, 0.0, 1.0), utterance(25, 0.0, 0.8)),
        (utterance(20, 0.0, 1.0), utterance(20, 1.5, 1.0)),
        (utterance(30, 0.0, 1.0), utterance(24, 0.2, 1.25)),
        (utterance(7, 0.4, 2.0), utterance(11, 0.1, 1.0)),
    ];

    for (i, (a, b)) in pairs.iter().enumerate() {
        for dtw in [Dtw::unconstrained(), Dtw::with_sakoe_chiba(6), Dtw::with_sakoe_chiba(12)] {
            let rolled = dtw.distance(a, b).unwrap();
            let full = dtw.lattice(a, b).unwrap().outcome();
            assert_eq!(
                rolled.is_aligned(),
                full.is_aligned(),
                "pair {i} {:?}",
                dtw.constraint()
            );
            if let (Some(r), Some(f)) = (rolled.distance(), full.distance()) {
                assert!(
                    (r.value() - f.value()).abs() < 1e-9,
                    "pair {i}: rolling {r} != lattice {f}"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// f) long_diagonal_band
// ---------------------------------------------------------------------------

/// N = M = 100 with a zero band reduces to the sum of equal-index frame distances.
#[test]
fn long_diagonal_band() {
    let a = utterance(100, 0.0, 1.0);
    let b = utterance(100, 0.3, 1.0);
    let expected: f64 = a
        .iter()
        .zip(&b)
        .map(|(x, y)| speakerid_dtw::frame_distance(x, y).unwrap())
        .sum();
    assert_cost(Dtw::with_sakoe_chiba(0).distance(&a, &b).unwrap(), expected, "diagonal");
}
