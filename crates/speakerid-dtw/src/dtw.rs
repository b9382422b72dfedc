//! DTW distance computation.

use std::ops::Range;

use tracing::{debug, instrument};

use crate::constraint::BandConstraint;
use crate::distance::{DtwOutcome, Rejection};
use crate::error::DtwError;
use crate::frame::{Sequence, check_dims, squared_euclidean};
use crate::lattice::CostLattice;

/// Immutable DTW configuration. Thread-safe and copyable.
///
/// Every method allocates its own working rows, so one `Dtw` can score a
/// candidate against many templates from several threads at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dtw {
    constraint: BandConstraint,
}

impl Dtw {
    /// Create an unconstrained DTW calculator.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            constraint: BandConstraint::Unconstrained,
        }
    }

    /// Create a DTW calculator with a Sakoe-Chiba band of half-width `radius`.
    #[must_use]
    pub fn with_sakoe_chiba(radius: usize) -> Self {
        Self {
            constraint: BandConstraint::SakoeChibaRadius(radius),
        }
    }

    /// Return the band constraint configuration.
    #[must_use]
    pub fn constraint(&self) -> BandConstraint {
        self.constraint
    }

    /// Fill the complete cost lattice.
    ///
    /// This is the reference computation: O(n * m) time and space. With
    /// [`Dtw::unconstrained`] the result is exact full DTW; with a band the
    /// out-of-band cells are left unreachable. Use the returned
    /// [`CostLattice`] for the cost and the warping path.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::DimensionMismatch`] if the sequences differ in dimension.
    #[instrument(level = "debug", skip_all, fields(n = a.len(), m = b.len()))]
    pub fn lattice(&self, a: &Sequence, b: &Sequence) -> Result<CostLattice, DtwError> {
        check_dims(a, b)?;
        Ok(CostLattice::fill(a, b, self.constraint))
    }

    /// Compute the DTW distance between two sequences.
    ///
    /// Uses two rolling rows of length `m + 1` rather than the full lattice.
    /// Runs in O(n * w) time and O(m) space, where `w` is `m` for unconstrained
    /// and `2r + 1` for Sakoe-Chiba radius `r`.
    ///
    /// # Errors
    ///
    /// | Condition | Result |
    /// |---|---|
    /// | Sequences differ in dimension | `Err(DtwError::DimensionMismatch)` |
    /// | Either sequence empty | `Ok(Rejected(EmptySequence))` |
    /// | Band narrower than `abs(n - m)` | `Ok(Rejected(OutsideBand))` |
    /// | Every admissible path overflows `f64` | `Ok(Rejected(CostOverflow))` |
    /// | Otherwise | `Ok(Aligned(cost))` |
    #[instrument(level = "debug", skip_all, fields(n = a.len(), m = b.len()))]
    pub fn distance(&self, a: &Sequence, b: &Sequence) -> Result<DtwOutcome, DtwError> {
        check_dims(a, b)?;
        Ok(self.rolling(a, b, None))
    }

    /// Compute the DTW distance with early abandoning.
    ///
    /// A cell is kept only if its cumulative cost is `<= threshold`. Costs
    /// never decrease along a path, so once a whole row exceeds the threshold
    /// no later row can recover and the computation stops there. The result is
    /// exact: if an alignment is returned it equals [`Dtw::distance`], and it is
    /// returned whenever that distance is `<= threshold`.
    ///
    /// `threshold` may be `f64::INFINITY`, in which case only a row whose
    /// every cell overflowed is abandoned.
    ///
    /// # Errors
    ///
    /// | Condition | Result |
    /// |---|---|
    /// | `threshold` negative or NaN | `Err(DtwError::InvalidParameter)` |
    /// | Sequences differ in dimension | `Err(DtwError::DimensionMismatch)` |
    /// | A row or the final cell exceeds a finite `threshold` | `Ok(Rejected(ThresholdExceeded))` |
    /// | Infinite `threshold` and the cost overflows | `Ok(Rejected(CostOverflow))` |
    #[instrument(level = "debug", skip(self, a, b), fields(n = a.len(), m = b.len()))]
    pub fn distance_with_threshold(
        &self,
        a: &Sequence,
        b: &Sequence,
        threshold: f64,
    ) -> Result<DtwOutcome, DtwError> {
        validate_threshold(threshold)?;
        check_dims(a, b)?;
        Ok(self.rolling(a, b, Some(threshold)))
    }

    /// Rolling two-row DTW with optional early abandoning.
    ///
    /// Row buffers are indexed by lattice column `0..=m`; column 0 is the
    /// boundary. Only the band of the row a buffer last held is reset before
    /// reuse, so every cell outside the current band reads as unreachable
    /// without an O(m) clear per row.
    fn rolling(&self, a: &Sequence, b: &Sequence, threshold: Option<f64>) -> DtwOutcome {
        let n = a.len();
        let m = b.len();

        if n == 0 || m == 0 {
            return DtwOutcome::Rejected(Rejection::EmptySequence);
        }
        if !self.constraint.admits(n, m) {
            return DtwOutcome::Rejected(Rejection::OutsideBand {
                band: self.constraint.radius().unwrap_or(0),
                length_gap: n.abs_diff(m),
            });
        }

        let mut prev = vec![f64::INFINITY; m + 1];
        let mut curr = vec![f64::INFINITY; m + 1];
        prev[0] = 0.0;

        let mut prev_cols: Range<usize> = 0..1;
        let mut stale: Range<usize> = 0..0;

        for i in 1..=n {
            curr[stale].fill(f64::INFINITY);

            let cols = self.constraint.column_range(i, m);
            let fa = a[i - 1].as_slice();
            let mut row_alive = false;

            for j in cols.clone() {
                let cost = squared_euclidean(fa, b[j - 1].as_slice());
                let best = prev[j].min(prev[j - 1]).min(curr[j - 1]);
                let val = cost + best;

                if threshold.is_some_and(|t| val > t) {
                    continue;
                }
                curr[j] = val;
                row_alive |= val.is_finite();
            }

            if let Some(t) = threshold
                && !row_alive
            {
                // With an infinite threshold only an overflowed row can be dead.
                if t.is_infinite() {
                    debug!(row = i, "every cell in row overflowed, abandoning");
                    return DtwOutcome::Rejected(Rejection::CostOverflow);
                }
                debug!(row = i, "every cell in row exceeds threshold, abandoning");
                return DtwOutcome::Rejected(Rejection::ThresholdExceeded { row: i });
            }

            stale = prev_cols;
            prev_cols = cols;
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap, `prev` holds row n. The band admits a path, so
        // an unreachable end cell means the threshold cut it or the cost overflowed.
        let reason = match threshold {
            Some(t) if t < f64::INFINITY => Rejection::ThresholdExceeded { row: n },
            _ => Rejection::CostOverflow,
        };
        DtwOutcome::from_cost(prev[m], reason)
    }
}

fn validate_threshold(threshold: f64) -> Result<(), DtwError> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(DtwError::InvalidParameter {
            name: "threshold",
            value: threshold,
        });
    }
    Ok(())
}
