//! Materialized DTW cost lattice and warping path traceback.

use crate::constraint::BandConstraint;
use crate::distance::{DtwOutcome, Rejection};
use crate::frame::{Sequence, squared_euclidean};

/// One aligned frame pair: frame `left` of the first sequence matched with
/// frame `right` of the second. Zero-based frame indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentStep {
    /// Frame index in the first sequence.
    pub left: usize,
    /// Frame index in the second sequence.
    pub right: usize,
}

/// Optimal alignment from the first frame pair to the last, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpingPath(Vec<AlignmentStep>);

impl WarpingPath {
    /// Return the aligned frame pairs as a slice.
    #[must_use]
    pub fn steps(&self) -> &[AlignmentStep] {
        &self.0
    }

    /// Return the number of aligned frame pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path has no steps. Never true for a traced path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a AlignmentStep;
    type IntoIter = std::slice::Iter<'a, AlignmentStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The full `(N+1) x (M+1)` cumulative cost lattice.
///
/// Cell `(i, j)` holds the minimal cost of aligning the first `i` frames of
/// one sequence with the first `j` frames of the other. `(0, 0)` is zero and
/// every other boundary cell is unreachable, so both sequences must consume
/// a frame before the first match.
#[derive(Debug, Clone)]
pub struct CostLattice {
    n: usize,
    m: usize,
    constraint: BandConstraint,
    cells: Vec<f64>,
}

impl CostLattice {
    /// Fill the lattice row-major. Dimensions must already be checked.
    pub(crate) fn fill(a: &Sequence, b: &Sequence, constraint: BandConstraint) -> Self {
        let n = a.len();
        let m = b.len();
        let width = m + 1;
        let mut cells = vec![f64::INFINITY; (n + 1) * width];
        cells[0] = 0.0;

        for i in 1..=n {
            let fa = a[i - 1].as_slice();
            for j in constraint.column_range(i, m) {
                let cost = squared_euclidean(fa, b[j - 1].as_slice());
                let above = cells[(i - 1) * width + j];
                let left = cells[i * width + j - 1];
                let diag = cells[(i - 1) * width + j - 1];
                cells[i * width + j] = cost + above.min(left).min(diag);
            }
        }

        Self {
            n,
            m,
            constraint,
            cells,
        }
    }

    /// Return `(N + 1, M + 1)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n + 1, self.m + 1)
    }

    /// Return the cumulative cost at `(i, j)`, or `None` if the cell is
    /// unreachable or outside the lattice (`i > N` or `j > M`).
    #[must_use]
    pub fn cell(&self, i: usize, j: usize) -> Option<f64> {
        if i > self.n || j > self.m {
            return None;
        }
        Some(self.raw(i, j)).filter(|v| v.is_finite())
    }

    /// Return the alignment cost `cost(N, M)`.
    #[must_use]
    pub fn outcome(&self) -> DtwOutcome {
        if self.n == 0 || self.m == 0 {
            return DtwOutcome::Rejected(Rejection::EmptySequence);
        }
        if !self.constraint.admits(self.n, self.m) {
            return DtwOutcome::Rejected(Rejection::OutsideBand {
                band: self.constraint.radius().unwrap_or(0),
                length_gap: self.n.abs_diff(self.m),
            });
        }
        DtwOutcome::from_cost(self.raw(self.n, self.m), Rejection::CostOverflow)
    }

    /// Trace the optimal warping path back from `(N, M)`.
    ///
    /// Ties between predecessors prefer the diagonal, then the cell above.
    /// Returns `None` when there is no alignment.
    #[must_use]
    pub fn warping_path(&self) -> Option<WarpingPath> {
        if !self.outcome().is_aligned() {
            return None;
        }

        let mut steps = Vec::with_capacity(self.n + self.m);
        let (mut i, mut j) = (self.n, self.m);
        loop {
            steps.push(AlignmentStep {
                left: i - 1,
                right: j - 1,
            });
            if i == 1 && j == 1 {
                break;
            }
            let diag = self.raw(i - 1, j - 1);
            let above = self.raw(i - 1, j);
            let left = self.raw(i, j - 1);
            if diag <= above && diag <= left {
                i -= 1;
                j -= 1;
            } else if above <= left {
                i -= 1;
            } else {
                j -= 1;
            }
        }

        steps.reverse();
        Some(WarpingPath(steps))
    }

    fn raw(&self, i: usize, j: usize) -> f64 {
        self.cells[i * (self.m + 1) + j]
    }
}
