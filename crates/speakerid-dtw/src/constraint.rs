//! Band constraint types for DTW computation.

use std::ops::Range;

/// Constraint on the DTW warping window.
///
/// Lattice rows and columns are one-based: row `i` aligns frame `i - 1` of
/// the first sequence, column `j` frame `j - 1` of the second. Row and
/// column 0 are the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BandConstraint {
    /// No constraint: every column of every row is computed.
    #[default]
    Unconstrained,

    /// Sakoe-Chiba band: cell (i,j) is valid only if |i - j| <= radius.
    SakoeChibaRadius(usize),
}

impl BandConstraint {
    /// Return the valid column range for lattice row `row` of an `m`-column lattice.
    ///
    /// For unconstrained DTW, returns `1..m+1`.
    /// For Sakoe-Chiba, returns `[row - r, row + r]` clamped to `[1, m]`. The
    /// range is empty when the band misses the lattice entirely.
    #[must_use]
    pub fn column_range(&self, row: usize, m: usize) -> Range<usize> {
        match self {
            Self::Unconstrained => 1..m + 1,
            Self::SakoeChibaRadius(r) => {
                let start = row.saturating_sub(*r).max(1);
                let end = row.saturating_add(*r).min(m) + 1;
                start..end.max(start)
            }
        }
    }

    /// Return true if a path from `(0, 0)` to `(n, m)` fits inside the band.
    #[must_use]
    pub fn admits(&self, n: usize, m: usize) -> bool {
        match self {
            Self::Unconstrained => true,
            Self::SakoeChibaRadius(r) => n.abs_diff(m) <= *r,
        }
    }

    /// Return the band radius, or `None` when unconstrained.
    #[must_use]
    pub fn radius(&self) -> Option<usize> {
        match self {
            Self::Unconstrained => None,
            Self::SakoeChibaRadius(r) => Some(*r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconstrained_full_range() {
        let c = BandConstraint::Unconstrained;
        assert_eq!(c.column_range(1, 10), 1..11);
        assert_eq!(c.column_range(7, 10), 1..11);
    }

    #[test]
    fn sakoe_chiba_middle_row() {
        let c = BandConstraint::SakoeChibaRadius(2);
        assert_eq!(c.column_range(5, 10), 3..8);
    }

    #[test]
    fn sakoe_chiba_first_row_clamps_to_one() {
        let c = BandConstraint::SakoeChibaRadius(2);
        assert_eq!(c.column_range(1, 10), 1..4);
    }

    #[test]
    fn sakoe_chiba_last_row() {
        let c = BandConstraint::SakoeChibaRadius(2);
        assert_eq!(c.column_range(10, 10), 8..11);
    }

    #[test]
    fn zero_radius_is_diagonal() {
        let c = BandConstraint::SakoeChibaRadius(0);
        assert_eq!(c.column_range(4, 10), 4..5);
    }

    #[test]
    fn band_past_last_column_is_empty() {
        // Row 8 of a 3-column lattice with radius 2 starts at column 6.
        let c = BandConstraint::SakoeChibaRadius(2);
        assert!(c.column_range(8, 3).is_empty());
    }

    #[test]
    fn sakoe_chiba_radius_exceeds_size() {
        let c = BandConstraint::SakoeChibaRadius(20);
        assert_eq!(c.column_range(3, 5), 1..6);
    }

    #[test]
    fn huge_radius_does_not_overflow() {
        let c = BandConstraint::SakoeChibaRadius(usize::MAX);
        assert_eq!(c.column_range(3, 5), 1..6);
        assert!(c.admits(1, 1000));
    }

    #[test]
    fn admits_checks_length_gap() {
        let c = BandConstraint::SakoeChibaRadius(2);
        assert!(c.admits(10, 12));
        assert!(c.admits(12, 10));
        assert!(!c.admits(10, 13));
        assert!(BandConstraint::Unconstrained.admits(1, 100));
    }

    #[test]
    fn default_is_unconstrained() {
        assert_eq!(BandConstraint::default(), BandConstraint::Unconstrained);
        assert_eq!(BandConstraint::default().radius(), None);
    }
}
