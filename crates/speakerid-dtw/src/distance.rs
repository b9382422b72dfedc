//! DTW distance newtype and the aligned/rejected result domain.

use std::cmp::Ordering;
use std::fmt;

/// Numeric stand-in for "no acceptable alignment" in callers that need a
/// plain `f64`. Far above any realistic sum of MFCC frame distances.
pub const NO_ALIGNMENT: f64 = 1e12;

/// A finite, non-negative cumulative alignment cost.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DtwDistance(f64);

impl DtwDistance {
    /// Create a new DTW distance from a raw value.
    pub(crate) fn new(value: f64) -> Self {
        debug_assert!(value.is_finite() && value >= 0.0, "invalid DTW cost {value}");
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for DtwDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Why no alignment was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// At least one of the sequences has no frames.
    EmptySequence,

    /// The band is narrower than the length difference, so no path reaches `(N, M)`.
    OutsideBand {
        /// Band half-width that was requested.
        band: usize,
        /// `|N - M|` for the compared sequences.
        length_gap: usize,
    },

    /// Every cell of lattice row `row` exceeded the threshold, or the final
    /// cell did (`row == N`).
    ThresholdExceeded {
        /// One-based lattice row at which the alignment was abandoned.
        row: usize,
    },

    /// Every path to `(N, M)` accumulated a cost beyond the `f64` range.
    CostOverflow,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence => f.write_str("empty sequence"),
            Self::OutsideBand { band, length_gap } => {
                write!(f, "band {band} narrower than length gap {length_gap}")
            }
            Self::ThresholdExceeded { row } => write!(f, "threshold exceeded at row {row}"),
            Self::CostOverflow => f.write_str("alignment cost overflowed"),
        }
    }
}

/// Result of one DTW invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DtwOutcome {
    /// A feasible alignment with its minimal cumulative cost.
    Aligned(DtwDistance),
    /// No feasible or acceptable alignment.
    Rejected(Rejection),
}

impl DtwOutcome {
    /// Return the distance if an alignment was found.
    #[must_use]
    pub fn distance(&self) -> Option<DtwDistance> {
        match self {
            Self::Aligned(d) => Some(*d),
            Self::Rejected(_) => None,
        }
    }

    /// Return the rejection reason if no alignment was found.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Aligned(_) => None,
            Self::Rejected(r) => Some(*r),
        }
    }

    /// Return true if an alignment was found.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }

    /// Return the raw cost, or [`NO_ALIGNMENT`] for rejections.
    #[must_use]
    pub fn value_or_sentinel(&self) -> f64 {
        self.distance().map_or(NO_ALIGNMENT, DtwDistance::value)
    }

    /// Total ordering: aligned outcomes by cost, all rejections after them and equal
    /// to each other.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Aligned(a), Self::Aligned(b)) => a.total_cmp(b),
            (Self::Aligned(_), Self::Rejected(_)) => Ordering::Less,
            (Self::Rejected(_), Self::Aligned(_)) => Ordering::Greater,
            (Self::Rejected(_), Self::Rejected(_)) => Ordering::Equal,
        }
    }

    /// Map a raw lattice value to an outcome. Infinite values become `reason`.
    pub(crate) fn from_cost(cost: f64, reason: Rejection) -> Self {
        if cost.is_finite() {
            Self::Aligned(DtwDistance::new(cost))
        } else {
            Self::Rejected(reason)
        }
    }
}

impl fmt::Display for DtwOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aligned(d) => d.fmt(f),
            Self::Rejected(r) => write!(f, "rejected ({r})"),
        }
    }
}
