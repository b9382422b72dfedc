//! Identification configuration builder.

use speakerid_dtw::Sequence;

use crate::error::MatchError;
use crate::result::Identification;
use crate::search;
use crate::template::TemplateBank;

/// Which DTW variant scores each template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Exact DTW over the full lattice. O(n * m) time and space per template.
    Full,
    /// Sakoe-Chiba banded DTW on rolling rows.
    Banded {
        /// Band half-width `W`.
        band: usize,
    },
    /// Banded DTW that abandons a template once a whole lattice row exceeds
    /// the current threshold.
    Thresholded {
        /// Band half-width `W`.
        band: usize,
    },
}

/// How the template bank is traversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Score every template in order against the rejection threshold.
    #[default]
    Exhaustive,
    /// Score templates in order, tightening the abandonment threshold to the
    /// best distance found so far. Only saves work with [`Variant::Thresholded`];
    /// templates abandoned this way are reported as rejected.
    BestSoFar,
    /// Score templates independently on the rayon pool against the rejection
    /// threshold only.
    Parallel,
}

/// Configuration for closest-template identification.
///
/// Construct via [`MatchConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter             | Default                        |
/// |-----------------------|--------------------------------|
/// | `rejection_threshold` | none (every alignment accepted) |
/// | `search`              | `SearchStrategy::Exhaustive`   |
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub(crate) variant: Variant,
    pub(crate) rejection_threshold: Option<f64>,
    pub(crate) search: SearchStrategy,
}

impl MatchConfig {
    /// Create a configuration scoring templates with `variant`.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            rejection_threshold: None,
            search: SearchStrategy::Exhaustive,
        }
    }

    /// Reject every template whose distance exceeds `threshold`. Validated by
    /// [`MatchConfig::identify`].
    #[must_use]
    pub fn with_rejection_threshold(mut self, threshold: f64) -> Self {
        self.rejection_threshold = Some(threshold);
        self
    }

    /// Set the bank traversal strategy.
    #[must_use]
    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    /// Return the DTW variant.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Return the rejection threshold, if set.
    #[must_use]
    pub fn rejection_threshold(&self) -> Option<f64> {
        self.rejection_threshold
    }

    /// Return the bank traversal strategy.
    #[must_use]
    pub fn search(&self) -> SearchStrategy {
        self.search
    }

    /// Score `candidate` against every template in `bank` and pick the closest.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MatchError::InvalidThreshold`] | Rejection threshold is negative or NaN |
    /// | [`MatchError::DimensionMismatch`] | Candidate and bank differ in frame dimension |
    /// | [`MatchError::Dtw`] | A DTW invocation rejects its inputs |
    pub fn identify(
        &self,
        candidate: &Sequence,
        bank: &TemplateBank,
    ) -> Result<Identification, MatchError> {
        search::identify(candidate, bank, self)
    }
}
