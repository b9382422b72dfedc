//! DTW alignment kernel for MFCC frame sequences.
//!
//! Pure math library, zero I/O. Compares two sequences of fixed-dimension
//! feature frames with Dynamic Time Warping: the full reference lattice,
//! a Sakoe-Chiba banded variant on two rolling rows, and the banded variant
//! with threshold-driven early abandoning.

mod constraint;
mod distance;
mod dtw;
mod error;
mod frame;
mod lattice;

pub use constraint::BandConstraint;
pub use distance::{DtwDistance, DtwOutcome, NO_ALIGNMENT, Rejection};
pub use dtw::Dtw;
pub use error::DtwError;
pub use frame::{Frame, MFCC_DIM, Sequence, frame_distance};
pub use lattice::{AlignmentStep, CostLattice, WarpingPath};
