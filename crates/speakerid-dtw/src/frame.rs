//! Feature frames, frame sequences, and the frame distance metric.

use std::ops::Index;

use crate::error::DtwError;

/// Number of MFCC coefficients per frame produced by the feature extractor.
pub const MFCC_DIM: usize = 13;

/// One analysis window's feature vector. Guaranteed non-empty with all finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame(Box<[f64]>);

impl Frame {
    /// Create a new frame, validating that it is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptyFrame`] | `coefficients` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(coefficients: Vec<f64>) -> Result<Self, DtwError> {
        if coefficients.is_empty() {
            return Err(DtwError::EmptyFrame);
        }
        if let Some(index) = coefficients.iter().position(|v| !v.is_finite()) {
            return Err(DtwError::NonFiniteValue { index });
        }
        Ok(Self(coefficients.into_boxed_slice()))
    }

    /// Return the number of coefficients.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Return the coefficients as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl AsRef<[f64]> for Frame {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// An ordered list of frames sharing one dimension.
///
/// An empty sequence is valid; it carries the dimension it was declared with
/// but can never be aligned against anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    dim: usize,
    frames: Vec<Frame>,
}

impl Sequence {
    /// Create a sequence of `dim`-coefficient frames.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::InconsistentFrame`] for the first frame whose
    /// dimension differs from `dim`.
    pub fn new(dim: usize, frames: Vec<Frame>) -> Result<Self, DtwError> {
        if let Some((index, frame)) = frames.iter().enumerate().find(|(_, f)| f.dim() != dim) {
            return Err(DtwError::InconsistentFrame {
                index,
                expected: dim,
                got: frame.dim(),
            });
        }
        Ok(Self { dim, frames })
    }

    /// Build a sequence from raw coefficient rows, inferring the dimension
    /// from the first row. An empty `rows` yields an empty sequence of dimension 0.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptyFrame`] | A row is empty |
    /// | [`DtwError::NonFiniteValue`] | A row contains NaN or infinity |
    /// | [`DtwError::InconsistentFrame`] | A row's length differs from the first |
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DtwError> {
        let dim = rows.first().map_or(0, Vec::len);
        let frames = rows
            .into_iter()
            .map(Frame::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dim, frames)
    }

    /// Return the coefficient count shared by every frame.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return true if the sequence has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate over the frames in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }
}

impl Index<usize> for Sequence {
    type Output = Frame;

    fn index(&self, index: usize) -> &Self::Output {
        &self.frames[index]
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Squared Euclidean distance between two frames.
///
/// The square root is omitted: the value is only ever summed inside a
/// minimization, and `sqrt` is monotonic.
///
/// # Errors
///
/// Returns [`DtwError::DimensionMismatch`] if the frames differ in dimension.
pub fn frame_distance(a: &Frame, b: &Frame) -> Result<f64, DtwError> {
    if a.dim() != b.dim() {
        return Err(DtwError::DimensionMismatch {
            expected: a.dim(),
            got: b.dim(),
        });
    }
    Ok(squared_euclidean(a.as_slice(), b.as_slice()))
}

/// Unchecked squared Euclidean distance. Callers guarantee equal lengths.
#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Check that two sequences can be compared.
///
/// Empty sequences are exempt: they have no frames that could disagree.
pub(crate) fn check_dims(a: &Sequence, b: &Sequence) -> Result<(), DtwError> {
    if !a.is_empty() && !b.is_empty() && a.dim() != b.dim() {
        return Err(DtwError::DimensionMismatch {
            expected: a.dim(),
            got: b.dim(),
        });
    }
    Ok(())
}
