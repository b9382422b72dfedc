//! CSV frame sequence reader with full input validation.

use std::path::{Path, PathBuf};

use speakerid_dtw::{MFCC_DIM, Sequence};
use tracing::{debug, instrument};

use crate::IoError;

/// Reads one feature sequence from a CSV file.
///
/// Expected CSV format:
/// - Header row required, one column per coefficient (`c0,c1,...,c12`)
/// - One row per frame, in time order
/// - Every row has exactly as many columns as the header
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::DimensionMismatch`] | Header column count differs from the expected dimension |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
/// | [`IoError::EmptySequence`] | Zero frames after header |
pub struct SequenceReader {
    path: PathBuf,
    dim: usize,
}

impl SequenceReader {
    /// Create a reader for the given CSV file, expecting [`MFCC_DIM`] coefficients per frame.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            dim: MFCC_DIM,
        }
    }

    /// Expect `dim` coefficients per frame instead of [`MFCC_DIM`].
    #[must_use]
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Read and validate the CSV file, returning a non-empty [`Sequence`].
    #[instrument(skip(self), fields(path = %self.path.display(), dim = self.dim))]
    pub fn read(&self) -> Result<Sequence, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so short or long rows surface as InconsistentRowLength
        // rather than a generic CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        let expected_cols = header.len();
        if expected_cols != self.dim {
            return Err(IoError::DimensionMismatch {
                path: self.path.clone(),
                expected: self.dim,
                got: expected_cols,
            });
        }

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut frame = Vec::with_capacity(expected_cols);
            for (col_index, raw) in record.iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    })?;
                frame.push(value);
            }
            rows.push(frame);
        }

        if rows.is_empty() {
            return Err(IoError::EmptySequence {
                path: self.path.clone(),
            });
        }

        let sequence = Sequence::from_rows(rows).map_err(|e| IoError::Sequence {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(frames = sequence.len(), "sequence loaded");
        Ok(sequence)
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn read3(content: &str) -> Result<Sequence, IoError> {
        let f = write_csv(content);
        SequenceReader::new(f.path()).with_dim(3).read()
    }

    #[test]
    fn read_valid_sequence() {
        let seq = read3("c0,c1,c2\n0.0,0.1,0.2\n1.0,1.1,1.2\n2.0,2.1,2.2\n3.0,3.1,3.2\n").unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.dim(), 3);
        assert_eq!(seq[2].as_slice(), &[2.0, 2.1, 2.2]);
    }

    #[test]
    fn value_round_trip() {
        let seq = read3("c0,c1,c2\n1.23456789,-9.87654321,1e-3\n").unwrap();
        let vals = seq[0].as_slice();
        assert!((vals[0] - 1.23456789).abs() < 1e-12);
        assert!((vals[1] + 9.87654321).abs() < 1e-12);
        assert!((vals[2] - 0.001).abs() < 1e-15);
    }

    #[test]
    fn whitespace_around_cells_is_trimmed() {
        let seq = read3("c0, c1, c2\n 1.0 , 2.0 ,3.0\n").unwrap();
        assert_eq!(seq[0].as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn default_dimension_is_mfcc() {
        let header: Vec<String> = (0..MFCC_DIM).map(|k| format!("c{k}")).collect();
        let row = vec!["0.5"; MFCC_DIM].join(",");
        let f = write_csv(&format!("{}\n{row}\n{row}\n", header.join(",")));
        let seq = SequenceReader::new(f.path()).read().unwrap();
        assert_eq!(seq.dim(), MFCC_DIM);
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn file_not_found() {
        let result = SequenceReader::new(Path::new("/nonexistent/take.csv")).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn header_only_is_empty_sequence() {
        assert!(matches!(read3("c0,c1,c2\n"), Err(IoError::EmptySequence { .. })));
    }

    #[test]
    fn wrong_dimension_rejected() {
        let result = read3("c0,c1\n0.0,1.0\n");
        assert!(matches!(
            result,
            Err(IoError::DimensionMismatch {
                expected: 3,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn short_row_rejected() {
        let result = read3("c0,c1,c2\n0.0,1.0,2.0\n0.0,1.0\n");
        assert!(matches!(
            result,
            Err(IoError::InconsistentRowLength {
                row_index: 1,
                expected: 3,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn nan_value_rejected() {
        let result = read3("c0,c1,c2\n0.0,NaN,2.0\n");
        assert!(matches!(
            result,
            Err(IoError::NonFiniteValue {
                row_index: 0,
                col_index: 1,
                ..
            })
        ));
    }

    #[test]
    fn inf_value_rejected() {
        let result = read3("c0,c1,c2\n0.0,1.0,inf\n");
        assert!(matches!(
            result,
            Err(IoError::NonFiniteValue { col_index: 2, .. })
        ));
    }

    #[test]
    fn unparseable_value_rejected() {
        let result = read3("c0,c1,c2\n0.0,abc,2.0\n");
        match result {
            Err(IoError::NonFiniteValue { raw, .. }) => assert_eq!(raw, "abc"),
            other => panic!("expected NonFiniteValue, got {other:?}"),
        }
    }

    #[test]
    fn empty_cell_rejected() {
        let result = read3("c0,c1,c2\n0.0,,2.0\n");
        assert!(matches!(result, Err(IoError::NonFiniteValue { col_index: 1, .. })));
    }
}
