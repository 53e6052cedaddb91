use crate::error::{AssignError, Result};

/// A borrowed, dense, row-major `rows x dim` matrix of `f32`.
#[derive(Debug, Clone, Copy)]
pub struct Matrix<'a> {
    data: &'a [f32],
    rows: usize,
    dim: usize,
}

impl<'a> Matrix<'a> {
    /// Wraps a flat buffer holding `rows` rows of `dim` elements each.
    pub fn new(data: &'a [f32], rows: usize, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(AssignError::EmptyDimension);
        }
        let expected = rows
            .checked_mul(dim)
            .ok_or(AssignError::ShapeMismatch {
                expected: usize::MAX,
                got: data.len(),
            })?;
        if data.len() != expected {
            return Err(AssignError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, rows, dim })
    }

    /// Wraps a flat buffer of `dim`-length rows, inferring the row count.
    pub fn from_flat(data: &'a [f32], dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(AssignError::EmptyDimension);
        }
        Self::new(data, data.len() / dim, dim)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns row `i`. Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterates rows in order.
    pub fn iter_rows(&self) -> std::slice::ChunksExact<'a, f32> {
        self.data.chunks_exact(self.dim)
    }

    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }
}

/// Flattens nested rows into a row-major buffer, rejecting ragged input.
pub fn flatten_rows<R: AsRef<[f32]>>(rows: &[R], dim: usize) -> Result<Vec<f32>> {
    let mut flat = Vec::with_capacity(rows.len().saturating_mul(dim));
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != dim {
            return Err(AssignError::RaggedRow {
                row: i,
                expected: dim,
                got: row.len(),
            });
        }
        flat.extend_from_slice(row);
    }
    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_row_major() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = Matrix::new(&data, 3, 2).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        let rows: Vec<&[f32]> = m.iter_rows().collect();
        assert_eq!(rows[2], &[5.0, 6.0]);
    }

    #[test]
    fn zero_dim_rejected() {
        assert_eq!(Matrix::new(&[], 0, 0).unwrap_err(), AssignError::EmptyDimension);
        assert_eq!(Matrix::from_flat(&[1.0], 0).unwrap_err(), AssignError::EmptyDimension);
    }

    #[test]
    fn wrong_length_rejected() {
        let err = Matrix::new(&[1.0, 2.0, 3.0], 2, 2).unwrap_err();
        assert_eq!(err, AssignError::ShapeMismatch { expected: 4, got: 3 });
    }

    #[test]
    fn from_flat_rejects_partial_row() {
        let err = Matrix::from_flat(&[1.0, 2.0, 3.0], 2).unwrap_err();
        assert_eq!(err, AssignError::ShapeMismatch { expected: 2, got: 3 });
    }

    #[test]
    fn zero_rows_allowed() {
        let m = Matrix::new(&[], 0, 4).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.iter_rows().count(), 0);
    }

    #[test]
    fn flatten_ok() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert_eq!(flatten_rows(&rows, 2).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn flatten_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = flatten_rows(&rows, 2).unwrap_err();
        assert_eq!(err, AssignError::RaggedRow { row: 1, expected: 2, got: 1 });
    }
}
