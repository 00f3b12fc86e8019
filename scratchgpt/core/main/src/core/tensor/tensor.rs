//! Row-major 2-D tensor of `f64` values.

use crate::api::error::{TensorError, TensorResult};
use rand::Rng;
use std::fmt;

/// A dense `rows x cols` matrix of `f64`.
///
/// Tensors are immutable by convention: every algebraic operation returns a
/// new tensor. The only in-place writes are [`Tensor::set`] (used while
/// building masks and test fixtures) and [`Tensor::set_data`] (used once when
/// installing loaded weights).
#[derive(Clone, PartialEq)]
pub struct Tensor {
    pub(crate) data: Vec<f64>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl Tensor {
    // ==================== Constructors ====================

    /// Create a tensor filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::full(rows, cols, 0.0)
    }

    /// Create a tensor filled with ones.
    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::full(rows, cols, 1.0)
    }

    /// Create a tensor filled with a specific value.
    pub fn full(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a tensor from row-major data.
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> TensorResult<Self> {
        if data.len() != rows * cols {
            return Err(TensorError::ShapeMismatch {
                op: "from_vec",
                left: (rows, cols),
                right: (1, data.len()),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Deep-copy a slice of rows into a new tensor.
    ///
    /// Every row must have the same length; an empty slice is rejected.
    pub fn from_rows(rows: &[Vec<f64>]) -> TensorResult<Self> {
        let first = rows.first().ok_or(TensorError::EmptyTensor)?;
        let cols = first.len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(TensorError::ShapeMismatch {
                    op: "from_rows",
                    left: (i, cols),
                    right: (i, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Create a `1 x n` row vector.
    pub fn row_vector(values: &[f64]) -> Self {
        Self {
            data: values.to_vec(),
            rows: 1,
            cols: values.len(),
        }
    }

    /// Create an `n x 1` column vector.
    pub fn column_vector(values: &[f64]) -> Self {
        Self {
            data: values.to_vec(),
            rows: values.len(),
            cols: 1,
        }
    }

    /// Create an identity matrix.
    pub fn eye(n: usize) -> Self {
        let mut t = Self::zeros(n, n);
        for i in 0..n {
            t.data[i * n + i] = 1.0;
        }
        t
    }

    /// Create a causal mask: entry `[i][j]` is `1.0` when `j > i` (a future
    /// position that must be hidden) and `0.0` otherwise.
    pub fn causal_mask(size: usize) -> Self {
        let mut t = Self::zeros(size, size);
        for i in 0..size {
            for j in (i + 1)..size {
                t.data[i * size + j] = 1.0;
            }
        }
        t
    }

    /// Create a tensor with values drawn from `N(mean, std^2)`.
    ///
    /// Uses the Box-Muller transform over the supplied generator so that a
    /// seeded RNG always produces the same tensor.
    pub fn random_normal<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        mean: f64,
        std: f64,
        rng: &mut R,
    ) -> Self {
        let data = (0..rows * cols)
            .map(|_| {
                let u1: f64 = rng.r#gen::<f64>().max(f64::MIN_POSITIVE);
                let u2: f64 = rng.r#gen();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                mean + std * z
            })
            .collect();
        Self { data, rows, cols }
    }

    /// Create a tensor with values from the standard normal distribution.
    pub fn randn<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self::random_normal(rows, cols, 0.0, 1.0, rng)
    }

    // ==================== Properties ====================

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the underlying data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Consume the tensor and return its row-major data.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Iterate over all elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    // ==================== Element access ====================

    fn offset(&self, row: usize, col: usize) -> TensorResult<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(TensorError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Read the element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> TensorResult<f64> {
        let idx = self.offset(row, col)?;
        Ok(self.data[idx])
    }

    /// Write the element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> TensorResult<()> {
        let idx = self.offset(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Borrow one row as a slice.
    pub fn row(&self, row: usize) -> TensorResult<&[f64]> {
        if row >= self.rows {
            return Err(TensorError::IndexOutOfBounds {
                row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let start = row * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    /// Copy the tensor out as a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows)
            .map(|r| self.data[r * self.cols..(r + 1) * self.cols].to_vec())
            .collect()
    }

    /// Overwrite every element with the contents of `other`.
    ///
    /// Reserved for weight installation; shapes must match exactly.
    pub fn set_data(&mut self, other: &Tensor) -> TensorResult<()> {
        if self.shape() != other.shape() {
            return Err(TensorError::ShapeMismatch {
                op: "set_data",
                left: self.shape(),
                right: other.shape(),
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// True when every element of `other` is within `tol` of the matching
    /// element of `self`. Tensors of different shape are never close.
    pub fn all_close(&self, other: &Tensor, tol: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 8;
        write!(f, "Tensor({}x{}, [", self.rows, self.cols)?;
        for (i, v) in self.data.iter().take(PREVIEW).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.6}", v)?;
        }
        if self.data.len() > PREVIEW {
            write!(f, ", ...")?;
        }
        write!(f, "])")
    }
}
