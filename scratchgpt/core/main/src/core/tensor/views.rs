//! Structural operations: transpose, reshape, slicing, column split/concat.

use super::tensor::Tensor;
use crate::api::error::{TensorError, TensorResult};

impl Tensor {
    /// Swap rows and columns.
    pub fn transpose(&self) -> Tensor {
        let (r, c) = (self.rows, self.cols);
        let mut data = vec![0.0; r * c];
        for i in 0..r {
            for j in 0..c {
                data[j * r + i] = self.data[i * c + j];
            }
        }
        Tensor {
            data,
            rows: c,
            cols: r,
        }
    }

    /// Reinterpret the row-major data with a new shape.
    pub fn reshape(&self, rows: usize, cols: usize) -> TensorResult<Tensor> {
        if rows * cols != self.numel() {
            return Err(TensorError::InvalidReshape {
                from: self.shape(),
                to: (rows, cols),
            });
        }
        Ok(Tensor {
            data: self.data.clone(),
            rows,
            cols,
        })
    }

    /// Copy out rows `row_start..row_end` and columns `col_start..col_end`.
    pub fn sub_matrix(
        &self,
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
    ) -> TensorResult<Tensor> {
        if row_start > row_end || col_start > col_end || row_end > self.rows || col_end > self.cols
        {
            return Err(TensorError::InvalidSubMatrix {
                row_start,
                row_end,
                col_start,
                col_end,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let mut data = Vec::with_capacity((row_end - row_start) * (col_end - col_start));
        for r in row_start..row_end {
            let base = r * self.cols;
            data.extend_from_slice(&self.data[base + col_start..base + col_end]);
        }
        Ok(Tensor {
            data,
            rows: row_end - row_start,
            cols: col_end - col_start,
        })
    }

    /// Place `parts` side by side, in order. All parts must have the same row count.
    pub fn concat_cols(parts: &[Tensor]) -> TensorResult<Tensor> {
        let first = parts.first().ok_or(TensorError::EmptyTensor)?;
        let rows = first.rows;
        for p in parts {
            if p.rows != rows {
                return Err(TensorError::ShapeMismatch {
                    op: "concat_cols",
                    left: first.shape(),
                    right: p.shape(),
                });
            }
        }
        let cols: usize = parts.iter().map(|p| p.cols).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for p in parts {
                data.extend_from_slice(&p.data[r * p.cols..(r + 1) * p.cols]);
            }
        }
        Ok(Tensor { data, rows, cols })
    }

    /// Split into `n` tensors of equal width taken from contiguous column ranges.
    pub fn split_cols(&self, n: usize) -> TensorResult<Vec<Tensor>> {
        if n == 0 || self.cols % n != 0 {
            return Err(TensorError::InvalidArgument(format!(
                "cannot split {} columns into {} equal parts",
                self.cols, n
            )));
        }
        let width = self.cols / n;
        (0..n)
            .map(|i| self.sub_matrix(0, self.rows, i * width, (i + 1) * width))
            .collect()
    }
}
