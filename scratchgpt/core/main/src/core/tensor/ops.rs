//! Tensor math operations: element-wise arithmetic, matmul, reductions, activations.

use super::tensor::Tensor;
use crate::api::error::{TensorError, TensorResult};
use crate::api::types::{Broadcast, ROW_AXIS};
use crate::core::functional;
use rand::Rng;

impl Tensor {
    /// Apply `f(lhs, rhs)` across `self` and a broadcast `other`.
    fn broadcast_op<F>(&self, other: &Tensor, op: &'static str, f: F) -> TensorResult<Tensor>
    where
        F: Fn(f64, f64) -> f64,
    {
        let mode = Broadcast::resolve(self.shape(), other.shape()).ok_or(
            TensorError::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            },
        )?;

        let cols = self.cols;
        let data = match mode {
            Broadcast::Elementwise => self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            Broadcast::Column => self
                .data
                .iter()
                .enumerate()
                .map(|(i, &a)| f(a, other.data[i / cols]))
                .collect(),
            Broadcast::Row => self
                .data
                .iter()
                .enumerate()
                .map(|(i, &a)| f(a, other.data[i % cols]))
                .collect(),
        };

        Ok(Tensor {
            data,
            rows: self.rows,
            cols: self.cols,
        })
    }

    // ==================== Element-wise binary ops ====================

    /// Element-wise addition with row/column broadcasting.
    pub fn add(&self, other: &Tensor) -> TensorResult<Tensor> {
        self.broadcast_op(other, "add", |a, b| a + b)
    }

    /// Element-wise subtraction with row/column broadcasting.
    pub fn sub(&self, other: &Tensor) -> TensorResult<Tensor> {
        self.broadcast_op(other, "sub", |a, b| a - b)
    }

    /// Element-wise multiplication with row/column broadcasting.
    pub fn mul(&self, other: &Tensor) -> TensorResult<Tensor> {
        self.broadcast_op(other, "mul", |a, b| a * b)
    }

    /// Element-wise division with row/column broadcasting.
    ///
    /// Division by zero follows IEEE-754 and yields `inf` or `NaN`.
    pub fn div(&self, other: &Tensor) -> TensorResult<Tensor> {
        self.broadcast_op(other, "div", |a, b| a / b)
    }

    // ==================== Scalar ops ====================

    pub fn add_scalar(&self, s: f64) -> Tensor {
        self.apply_function(|x| x + s)
    }

    pub fn sub_scalar(&self, s: f64) -> Tensor {
        self.apply_function(|x| x - s)
    }

    pub fn mul_scalar(&self, s: f64) -> Tensor {
        self.apply_function(|x| x * s)
    }

    pub fn div_scalar(&self, s: f64) -> Tensor {
        self.apply_function(|x| x / s)
    }

    pub fn pow_scalar(&self, p: f64) -> Tensor {
        self.apply_function(|x| x.powf(p))
    }

    // ==================== Matrix multiplication ====================

    /// Matrix product `self · other`.
    ///
    /// Requires `self.cols == other.rows`; the result is
    /// `self.rows x other.cols`. Each output element accumulates over the
    /// shared dimension in increasing index order.
    pub fn matmul(&self, other: &Tensor) -> TensorResult<Tensor> {
        if self.cols != other.rows {
            return Err(TensorError::ShapeMismatch {
                op: "matmul",
                left: self.shape(),
                right: other.shape(),
            });
        }

        let _t = if log::log_enabled!(log::Level::Trace) {
            Some(std::time::Instant::now())
        } else {
            None
        };

        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut out = vec![0.0; m * n];
        for i in 0..m {
            let out_row = &mut out[i * n..(i + 1) * n];
            for p in 0..k {
                let a = self.data[i * k + p];
                let b_row = &other.data[p * n..(p + 1) * n];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }

        if let Some(t) = _t {
            log::trace!(
                "[perf] matmul [{}x{}]@[{}x{}] {:.3}ms",
                m,
                k,
                k,
                n,
                t.elapsed().as_secs_f64() * 1000.0
            );
        }

        Ok(Tensor {
            data: out,
            rows: m,
            cols: n,
        })
    }

    // ==================== Reductions ====================

    /// Row `r` without a bounds check; a zero-width row is an empty slice.
    fn row_slice(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    fn check_row_axis(axis: i32, op: &str) -> TensorResult<()> {
        if axis != ROW_AXIS {
            return Err(TensorError::UnsupportedOperation(format!(
                "{} only supports axis {} (got {})",
                op, ROW_AXIS, axis
            )));
        }
        Ok(())
    }

    /// Row-wise mean, returned as a `rows x 1` column vector.
    ///
    /// Only `axis == -1` is supported.
    pub fn mean(&self, axis: i32) -> TensorResult<Tensor> {
        Self::check_row_axis(axis, "mean")?;
        let n = self.cols as f64;
        let data = (0..self.rows)
            .map(|r| self.row_slice(r).iter().sum::<f64>() / n)
            .collect();
        Ok(Tensor {
            data,
            rows: self.rows,
            cols: 1,
        })
    }

    /// Row-wise variance, returned as a `rows x 1` column vector.
    ///
    /// Divides by `cols - 1` when `unbiased`, otherwise by `cols`.
    pub fn variance(&self, axis: i32, unbiased: bool) -> TensorResult<Tensor> {
        Self::check_row_axis(axis, "variance")?;
        let means = self.mean(axis)?;
        let denom = if unbiased {
            self.cols as f64 - 1.0
        } else {
            self.cols as f64
        };
        let data = (0..self.rows)
            .zip(&means.data)
            .map(|(r, &m)| {
                self.row_slice(r)
                    .iter()
                    .map(|&x| (x - m) * (x - m))
                    .sum::<f64>()
                    / denom
            })
            .collect();
        Ok(Tensor {
            data,
            rows: self.rows,
            cols: 1,
        })
    }

    /// Sum of every element.
    pub fn sum_all(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Largest element, or `EmptyTensor` for a tensor with no elements.
    pub fn max_all(&self) -> TensorResult<f64> {
        self.data
            .iter()
            .copied()
            .reduce(f64::max)
            .ok_or(TensorError::EmptyTensor)
    }

    /// Column index of the largest value in `row`; the first wins on ties.
    pub fn argmax_row(&self, row: usize) -> TensorResult<usize> {
        let values = self.row(row)?;
        if values.is_empty() {
            return Err(TensorError::EmptyTensor);
        }
        let mut best = 0;
        for (i, &v) in values.iter().enumerate() {
            if v > values[best] {
                best = i;
            }
        }
        Ok(best)
    }

    // ==================== Element-wise transforms ====================

    /// Map `f` over every element.
    pub fn apply_function<F>(&self, f: F) -> Tensor
    where
        F: Fn(f64) -> f64,
    {
        Tensor {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn sqrt(&self) -> Tensor {
        self.apply_function(f64::sqrt)
    }

    pub fn exp(&self) -> Tensor {
        self.apply_function(f64::exp)
    }

    pub fn tanh(&self) -> Tensor {
        self.apply_function(f64::tanh)
    }

    /// Tanh-approximated GELU. See [`functional::gelu`].
    pub fn gelu(&self) -> Tensor {
        functional::gelu(self)
    }

    /// Row-wise stable softmax. See [`functional::softmax`].
    pub fn softmax(&self) -> Tensor {
        functional::softmax(self)
    }

    /// Fill positions where `mask` is non-zero. See [`functional::apply_mask`].
    pub fn apply_mask(&self, mask: &Tensor) -> TensorResult<Tensor> {
        functional::apply_mask(self, mask)
    }

    /// See [`functional::dropout`].
    pub fn dropout<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> TensorResult<Tensor> {
        functional::dropout(self, rate, rng)
    }
}
