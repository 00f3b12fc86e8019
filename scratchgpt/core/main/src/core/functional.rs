//! Activation and masking functions applied to whole tensors.

use crate::api::error::{TensorError, TensorResult};
use crate::api::types::MASK_FILL;
use crate::core::tensor::Tensor;
use rand::Rng;

const SQRT_2_OVER_PI: f64 = 0.797_884_560_802_865_4;
const GELU_COEFF: f64 = 0.044715;

/// GELU, tanh approximation:
/// `0.5 * x * (1 + tanh(sqrt(2/pi) * (x + 0.044715 * x^3)))`.
pub fn gelu(x: &Tensor) -> Tensor {
    x.apply_function(|v| {
        let inner = (v + (v * v * v) * GELU_COEFF) * SQRT_2_OVER_PI;
        (v * 0.5) * (inner.tanh() + 1.0)
    })
}

/// Row-wise softmax.
///
/// The row maximum is subtracted before exponentiating, so adding a constant
/// to a row leaves its output unchanged and large logits do not overflow.
pub fn softmax(x: &Tensor) -> Tensor {
    let cols = x.cols();
    let mut data = Vec::with_capacity(x.numel());
    for row in x.data().chunks(cols.max(1)).take(x.rows()) {
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let start = data.len();
        let mut sum = 0.0;
        for &v in row {
            let e = (v - max).exp();
            sum += e;
            data.push(e);
        }
        for e in &mut data[start..] {
            *e /= sum;
        }
    }
    Tensor {
        data,
        rows: x.rows(),
        cols,
    }
}

/// Replace every element of `x` whose `mask` entry is non-zero with [`MASK_FILL`].
pub fn apply_mask(x: &Tensor, mask: &Tensor) -> TensorResult<Tensor> {
    if x.shape() != mask.shape() {
        return Err(TensorError::ShapeMismatch {
            op: "apply_mask",
            left: x.shape(),
            right: mask.shape(),
        });
    }
    let data = x
        .data()
        .iter()
        .zip(mask.data())
        .map(|(&v, &m)| if m != 0.0 { MASK_FILL } else { v })
        .collect();
    Ok(Tensor {
        data,
        rows: x.rows(),
        cols: x.cols(),
    })
}

/// Zero each element independently with probability `rate`.
///
/// One uniform draw is taken per element regardless of `rate`, and an element
/// is zeroed when its draw falls below `rate`. Survivors keep their value.
pub fn dropout<R: Rng + ?Sized>(x: &Tensor, rate: f64, rng: &mut R) -> TensorResult<Tensor> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(TensorError::InvalidArgument(format!(
            "dropout rate must be in [0, 1], got {}",
            rate
        )));
    }
    let data = x
        .data()
        .iter()
        .map(|&v| {
            let draw: f64 = rng.r#gen();
            if draw < rate { 0.0 } else { v }
        })
        .collect();
    Ok(Tensor {
        data,
        rows: x.rows(),
        cols: x.cols(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_gelu_known_values() {
        let x = Tensor::row_vector(&[0.0, 1.0, -1.0, 3.0]);
        let y = gelu(&x);
        assert_eq!(y.data()[0], 0.0);
        assert!((y.data()[1] - 0.841_191_990_608_276_8).abs() < 1e-12);
        assert!((y.data()[2] + 0.158_808_009_391_723_24).abs() < 1e-12);
        assert!((y.data()[3] - 2.996_362_607_918_227).abs() < 1e-9);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let x = Tensor::from_vec(vec![1.0, 2.0, 3.0, -5.0, 0.0, 5.0], 2, 3).unwrap();
        let y = softmax(&x);
        for r in 0..2 {
            let s: f64 = y.row(r).unwrap().iter().sum();
            assert!((s - 1.0).abs() < 1e-12);
        }
        assert!(y.get(0, 2).unwrap() > y.get(0, 1).unwrap());
    }

    #[test]
    fn test_softmax_large_values_are_stable() {
        let x = Tensor::row_vector(&[1000.0, 1000.0]);
        let y = softmax(&x);
        assert!((y.data()[0] - 0.5).abs() < 1e-12);
        assert!(y.iter().all(f64::is_finite));
    }

    #[test]
    fn test_apply_mask() {
        let x = Tensor::ones(2, 2);
        let m = Tensor::causal_mask(2);
        let y = apply_mask(&x, &m).unwrap();
        assert_eq!(y.data(), &[1.0, MASK_FILL, 1.0, 1.0]);
        assert!(apply_mask(&x, &Tensor::causal_mask(3)).is_err());
    }

    #[test]
    fn test_dropout_zero_rate_is_identity() {
        let x = Tensor::from_vec((1..=12).map(f64::from).collect(), 3, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(dropout(&x, 0.0, &mut rng).unwrap(), x);
    }

    #[test]
    fn test_dropout_full_rate_zeroes_everything() {
        let x = Tensor::ones(3, 3);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(dropout(&x, 1.0, &mut rng).unwrap().iter().all(|v| v == 0.0));
    }

    #[test]
    fn test_dropout_does_not_rescale() {
        let x = Tensor::full(50, 50, 2.0);
        let mut rng = StdRng::seed_from_u64(9);
        let y = dropout(&x, 0.5, &mut rng).unwrap();
        let zeros = y.iter().filter(|&v| v == 0.0).count();
        assert!(y.iter().all(|v| v == 0.0 || v == 2.0));
        assert!(zeros > 1000 && zeros < 1500, "zeroed {}", zeros);
    }

    #[test]
    fn test_dropout_rejects_bad_rate() {
        let x = Tensor::ones(1, 1);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(dropout(&x, -0.1, &mut rng).is_err());
        assert!(dropout(&x, 1.5, &mut rng).is_err());
    }
}
