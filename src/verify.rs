//! Numeric equivalence between the reference and the parallel output
//!
//! Chunked evaluation may differ from a single pass in the last bits, so
//! outputs are compared with a relative plus absolute tolerance rather
//! than bit equality.

use num_traits::Float;

use crate::error::{EvalError, Result};

/// Relative and absolute tolerance for [`is_close`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Tolerance {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Bit-for-bit comparison (infinities still compare equal to themselves)
    pub fn exact() -> Self {
        Self { rtol: 0.0, atol: 0.0 }
    }
}

/// Returns true if `actual` is within `atol + rtol * |actual|` of `expected`
///
/// This is `numpy.allclose(expected, actual)`: the relative term scales
/// with the second operand.
///
/// NaN is never close to anything. Infinities are close only to an
/// infinity of the same sign.
pub fn is_close<T: Float>(expected: T, actual: T, tol: Tolerance) -> bool {
    if expected.is_nan() || actual.is_nan() {
        return false;
    }
    if expected.is_infinite() || actual.is_infinite() {
        return expected == actual;
    }
    let (e, a) = match (expected.to_f64(), actual.to_f64()) {
        (Some(e), Some(a)) => (e, a),
        _ => return false,
    };
    (a - e).abs() <= tol.atol + tol.rtol * a.abs()
}

/// Index of the first element that is not close, if any
///
/// When the lengths differ and the common prefix matches, the index one
/// past the shorter sequence is reported.
pub fn first_mismatch<T: Float>(expected: &[T], actual: &[T], tol: Tolerance) -> Option<usize> {
    expected
        .iter()
        .zip(actual.iter())
        .position(|(&e, &a)| !is_close(e, a, tol))
        .or_else(|| {
            if expected.len() != actual.len() {
                Some(expected.len().min(actual.len()))
            } else {
                None
            }
        })
}

pub fn all_close<T: Float>(expected: &[T], actual: &[T], tol: Tolerance) -> bool {
    first_mismatch(expected, actual, tol).is_none()
}

/// Fails with [`EvalError::Mismatch`] at the first divergent element
pub fn verify<T: Float>(expected: &[T], actual: &[T], tol: Tolerance) -> Result<()> {
    match first_mismatch(expected, actual, tol) {
        None => Ok(()),
        Some(index) => {
            let value_at = |s: &[T]| s.get(index).and_then(|v| v.to_f64()).unwrap_or(f64::NAN);
            Err(EvalError::Mismatch {
                index,
                expected: value_at(expected),
                actual: value_at(actual),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_tolerance_scales() {
        let tol = Tolerance::default();
        assert!(is_close(1.0e10f64, 1.0e10 + 1.0e4, tol));
        assert!(!is_close(1.0f64, 1.0 + 1.0e-3, tol));
        assert!(is_close(0.0f64, 5.0e-9, tol));
    }

    #[test]
    fn test_relative_term_scales_with_actual() {
        let tol = Tolerance::new(0.5, 0.0);
        // Same difference of 2, accepted only once 0.5 * |actual| reaches it
        assert!(!is_close(1.0f64, 3.0, tol));
        assert!(is_close(2.0f64, 4.0, tol));
        assert!(!is_close(4.0f64, 2.0, tol));
    }

    #[test]
    fn test_special_values() {
        let tol = Tolerance::default();
        assert!(!is_close(f64::NAN, f64::NAN, tol));
        assert!(is_close(f64::INFINITY, f64::INFINITY, tol));
        assert!(!is_close(f64::INFINITY, f64::NEG_INFINITY, tol));
        assert!(!is_close(f64::INFINITY, 1.0e300, tol));
    }

    #[test]
    fn test_first_mismatch() {
        let tol = Tolerance::exact();
        assert_eq!(first_mismatch(&[1.0f32, 2.0, 3.0], &[1.0, 2.0, 3.0], tol), None);
        assert_eq!(first_mismatch(&[1.0f32, 2.0, 3.0], &[1.0, 2.5, 3.5], tol), Some(1));
        assert_eq!(first_mismatch(&[1.0f32, 2.0], &[1.0], tol), Some(1));
    }

    #[test]
    fn test_verify_reports_values() {
        match verify(&[0.0f64, 1.0], &[0.0, 2.0], Tolerance::default()) {
            Err(EvalError::Mismatch { index, expected, actual }) => {
                assert_eq!(index, 1);
                assert_eq!(expected, 1.0);
                assert_eq!(actual, 2.0);
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
        assert!(verify(&[0.5f64], &[0.5], Tolerance::default()).is_ok());
    }
}
