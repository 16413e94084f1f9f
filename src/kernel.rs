//! Numeric functions evaluated by the workers
//!
//! A kernel maps a chunk of the input to an output chunk of the same
//! length. It is called concurrently from several workers and must not
//! capture mutable state.

use num_traits::Float;

/// Vectorized, pure function applied to one chunk at a time
pub trait ChunkKernel<T>: Send + Sync + 'static {
    /// Evaluate the function over `chunk`
    ///
    /// The returned vector must have exactly `chunk.len()` elements.
    fn apply(&self, chunk: &[T]) -> Vec<T>;
}

impl<T, F> ChunkKernel<T> for F
where
    F: Fn(&[T]) -> Vec<T> + Send + Sync + 'static,
{
    fn apply(&self, chunk: &[T]) -> Vec<T> {
        self(chunk)
    }
}

/// Lifts a scalar function into a [`ChunkKernel`] by mapping it over every element
///
/// ```
/// use chunkwise::kernel::{ChunkKernel, Elementwise};
///
/// let double = Elementwise(|x: f64| 2.0 * x);
/// let input: Vec<f64> = vec![1.0, 2.5];
/// assert_eq!(double.apply(input.as_slice()), vec![2.0, 5.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Elementwise<F>(pub F);

impl<T, F> ChunkKernel<T> for Elementwise<F>
where
    T: Copy,
    F: Fn(T) -> T + Send + Sync + 'static,
{
    fn apply(&self, chunk: &[T]) -> Vec<T> {
        chunk.iter().map(|&x| (self.0)(x)).collect()
    }
}

/// `x² + cos(x)`
#[inline]
pub fn square_plus_cos<T: Float>(x: T) -> T {
    x * x + x.cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_kernel() {
        let negate = |chunk: &[i64]| chunk.iter().map(|x| -x).collect::<Vec<i64>>();
        let input: Vec<i64> = vec![1, -2, 3];
        assert_eq!(negate.apply(input.as_slice()), vec![-1, 2, -3]);
    }

    #[test]
    fn test_elementwise_empty_chunk() {
        let k = Elementwise(square_plus_cos::<f64>);
        let empty: Vec<f64> = Vec::new();
        assert!(k.apply(empty.as_slice()).is_empty());
    }

    #[test]
    fn test_square_plus_cos() {
        assert_eq!(square_plus_cos(0.0f64), 1.0);
        let x = std::f64::consts::PI;
        assert!((square_plus_cos(x) - (x * x - 1.0)).abs() < 1e-12);
        assert!((square_plus_cos(2.0f32) - (4.0 + 2.0f32.cos())).abs() < 1e-6);
    }
}
