//! Reference implementation: the kernel applied to the whole input in one pass
//!
//! This provides the baseline every parallel run is checked against, and
//! the sequential timing that parallel timings are compared with.

use ndarray::Array1;

use crate::kernel::ChunkKernel;

/// Evaluates `kernel` over the entire input on the calling thread
pub fn evaluate_sequential<T, K>(input: &[T], kernel: &K) -> Vec<T>
where
    K: ChunkKernel<T> + ?Sized,
{
    kernel.apply(input)
}

/// [`evaluate_sequential`] for an ndarray vector
pub fn evaluate_sequential_array<T, K>(input: &Array1<T>, kernel: &K) -> Array1<T>
where
    T: Clone,
    K: ChunkKernel<T> + ?Sized,
{
    match input.as_slice() {
        Some(slice) => Array1::from_vec(kernel.apply(slice)),
        None => Array1::from_vec(kernel.apply(&input.to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{square_plus_cos, Elementwise};
    use ndarray::s;

    #[test]
    fn test_sequential_matches_scalar_map() {
        let input: Vec<f64> = (0..100).map(|i| i as f64 * 0.25).collect();
        let out = evaluate_sequential(&input, &Elementwise(square_plus_cos::<f64>));
        for (x, y) in input.iter().zip(out.iter()) {
            assert_eq!(*y, x * x + x.cos());
        }
    }

    #[test]
    fn test_sequential_array() {
        let base = Array1::linspace(0.0f64, 9.0, 10);
        let evens = base.slice(s![..;2]).to_owned();
        let out = evaluate_sequential_array(&evens, &Elementwise(|x: f64| x + 1.0));
        assert_eq!(out.to_vec(), vec![1.0, 3.0, 5.0, 7.0, 9.0]);
    }
}
