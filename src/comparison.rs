//! Timed comparison of the reference and parallel paths
//!
//! A run is only accepted when the parallel output matches the reference
//! element for element within the configured tolerance.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ndarray::Array1;
use num_traits::Float;

use crate::config::Backend;
use crate::error::Result;
use crate::kernel::ChunkKernel;
use crate::parallel::ChunkedEvaluator;
use crate::reference::evaluate_sequential;
use crate::verify::verify;

/// `n` evenly spaced values from `start` to `end`, both inclusive
pub fn linspace<T: Float>(start: T, end: T, n: usize) -> Array1<T> {
    Array1::linspace(start, end, n)
}

/// Outcome of [`compare`]
#[derive(Debug, Clone)]
pub struct ComparisonReport<T> {
    pub len: usize,
    pub n_workers: usize,
    pub backend: Backend,
    /// Elapsed time of the single-pass evaluation
    pub sequential: Duration,
    /// Elapsed time of the chunked evaluation, spawn to last collection
    pub parallel: Duration,
    /// The verified parallel output
    pub output: Vec<T>,
}

impl<T> ComparisonReport<T> {
    /// Sequential time divided by parallel time
    pub fn speedup(&self) -> f64 {
        let parallel = self.parallel.as_secs_f64();
        if parallel > 0.0 {
            self.sequential.as_secs_f64() / parallel
        } else {
            f64::INFINITY
        }
    }
}

/// Runs both paths over `input`, verifies equivalence and reports timings
///
/// Returns [`EvalError::Mismatch`](crate::EvalError::Mismatch) if the
/// outputs diverge beyond the evaluator's tolerance.
pub fn compare<T, K>(
    evaluator: &ChunkedEvaluator,
    input: Arc<[T]>,
    kernel: Arc<K>,
) -> Result<ComparisonReport<T>>
where
    T: Float + Default + Send + Sync + 'static,
    K: ChunkKernel<T>,
{
    let config = evaluator.config();

    let t0 = Instant::now();
    let expected = evaluate_sequential(&input[..], kernel.as_ref());
    let sequential = t0.elapsed();

    let t1 = Instant::now();
    let output = evaluator.evaluate(Arc::clone(&input), kernel)?;
    let parallel = t1.elapsed();

    log::info!("sequential time {:?}", sequential);
    log::info!(
        "parallel time {:?} ({} workers, {} backend)",
        parallel,
        config.n_workers,
        config.backend
    );

    verify(&expected, &output, config.tolerance)?;

    Ok(ComparisonReport {
        len: input.len(),
        n_workers: config.n_workers,
        backend: config.backend,
        sequential,
        parallel,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvalConfig;
    use crate::error::EvalError;
    use crate::kernel::{square_plus_cos, Elementwise};

    #[test]
    fn test_linspace_endpoints() {
        let x = linspace(0.0f64, 120245.0, 1001);
        assert_eq!(x.len(), 1001);
        assert_eq!(x[0], 0.0);
        assert!((x[1000] - 120245.0).abs() < 1e-6);
    }

    #[test]
    fn test_compare_accepts_equivalent_output() {
        let input: Arc<[f64]> = linspace(0.0, 500.0, 10_000).to_vec().into();
        let evaluator = ChunkedEvaluator::new(EvalConfig::with_workers(5)).unwrap();
        let report = compare(&evaluator, input, Arc::new(Elementwise(square_plus_cos::<f64>))).unwrap();
        assert_eq!(report.len, 10_000);
        assert_eq!(report.output.len(), 10_000);
        assert_eq!(report.n_workers, 5);
        assert!(report.speedup() > 0.0);
    }

    #[test]
    fn test_compare_rejects_chunk_dependent_kernel() {
        // Output depends on where the chunk starts, so chunking changes the result
        let offset = |chunk: &[f64]| {
            let first = chunk.first().copied().unwrap_or(0.0);
            chunk.iter().map(|x| x - first).collect::<Vec<f64>>()
        };
        let input: Arc<[f64]> = (0..10).map(|i| i as f64).collect();
        let evaluator = ChunkedEvaluator::new(EvalConfig::with_workers(2)).unwrap();
        let err = compare(&evaluator, input, Arc::new(offset)).unwrap_err();
        assert!(matches!(err, EvalError::Mismatch { index: 5, .. }));
    }
}
