//! # Chunked parallel evaluation
//!
//! The coordinator splits the input into contiguous chunks (see
//! [`partition`](crate::partition)), hands each chunk to an independent
//! worker and writes every worker's output back into the matching range
//! of a pre-allocated output vector.
//!
//! Two backends are provided:
//!
//! - [`Backend::Channels`]: one named thread per chunk. Each worker owns
//!   the sending half of a one-shot channel and publishes exactly one
//!   message. The coordinator drains the channels in chunk order, which
//!   is its only suspension point. Waiting is bounded by
//!   [`EvalConfig::worker_timeout`]; a worker that misses the deadline is
//!   reported by index and abandoned.
//! - [`Backend::Rayon`]: one job per chunk on a rayon pool of at most
//!   `n_cpus` threads. Jobs publish on the same kind of per-chunk channel
//!   and are collected with the same bounded, ordered loop.
//!
//! Workers never share mutable state. The input is shared read-only
//! through an [`Arc`] and every output range is written by one worker.
//!
//! Workers are threads of the calling process. A kernel panic is reported
//! as [`EvalError::WorkerFailed`], but a kernel that aborts (stack
//! overflow, allocation failure, `panic = "abort"`) takes the coordinator
//! down with it.

use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use ndarray::Array1;

use crate::config::{Backend, EvalConfig};
use crate::error::{EvalError, Result};
use crate::kernel::ChunkKernel;
use crate::partition::partition;

/// Evaluates a [`ChunkKernel`] over chunks of the input in parallel
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chunkwise::{ChunkedEvaluator, EvalConfig, Elementwise, evaluate_sequential};
///
/// let input: Arc<[f64]> = (0..1000).map(|i| i as f64).collect();
/// let kernel = Arc::new(Elementwise(|x: f64| x * x));
///
/// let evaluator = ChunkedEvaluator::new(EvalConfig::with_workers(4)).unwrap();
/// let output = evaluator.evaluate(Arc::clone(&input), Arc::clone(&kernel)).unwrap();
///
/// assert_eq!(output, evaluate_sequential(&input[..], kernel.as_ref()));
/// ```
#[derive(Debug, Clone)]
pub struct ChunkedEvaluator {
    config: EvalConfig,
}

impl ChunkedEvaluator {
    /// Create an evaluator, rejecting invalid configurations up front
    pub fn new(config: EvalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluates `kernel` over `input` using the configured backend
    ///
    /// The output has the same length as the input and is independent of
    /// the order in which workers finish.
    pub fn evaluate<T, K>(&self, input: Arc<[T]>, kernel: Arc<K>) -> Result<Vec<T>>
    where
        T: Copy + Default + Send + Sync + 'static,
        K: ChunkKernel<T>,
    {
        let ranges = partition(input.len(), self.config.n_workers)?;
        log::debug!(
            "evaluating {} elements in {} chunks with the {} backend",
            input.len(),
            ranges.len(),
            self.config.backend
        );

        match self.config.backend {
            Backend::Channels => self.evaluate_channels(input, kernel, &ranges),
            Backend::Rayon => self.evaluate_rayon(input, kernel, &ranges),
        }
    }

    /// Convenience wrapper that copies `input` into shared storage
    pub fn evaluate_slice<T, K>(&self, input: &[T], kernel: K) -> Result<Vec<T>>
    where
        T: Copy + Default + Send + Sync + 'static,
        K: ChunkKernel<T>,
    {
        self.evaluate(Arc::from(input), Arc::new(kernel))
    }

    /// Evaluates over an ndarray vector, returning a vector of the same length
    pub fn evaluate_array<T, K>(&self, input: &Array1<T>, kernel: K) -> Result<Array1<T>>
    where
        T: Copy + Default + Send + Sync + 'static,
        K: ChunkKernel<T>,
    {
        let shared: Arc<[T]> = input.iter().copied().collect();
        self.evaluate(shared, Arc::new(kernel)).map(Array1::from_vec)
    }

    fn evaluate_channels<T, K>(
        &self,
        input: Arc<[T]>,
        kernel: Arc<K>,
        ranges: &[Range<usize>],
    ) -> Result<Vec<T>>
    where
        T: Copy + Default + Send + Sync + 'static,
        K: ChunkKernel<T>,
    {
        let started = Instant::now();
        let mut receivers = Vec::with_capacity(ranges.len());
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(ranges.len());

        for (i, range) in ranges.iter().enumerate() {
            // Capacity one: the single send never blocks the worker
            let (tx, rx) = mpsc::sync_channel::<Vec<T>>(1);
            let input = Arc::clone(&input);
            let kernel = Arc::clone(&kernel);
            let range = range.clone();

            let handle = thread::Builder::new()
                .name(format!("chunkwise-worker-{}", i))
                .spawn(move || {
                    let chunk = kernel.apply(&input[range]);
                    // The receiver is gone only if the coordinator gave up on this run
                    let _ = tx.send(chunk);
                })
                .map_err(|source| EvalError::Spawn { worker: i, source })?;

            log::debug!("spawned worker {} for {:?}", i, ranges[i]);
            receivers.push(rx);
            handles.push(handle);
        }

        // On error the handles are dropped, detaching any stragglers
        let output = self.collect_ordered(receivers, ranges, input.len(), started)?;

        for (i, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                log::warn!("worker {} panicked after publishing its result", i);
            }
        }
        Ok(output)
    }

    fn evaluate_rayon<T, K>(
        &self,
        input: Arc<[T]>,
        kernel: Arc<K>,
        ranges: &[Range<usize>],
    ) -> Result<Vec<T>>
    where
        T: Copy + Default + Send + Sync + 'static,
        K: ChunkKernel<T>,
    {
        let started = Instant::now();
        let n_threads = ranges.len().min(self.config.system_params.n_cpus).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("chunkwise-rayon-{}", i))
            .build()
            .map_err(|e| EvalError::ThreadPool(e.to_string()))?;

        let mut receivers = Vec::with_capacity(ranges.len());
        for (i, range) in ranges.iter().enumerate() {
            let (tx, rx) = mpsc::sync_channel::<Vec<T>>(1);
            let input = Arc::clone(&input);
            let kernel = Arc::clone(&kernel);
            let range = range.clone();

            // A panic escaping a spawned job would abort the process; dropping
            // the sender instead reports the chunk as failed
            pool.spawn(move || {
                match panic::catch_unwind(AssertUnwindSafe(|| kernel.apply(&input[range]))) {
                    Ok(chunk) => {
                        let _ = tx.send(chunk);
                    }
                    Err(_) => log::debug!("kernel panicked in chunk {}", i),
                }
            });
            receivers.push(rx);
        }
        log::debug!("queued {} chunks on {} rayon threads", ranges.len(), n_threads);

        // Dropping the pool does not wait for jobs still running
        self.collect_ordered(receivers, ranges, input.len(), started)
    }

    /// Drains one result per chunk, in chunk order, into a fresh output vector
    ///
    /// Every read is bounded by a single deadline, `started + worker_timeout`.
    /// A deadline that does not fit in an [`Instant`] is treated as no bound.
    fn collect_ordered<T>(
        &self,
        receivers: Vec<Receiver<Vec<T>>>,
        ranges: &[Range<usize>],
        len: usize,
        started: Instant,
    ) -> Result<Vec<T>>
    where
        T: Copy + Default,
    {
        let deadline = self
            .config
            .worker_timeout
            .and_then(|limit| started.checked_add(limit));
        let mut output = vec![T::default(); len];

        for (i, (rx, range)) in receivers.into_iter().zip(ranges.iter()).enumerate() {
            let received = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    rx.recv_timeout(remaining).map_err(|e| match e {
                        RecvTimeoutError::Timeout => EvalError::WorkerTimeout {
                            worker: i,
                            waited: started.elapsed(),
                        },
                        RecvTimeoutError::Disconnected => EvalError::WorkerFailed { worker: i },
                    })
                }
                None => rx.recv().map_err(|_| EvalError::WorkerFailed { worker: i }),
            };

            let chunk = match received {
                Ok(chunk) => chunk,
                Err(err) => {
                    log::error!("{}", err);
                    return Err(err);
                }
            };

            if chunk.len() != range.len() {
                return Err(EvalError::ChunkLength {
                    worker: i,
                    expected: range.len(),
                    actual: chunk.len(),
                });
            }
            output[range.clone()].copy_from_slice(&chunk);
            log::debug!("collected worker {} ({} values)", i, range.len());
        }

        Ok(output)
    }
}
