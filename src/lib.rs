//! # chunkwise: chunked parallel evaluation of numeric functions
//!
//! `chunkwise` applies a pure, element-wise numeric function to a large
//! one-dimensional input faster than a single pass would, by splitting the
//! input into contiguous chunks, evaluating each chunk in an independent
//! worker and reassembling the output in original order.
//!
//! ## Overview
//!
//! 1. **Partitioning**: `[0, n)` is split into `p` ranges with floor-based
//!    boundaries, so the ranges never overlap and always cover the domain,
//!    even when `p` does not divide `n` or exceeds it.
//!
//! 2. **Fan-out**: each range is handed to a worker together with a shared,
//!    read-only view of the input.
//!
//! 3. **Fan-in**: every worker publishes its chunk on a private one-shot
//!    channel. The coordinator reads the channels in order, bounded by a
//!    configurable timeout, and copies each chunk into place.
//!
//! 4. **Verification**: the parallel output is compared with a single-pass
//!    reference using a relative and absolute tolerance.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use chunkwise::{compare, linspace, square_plus_cos, ChunkedEvaluator, Elementwise, EvalConfig};
//!
//! let input: Arc<[f64]> = linspace(0.0, 120245.0, 10_000).to_vec().into();
//! let evaluator = ChunkedEvaluator::new(EvalConfig::with_workers(4)).unwrap();
//!
//! let report = compare(&evaluator, input, Arc::new(Elementwise(square_plus_cos::<f64>))).unwrap();
//! assert_eq!(report.output.len(), 10_000);
//! ```

pub mod comparison;
pub mod config;
pub mod error;
pub mod kernel;
pub mod parallel;
pub mod partition;
pub mod reference;
pub mod verify;

// Re-export primary components
pub use comparison::{compare, linspace, ComparisonReport};
pub use config::{Backend, EvalConfig, SystemParameters, DEFAULT_WORKER_TIMEOUT};
pub use error::{EvalError, Result};
pub use kernel::{square_plus_cos, ChunkKernel, Elementwise};
pub use parallel::ChunkedEvaluator;
pub use partition::{chunk_bounds, partition};
pub use reference::{evaluate_sequential, evaluate_sequential_array};
pub use verify::{all_close, first_mismatch, is_close, verify, Tolerance};

/// Version information for the chunkwise library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
