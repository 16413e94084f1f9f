//! Error type shared by every evaluation path

use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("worker count must be at least 1 (got {0})")]
    InvalidWorkerCount(usize),
    #[error("worker timeout must be non-zero")]
    InvalidTimeout,
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },
    #[error("worker {worker} did not publish a result within {waited:?}")]
    WorkerTimeout { worker: usize, waited: Duration },
    #[error("worker {worker} exited without publishing a result")]
    WorkerFailed { worker: usize },
    #[error("worker {worker} returned {actual} values for a chunk of {expected}")]
    ChunkLength {
        worker: usize,
        expected: usize,
        actual: usize,
    },
    #[error("output diverges from reference at index {index}: expected {expected}, got {actual}")]
    Mismatch {
        index: usize,
        expected: f64,
        actual: f64,
    },
}

impl EvalError {
    /// Index of the worker the error is attributed to, if any
    pub fn worker(&self) -> Option<usize> {
        match self {
            EvalError::Spawn { worker, .. }
            | EvalError::WorkerTimeout { worker, .. }
            | EvalError::WorkerFailed { worker }
            | EvalError::ChunkLength { worker, .. } => Some(*worker),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
