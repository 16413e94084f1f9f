//! Configuration and system parameters for chunked evaluation

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{EvalError, Result};
use crate::verify::Tolerance;

/// Default bound on how long the coordinator waits for all workers
pub const DEFAULT_WORKER_TIMEOUT: Duration = Duration::from_secs(300);

/// How worker tasks are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// One thread per chunk, each publishing its result on a private
    /// one-shot channel that the coordinator drains in chunk order
    #[default]
    Channels,
    /// One rayon job per chunk on a pool of at most `n_cpus` threads,
    /// collected through the same per-chunk channels
    Rayon,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Channels => "channels",
            Backend::Rayon => "rayon",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "channels" => Ok(Backend::Channels),
            "rayon" => Ok(Backend::Rayon),
            other => Err(format!("unknown backend '{}' (expected channels or rayon)", other)),
        }
    }
}

/// System parameters for performance tuning
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Number of execution units available to this process
    pub n_cpus: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            n_cpus: num_cpus::get(), // Logical cores
        }
    }
}

/// Configuration for a [`ChunkedEvaluator`](crate::ChunkedEvaluator)
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Number of chunks, and therefore of workers
    ///
    /// [`Backend::Channels`] starts one OS thread per chunk on every call,
    /// so this is bounded by the process thread limit (typically a few
    /// thousand); past it evaluation fails with `EvalError::Spawn`.
    /// [`Backend::Rayon`] caps its pool at `n_cpus` threads and only queues
    /// one job per chunk, so it accepts much larger counts.
    pub n_workers: usize,

    /// Execution backend
    pub backend: Backend,

    /// Upper bound on the total wait for worker results
    /// If None, the coordinator blocks until every worker reports
    pub worker_timeout: Option<Duration>,

    /// Tolerance used when comparing against the reference path
    pub tolerance: Tolerance,

    pub system_params: SystemParameters,
}

impl Default for EvalConfig {
    fn default() -> Self {
        let system_params = SystemParameters::default();
        Self {
            n_workers: system_params.n_cpus,
            backend: Backend::default(),
            worker_timeout: Some(DEFAULT_WORKER_TIMEOUT),
            tolerance: Tolerance::default(),
            system_params,
        }
    }
}

impl EvalConfig {
    /// Create a config with a fixed worker count and defaults otherwise
    pub fn with_workers(n_workers: usize) -> Self {
        Self {
            n_workers,
            ..Self::default()
        }
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.worker_timeout = Some(timeout);
        self
    }

    /// Wait indefinitely for every worker
    pub fn without_timeout(mut self) -> Self {
        self.worker_timeout = None;
        self
    }

    pub fn tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject configurations that cannot run
    ///
    /// Oversubscription (more workers than CPUs) is allowed but logged.
    pub fn validate(&self) -> Result<()> {
        if self.n_workers == 0 {
            return Err(EvalError::InvalidWorkerCount(self.n_workers));
        }
        if self.worker_timeout == Some(Duration::ZERO) {
            return Err(EvalError::InvalidTimeout);
        }
        if self.n_workers > self.system_params.n_cpus {
            log::warn!(
                "{} workers requested but only {} CPUs available",
                self.n_workers,
                self.system_params.n_cpus
            );
        }
        Ok(())
    }
}
