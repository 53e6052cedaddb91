use serde::{Deserialize, Serialize};

use crate::metric::Metric;

/// Environment variable consulted when no positive thread count is given.
pub const NUM_THREADS_ENV: &str = "CHAINSAW_NUM_THREADS";

/// Controls assignment behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignConfig {
    /// Distance used to pick the nearest center.
    /// Default: euclidean.
    pub metric: Metric,

    /// Number of worker threads.
    /// Zero or negative falls back to `CHAINSAW_NUM_THREADS`, then to the
    /// number of available cores.
    pub n_threads: i32,
}

impl AssignConfig {
    pub fn new(metric: Metric, n_threads: i32) -> Self {
        Self { metric, n_threads }
    }

    /// Replaces a non-positive thread count with the resolved default.
    pub fn with_defaults(mut self) -> Self {
        self.n_threads = i32::try_from(resolve_threads(self.n_threads)).unwrap_or(i32::MAX);
        self
    }
}

/// Resolves a requested thread count into a usable worker count (always >= 1).
pub fn resolve_threads(requested: i32) -> usize {
    let env = std::env::var(NUM_THREADS_ENV).ok();
    let available = std::thread::available_parallelism().ok().map(|n| n.get());
    resolve_threads_from(requested, env.as_deref(), available)
}

fn resolve_threads_from(requested: i32, env: Option<&str>, available: Option<usize>) -> usize {
    if requested > 0 {
        return requested as usize;
    }
    env.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .or(available)
        .unwrap_or(1)
        .max(1)
}
