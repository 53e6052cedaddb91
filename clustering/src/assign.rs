use std::ops::Range;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::AssignConfig;
use crate::error::{AssignError, Result};
use crate::matrix::Matrix;
use crate::metric::Metric;
use crate::partition::partition;
use crate::scratch::Scratch;

/// Labels frames with the index of their nearest center.
///
/// Cheap to construct; holds no buffers between calls. Each call to
/// [`Assigner::assign`] builds its own worker pool and scratch space and
/// releases both before returning.
#[derive(Debug, Clone, Copy)]
pub struct Assigner {
    cfg: AssignConfig,
}

impl Assigner {
    /// Creates an assigner. A non-positive thread count is resolved here.
    pub fn new(cfg: AssignConfig) -> Self {
        Self {
            cfg: cfg.with_defaults(),
        }
    }

    /// Creates an assigner from a metric name such as `"euclidean"` or
    /// `"minRMSD"`.
    pub fn from_name(metric: &str, n_threads: i32) -> Result<Self> {
        let metric: Metric = metric.parse()?;
        Ok(Self::new(AssignConfig::new(metric, n_threads)))
    }

    pub fn metric(&self) -> Metric {
        self.cfg.metric
    }

    /// Resolved worker count (always >= 1).
    pub fn n_threads(&self) -> usize {
        self.cfg.n_threads.max(1) as usize
    }

    /// Writes the nearest-center index for every frame into `labels`.
    ///
    /// Ties go to the lowest center index. On error `labels` must be treated
    /// as invalid; validation and scratch allocation failures happen before
    /// any label is written.
    pub fn assign(&self, frames: &Matrix<'_>, centers: &Matrix<'_>, labels: &mut [i32]) -> Result<()> {
        validate(frames, centers, labels)?;

        let metric = self.cfg.metric;
        let ranges = partition(frames.rows(), self.n_threads());
        debug!(
            metric = %metric,
            frames = frames.rows(),
            centers = centers.rows(),
            dim = frames.dim(),
            workers = ranges.len(),
            "assigning frames to centers"
        );
        if ranges.is_empty() {
            return Ok(());
        }

        // One private scratch pair per worker, all allocated up front.
        let mut jobs = Vec::with_capacity(ranges.len());
        let mut rest = labels;
        for range in ranges {
            let scratch = if metric.needs_scratch() {
                Scratch::new(frames.dim())?
            } else {
                Scratch::none()
            };
            let (out, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            jobs.push(Job { range, out, scratch });
        }

        if jobs.len() == 1 {
            for job in jobs {
                job.run(metric, frames, centers);
            }
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs.len())
                .thread_name(|i| format!("assign-{i}"))
                .build()
                .map_err(|e| AssignError::ThreadPool(e.to_string()))?;
            pool.install(|| {
                jobs.into_par_iter()
                    .for_each(|job| job.run(metric, frames, centers));
            });
        }

        debug!(frames = frames.rows(), "assignment done");
        Ok(())
    }

    /// Like [`Assigner::assign`] but allocates and returns the label buffer.
    pub fn assign_to_vec(&self, frames: &Matrix<'_>, centers: &Matrix<'_>) -> Result<Vec<i32>> {
        let mut labels = vec![0i32; frames.rows()];
        self.assign(frames, centers, &mut labels)?;
        Ok(labels)
    }
}

/// A contiguous run of frames together with its slice of the label buffer
/// and the worker's private scratch pair.
struct Job<'a> {
    range: Range<usize>,
    out: &'a mut [i32],
    scratch: Scratch,
}

impl Job<'_> {
    fn run(mut self, metric: Metric, frames: &Matrix<'_>, centers: &Matrix<'_>) {
        trace!(start = self.range.start, end = self.range.end, "worker range");
        for (slot, i) in self.out.iter_mut().zip(self.range.clone()) {
            *slot = nearest(metric, frames.row(i), centers, &mut self.scratch);
        }
    }
}

/// Index of the center closest to `frame`. The first strictly smaller
/// distance wins, so ties resolve to the lowest index.
fn nearest(metric: Metric, frame: &[f32], centers: &Matrix<'_>, scratch: &mut Scratch) -> i32 {
    let mut best_dist = f32::INFINITY;
    let mut best_idx = 0usize;
    for (j, center) in centers.iter_rows().enumerate() {
        let d = metric.distance(frame, center, scratch);
        if d < best_dist {
            best_dist = d;
            best_idx = j;
        }
    }
    best_idx as i32
}

fn validate(frames: &Matrix<'_>, centers: &Matrix<'_>, labels: &[i32]) -> Result<()> {
    if centers.is_empty() {
        return Err(AssignError::NoCenters);
    }
    if centers.rows() > i32::MAX as usize {
        return Err(AssignError::TooManyCenters { got: centers.rows() });
    }
    if centers.dim() != frames.dim() {
        return Err(AssignError::DimensionMismatch {
            expected: frames.dim(),
            got: centers.dim(),
        });
    }
    if labels.len() != frames.rows() {
        return Err(AssignError::LabelLength {
            expected: frames.rows(),
            got: labels.len(),
        });
    }
    Ok(())
}

/// Assigns every frame to its nearest center using the named metric.
///
/// `metric` must be `"euclidean"` or `"minRMSD"`; anything else fails with
/// [`AssignError::InvalidMetric`] before `labels` is touched. A non-positive
/// `n_threads` picks the default worker count.
pub fn assign(
    frames: &Matrix<'_>,
    centers: &Matrix<'_>,
    metric: &str,
    labels: &mut [i32],
    n_threads: i32,
) -> Result<()> {
    Assigner::from_name(metric, n_threads)?.assign(frames, centers, labels)
}

/// Like [`assign`] but returns a freshly allocated label vector.
pub fn assign_to_vec(
    frames: &Matrix<'_>,
    centers: &Matrix<'_>,
    metric: &str,
    n_threads: i32,
) -> Result<Vec<i32>> {
    Assigner::from_name(metric, n_threads)?.assign_to_vec(frames, centers)
}

/// Flat-buffer entry point: checks shapes, then runs [`assign`].
///
/// `frames` and `centers` are row-major with `dim` columns; `labels` must
/// hold one slot per frame.
pub fn assign_checked(
    frames: &[f32],
    centers: &[f32],
    dim: usize,
    labels: &mut [i32],
    metric: &str,
    n_threads: i32,
) -> Result<()> {
    let frames = Matrix::from_flat(frames, dim)?;
    let centers = Matrix::from_flat(centers, dim)?;
    assign(&frames, &centers, metric, labels, n_threads)
}
