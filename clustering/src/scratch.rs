use crate::error::{AssignError, Result};

/// Working memory for metrics that must not mutate their inputs.
///
/// Holds one buffer per compared vector. Every worker owns its own pair;
/// [`crate::Metric::distance`] borrows it mutably, so a pair can never be
/// shared between concurrent distance calls.
#[derive(Debug, Default)]
pub struct Scratch {
    a: Vec<f32>,
    b: Vec<f32>,
}

impl Scratch {
    /// Allocates a pair of `dim`-length buffers.
    ///
    /// Allocation is fallible: running out of memory yields
    /// [`AssignError::OutOfMemory`] instead of aborting.
    pub fn new(dim: usize) -> Result<Self> {
        Ok(Self {
            a: alloc_buffer(dim)?,
            b: alloc_buffer(dim)?,
        })
    }

    /// An empty pair for metrics that need no scratch space.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns the buffer length this pair was allocated for.
    pub fn dim(&self) -> usize {
        self.a.len()
    }

    /// Copies `a` and `b` into the buffers and returns mutable views of the
    /// copies, each `a.len()` long.
    pub(crate) fn load(&mut self, a: &[f32], b: &[f32]) -> (&mut [f32], &mut [f32]) {
        let n = a.len();
        debug_assert_eq!(n, b.len());
        if self.a.len() < n {
            self.a.resize(n, 0.0);
            self.b.resize(n, 0.0);
        }
        let xa = &mut self.a[..n];
        let xb = &mut self.b[..n];
        xa.copy_from_slice(a);
        xb.copy_from_slice(b);
        (xa, xb)
    }
}

fn alloc_buffer(dim: usize) -> Result<Vec<f32>> {
    let mut buf: Vec<f32> = Vec::new();
    buf.try_reserve_exact(dim)
        .map_err(|_| AssignError::OutOfMemory {
            bytes: dim.saturating_mul(std::mem::size_of::<f32>()),
        })?;
    buf.resize(dim, 0.0);
    Ok(buf)
}
