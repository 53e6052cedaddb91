use std::ops::Range;

/// Number of consecutive frames that always stay on the same worker.
pub const BLOCK_SIZE: usize = 10;

/// Splits `[0, n_frames)` into contiguous per-worker ranges.
///
/// Frames are grouped into blocks of [`BLOCK_SIZE`]; blocks are spread as
/// evenly as possible, earlier workers taking one extra block when the count
/// does not divide. The returned ranges are ordered, disjoint, non-empty and
/// cover every frame. Fewer than `n_workers` ranges come back when there are
/// not enough blocks to go around.
pub fn partition(n_frames: usize, n_workers: usize) -> Vec<Range<usize>> {
    if n_frames == 0 {
        return Vec::new();
    }

    let n_blocks = n_frames.div_ceil(BLOCK_SIZE);
    let workers = n_workers.clamp(1, n_blocks);
    let base = n_blocks / workers;
    let extra = n_blocks % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut block = 0;
    for w in 0..workers {
        let take = base + usize::from(w < extra);
        let start = block * BLOCK_SIZE;
        block += take;
        let end = (block * BLOCK_SIZE).min(n_frames);
        ranges.push(start..end);
    }
    ranges
}
