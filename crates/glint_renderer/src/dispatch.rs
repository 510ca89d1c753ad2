//! Fork/join distribution of per-pixel work over a fixed thread pool.

use std::ops::Range;

/// Split `count` items into `workers` contiguous ranges.
///
/// The first `count % workers` ranges get one extra item. Ranges cover
/// `0..count` exactly once and in order; some may be empty when there are
/// more workers than items.
pub fn partition(count: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let base = count / workers;
    let remainder = count % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let len = base + usize::from(i < remainder);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// A rayon thread pool with an explicit worker count.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Build a pool. `workers == 0` uses one worker per available core.
    pub fn new(workers: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            workers
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("glint-worker-{}", i))
            .build()?;

        log::debug!("Worker pool started with {} threads", workers);
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `f(range_start, chunk)` over disjoint chunks of `buffer`, one per
    /// worker, and return once every chunk is done.
    ///
    /// A panic in any chunk propagates out of this call.
    pub fn run<T, F>(&self, buffer: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let ranges = partition(buffer.len(), self.workers);
        let f = &f;

        self.pool.scope(|scope| {
            let mut rest = buffer;
            for range in ranges {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                if chunk.is_empty() {
                    continue;
                }
                scope.spawn(move |_| f(range.start, chunk));
            }
        });
    }
}
