use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how independent lanes of an operator are executed.
///
/// A lane is a scanline, a column block or an `(x, y)` plane, depending on the
/// operator. Lanes never depend on each other within one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process lanes in parallel.
    #[default]
    ParallelLanes,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small arrays, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

/// Apply `op` to every `lane_len`-sized chunk of `dst`, passing the chunk index.
///
/// A trailing chunk shorter than `lane_len` is still visited. Nothing happens when
/// `dst` is empty or `lane_len` is zero.
///
/// # Errors
///
/// Fails for [`ExecutionStrategy::Fixed`] with zero threads or when the pool cannot be built.
pub fn for_each_lane<T, F>(
    dst: &mut [T],
    lane_len: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if dst.is_empty() || lane_len == 0 {
        return Ok(());
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_mut(lane_len)
                .enumerate()
                .for_each(|(i, lane)| op(i, lane));
        }
        ExecutionStrategy::ParallelLanes => {
            dst.par_chunks_mut(lane_len)
                .enumerate()
                .for_each(|(i, lane)| op(i, lane));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_mut(lane_len)
                    .enumerate()
                    .for_each(|(i, lane)| op(i, lane));
            });
        }
    }
    Ok(())
}
