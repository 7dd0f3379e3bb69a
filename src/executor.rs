//! Component §5 — pluggable executor policy.
//!
//! Two concrete executors: a single-thread one for tests and
//! reproducibility, and a thread-pool one (backed by `rayon`'s global pool,
//! the way the teacher's simulator dispatches indicator work) for
//! production. Both expose the same `parallel_for` shape so call sites
//! don't care which one they got.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutorKind {
    Single,
    ThreadPool,
}

/// An executor runs an index range `0..n`, invoking `f(i)` for each index
/// and collecting the results in index order. `f` must be safe to call from
/// any thread; it is expected to set up its own thread-local RNG/scratch
/// state on first use (per §5's "no synchronization on the hot path").
pub trait Executor {
    fn parallel_for<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SingleThreadExecutor;

impl Executor for SingleThreadExecutor {
    fn parallel_for<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        (0..n).map(f).collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPoolExecutor;

impl Executor for ThreadPoolExecutor {
    fn parallel_for<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        (0..n).into_par_iter().map(f).collect()
    }
}

/// Dynamic wrapper selecting between the two concrete executors at runtime,
/// so a [`crate::config::RunConfig`] value can pick one without the caller
/// writing generic code over `Executor`.
#[derive(Debug, Clone, Copy)]
pub enum AnyExecutor {
    Single(SingleThreadExecutor),
    ThreadPool(ThreadPoolExecutor),
}

impl AnyExecutor {
    pub fn from_kind(kind: ExecutorKind) -> Self {
        match kind {
            ExecutorKind::Single => AnyExecutor::Single(SingleThreadExecutor),
            ExecutorKind::ThreadPool => AnyExecutor::ThreadPool(ThreadPoolExecutor),
        }
    }

    pub fn single() -> Self {
        AnyExecutor::Single(SingleThreadExecutor)
    }

    pub fn thread_pool() -> Self {
        AnyExecutor::ThreadPool(ThreadPoolExecutor)
    }
}

impl Executor for AnyExecutor {
    fn parallel_for<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        match self {
            AnyExecutor::Single(e) => e.parallel_for(n, f),
            AnyExecutor::ThreadPool(e) => e.parallel_for(n, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_thread_preserves_index_order() {
        let exec = SingleThreadExecutor;
        let out = exec.parallel_for(5, |i| i * 2);
        assert_eq!(out, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn thread_pool_preserves_index_order() {
        let exec = ThreadPoolExecutor;
        let out = exec.parallel_for(200, |i| i);
        assert_eq!(out, (0..200).collect::<Vec<_>>());
    }
}
