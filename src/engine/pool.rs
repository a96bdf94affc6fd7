//! Fixed-size evaluation worker pool.
//!
//! Wraps a dedicated rayon thread pool and exposes the two shapes of
//! parallel map the scheduler needs: a blocking map for evaluation and
//! recombination, and a submit-then-await map for mutation. Both preserve
//! index correspondence: `result[i]` is computed from `items[i]`, which is
//! what lets the scheduler write fitnesses and replacement individuals
//! back onto the same-indexed slot.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use rayon::prelude::*;

/// Worker count used when the run configuration leaves `pool_size` unset.
pub const DEFAULT_POOL_SIZE: usize = 8;

/// A fixed-size pool of worker threads for per-individual operator
/// invocations.
///
/// The pool lives for exactly one scheduler run. Dropping it joins all
/// worker threads, so scoped ownership inside `run` guarantees release on
/// every exit path.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Build a pool with a fixed number of worker threads.
    pub fn new(size: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("evostrat-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Blocking indexed parallel map.
    ///
    /// Applies `op` to every item and returns the results in input order.
    /// Fail-fast: the first operator error aborts the whole map and any
    /// partial results are discarded.
    pub fn map<T, U, E, F>(&self, items: &[T], op: F) -> Result<Vec<U>, E>
    where
        T: Sync,
        U: Send,
        E: Send,
        F: Fn(usize, &T) -> Result<U, E> + Sync,
    {
        self.pool.install(|| {
            items
                .par_iter()
                .enumerate()
                .map(|(index, item)| op(index, item))
                .collect()
        })
    }

    /// Non-blocking submission of an indexed parallel map.
    ///
    /// The work is scheduled onto the pool and the caller gets a handle to
    /// await. Behaviorally this is `map` split into submit and wait; the
    /// mutation step uses it so the coordinating thread issues the request
    /// before blocking on the result.
    pub fn map_submit<T, U, E, F>(&self, items: Vec<T>, op: F) -> PendingMap<U, E>
    where
        T: Send + Sync + 'static,
        U: Send + 'static,
        E: Send + 'static,
        F: Fn(usize, &T) -> Result<U, E> + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.pool.spawn(move || {
            // A panicking operator must not escape into the pool, where
            // rayon would abort the process. The payload is carried back
            // over the channel and re-raised on the awaiting thread.
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                items
                    .par_iter()
                    .enumerate()
                    .map(|(index, item)| op(index, item))
                    .collect()
            }));
            // The receiver may already be gone if the run was abandoned;
            // the result is discarded in that case.
            let _ = tx.send(outcome);
        });
        PendingMap { rx }
    }
}

/// Handle to a submitted parallel map.
///
/// Must be awaited before the results are used; dropping it abandons the
/// computation's output.
#[must_use = "a submitted map does nothing until awaited"]
pub struct PendingMap<U, E> {
    rx: Receiver<thread::Result<Result<Vec<U>, E>>>,
}

impl<U, E> PendingMap<U, E> {
    /// Block until the submitted map completes.
    ///
    /// An operator panic is re-raised here on the awaiting thread, the
    /// same way the blocking `map` propagates one out of `install`.
    pub fn wait(self) -> Result<Vec<U>, E> {
        let outcome = self
            .rx
            .recv()
            .expect("worker pool dropped a submitted map without completing it");
        outcome.unwrap_or_else(|payload| panic::resume_unwind(payload))
    }
}
