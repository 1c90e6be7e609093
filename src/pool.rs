//! Fixed-size worker pool the pipeline schedules tiles on.
//!
//! The pool is an owned value: the driver builds it with an explicit worker
//! count and dropping it waits until every worker thread has exited.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{HeatError, Result};

/// Counts worker threads that have left their run loop.
#[derive(Default)]
struct ExitLatch {
    exited: Mutex<usize>,
    cond: Condvar,
}

impl ExitLatch {
    fn arrive(&self) {
        let mut exited = self.exited.lock().unwrap_or_else(|e| e.into_inner());
        *exited += 1;
        self.cond.notify_all();
    }

    fn wait_for(&self, workers: usize) {
        let mut exited = self.exited.lock().unwrap_or_else(|e| e.into_inner());
        while *exited < workers {
            exited = self.cond.wait(exited).unwrap_or_else(|e| e.into_inner());
        }
    }
}

pub struct WorkerPool {
    pool: Option<ThreadPool>,
    workers: usize,
    latch: Arc<ExitLatch>,
}

impl WorkerPool {
    /// Start exactly `workers` threads.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(HeatError::WorkerPool(
                "worker count must be at least 1".to_string(),
            ));
        }

        let latch = Arc::new(ExitLatch::default());
        let on_exit = Arc::clone(&latch);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("heat-worker-{}", i))
            .exit_handler(move |_| on_exit.arrive())
            .build()?;

        debug!(workers, "worker pool started");
        Ok(Self {
            pool: Some(pool),
            workers,
            latch,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn pool(&self) -> Result<&ThreadPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| HeatError::WorkerPool("worker pool already shut down".to_string()))
    }

    /// Run `f` as a single unit on one worker and wait for it.
    pub fn run<F, R>(&self, phase: &'static str, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        let pool = self.pool()?;
        panic::catch_unwind(AssertUnwindSafe(|| pool.install(f))).map_err(|payload| {
            HeatError::TileFault {
                phase,
                message: panic_message(payload),
            }
        })
    }

    /// Dispatch one unit of work per element of `units` and block until all
    /// of them have finished.
    ///
    /// If any unit panics the remaining units still run to completion and
    /// the whole submission fails with [`HeatError::TileFault`].
    pub fn submit<U, F>(&self, phase: &'static str, units: Vec<U>, work: F) -> Result<()>
    where
        U: Send,
        F: Fn(U) + Sync,
    {
        let work = &work;
        let pool = self.pool()?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.scope(|scope| {
                for unit in units {
                    scope.spawn(move |_| work(unit));
                }
            })
        }));

        outcome.map_err(|payload| HeatError::TileFault {
            phase,
            message: panic_message(payload),
        })
    }

    /// Stop accepting work, let running units drain, then join every worker.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            drop(pool);
            self.latch.wait_for(self.workers);
            debug!(workers = self.workers, "worker pool joined");
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unit of work panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn submit_runs_every_unit_before_returning() {
        let pool = WorkerPool::new(4).unwrap();
        let done = AtomicUsize::new(0);
        pool.submit("count", (0..100).collect(), |_: usize| {
            done.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(done.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn units_run_on_pool_threads() {
        let pool = WorkerPool::new(2).unwrap();
        let names = Mutex::new(HashSet::new());
        pool.submit("names", (0..16).collect(), |_: usize| {
            let name = std::thread::current().name().map(str::to_string);
            names.lock().unwrap().insert(name);
        })
        .unwrap();

        let names = names.into_inner().unwrap();
        assert!(names
            .iter()
            .all(|n| n.as_deref().is_some_and(|n| n.starts_with("heat-worker-"))));
    }

    #[test]
    fn mutable_units_are_disjoint() {
        let pool = WorkerPool::new(3).unwrap();
        let mut data = vec![0usize; 12];
        let chunks: Vec<(usize, &mut [usize])> = data.chunks_mut(4).enumerate().collect();
        pool.submit("fill", chunks, |(t, chunk)| {
            chunk.iter_mut().for_each(|v| *v = t + 1);
        })
        .unwrap();
        assert_eq!(data, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
    }

    #[test]
    fn panicking_unit_fails_the_submission() {
        let pool = WorkerPool::new(2).unwrap();
        let done = AtomicUsize::new(0);
        let result = pool.submit("faulty", (0..8).collect(), |t: usize| {
            if t == 3 {
                panic!("tile {} diverged", t);
            }
            done.fetch_add(1, Ordering::Relaxed);
        });

        match result {
            Err(HeatError::TileFault { phase, message }) => {
                assert_eq!(phase, "faulty");
                assert!(message.contains("tile 3"));
            }
            other => panic!("expected tile fault, got {:?}", other),
        }
        assert_eq!(done.load(Ordering::Relaxed), 7);

        // the pool stays usable after a fault
        assert_eq!(pool.run("serial", || 7).unwrap(), 7);
    }

    #[test]
    fn shutdown_joins_all_workers() {
        let pool = WorkerPool::new(3).unwrap();
        let latch = Arc::clone(&pool.latch);
        pool.shutdown();
        assert_eq!(*latch.exited.lock().unwrap(), 3);
    }

    #[test]
    fn pool_keeps_requested_worker_count() {
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.workers(), 3);
        assert_eq!(pool.run("count", rayon::current_num_threads).unwrap(), 3);
    }

    #[test]
    fn taken_pool_reports_error() {
        let mut pool = WorkerPool::new(1).unwrap();
        let inner = pool.pool.take();
        drop(inner);
        assert!(matches!(pool.run("late", || ()), Err(HeatError::WorkerPool(_))));
        assert!(matches!(
            pool.submit("late", vec![1usize], |_| ()),
            Err(HeatError::WorkerPool(_))
        ));
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(HeatError::WorkerPool(_))));
    }
}
