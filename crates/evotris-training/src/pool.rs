//! Fixed-size worker pool with completion-ordered results.
//!
//! Tasks are closures tagged with a caller-chosen `usize`. Workers pull tasks
//! from a bounded job queue and push [`Completion`]s to an unbounded result
//! queue, so the coordinator receives results in the order tasks finish, not
//! the order they were submitted.
//!
//! A panicking task is caught on the worker and reported as
//! [`TaskError::Panicked`]; the worker keeps running.
//!
//! # Example
//!
//! ```
//! use evotris_training::pool::WorkerPool;
//!
//! let mut pool = WorkerPool::new(2).unwrap();
//! for i in 0..4 {
//!     pool.submit(i, move || i * i).unwrap();
//! }
//! let mut sum = 0;
//! for completion in pool.drain() {
//!     sum += completion.result.unwrap();
//! }
//! assert_eq!(sum, 14);
//! ```

use std::{
    any::Any,
    io,
    panic::{self, AssertUnwindSafe},
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};

type Job<T> = (usize, Box<dyn FnOnce() -> T + Send>);

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum TaskError {
    #[display("task panicked: {message}")]
    Panicked { message: String },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PoolError {
    #[display("failed to spawn worker thread")]
    Spawn { source: io::Error },
    #[display("worker pool is shut down")]
    Closed,
}

/// Result of one task, with the tag it was submitted under.
#[derive(Debug)]
pub struct Completion<T> {
    pub tag: usize,
    pub result: Result<T, TaskError>,
}

#[derive(Debug)]
pub struct WorkerPool<T> {
    jobs: Option<Sender<Job<T>>>,
    completions: Receiver<Completion<T>>,
    workers: Vec<JoinHandle<()>>,
    pending: usize,
}

impl<T> WorkerPool<T>
where
    T: Send + 'static,
{
    /// Starts `workers` worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `workers` is 0.
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        assert!(workers > 0, "worker pool needs at least one worker");
        let (jobs_tx, jobs_rx) = crossbeam_channel::bounded::<Job<T>>(workers * 4);
        let (results_tx, results_rx) = crossbeam_channel::unbounded();

        let mut pool = Self {
            jobs: Some(jobs_tx),
            completions: results_rx,
            workers: Vec::with_capacity(workers),
            pending: 0,
        };
        for i in 0..workers {
            let jobs = jobs_rx.clone();
            let results = results_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("evotris-worker-{i}"))
                .spawn(move || worker_loop(&jobs, &results))
                .map_err(|source| PoolError::Spawn { source })?;
            pool.workers.push(handle);
        }
        tracing::debug!(workers, "worker pool started");
        Ok(pool)
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Number of submitted tasks not yet returned by [`Self::next_completed`].
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Queues a task. Blocks while the job queue is full.
    pub fn submit<F>(&mut self, tag: usize, task: F) -> Result<(), PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let jobs = self.jobs.as_ref().ok_or(PoolError::Closed)?;
        let job: Job<T> = (tag, Box::new(task));
        jobs.send(job).map_err(|_| PoolError::Closed)?;
        self.pending += 1;
        Ok(())
    }

    /// Blocks until any pending task completes.
    ///
    /// Returns `None` once nothing is pending.
    pub fn next_completed(&mut self) -> Option<Completion<T>> {
        if self.pending == 0 {
            return None;
        }
        if let Ok(completion) = self.completions.recv() {
            self.pending -= 1;
            return Some(completion);
        }
        // Every worker is gone; the remaining tasks will never report.
        tracing::warn!(pending = self.pending, "worker pool disconnected");
        self.pending = 0;
        None
    }

    /// Iterates over completions until nothing is pending.
    pub fn drain(&mut self) -> impl Iterator<Item = Completion<T>> + '_ {
        std::iter::from_fn(move || self.next_completed())
    }

    /// Closes the job queue and joins every worker.
    ///
    /// Tasks already queued still run; their results are discarded.
    pub fn shutdown(&mut self) {
        if self.jobs.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("worker thread panicked outside a task");
            }
        }
        self.pending = 0;
        tracing::debug!("worker pool shut down");
    }
}

impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.jobs = None;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("worker thread panicked outside a task");
            }
        }
    }
}

fn worker_loop<T>(jobs: &Receiver<Job<T>>, results: &Sender<Completion<T>>) {
    while let Ok((tag, job)) = jobs.recv() {
        let result = panic::catch_unwind(AssertUnwindSafe(job)).map_err(|payload| {
            TaskError::Panicked {
                message: panic_message(&*payload),
            }
        });
        if results.send(Completion { tag, result }).is_err() {
            break;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_every_task_completes_once() {
        let mut pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.workers(), 3);
        for tag in 0..50 {
            pool.submit(tag, move || tag * 2).unwrap();
        }
        let mut seen = vec![false; 50];
        for completion in pool.drain() {
            assert_eq!(completion.result.unwrap(), completion.tag * 2);
            assert!(!seen[completion.tag]);
            seen[completion.tag] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(pool.pending(), 0);
        assert!(pool.next_completed().is_none());
    }

    #[test]
    fn test_results_arrive_in_completion_order() {
        let mut pool = WorkerPool::new(2).unwrap();
        pool.submit(0, || {
            thread::sleep(Duration::from_millis(300));
            0
        })
        .unwrap();
        pool.submit(1, || 1).unwrap();
        let first = pool.next_completed().unwrap();
        assert_eq!(first.tag, 1);
        let second = pool.next_completed().unwrap();
        assert_eq!(second.tag, 0);
    }

    #[test]
    fn test_panicking_task_is_reported() {
        let mut pool = WorkerPool::new(1).unwrap();
        pool.submit(0, || -> usize { panic!("boom") }).unwrap();
        pool.submit(1, || 7).unwrap();

        let mut completions: Vec<_> = pool.drain().collect();
        completions.sort_by_key(|c| c.tag);
        match &completions[0].result {
            Err(TaskError::Panicked { message }) => assert_eq!(message, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(completions[1].result.as_ref().unwrap(), &7);

        // the worker survives
        pool.submit(2, || 8).unwrap();
        assert_eq!(pool.next_completed().unwrap().result.unwrap(), 8);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut pool = WorkerPool::new(2).unwrap();
        pool.submit(0, || ()).unwrap();
        assert!(pool.next_completed().is_some());
        pool.shutdown();
        assert_eq!(pool.workers(), 0);
        assert!(matches!(pool.submit(1, || ()), Err(PoolError::Closed)));
        assert!(pool.next_completed().is_none());
    }
}
