//! Bounded-concurrency fan-out of sub-tasks with aggregated progress.
//!
//! The semaphore is shared by every process the manager runs, so it caps
//! total in-flight sub-tasks rather than sub-tasks per operation.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tokio::sync::{watch, Semaphore};
use tracing::{debug, warn};

use uc_core::sync::PasteSingleProcess;

/// Shared handle to one process tracker.
#[derive(Clone)]
pub struct ProcessHandle {
    inner: Arc<ProcessInner>,
}

struct ProcessInner {
    process: Mutex<PasteSingleProcess>,
    progress_tx: watch::Sender<f32>,
}

impl ProcessHandle {
    fn new(task_count: usize) -> Self {
        let process = PasteSingleProcess::new(task_count);
        let (progress_tx, _) = watch::channel(process.progress());
        Self {
            inner: Arc::new(ProcessInner {
                process: Mutex::new(process),
                progress_tx,
            }),
        }
    }

    /// Marks sub-task `index` done. Repeated or out-of-range marks are
    /// ignored.
    pub fn success(&self, index: usize) -> bool {
        let progress = {
            let mut process = match self.inner.process.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if !process.success(index) {
                return false;
            }
            process.progress()
        };
        self.inner.progress_tx.send_replace(progress);
        true
    }

    pub fn snapshot(&self) -> PasteSingleProcess {
        match self.inner.process.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn progress(&self) -> f32 {
        *self.inner.progress_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f32> {
        self.inner.progress_tx.subscribe()
    }
}

pub struct PasteSyncProcessManager<K> {
    permits: Arc<Semaphore>,
    processes: Mutex<HashMap<K, ProcessHandle>>,
}

impl<K> PasteSyncProcessManager<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new(permits: Arc<Semaphore>) -> Self {
        Self {
            permits,
            processes: Mutex::new(HashMap::new()),
        }
    }

    fn processes(&self) -> std::sync::MutexGuard<'_, HashMap<K, ProcessHandle>> {
        match self.processes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// First caller wins: an existing tracker keeps its task count.
    pub fn get_or_create_process(&self, key: K, task_count: usize) -> ProcessHandle {
        self.processes()
            .entry(key)
            .or_insert_with(|| ProcessHandle::new(task_count))
            .clone()
    }

    pub fn get_process(&self, key: &K) -> Option<ProcessHandle> {
        self.processes().get(key).cloned()
    }

    pub fn cleanup(&self, key: &K) {
        if self.processes().remove(key).is_some() {
            debug!(key = ?key, "Process tracker removed");
        }
    }

    /// Runs every task concurrently, each holding one permit while it runs.
    /// Successful tasks mark their index in the tracker for `key`. Results
    /// come back in task order once all tasks finished.
    pub async fn run_tasks<F, Fut, T, E>(&self, key: K, tasks: Vec<F>) -> Vec<(usize, Result<T, E>)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let handle = self.get_or_create_process(key.clone(), tasks.len());

        let runs = tasks.into_iter().enumerate().map(|(index, task)| {
            let permits = self.permits.clone();
            let handle = handle.clone();
            let key = &key;
            async move {
                // A closed semaphore means shutdown; let the task run anyway.
                let permit = permits.acquire_owned().await.ok();
                if permit.is_none() {
                    warn!(key = ?key, index, "Semaphore closed, running task without permit");
                }
                let result = task().await;
                drop(permit);

                if result.is_ok() {
                    handle.success(index);
                }
                (index, result)
            }
        });

        join_all(runs).await
    }
}
