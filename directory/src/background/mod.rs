pub mod data_loader;

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Handle to a unit of work that runs after a delay. Dropping the handle
/// cancels the work if it has not finished yet.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn after<F>(delay: Duration, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            future.await;
        });
        Self { handle }
    }

    pub fn cancel(self) {
        // Drop aborts
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Keeps at most one scheduled task alive: scheduling again cancels the
/// previous one, so only the last call inside the quiet period runs.
#[derive(Debug, Default)]
pub struct Debouncer {
    current: Option<ScheduledTask>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn schedule<F>(&mut self, delay: Duration, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.current = Some(ScheduledTask::after(delay, future));
    }

    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn is_pending(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

/// Manages background tasks for data loading and debounced suggestion work.
/// Tracks running tasks and provides cancellation support
pub struct BackgroundTaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
    debouncers: HashMap<&'static str, Debouncer>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            debouncers: HashMap::new(),
        }
    }

    /// Spawn a background data loading task
    /// If a task with the same ID already exists, it will be cancelled first
    pub fn spawn_load_task<F>(&mut self, task_id: String, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.tasks.remove(&task_id) {
            handle.abort();
        }

        self.tasks.retain(|_, handle| !handle.is_finished());
        let handle = tokio::spawn(future);
        self.tasks.insert(task_id, handle);
    }

    /// Run `future` once `delay` passes without another call for `key`.
    pub fn debounce<F>(&mut self, key: &'static str, delay: Duration, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.debouncers
            .entry(key)
            .or_default()
            .schedule(delay, future);
    }

    pub fn cancel_debounce(&mut self, key: &'static str) {
        if let Some(debouncer) = self.debouncers.get_mut(key) {
            debouncer.cancel();
        }
    }

    /// Cancel all running tasks (used on shutdown)
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
        self.debouncers.clear();
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
