use std::collections::HashMap;
use std::time::Duration;

/// Identifies one repeating task registered with a [`Scheduler`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Host-side repeating task registry.
///
/// Cancelling a handle that is unknown or already cancelled is a no-op, and a
/// cancelled task is never reported as due again.
pub trait Scheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TaskHandle;
    fn cancel(&mut self, handle: TaskHandle);
    /// Returns true when the task should run at `now_ms`, advancing its deadline.
    fn poll(&mut self, handle: TaskHandle, now_ms: i64) -> bool;
    fn is_active(&self, handle: TaskHandle) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Task {
    period_ms: i64,
    // None until the first poll, which always fires
    next_due_ms: Option<i64>,
}

/// Deadline-based scheduler polled from the event loop.
///
/// Missed periods are coalesced: a late poll fires once and the next
/// deadline is measured from that poll.
#[derive(Debug, Default)]
pub struct IntervalScheduler {
    next_id: u64,
    tasks: HashMap<u64, Task>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TaskHandle {
        self.next_id += 1;
        let period_ms = (period.as_millis() as i64).max(1);
        self.tasks.insert(
            self.next_id,
            Task {
                period_ms,
                next_due_ms: None,
            },
        );
        tracing::trace!(task = self.next_id, period_ms, "scheduled repeating task");
        TaskHandle(self.next_id)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if self.tasks.remove(&handle.0).is_some() {
            tracing::trace!(task = handle.0, "cancelled repeating task");
        }
    }

    fn poll(&mut self, handle: TaskHandle, now_ms: i64) -> bool {
        let Some(task) = self.tasks.get_mut(&handle.0) else {
            return false;
        };

        match task.next_due_ms {
            Some(due) if now_ms < due => false,
            _ => {
                task.next_due_ms = Some(now_ms + task.period_ms);
                true
            }
        }
    }

    fn is_active(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&handle.0)
    }
}
