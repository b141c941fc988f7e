use std::collections::HashMap;
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::debug;

use crate::events::{EventSender, TimerEvent, UiEvent};

/// Handle returned by [`Schedule::schedule`], used to cancel a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Wall-clock delays that post a [`TimerEvent`] back into the event queue.
///
/// Delays are best effort. Cancelling only guarantees the timer will not fire
/// if it has not fired yet; a firing that is already queued is still
/// delivered, so receivers must treat stale timers as no-ops.
pub trait Schedule {
    fn schedule(&mut self, delay: Duration, timer: TimerEvent) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// [`Schedule`] backed by `tokio::time::sleep` tasks.
///
/// Must be used from inside a tokio runtime.
pub struct TokioScheduler {
    sender: EventSender,
    next_id: u64,
    pending: HashMap<u64, AbortHandle>,
}

impl TokioScheduler {
    pub fn new(sender: EventSender) -> Self {
        Self {
            sender,
            next_id: 0,
            pending: HashMap::new(),
        }
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.pending.values().filter(|task| !task.is_finished()).count()
    }
}

impl Schedule for TokioScheduler {
    fn schedule(&mut self, delay: Duration, timer: TimerEvent) -> TimerHandle {
        self.pending.retain(|_, task| !task.is_finished());

        let id = self.next_id;
        self.next_id += 1;

        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone once the app shut down; nothing to deliver.
            let _ = sender.send(UiEvent::Timer(timer));
        });
        self.pending.insert(id, task.abort_handle());
        debug!("Scheduled {:?} in {:?}", timer, delay);

        TimerHandle(id)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.pending.remove(&handle.0) {
            task.abort();
        }
    }
}

/// Deterministic scheduler for state-machine tests: time only moves when
/// the test says so.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    now: Duration,
    next_id: u64,
    queue: Vec<(u64, Duration, TimerEvent)>,
}

#[cfg(test)]
impl ManualScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn pending(&self) -> Vec<TimerEvent> {
        self.queue.iter().map(|(_, _, timer)| *timer).collect()
    }

    /// Pop the earliest timer due at or before `deadline`, moving the clock
    /// to its due time. Ties fire in scheduling order.
    pub(crate) fn pop_due(&mut self, deadline: Duration) -> Option<TimerEvent> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, (_, due, _))| *due <= deadline)
            .min_by_key(|(_, (id, due, _))| (*due, *id))
            .map(|(index, _)| index)?;
        let (_, due, timer) = self.queue.remove(index);
        self.now = due;
        Some(timer)
    }

    pub(crate) fn set_now(&mut self, now: Duration) {
        self.now = now;
    }
}

#[cfg(test)]
impl Schedule for ManualScheduler {
    fn schedule(&mut self, delay: Duration, timer: TimerEvent) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push((id, self.now + delay, timer));
        TimerHandle(id)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.queue.retain(|(id, _, _)| *id != handle.0);
    }
}
