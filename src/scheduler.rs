//! Keyed, cancellable delayed events
//!
//! Every timer (toast expiry, simulated analysis, simulated sign-in) is a
//! spawned task that sleeps and then sends one [`Event`] back to the app.
//! Tasks are keyed so that rescheduling or cancelling a key aborts the
//! previous task before it can fire.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::app::{Event, EventSender};

pub struct Scheduler<K> {
    events: EventSender,
    tasks: HashMap<K, JoinHandle<()>>,
}

impl<K> Scheduler<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            tasks: HashMap::new(),
        }
    }

    /// Send `event` after `delay`, replacing any task pending under `key`.
    /// Must be called from within a tokio runtime.
    #[tracing::instrument(name = "schedule", level = "trace", skip(self, event))]
    pub fn schedule(&mut self, key: K, delay: Duration, event: Event) {
        self.cancel(&key);
        self.tasks.retain(|_, task| !task.is_finished());

        // deadline counts from now, not from the task's first poll
        let deadline = tokio::time::Instant::now() + delay;
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if events.send(event).is_err() {
                tracing::debug!("Event loop closed before timer fired");
            }
        });
        self.tasks.insert(key, task);
    }

    /// Abort the task pending under `key`. Returns whether one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.tasks.remove(key) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// Forget a key whose event has been delivered
    pub fn complete(&mut self, key: &K) {
        self.tasks.remove(key);
    }

    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.tasks.get(key).is_some_and(|task| !task.is_finished())
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl<K> Drop for Scheduler<K> {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);
        scheduler.schedule("sign-in", Duration::from_millis(1500), Event::SignInDue);

        tokio::time::advance(Duration::from_millis(1400)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        assert!(matches!(rx.try_recv(), Ok(Event::SignInDue)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_counts_from_schedule_call() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);
        scheduler.schedule("sign-in", Duration::from_millis(1500), Event::SignInDue);

        // the spawned task has not been polled before the clock moves
        tokio::time::advance(Duration::from_millis(1600)).await;
        settle().await;
        assert!(matches!(rx.try_recv(), Ok(Event::SignInDue)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);
        scheduler.schedule(1u64, Duration::from_secs(1), Event::SignInDue);

        assert!(scheduler.cancel(&1));
        assert!(!scheduler.cancel(&1));

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);
        scheduler.schedule("analysis", Duration::from_secs(2), Event::AnalysisDue(1));
        tokio::time::advance(Duration::from_secs(1)).await;
        scheduler.schedule("analysis", Duration::from_secs(2), Event::AnalysisDue(2));

        tokio::time::advance(Duration::from_millis(1500)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert!(matches!(rx.try_recv(), Ok(Event::AnalysisDue(2))));
        assert!(rx.try_recv().is_err());
        assert_eq!(scheduler.pending(), 0);
    }
}
