//! Single-shot deferred tasks for the UI thread.
//!
//! Nothing here runs on its own: the event loop asks for due tasks on every
//! idle tick and dispatches them. A task that wants to repeat must re-arm
//! itself, which keeps idle widgets free of background ticking.
//!
//! While draining, the clock jumps to each task's deadline before the task
//! is handed out. Tasks re-armed during the drain are therefore measured
//! from their predecessor's deadline and still fire within the same drain if
//! they fall before its end, so a long stall catches up deterministically.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Instant,
    next_id: u64,
    queue: BTreeMap<(Instant, TimerId), T>,
}

impl<T> Scheduler<T> {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            next_id: 0,
            queue: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    /// Queue `task` to fire once, `delay` after the scheduler's current time.
    pub fn single_shot(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now + delay, id), task);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let key = self.queue.keys().find(|(_, tid)| *tid == id).copied()?;
        self.queue.remove(&key)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.keys().any(|(_, tid)| *tid == id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.first_key_value().map(|((deadline, _), _)| *deadline)
    }

    /// Remove the earliest task due at or before `until`.
    pub fn pop_due(&mut self, until: Instant) -> Option<(TimerId, T)> {
        let (&(deadline, id), _) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }
        let task = self.queue.remove(&(deadline, id))?;
        if deadline > self.now {
            self.now = deadline;
        }
        Some((id, task))
    }

    /// Finish a drain: move the clock to `until` if it is behind.
    pub fn settle(&mut self, until: Instant) {
        if until > self.now {
            self.now = until;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_in_deadline_then_insertion_order() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(t0);
        s.single_shot(Duration::from_millis(20), "late");
        s.single_shot(Duration::from_millis(10), "first");
        s.single_shot(Duration::from_millis(10), "second");
        let until = t0 + Duration::from_millis(30);
        let mut fired = Vec::new();
        while let Some((_, task)) = s.pop_due(until) {
            fired.push(task);
        }
        assert_eq!(fired, vec!["first", "second", "late"]);
        assert!(s.is_empty());
    }

    #[test]
    fn nothing_fires_early() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(t0);
        s.single_shot(Duration::from_millis(10), ());
        assert!(s.pop_due(t0 + Duration::from_millis(9)).is_none());
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn cancel_removes_pending_task() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(t0);
        let keep = s.single_shot(Duration::from_millis(5), 1);
        let drop = s.single_shot(Duration::from_millis(5), 2);
        assert_eq!(s.cancel(drop), Some(2));
        assert_eq!(s.cancel(drop), None);
        assert!(s.is_pending(keep));
        assert!(!s.is_pending(drop));
    }

    #[test]
    fn rearmed_tasks_catch_up_within_one_drain() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(t0);
        s.single_shot(Duration::from_millis(10), 0u32);
        let until = t0 + Duration::from_millis(55);
        let mut count = 0;
        while let Some((_, n)) = s.pop_due(until) {
            count += 1;
            s.single_shot(Duration::from_millis(10), n + 1);
        }
        s.settle(until);
        // Deadlines at 10, 20, 30, 40, 50 fire; the one at 60 waits.
        assert_eq!(count, 5);
        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(60)));
        assert_eq!(s.now(), until);
    }
}
