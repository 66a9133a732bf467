use std::collections::BTreeMap;

/// What a timer of the core is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Move focus into the preview once it has rendered.
    PreviewFocus,
}

/// Handle to a pending timer. Handles are never reused, so cancelling or
/// matching a stale handle is always harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle {
    // Field order gives the (deadline, id) firing order.
    deadline: u64,
    id: u64,
}

impl TimerHandle {
    /// Logical time (ms) at which the timer fires.
    pub fn deadline(&self) -> u64 {
        self.deadline
    }
}

/// Logical-clock timer queue.
///
/// Time only moves when the host says so via [`Scheduler::advance_to`], so
/// every timer in the core is deterministic under test. Payloads say what a
/// timer is for; the owner dispatches them when they come due.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: u64,
    next_id: u64,
    pending: BTreeMap<TimerHandle, T>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Current logical time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerHandle {
        let handle = TimerHandle {
            deadline: self.now.saturating_add(delay_ms),
            id: self.next_id,
        };
        self.next_id += 1;
        self.pending.insert(handle, payload);
        handle
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Move the clock to `now_ms` and take every timer that came due, in
    /// deadline order. The clock never runs backwards; an earlier `now_ms`
    /// fires nothing.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<(TimerHandle, T)> {
        self.now = self.now.max(now_ms);
        let mut due = Vec::new();
        while let Some((handle, _)) = self.pending.first_key_value() {
            if handle.deadline > self.now {
                break;
            }
            if let Some(entry) = self.pending.pop_first() {
                due.push(entry);
            }
        }
        due
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.first_key_value().map(|(handle, _)| handle.deadline)
    }

    /// Drop every pending timer, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut sched = Scheduler::new();
        sched.schedule(30, "late");
        sched.schedule(10, "early");
        sched.schedule(10, "early-second");

        assert!(sched.advance_to(9).is_empty());
        let fired: Vec<_> = sched.advance_to(30).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec!["early", "early-second", "late"]);
        assert!(sched.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut sched = Scheduler::new();
        let handle = sched.schedule(50, ());
        assert!(sched.is_pending(handle));
        assert!(sched.cancel(handle));
        assert!(!sched.cancel(handle));
        assert!(sched.advance_to(1_000).is_empty());
    }

    #[test]
    fn clock_is_monotonic() {
        let mut sched = Scheduler::new();
        sched.advance_to(100);
        sched.advance_to(40);
        assert_eq!(sched.now(), 100);

        let handle = sched.schedule(50, ());
        assert_eq!(handle.deadline(), 150);
        assert_eq!(sched.next_deadline(), Some(150));
    }

    #[test]
    fn clear_reports_dropped_timers() {
        let mut sched = Scheduler::new();
        sched.schedule(1, 'a');
        sched.schedule(2, 'b');
        assert_eq!(sched.clear(), 2);
        assert_eq!(sched.next_deadline(), None);
    }
}
