use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Delayed work driven by the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Spawner fire.
    Spawn,
    /// Drop the scared tint from a butterfly.
    RevertTint(hecs::Entity),
}

/// Handle for cancelling a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry {
    fire_at: f64,
    id: u64,
    event: TimerEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap pops the earliest entry; ids break ties FIFO.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Priority queue of "fire at time T" events.
pub struct Scheduler {
    heap: BinaryHeap<Entry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::with_capacity(16),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, fire_at: f64, event: TimerEvent) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.heap.push(Entry { fire_at, id, event });
        TimerId(id)
    }

    /// Remove a pending event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        let before = self.heap.len();
        self.heap.retain(|e| e.id != timer.0);
        self.heap.len() != before
    }

    /// Pop the earliest event due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<TimerEvent> {
        if self.heap.peek()?.fire_at <= now {
            self.heap.pop().map(|e| e.event)
        } else {
            None
        }
    }

    pub fn is_pending(&self, timer: TimerId) -> bool {
        self.heap.iter().any(|e| e.id == timer.0)
    }

    /// Fire time of the earliest pending event.
    pub fn next_fire_time(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.fire_at)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut s = Scheduler::new();
        let mut world = hecs::World::new();
        let e = world.spawn((0u8,));
        s.schedule(2.0, TimerEvent::Spawn);
        s.schedule(1.0, TimerEvent::RevertTint(e));

        assert_eq!(s.pop_due(0.5), None);
        assert_eq!(s.pop_due(3.0), Some(TimerEvent::RevertTint(e)));
        assert_eq!(s.pop_due(3.0), Some(TimerEvent::Spawn));
        assert!(s.is_empty());
    }

    #[test]
    fn equal_times_fire_fifo() {
        let mut s = Scheduler::new();
        let mut world = hecs::World::new();
        let a = world.spawn((0u8,));
        let b = world.spawn((1u8,));
        s.schedule(1.0, TimerEvent::RevertTint(a));
        s.schedule(1.0, TimerEvent::RevertTint(b));
        assert_eq!(s.pop_due(1.0), Some(TimerEvent::RevertTint(a)));
        assert_eq!(s.pop_due(1.0), Some(TimerEvent::RevertTint(b)));
    }

    #[test]
    fn cancel_removes_only_that_timer() {
        let mut s = Scheduler::new();
        let first = s.schedule(1.0, TimerEvent::Spawn);
        let second = s.schedule(2.0, TimerEvent::Spawn);

        assert!(s.cancel(first));
        assert!(!s.cancel(first));
        assert!(!s.is_pending(first));
        assert!(s.is_pending(second));
        assert_eq!(s.next_fire_time(), Some(2.0));
    }
}
