use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;

use crate::core::{ProcessId, Ticks};

/// Ordering key for SJF/STCF levels: smallest metric first, then earliest
/// arrival, then whichever was admitted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub metric: Ticks,
    pub arrival: Ticks,
    pub seq: u64,
}

impl OrderKey {
    fn tuple(&self) -> (Ticks, Ticks, u64) {
        (self.metric, self.arrival, self.seq)
    }
}

// KeyedPriorityQueue is a max-heap, so the smallest key must compare greatest
impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other.tuple().cmp(&self.tuple())
    }
}

#[derive(Debug)]
pub struct PriqQueue {
    processes: KeyedPriorityQueue<ProcessId, OrderKey>,
    next_seq: u64,
}

impl PriqQueue {
    pub fn new() -> Self {
        Self {
            processes: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    /// Insert with a fresh admission sequence number. A process that is
    /// reinserted after a partial run queues behind equal keys already waiting.
    pub fn push(&mut self, id: ProcessId, metric: Ticks, arrival: Ticks) {
        let key = OrderKey {
            metric,
            arrival,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        let replaced = self.processes.push(id, key);
        debug_assert!(replaced.is_none(), "Process {id} pushed twice");
    }

    pub fn pop(&mut self) -> Option<ProcessId> {
        self.processes.pop().map(|(id, _)| id)
    }

    pub fn peek_key(&self) -> Option<OrderKey> {
        self.processes.peek().map(|(_, key)| *key)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.processes.get_priority(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_metric_first() {
        let mut q = PriqQueue::new();
        q.push(0, 8, 0);
        q.push(1, 2, 3);
        q.push(2, 5, 1);
        assert_eq!(q.peek_key().map(|k| k.metric), Some(2));
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(0));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn ties_break_on_arrival_then_admission() {
        let mut q = PriqQueue::new();
        q.push(7, 4, 2);
        q.push(3, 4, 1);
        q.push(5, 4, 2);
        q.push(6, 4, 2);
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), Some(7));
        assert_eq!(q.pop(), Some(5));
        assert_eq!(q.pop(), Some(6));
    }
}
