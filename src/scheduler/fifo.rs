use std::collections::VecDeque;

use crate::core::ProcessId;

/// Arrival-ordered ready container used by FCFS and round-robin levels.
#[derive(Debug, Default)]
pub struct FifoQueue {
    processes: VecDeque<ProcessId>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, id: ProcessId) {
        self.processes.push_back(id);
    }

    pub fn pop_front(&mut self) -> Option<ProcessId> {
        self.processes.pop_front()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.processes.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_insertion_order() {
        let mut q = FifoQueue::new();
        q.push_back(4);
        q.push_back(1);
        q.push_back(9);
        assert!(q.contains(1));
        assert_eq!(q.pop_front(), Some(4));
        assert_eq!(q.pop_front(), Some(1));
        assert_eq!(q.pop_front(), Some(9));
        assert!(q.is_empty());
    }
}
