use std::collections::VecDeque;

use super::state::{ProcessId, ProcessState, SimCtx, Ticks};

/// Checks the engine's bookkeeping after every step. Debug builds only.
#[derive(Debug)]
pub struct Observer {
    step: u64,
    last_now: Ticks,
    last_remaining: Vec<Ticks>,
}

impl Observer {
    pub fn new(ctx: &SimCtx) -> Self {
        Self {
            step: 0,
            last_now: ctx.now,
            last_remaining: ctx.processes.iter().map(|p| p.burst_time).collect(),
        }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx, pending: &VecDeque<ProcessId>, completed: &[ProcessId]) {
        self.step += 1;
        if !cfg!(debug_assertions) {
            return;
        }

        debug_assert!(
            ctx.now >= self.last_now,
            "Clock went backwards from {} to {}",
            self.last_now,
            ctx.now
        );
        self.last_now = ctx.now;

        for (id, process) in ctx.processes.iter().enumerate() {
            let last = self.last_remaining[id];
            debug_assert!(
                process.remaining_time() <= last,
                "Remaining time of {} grew from {last} to {}",
                process.label,
                process.remaining_time()
            );
            self.last_remaining[id] = process.remaining_time();
        }

        // Every process sits in exactly one of: pool, a ready container, completed
        let mut seen = vec![0u8; ctx.processes.len()];
        for &id in pending {
            seen[id] += 1;
            debug_assert_eq!(
                ctx.process(id).state(),
                ProcessState::Pending,
                "Pooled process {id} must be Pending"
            );
            debug_assert!(
                ctx.process(id).arrival_time > ctx.now,
                "Process {id} has arrived but was not admitted"
            );
        }
        for &id in completed {
            seen[id] += 1;
            debug_assert_eq!(
                ctx.process(id).state(),
                ProcessState::Completed,
                "Process {id} in completed set must be Completed"
            );
        }
        for (&id, &level_id) in &ctx.process_to_level {
            seen[id] += 1;
            debug_assert_eq!(
                ctx.process(id).state(),
                ProcessState::Ready,
                "Enqueued process {id} must be Ready"
            );
            if let Some(level) = ctx.levels.get(level_id) {
                debug_assert!(
                    level.contains(id),
                    "process_to_level claims process {id} in level {}, but the level does not contain it",
                    level.level()
                );
            } else {
                debug_assert!(false, "process_to_level references unknown level {level_id:?}");
            }
        }
        for (id, count) in seen.iter().enumerate() {
            debug_assert_eq!(
                *count, 1,
                "Process {id} accounted for {count} times at step {}",
                self.step
            );
        }

        let queued: usize = ctx.levels.values().map(|level| level.len()).sum();
        debug_assert_eq!(
            queued,
            ctx.process_to_level.len(),
            "Ready containers disagree with membership map"
        );
    }
}
