use std::collections::VecDeque;

use log::{debug, info, warn};

use super::{
    event::{SimEvent, Slice},
    observer::Observer,
    state::{ProcessId, ProcessRecord, SimCtx, Ticks},
};
use crate::error::SimError;
use crate::scheduler::{Decision, QueueSpec};

/// Multi-level queue scheduler over logical time.
///
/// Each [`step`](Self::step) admits arrivals, lets the highest-priority
/// non-empty level pick a process and slice, applies the slice, admits
/// whatever arrived during it and then requeues or completes the process.
pub struct SchedulerEngine {
    pub ctx: SimCtx,
    // Not yet admitted, ascending arrival; ties keep input order
    pending: VecDeque<ProcessId>,
    completed: Vec<ProcessId>,
    timeline: Vec<Slice>,
    observer: Observer,
}

impl SchedulerEngine {
    pub fn new(specs: Vec<QueueSpec>, processes: Vec<ProcessRecord>) -> Result<Self, SimError> {
        let ctx = SimCtx::new(specs, processes)?;

        for &level_id in &ctx.level_order {
            let level = ctx.levels[level_id].level();
            if !ctx.processes.iter().any(|p| p.queue_level == level) {
                warn!("queue level {level} has no processes assigned");
            }
        }

        let mut pending: Vec<ProcessId> = (0..ctx.processes.len()).collect();
        pending.sort_by_key(|&id| ctx.processes[id].arrival_time);

        info!(
            "scheduler configured with {} levels and {} processes",
            ctx.levels.len(),
            ctx.processes.len()
        );

        let observer = Observer::new(&ctx);
        Ok(Self {
            ctx,
            pending: pending.into(),
            completed: Vec::new(),
            timeline: Vec::new(),
            observer,
        })
    }

    pub fn is_terminated(&self) -> bool {
        self.pending.is_empty() && self.ctx.all_levels_empty()
    }

    pub fn step(&mut self) -> Result<Vec<SimEvent>, SimError> {
        let mut events = Vec::new();
        if self.is_terminated() {
            return Ok(events);
        }

        self.admit_arrivals(&mut events)?;

        let next_arrival = self.next_arrival();
        let Some((level_id, decision)) = self.ctx.next_decision(next_arrival) else {
            // Idle: nothing changes until the next arrival, so jump straight to it
            if let Some(until) = next_arrival {
                debug!("t={} idle until {until}", self.ctx.now);
                self.ctx.advance_time(until - self.ctx.now);
                events.push(SimEvent::Idle { until });
                self.admit_arrivals(&mut events)?;
            }
            self.observer
                .observe(&self.ctx, &self.pending, &self.completed);
            return Ok(events);
        };

        let Decision { process: id, slice } = decision;
        let level = self.ctx.levels[level_id].level();
        let start = self.ctx.now;

        self.ctx.mark_running(id);
        if self.ctx.process(id).start_time().is_none() {
            self.ctx.process_mut(id).record_first_dispatch(start)?;
        }
        events.push(SimEvent::Dispatched {
            process: id,
            level,
            slice,
        });

        self.ctx.advance_time(slice);
        self.ctx.process_mut(id).advance(slice)?;
        self.timeline.push(Slice {
            process: id,
            level,
            start,
            len: slice,
        });

        // Arrivals inside (start, now] must compete with the requeued process
        self.admit_arrivals(&mut events)?;

        let now = self.ctx.now;
        let process = self.ctx.process_mut(id);
        if process.is_finished() {
            process.complete(now)?;
            debug!("t={now} {} completed", process.label);
            self.completed.push(id);
            events.push(SimEvent::Completed { process: id });
        } else {
            let remaining = process.remaining_time();
            debug!("t={now} {} preempted with {remaining} left", process.label);
            events.push(SimEvent::Preempted {
                process: id,
                remaining,
            });
            self.ctx.admit(id)?;
        }

        self.observer
            .observe(&self.ctx, &self.pending, &self.completed);
        Ok(events)
    }

    /// Step until every process has completed.
    pub fn run(&mut self) -> Result<(), SimError> {
        info!("simulation started");
        while !self.is_terminated() {
            self.step()?;
        }
        info!(
            "simulation finished at t={} after {} steps",
            self.ctx.now,
            self.observer.steps()
        );
        Ok(())
    }

    fn admit_arrivals(&mut self, events: &mut Vec<SimEvent>) -> Result<(), SimError> {
        let now = self.ctx.now;
        while let Some(&id) = self.pending.front() {
            if self.ctx.process(id).arrival_time > now {
                break;
            }
            self.pending.pop_front();
            self.ctx.admit(id)?;
            events.push(SimEvent::Admitted {
                process: id,
                level: self.ctx.process(id).queue_level,
            });
        }
        Ok(())
    }

    /// Earliest arrival among processes not yet admitted.
    pub fn next_arrival(&self) -> Option<Ticks> {
        self.pending
            .front()
            .map(|&id| self.ctx.process(id).arrival_time)
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn processes(&self) -> &[ProcessRecord] {
        &self.ctx.processes
    }

    /// Completed processes in completion order.
    pub fn completed(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.completed.iter().map(|&id| self.ctx.process(id))
    }

    pub fn timeline(&self) -> &[Slice] {
        &self.timeline
    }

    /// Consume the engine, returning completed processes in completion order.
    pub fn into_completed(self) -> Vec<ProcessRecord> {
        let mut slots: Vec<Option<ProcessRecord>> =
            self.ctx.processes.into_iter().map(Some).collect();
        self.completed
            .iter()
            .filter_map(|&id| slots[id].take())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessState;
    use crate::scheduler::Policy;

    fn fcfs() -> Vec<QueueSpec> {
        vec![QueueSpec::new(1, Policy::Fcfs)]
    }

    #[test]
    fn empty_input_terminates_immediately() {
        let mut engine = SchedulerEngine::new(fcfs(), Vec::new()).unwrap();
        assert!(engine.is_terminated());
        assert!(engine.step().unwrap().is_empty());
        engine.run().unwrap();
        assert_eq!(engine.now(), 0);
        assert_eq!(engine.completed().count(), 0);
    }

    #[test]
    fn idle_gap_jumps_to_next_arrival() {
        let mut engine =
            SchedulerEngine::new(fcfs(), vec![ProcessRecord::new("A", 2, 5, 1, 1)]).unwrap();
        let events = engine.step().unwrap();
        assert_eq!(
            events,
            vec![
                SimEvent::Idle { until: 5 },
                SimEvent::Admitted {
                    process: 0,
                    level: 1
                },
            ]
        );
        assert_eq!(engine.now(), 5);
        assert_eq!(engine.processes()[0].state(), ProcessState::Ready);

        engine.run().unwrap();
        let a = &engine.processes()[0];
        assert_eq!(a.completion_time(), Some(7));
        assert_eq!(a.waiting_time(), 0);
    }

    #[test]
    fn step_reports_dispatch_and_completion() {
        let mut engine =
            SchedulerEngine::new(fcfs(), vec![ProcessRecord::new("A", 3, 0, 1, 1)]).unwrap();
        let events = engine.step().unwrap();
        assert_eq!(
            events,
            vec![
                SimEvent::Admitted {
                    process: 0,
                    level: 1
                },
                SimEvent::Dispatched {
                    process: 0,
                    level: 1,
                    slice: 3
                },
                SimEvent::Completed { process: 0 },
            ]
        );
        assert!(engine.is_terminated());
        assert_eq!(
            engine.timeline(),
            &[Slice {
                process: 0,
                level: 1,
                start: 0,
                len: 3
            }]
        );
    }

    #[test]
    fn arrivals_during_a_slice_queue_ahead_of_the_preempted_process() {
        let specs = vec![QueueSpec::new(
            1,
            Policy::RoundRobin {
                quantum: std::num::NonZeroU64::new(2).unwrap(),
            },
        )];
        let processes = vec![
            ProcessRecord::new("A", 3, 0, 1, 1),
            ProcessRecord::new("B", 1, 1, 1, 1),
        ];
        let mut engine = SchedulerEngine::new(specs, processes).unwrap();
        engine.run().unwrap();

        let order: Vec<(ProcessId, Ticks)> = engine
            .timeline()
            .iter()
            .map(|s| (s.process, s.start))
            .collect();
        assert_eq!(order, vec![(0, 0), (1, 2), (0, 3)]);

        let done = engine.into_completed();
        assert_eq!(done[0].label, "B");
        assert_eq!(done[0].completion_time(), Some(3));
        assert_eq!(done[1].label, "A");
        assert_eq!(done[1].completion_time(), Some(4));
    }
}
