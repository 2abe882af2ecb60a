use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};

use crate::error::{ConfigError, ProcessError};
use crate::scheduler::{Decision, QueueLevel, QueueSpec};

// Index into the process table
pub type ProcessId = usize;
pub type Ticks = u64;
pub type Level = u32;
new_key_type! {
    pub struct LevelId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Not yet admitted; arrival time still in the future.
    Pending,
    Ready,
    Running,
    Completed,
}

/// One process: the input facts plus the bookkeeping the engine fills in.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub label: String,
    pub burst_time: Ticks,
    pub arrival_time: Ticks,
    pub queue_level: Level,
    /// Carried through to the output; no policy consults it.
    pub priority: i32,
    state: ProcessState,
    remaining_time: Ticks,
    start_time: Option<Ticks>,
    completion_time: Option<Ticks>,
    response_time: Option<Ticks>,
    waiting_time: Ticks,
    turnaround_time: Option<Ticks>,
}

impl ProcessRecord {
    pub fn new(
        label: impl Into<String>,
        burst_time: Ticks,
        arrival_time: Ticks,
        queue_level: Level,
        priority: i32,
    ) -> Self {
        Self {
            label: label.into(),
            burst_time,
            arrival_time,
            queue_level,
            priority,
            state: ProcessState::Pending,
            remaining_time: burst_time,
            start_time: None,
            completion_time: None,
            response_time: None,
            waiting_time: 0,
            turnaround_time: None,
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn remaining_time(&self) -> Ticks {
        self.remaining_time
    }

    pub fn start_time(&self) -> Option<Ticks> {
        self.start_time
    }

    pub fn completion_time(&self) -> Option<Ticks> {
        self.completion_time
    }

    pub fn response_time(&self) -> Option<Ticks> {
        self.response_time
    }

    /// Fixed at first dispatch as `start - arrival`; later waits after a
    /// preemption are not added.
    pub fn waiting_time(&self) -> Ticks {
        self.waiting_time
    }

    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.turnaround_time
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }

    pub fn record_first_dispatch(&mut self, time: Ticks) -> Result<(), ProcessError> {
        if self.start_time.is_some() {
            return Err(self.invalid_state("dispatched for the first time twice"));
        }
        if time < self.arrival_time {
            return Err(self.invalid_state("dispatched before its arrival"));
        }

        let waited = time - self.arrival_time;
        self.start_time = Some(time);
        self.response_time = Some(waited);
        self.waiting_time = waited;
        Ok(())
    }

    pub fn advance(&mut self, amount: Ticks) -> Result<(), ProcessError> {
        if amount == 0 || amount > self.remaining_time {
            return Err(ProcessError::InvalidArgument {
                label: self.label.clone(),
                amount,
                remaining: self.remaining_time,
            });
        }
        self.remaining_time -= amount;
        Ok(())
    }

    pub fn complete(&mut self, time: Ticks) -> Result<(), ProcessError> {
        if self.remaining_time != 0 {
            return Err(self.invalid_state("completed with service time remaining"));
        }
        if self.completion_time.is_some() {
            return Err(self.invalid_state("completed twice"));
        }
        if time < self.arrival_time {
            return Err(self.invalid_state("completed before its arrival"));
        }

        self.completion_time = Some(time);
        self.turnaround_time = Some(time - self.arrival_time);
        self.state = ProcessState::Completed;
        Ok(())
    }

    fn invalid_state(&self, reason: &'static str) -> ProcessError {
        ProcessError::InvalidState {
            label: self.label.clone(),
            reason,
        }
    }
}

/// All mutable simulation state that is not the arrival pool: the clock,
/// the process table and the configured queue levels.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub processes: Vec<ProcessRecord>,
    pub levels: SlotMap<LevelId, QueueLevel>,
    /// Ascending by level number, i.e. highest priority first.
    pub level_order: Vec<LevelId>,
    pub level_index: FxHashMap<Level, LevelId>,
    pub process_to_level: FxHashMap<ProcessId, LevelId>,
}

impl SimCtx {
    pub fn new(specs: Vec<QueueSpec>, processes: Vec<ProcessRecord>) -> Result<Self, ConfigError> {
        let mut levels = SlotMap::with_capacity_and_key(specs.len());
        let mut level_index = FxHashMap::default();

        for spec in specs {
            if level_index.contains_key(&spec.level) {
                return Err(ConfigError::DuplicateLevel { level: spec.level });
            }
            let level = spec.level;
            let id = levels.insert(QueueLevel::new(spec));
            level_index.insert(level, id);
        }

        let mut level_order: Vec<LevelId> = levels.keys().collect();
        level_order.sort_by_key(|&id| levels[id].level());

        let mut labels = FxHashSet::default();
        for process in &processes {
            if process.burst_time == 0 {
                return Err(ConfigError::ZeroBurst {
                    label: process.label.clone(),
                });
            }
            if !level_index.contains_key(&process.queue_level) {
                return Err(ConfigError::UnknownLevel {
                    label: process.label.clone(),
                    level: process.queue_level,
                });
            }
            if !labels.insert(process.label.as_str()) {
                return Err(ConfigError::DuplicateLabel {
                    label: process.label.clone(),
                });
            }
        }

        Ok(Self {
            now: 0,
            processes,
            levels,
            level_order,
            level_index,
            process_to_level: FxHashMap::default(),
        })
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn process(&self, id: ProcessId) -> &ProcessRecord {
        &self.processes[id]
    }

    pub fn process_mut(&mut self, id: ProcessId) -> &mut ProcessRecord {
        &mut self.processes[id]
    }

    pub fn level_of(&self, id: ProcessId) -> Result<LevelId, ConfigError> {
        let process = self.process(id);
        self.level_index
            .get(&process.queue_level)
            .copied()
            .ok_or_else(|| ConfigError::UnknownLevel {
                label: process.label.clone(),
                level: process.queue_level,
            })
    }

    /// Put a process into the ready container of its own queue level.
    pub fn admit(&mut self, id: ProcessId) -> Result<(), ConfigError> {
        assert!(
            !self.process_to_level.contains_key(&id),
            "Process {id} already present in some queue level"
        );

        let level_id = self.level_of(id)?;
        let process = &mut self.processes[id];
        debug_assert!(
            process.state != ProcessState::Completed && !process.is_finished(),
            "Process {id} must not be admitted once finished"
        );
        process.state = ProcessState::Ready;

        let level = self.levels.get_mut(level_id).expect("Unknown queue level");
        trace!(
            "t={} admit {} into level {}",
            self.now,
            process.label,
            level.level()
        );
        level.admit(id, process);
        self.process_to_level.insert(id, level_id);
        Ok(())
    }

    /// Ask the highest-priority non-empty level for its next decision.
    /// `None` when every level is empty.
    pub fn next_decision(&mut self, next_arrival: Option<Ticks>) -> Option<(LevelId, Decision)> {
        let now = self.now;
        for &level_id in &self.level_order {
            let level = &mut self.levels[level_id];
            if level.is_empty() {
                continue;
            }
            let decision = level.next_decision(now, next_arrival, &self.processes)?;
            let removed = self.process_to_level.remove(&decision.process);
            debug_assert!(
                removed.is_some(),
                "Process {} missing queue membership",
                decision.process
            );
            return Some((level_id, decision));
        }
        None
    }

    pub fn all_levels_empty(&self) -> bool {
        self.levels.values().all(QueueLevel::is_empty)
    }

    pub fn mark_running(&mut self, id: ProcessId) {
        debug_assert!(
            !self.process_to_level.contains_key(&id),
            "Running process {id} must not be enqueued"
        );
        let process = self.process_mut(id);
        debug_assert_eq!(process.state, ProcessState::Ready);
        process.state = ProcessState::Running;
    }
}
