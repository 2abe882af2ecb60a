use std::fmt;

use serde::Serialize;

use crate::core::{Level, ProcessId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Admitted {
        process: ProcessId,
        level: Level,
    },
    Dispatched {
        process: ProcessId,
        level: Level,
        slice: Ticks,
    },
    // Slice ended with service left; the process went back to its level
    Preempted {
        process: ProcessId,
        remaining: Ticks,
    },
    Completed {
        process: ProcessId,
    },
    // Nothing ready; clock jumps to the next arrival
    Idle {
        until: Ticks,
    },
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::Admitted { process, level } => write!(f, "admit #{process} -> L{level}"),
            SimEvent::Dispatched {
                process,
                level,
                slice,
            } => write!(f, "run #{process} on L{level} for {slice}"),
            SimEvent::Preempted { process, remaining } => {
                write!(f, "preempt #{process} ({remaining} left)")
            }
            SimEvent::Completed { process } => write!(f, "complete #{process}"),
            SimEvent::Idle { until } => write!(f, "idle until {until}"),
        }
    }
}

/// One execution slice actually applied to a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub process: ProcessId,
    pub level: Level,
    pub start: Ticks,
    pub len: Ticks,
}

impl Slice {
    pub fn end(&self) -> Ticks {
        self.start + self.len
    }
}
