pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedulerEngine;
pub use event::{SimEvent, Slice};
pub use state::{Level, LevelId, ProcessId, ProcessRecord, ProcessState, SimCtx, Ticks};
