//! Discrete-time simulator of a multi-level queue CPU scheduler.
//!
//! Processes are staged by arrival time and admitted into the queue level
//! they are assigned to. At every step the lowest-numbered non-empty level
//! dispatches according to its policy (FCFS, SJF, STCF or round-robin) and
//! the engine records waiting, response, completion and turnaround times.
//!
//! ```
//! use mlq_sim::{ProcessRecord, QueueSpec, simulate};
//!
//! let queues = QueueSpec::parse_list("1:FCFS").unwrap();
//! let processes = vec![
//!     ProcessRecord::new("A", 5, 0, 1, 1),
//!     ProcessRecord::new("B", 3, 1, 1, 1),
//! ];
//! let report = simulate(queues, processes).unwrap();
//! assert_eq!(report.rows[1].completion, 8);
//! assert_eq!(report.rows[1].waiting, 4);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod metrics;
pub mod scheduler;
pub mod sim;

pub use crate::core::{ProcessRecord, SchedulerEngine, SimEvent};
pub use error::{ConfigError, SimError};
pub use metrics::{Report, summarize};
pub use scheduler::{Policy, QueueLevel, QueueSpec};
pub use sim::{Sim, simulate};
