pub mod driver;
pub mod input;
pub mod output;
pub mod workload;

pub use driver::{Sim, simulate};
pub use input::{ParsedInput, parse_records, read_all};
pub use output::write_all;
pub use workload::{WorkloadParams, bernoulli_processes};
