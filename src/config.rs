//! Command-line and environment configuration.
//!
//! ```bash
//! mlq_sim --input mlq002.txt --queues "1:RR:2,2:RR:3,3:STCF"
//! MLQ_QUEUES="1:FCFS,2:SJF" mlq_sim -i procs.txt --format json
//! mlq_sim --generate 500 --seed 42 --trace
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::core::Level;
use crate::error::ConfigError;
use crate::scheduler::QueueSpec;
use crate::sim::WorkloadParams;

/// RR(2), RR(3), STCF
pub const DEFAULT_QUEUES: &str = "1:RR:2,2:RR:3,3:STCF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "mlq_sim")]
#[command(about = "Multi-level queue CPU scheduling simulator")]
#[command(version)]
pub struct Config {
    /// Process file, one `label; burst; arrival; queue; priority` per line
    #[arg(short, long, env = "MLQ_INPUT", required_unless_present = "generate")]
    pub input: Option<PathBuf>,

    /// Where to write results (default: `<input stem>_output.txt` next to the input)
    #[arg(short, long, env = "MLQ_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Queue levels as `level:POLICY[:quantum]`, comma separated
    #[arg(short, long, default_value = DEFAULT_QUEUES, env = "MLQ_QUEUES")]
    pub queues: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "MLQ_FORMAT")]
    pub format: OutputFormat,

    /// Print every simulation event and the execution timeline
    #[arg(long)]
    pub trace: bool,

    /// Simulate a random workload spanning this many ticks instead of reading a file
    #[arg(long, value_name = "TICKS", conflicts_with = "input")]
    pub generate: Option<u64>,

    /// Seed for `--generate`
    #[arg(long, default_value_t = 0, env = "MLQ_SEED")]
    pub seed: u64,

    /// Per-tick arrival probability for `--generate`
    #[arg(long, default_value_t = 0.3)]
    pub p_arrival: f64,
}

impl Config {
    pub fn new() -> Self {
        Config::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.p_arrival) {
            return Err("arrival probability must be within 0-1".to_string());
        }
        if self.generate == Some(0) {
            return Err("generated workload must span at least 1 tick".to_string());
        }
        self.queue_specs().map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn queue_specs(&self) -> Result<Vec<QueueSpec>, ConfigError> {
        QueueSpec::parse_list(&self.queues)
    }

    /// Name printed in the output header.
    pub fn source_name(&self) -> String {
        match (&self.input, self.generate) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(ticks)) => format!("generated({ticks} ticks, seed {})", self.seed),
            (None, None) => "<none>".to_string(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        let ext = match self.format {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        };
        match &self.input {
            Some(input) => {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "mlq".to_string());
                input.with_file_name(format!("{stem}_output.{ext}"))
            }
            None => PathBuf::from(format!("generated_output.{ext}")),
        }
    }

    pub fn workload(&self, levels: Vec<Level>) -> Option<WorkloadParams> {
        let ticks = self.generate?;
        let mut params = WorkloadParams::new(ticks, levels, self.seed);
        params.p_arrival = self.p_arrival;
        Some(params)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            queues: DEFAULT_QUEUES.to_string(),
            format: OutputFormat::Text,
            trace: false,
            generate: None,
            seed: 0,
            p_arrival: 0.3,
        }
    }
}
