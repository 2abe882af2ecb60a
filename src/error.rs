use std::fmt;

use crate::core::state::{Level, Ticks};

/// Problems with the queue configuration or the process set, detected
/// before the simulation takes its first step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A process references a level no queue is configured for.
    UnknownLevel { label: String, level: Level },
    MissingQuantum { level: Level },
    ZeroQuantum { level: Level },
    UnexpectedQuantum { level: Level },
    DuplicateLevel { level: Level },
    DuplicateLabel { label: String },
    ZeroBurst { label: String },
    UnknownPolicy(String),
    InvalidQueueSpec(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownLevel { label, level } => {
                write!(f, "process {label} assigned to unconfigured queue level {level}")
            }
            ConfigError::MissingQuantum { level } => {
                write!(f, "round-robin queue level {level} has no quantum")
            }
            ConfigError::ZeroQuantum { level } => {
                write!(f, "queue level {level} has a zero quantum")
            }
            ConfigError::UnexpectedQuantum { level } => {
                write!(f, "queue level {level} takes no quantum for its policy")
            }
            ConfigError::DuplicateLevel { level } => {
                write!(f, "queue level {level} configured more than once")
            }
            ConfigError::DuplicateLabel { label } => {
                write!(f, "process label {label} appears more than once")
            }
            ConfigError::ZeroBurst { label } => {
                write!(f, "process {label} has a zero burst time")
            }
            ConfigError::UnknownPolicy(tag) => write!(f, "unknown scheduling policy '{tag}'"),
            ConfigError::InvalidQueueSpec(spec) => write!(f, "invalid queue spec '{spec}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Bookkeeping violations raised by [`ProcessRecord`](crate::core::ProcessRecord)
/// mutators. A correct engine never produces these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    InvalidArgument { label: String, amount: Ticks, remaining: Ticks },
    InvalidState { label: String, reason: &'static str },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::InvalidArgument { label, amount, remaining } => write!(
                f,
                "cannot advance {label} by {amount} with {remaining} remaining"
            ),
            ProcessError::InvalidState { label, reason } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for ProcessError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    Config(ConfigError),
    Invariant(ProcessError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "configuration error: {e}"),
            SimError::Invariant(e) => write!(f, "scheduler invariant violated: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            SimError::Invariant(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<ProcessError> for SimError {
    fn from(e: ProcessError) -> Self {
        SimError::Invariant(e)
    }
}

/// Why an input line was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordErrorKind {
    FieldCount(usize),
    BadInteger { field: &'static str, value: String },
    EmptyLabel,
    ZeroBurst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    pub line: usize,
    pub kind: RecordErrorKind,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            RecordErrorKind::FieldCount(n) => write!(f, "expected 5 fields, found {n}"),
            RecordErrorKind::BadInteger { field, value } => {
                write!(f, "{field} '{value}' is not a valid integer")
            }
            RecordErrorKind::EmptyLabel => write!(f, "empty label"),
            RecordErrorKind::ZeroBurst => write!(f, "burst time must be at least 1"),
        }
    }
}

impl std::error::Error for RecordError {}
