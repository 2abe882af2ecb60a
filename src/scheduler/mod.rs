pub mod fifo;
pub mod priq;

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use log::debug;

use crate::core::{Level, ProcessId, ProcessRecord, Ticks};
use crate::error::ConfigError;
pub use fifo::FifoQueue;
pub use priq::{OrderKey, PriqQueue};

/// Dispatch policy bound to one queue level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Non-preemptive, arrival order.
    Fcfs,
    /// Non-preemptive, shortest burst first.
    Sjf,
    /// Shortest remaining time first; slices end at the next arrival.
    Stcf,
    RoundRobin { quantum: NonZeroU64 },
}

impl Policy {
    /// Build a policy from its tag. `quantum` is required for `RR` and
    /// rejected for every other tag.
    pub fn from_tag(tag: &str, quantum: Option<Ticks>, level: Level) -> Result<Self, ConfigError> {
        let tag = tag.trim().to_ascii_uppercase();
        let (tag, quantum) = match split_inline_quantum(&tag) {
            Some((name, q)) if quantum.is_none() => (name.to_string(), Some(q?)),
            Some(_) => return Err(ConfigError::InvalidQueueSpec(tag.clone())),
            None => (tag.clone(), quantum),
        };

        match (tag.as_str(), quantum) {
            ("RR", Some(q)) => NonZeroU64::new(q)
                .map(|quantum| Policy::RoundRobin { quantum })
                .ok_or(ConfigError::ZeroQuantum { level }),
            ("RR", None) => Err(ConfigError::MissingQuantum { level }),
            ("FCFS" | "SJF" | "STCF", Some(_)) => Err(ConfigError::UnexpectedQuantum { level }),
            ("FCFS", None) => Ok(Policy::Fcfs),
            ("SJF", None) => Ok(Policy::Sjf),
            ("STCF", None) => Ok(Policy::Stcf),
            _ => Err(ConfigError::UnknownPolicy(tag)),
        }
    }

    pub fn is_ordered(&self) -> bool {
        matches!(self, Policy::Sjf | Policy::Stcf)
    }

    /// Length of the slice granted to a process with `remaining` service
    /// left, dispatched at `now`. `next_arrival` is the earliest arrival
    /// among processes not yet admitted to any level.
    pub fn slice(&self, remaining: Ticks, now: Ticks, next_arrival: Option<Ticks>) -> Ticks {
        match self {
            Policy::Fcfs | Policy::Sjf => remaining,
            Policy::RoundRobin { quantum } => remaining.min(quantum.get()),
            Policy::Stcf => {
                let bounded = match next_arrival {
                    Some(arrival) if arrival > now => remaining.min(arrival - now),
                    _ => remaining,
                };
                bounded.max(1)
            }
        }
    }

    /// Key an ordered level sorts by; `None` for FIFO levels.
    fn metric(&self, process: &ProcessRecord) -> Option<Ticks> {
        match self {
            Policy::Sjf => Some(process.burst_time),
            Policy::Stcf => Some(process.remaining_time()),
            Policy::Fcfs | Policy::RoundRobin { .. } => None,
        }
    }
}

// "RR(2)" -> ("RR", Ok(2))
fn split_inline_quantum(tag: &str) -> Option<(&str, Result<Ticks, ConfigError>)> {
    let (name, rest) = tag.split_once('(')?;
    let inner = rest.strip_suffix(')')?;
    let quantum = inner
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidQueueSpec(tag.to_string()));
    Some((name.trim(), quantum))
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fcfs => write!(f, "FCFS"),
            Policy::Sjf => write!(f, "SJF"),
            Policy::Stcf => write!(f, "STCF"),
            Policy::RoundRobin { quantum } => write!(f, "RR({quantum})"),
        }
    }
}

/// One `(level, policy, quantum?)` entry of the queue configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSpec {
    pub level: Level,
    pub policy: Policy,
}

impl QueueSpec {
    pub fn new(level: Level, policy: Policy) -> Self {
        Self { level, policy }
    }

    pub fn from_parts(level: Level, tag: &str, quantum: Option<Ticks>) -> Result<Self, ConfigError> {
        Ok(Self::new(level, Policy::from_tag(tag, quantum, level)?))
    }

    /// Parse a comma-separated list such as `1:RR:2,2:RR:3,3:STCF`.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, ConfigError> {
        let specs = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Self>, _>>()?;

        let mut seen = Vec::with_capacity(specs.len());
        for spec in &specs {
            if seen.contains(&spec.level) {
                return Err(ConfigError::DuplicateLevel { level: spec.level });
            }
            seen.push(spec.level);
        }
        Ok(specs)
    }
}

impl FromStr for QueueSpec {
    type Err = ConfigError;

    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidQueueSpec(entry.to_string());
        let mut fields = entry.split(':').map(str::trim);

        let level = fields
            .next()
            .and_then(|l| l.parse::<Level>().ok())
            .ok_or_else(invalid)?;
        let tag = fields.next().filter(|t| !t.is_empty()).ok_or_else(invalid)?;
        let quantum = match fields.next() {
            Some(q) => Some(q.parse::<Ticks>().map_err(|_| invalid())?),
            None => None,
        };
        if fields.next().is_some() {
            return Err(invalid());
        }

        QueueSpec::from_parts(level, tag, quantum)
    }
}

impl fmt::Display for QueueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level, self.policy)
    }
}

/// Which process runs next and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub process: ProcessId,
    pub slice: Ticks,
}

#[derive(Debug)]
pub enum ReadyQueue {
    Fifo(FifoQueue),
    Priq(PriqQueue),
}

impl ReadyQueue {
    fn for_policy(policy: Policy) -> Self {
        if policy.is_ordered() {
            ReadyQueue::Priq(PriqQueue::new())
        } else {
            ReadyQueue::Fifo(FifoQueue::new())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReadyQueue::Fifo(q) => q.len(),
            ReadyQueue::Priq(q) => q.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ReadyQueue::Fifo(q) => q.is_empty(),
            ReadyQueue::Priq(q) => q.is_empty(),
        }
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        match self {
            ReadyQueue::Fifo(q) => q.contains(id),
            ReadyQueue::Priq(q) => q.contains(id),
        }
    }

    fn pop(&mut self) -> Option<ProcessId> {
        match self {
            ReadyQueue::Fifo(q) => q.pop_front(),
            ReadyQueue::Priq(q) => q.pop(),
        }
    }
}

/// A priority level: its policy and the processes ready to run at it.
#[derive(Debug)]
pub struct QueueLevel {
    level: Level,
    policy: Policy,
    ready: ReadyQueue,
}

impl QueueLevel {
    pub fn new(spec: QueueSpec) -> Self {
        Self {
            level: spec.level,
            policy: spec.policy,
            ready: ReadyQueue::for_policy(spec.policy),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn ready(&self) -> &ReadyQueue {
        &self.ready
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.ready.contains(id)
    }

    /// Insert `process` (whose table index is `id`). Ordered levels key it on
    /// its current burst or remaining time, so a preempted STCF process is
    /// re-sorted on every reinsertion.
    pub fn admit(&mut self, id: ProcessId, process: &ProcessRecord) {
        match (&mut self.ready, self.policy.metric(process)) {
            (ReadyQueue::Fifo(q), _) => q.push_back(id),
            (ReadyQueue::Priq(q), Some(metric)) => q.push(id, metric, process.arrival_time),
            (ReadyQueue::Priq(_), None) => unreachable!("ordered level without a metric"),
        }
    }

    /// Remove the next process to run and compute its slice.
    pub fn next_decision(
        &mut self,
        now: Ticks,
        next_arrival: Option<Ticks>,
        processes: &[ProcessRecord],
    ) -> Option<Decision> {
        let id = self.ready.pop()?;
        let process = &processes[id];
        let slice = self
            .policy
            .slice(process.remaining_time(), now, next_arrival);
        debug!(
            "t={now} level {} ({}) picks {} for {slice} of {} remaining",
            self.level,
            self.policy,
            process.label,
            process.remaining_time()
        );
        Some(Decision { process: id, slice })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rr(q: u64) -> Policy {
        Policy::RoundRobin {
            quantum: NonZeroU64::new(q).unwrap(),
        }
    }

    #[test]
    fn parses_queue_lists() {
        let specs = QueueSpec::parse_list("1:RR:2, 2:rr(3) ,3:STCF").unwrap();
        assert_eq!(
            specs,
            vec![
                QueueSpec::new(1, rr(2)),
                QueueSpec::new(2, rr(3)),
                QueueSpec::new(3, Policy::Stcf),
            ]
        );
        assert_eq!(specs[1].to_string(), "2:RR(3)");
    }

    #[test]
    fn rejects_bad_queue_specs() {
        assert_eq!(
            QueueSpec::from_parts(1, "RR", None),
            Err(ConfigError::MissingQuantum { level: 1 })
        );
        assert_eq!(
            QueueSpec::from_parts(2, "RR", Some(0)),
            Err(ConfigError::ZeroQuantum { level: 2 })
        );
        assert_eq!(
            QueueSpec::from_parts(3, "SJF", Some(4)),
            Err(ConfigError::UnexpectedQuantum { level: 3 })
        );
        assert_eq!(
            QueueSpec::from_parts(1, "LOTTERY", None),
            Err(ConfigError::UnknownPolicy("LOTTERY".into()))
        );
        assert!(matches!(
            "x:FCFS".parse::<QueueSpec>(),
            Err(ConfigError::InvalidQueueSpec(_))
        ));
        assert!(matches!(
            "1:RR(2):3".parse::<QueueSpec>(),
            Err(ConfigError::InvalidQueueSpec(_))
        ));
        assert_eq!(
            QueueSpec::parse_list("1:FCFS,1:SJF"),
            Err(ConfigError::DuplicateLevel { level: 1 })
        );
    }

    #[test]
    fn slice_lengths_per_policy() {
        assert_eq!(Policy::Fcfs.slice(7, 0, Some(1)), 7);
        assert_eq!(Policy::Sjf.slice(7, 0, Some(1)), 7);
        assert_eq!(rr(2).slice(7, 0, None), 2);
        assert_eq!(rr(2).slice(1, 0, None), 1);
        assert_eq!(Policy::Stcf.slice(8, 0, Some(3)), 3);
        assert_eq!(Policy::Stcf.slice(2, 0, Some(3)), 2);
        assert_eq!(Policy::Stcf.slice(8, 4, None), 8);
        assert_eq!(Policy::Stcf.slice(8, 4, Some(4)), 8);
    }

    #[test]
    fn sjf_orders_by_burst_not_remaining() {
        let mut processes = vec![
            ProcessRecord::new("A", 6, 0, 1, 1),
            ProcessRecord::new("B", 3, 1, 1, 1),
        ];
        processes[0].advance(5).unwrap();

        let mut level = QueueLevel::new(QueueSpec::new(1, Policy::Sjf));
        level.admit(0, &processes[0]);
        level.admit(1, &processes[1]);
        let decision = level.next_decision(2, None, &processes).unwrap();
        assert_eq!(decision, Decision { process: 1, slice: 3 });
    }

    #[test]
    fn stcf_orders_by_remaining() {
        let mut processes = vec![
            ProcessRecord::new("A", 6, 0, 1, 1),
            ProcessRecord::new("B", 3, 1, 1, 1),
        ];
        processes[0].advance(5).unwrap();

        let mut level = QueueLevel::new(QueueSpec::new(1, Policy::Stcf));
        level.admit(1, &processes[1]);
        level.admit(0, &processes[0]);
        assert_eq!(level.len(), 2);
        let decision = level.next_decision(2, Some(10), &processes).unwrap();
        assert_eq!(decision, Decision { process: 0, slice: 1 });
        assert!(level.contains(1));
        assert!(!level.contains(0));
    }

    #[test]
    fn round_robin_takes_fifo_head() {
        let processes = vec![
            ProcessRecord::new("A", 1, 0, 1, 1),
            ProcessRecord::new("B", 9, 0, 1, 1),
        ];
        let mut level = QueueLevel::new(QueueSpec::new(1, rr(4)));
        level.admit(1, &processes[1]);
        level.admit(0, &processes[0]);
        assert_eq!(
            level.next_decision(0, None, &processes),
            Some(Decision { process: 1, slice: 4 })
        );
        assert_eq!(
            level.next_decision(4, None, &processes),
            Some(Decision { process: 0, slice: 1 })
        );
        assert_eq!(level.next_decision(5, None, &processes), None);
    }
}
