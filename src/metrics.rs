//! Per-process timing rows and their averages.
//!
//! Waiting time is the value fixed at first dispatch (`start - arrival`),
//! so for preempted processes it is not the sum of every ready interval.

use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::{Level, ProcessRecord, Slice, Ticks};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRow {
    pub label: String,
    pub burst: Ticks,
    pub arrival: Ticks,
    pub queue: Level,
    pub priority: i32,
    pub waiting: Ticks,
    pub completion: Ticks,
    pub response: Ticks,
    pub turnaround: Ticks,
}

impl ProcessRow {
    /// `None` if the process has not completed.
    pub fn from_record(record: &ProcessRecord) -> Option<Self> {
        Some(Self {
            label: record.label.clone(),
            burst: record.burst_time,
            arrival: record.arrival_time,
            queue: record.queue_level,
            priority: record.priority,
            waiting: record.waiting_time(),
            completion: record.completion_time()?,
            response: record.response_time()?,
            turnaround: record.turnaround_time()?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Averages {
    pub waiting: f64,
    pub completion: f64,
    pub response: f64,
    pub turnaround: f64,
}

impl Averages {
    /// Arithmetic means over `rows`; all zero when there are none.
    pub fn of(rows: &[ProcessRow]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let n = rows.len() as f64;
        let mean = |f: fn(&ProcessRow) -> Ticks| rows.iter().map(f).sum::<Ticks>() as f64 / n;
        Self {
            waiting: mean(|r| r.waiting),
            completion: mean(|r| r.completion),
            response: mean(|r| r.response),
            turnaround: mean(|r| r.turnaround),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Sorted by label.
    pub rows: Vec<ProcessRow>,
    pub averages: Averages,
}

/// Build the report for a set of completed processes. Incomplete records
/// are ignored.
pub fn summarize<'a>(completed: impl IntoIterator<Item = &'a ProcessRecord>) -> Report {
    let mut rows: Vec<ProcessRow> = completed
        .into_iter()
        .filter_map(ProcessRow::from_record)
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));
    let averages = Averages::of(&rows);
    Report { rows, averages }
}

/// Aggregate figures about the execution timeline itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub dispatches: usize,
    pub preemptions: usize,
    pub busy_time: Ticks,
    pub makespan: Ticks,
    pub mean_slice: f64,
    pub utilization: f64,
}

impl RunStats {
    pub fn from_timeline(timeline: &[Slice], processes: usize) -> Self {
        if timeline.is_empty() {
            return Self::default();
        }

        let slices: Mean = timeline.iter().map(|s| s.len as f64).collect();
        let busy_time = timeline.iter().map(|s| s.len).sum();
        let makespan = timeline.iter().map(Slice::end).max().unwrap_or(0);
        Self {
            dispatches: timeline.len(),
            preemptions: timeline.len().saturating_sub(processes),
            busy_time,
            makespan,
            mean_slice: slices.estimate(),
            utilization: if makespan == 0 {
                0.0
            } else {
                busy_time as f64 / makespan as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(label: &str, burst: Ticks, arrival: Ticks, start: Ticks) -> ProcessRecord {
        let mut p = ProcessRecord::new(label, burst, arrival, 1, 1);
        p.record_first_dispatch(start).unwrap();
        p.advance(burst).unwrap();
        p.complete(start + burst).unwrap();
        p
    }

    #[test]
    fn rows_sorted_by_label_with_means() {
        let done = vec![
            finished("B", 3, 1, 5),
            finished("A", 5, 0, 0),
            ProcessRecord::new("C", 2, 0, 1, 1),
        ];
        let report = summarize(&done);

        let labels: Vec<&str> = report.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(report.rows[1].waiting, 4);
        assert_eq!(report.rows[1].turnaround, 7);
        assert_eq!(
            report.averages,
            Averages {
                waiting: 2.0,
                completion: 6.5,
                response: 2.0,
                turnaround: 6.0,
            }
        );
    }

    #[test]
    fn summarize_is_repeatable() {
        let done = vec![finished("X", 4, 2, 3), finished("Y", 1, 0, 0)];
        assert_eq!(summarize(&done), summarize(&done));
    }

    #[test]
    fn empty_set_averages_zero() {
        let report = summarize(std::iter::empty());
        assert!(report.rows.is_empty());
        assert_eq!(report.averages, Averages::default());
    }

    #[test]
    fn run_stats_from_timeline() {
        let timeline = vec![
            Slice { process: 0, level: 1, start: 0, len: 2 },
            Slice { process: 1, level: 1, start: 4, len: 2 },
            Slice { process: 0, level: 1, start: 6, len: 4 },
        ];
        let stats = RunStats::from_timeline(&timeline, 2);
        assert_eq!(stats.dispatches, 3);
        assert_eq!(stats.preemptions, 1);
        assert_eq!(stats.busy_time, 8);
        assert_eq!(stats.makespan, 10);
        assert!((stats.mean_slice - 8.0 / 3.0).abs() < 1e-12);
        assert!((stats.utilization - 0.8).abs() < 1e-12);
    }
}
