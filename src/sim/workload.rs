use rand::prelude::*;

use crate::core::{Level, ProcessRecord, Ticks};

/// Parameters of a random workload: at every tick a process arrives with
/// probability `p_arrival`; it is short with probability `p_short`.
#[derive(Debug, Clone)]
pub struct WorkloadParams {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: Ticks,
    pub long_burst: Ticks,
    pub levels: Vec<Level>,
    pub seed: u64,
}

impl WorkloadParams {
    pub fn new(ticks: Ticks, levels: Vec<Level>, seed: u64) -> Self {
        Self {
            ticks,
            p_arrival: 0.3,
            p_short: 0.3,
            short_burst: 2,
            long_burst: 6,
            levels,
            seed,
        }
    }
}

/// Seeded Bernoulli arrivals spread uniformly over `levels`. Labels are
/// `P0000`, `P0001`, ... so label order matches arrival order.
pub fn bernoulli_processes(params: &WorkloadParams) -> Vec<ProcessRecord> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut processes = Vec::new();
    if params.levels.is_empty() {
        return processes;
    }

    for t in 0..params.ticks {
        if rng.random::<f64>() < params.p_arrival {
            let burst = if rng.random::<f64>() < params.p_short {
                params.short_burst
            } else {
                params.long_burst
            };
            let level = params.levels[rng.random_range(0..params.levels.len())];
            let priority = rng.random_range(1..=5);

            processes.push(ProcessRecord::new(
                format!("P{:04}", processes.len()),
                burst.max(1),
                t,
                level,
                priority,
            ));
        }
    }

    processes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_workload() {
        let params = WorkloadParams::new(200, vec![1, 2, 3], 7);
        let a = bernoulli_processes(&params);
        let b = bernoulli_processes(&params);
        assert!(!a.is_empty());
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(
                (&x.label, x.burst_time, x.arrival_time, x.queue_level),
                (&y.label, y.burst_time, y.arrival_time, y.queue_level)
            );
        }
    }

    #[test]
    fn arrivals_within_horizon_and_levels_respected() {
        let params = WorkloadParams::new(100, vec![2, 5], 1);
        for p in bernoulli_processes(&params) {
            assert!(p.arrival_time < 100);
            assert!(p.queue_level == 2 || p.queue_level == 5);
            assert!(p.burst_time == 2 || p.burst_time == 6);
        }
    }

    #[test]
    fn no_levels_no_processes() {
        let params = WorkloadParams::new(100, Vec::new(), 1);
        assert!(bernoulli_processes(&params).is_empty());
    }
}
