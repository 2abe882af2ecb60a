use crate::{
    core::{ProcessRecord, SchedulerEngine, SimEvent},
    error::SimError,
    metrics::{self, Report, RunStats},
    scheduler::QueueSpec,
};

/// Engine plus reporting: configure, step or run, then summarize.
pub struct Sim {
    pub engine: SchedulerEngine,
}

impl Sim {
    pub fn new(specs: Vec<QueueSpec>, processes: Vec<ProcessRecord>) -> Result<Self, SimError> {
        Ok(Self {
            engine: SchedulerEngine::new(specs, processes)?,
        })
    }

    pub fn step(&mut self) -> Result<Vec<SimEvent>, SimError> {
        self.engine.step()
    }

    pub fn run(&mut self) -> Result<(), SimError> {
        self.engine.run()
    }

    pub fn all_processes_completed(&self) -> bool {
        self.engine.is_terminated()
    }

    pub fn report(&self) -> Report {
        metrics::summarize(self.engine.completed())
    }

    pub fn stats(&self) -> RunStats {
        RunStats::from_timeline(self.engine.timeline(), self.engine.processes().len())
    }
}

/// Run a whole simulation and return its report.
pub fn simulate(specs: Vec<QueueSpec>, processes: Vec<ProcessRecord>) -> Result<Report, SimError> {
    let mut sim = Sim::new(specs, processes)?;
    sim.run()?;
    Ok(sim.report())
}
