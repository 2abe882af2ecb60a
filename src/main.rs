use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result, bail};
use mlq_sim::{
    Sim,
    config::{Config, OutputFormat},
    sim::{bernoulli_processes, output, read_all},
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Config::new()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<()> {
    if let Err(msg) = config.validate() {
        bail!("invalid configuration: {msg}");
    }
    let specs = config.queue_specs()?;

    let processes = match (&config.input, config.workload(specs.iter().map(|s| s.level).collect())) {
        (Some(path), _) => {
            let parsed = read_all(path)
                .with_context(|| format!("cannot read input file '{}'", path.display()))?;
            if !parsed.skipped.is_empty() {
                eprintln!("skipped {} malformed line(s)", parsed.skipped.len());
            }
            parsed.records
        }
        (None, Some(params)) => bernoulli_processes(&params),
        (None, None) => bail!("no input file given"),
    };

    let mut sim = Sim::new(specs, processes)?;
    if config.trace {
        while !sim.all_processes_completed() {
            let now = sim.engine.now();
            for event in sim.step()? {
                println!("t={now} {event}");
            }
        }
        print!(
            "{}",
            output::format_timeline(sim.engine.timeline(), sim.engine.processes())
        );
    } else {
        sim.run()?;
    }

    let report = sim.report();
    let stats = sim.stats();
    print!("{}", output::format_summary(&report.rows));

    let source = config.source_name();
    let path = config.output_path();
    let file = File::create(&path)
        .with_context(|| format!("cannot create output file '{}'", path.display()))?;
    let sink = BufWriter::new(file);
    let written = match config.format {
        OutputFormat::Text => output::write_all(sink, &source, &report.rows, &report.averages),
        OutputFormat::Json => output::write_json(sink, &source, &report, &stats),
    };
    written.with_context(|| format!("cannot write results to '{}'", path.display()))?;

    println!("{}", output::averages_line(&report.averages));
    println!(
        "{} dispatches, {} preemptions, mean slice {:.2}, utilization {:.1}%",
        stats.dispatches,
        stats.preemptions,
        stats.mean_slice,
        stats.utilization * 100.0
    );
    Ok(())
}
