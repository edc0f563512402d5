// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::path::PathBuf;

use armviz::driver::Simulation;
use armviz::rand::{rngs::StdRng, SeedableRng};
use armviz::runtime::trace::{CsvTracer, NullTracer, TraceWriter, Tracer};
use clap::Parser;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Planar arm reachability simulator", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(short = 'c', long = "config", alias = "conf", value_name = "FILE")]
    config: Option<PathBuf>,
    /// Random generator seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of warmup ticks.
    #[arg(long, value_name = "TICKS")]
    warmup: Option<u64>,
    /// Stop after this many interactive ticks.
    #[arg(long)]
    ticks: Option<u64>,
    /// Write the reachability grid to a CSV file on exit.
    #[arg(long, value_name = "FILE")]
    heatmap: Option<PathBuf>,
    /// Record interactive ticks into a directory.
    #[arg(long, value_name = "DIR")]
    trace: Option<PathBuf>,
    /// Quiet output (no logging).
    #[arg(long)]
    quiet: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use log::LevelFilter;

    let args = Args::parse();

    let mut config: armviz::Config = match &args.config {
        Some(path) => armviz::from_file(path)?,
        None => armviz::Config::default(),
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(iterations) = args.warmup {
        config.warmup.iterations = iterations;
    }
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = Some(ticks);
    }
    if let Some(heatmap) = args.heatmap {
        config.output.heatmap = Some(heatmap);
    }
    if let Some(trace) = args.trace {
        config.output.trace = Some(trace);
    }

    let mut log_config = simplelog::ConfigBuilder::new();
    log_config.set_target_level(LevelFilter::Off);
    log_config.set_location_level(LevelFilter::Off);
    log_config.add_filter_ignore_str("mio");

    let log_level = if args.quiet {
        LevelFilter::Off
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    log::debug!("Runtime version: {}", armviz::consts::VERSION);
    log::trace!("{:#?}", config);

    config.validate()?;

    log::info!("Configured: {}", config);

    match &config.output.trace {
        Some(path) => run(&config, CsvTracer::from_path(path)).await,
        None => run(&config, NullTracer::from_path("")).await,
    }
}

async fn run<T: Tracer>(config: &armviz::Config, tracer: T) -> anyhow::Result<()> {
    use std::time::{Duration, Instant};

    let mut rng = match config.simulation.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut simulation = Simulation::from_config(config);

    simulation.warmup(
        config.warmup.iterations,
        config.warmup.dt,
        config.warmup.jitter,
        &mut rng,
    );

    let mut trace = tracer.instance(armviz::consts::TRACE_NAME)?;

    let mut interval =
        tokio::time::interval(Duration::from_secs_f64(1.0 / config.simulation.rate as f64));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let start = simulation.ticks();
    let mut last_step = Instant::now();
    let mut last_report = Instant::now();

    log::info!("Running interactive phase, press Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Termination requested");
                break;
            }
            _ = interval.tick() => {
                let dt = last_step.elapsed().as_secs_f32();
                last_step = Instant::now();

                let sample = simulation.tick(dt, config.simulation.jitter, &mut rng);
                trace.write_record(sample)?;

                log::trace!(
                    "Tick {} End effector: ({:+.2}, {:+.2}) Score: {:.3}",
                    sample.tick,
                    sample.x,
                    sample.y,
                    sample.score
                );

                if last_report.elapsed() >= armviz::consts::PROGRESS_INTERVAL {
                    log::debug!("Frame: {}", simulation.frame());
                    last_report = Instant::now();
                }

                if let Some(limit) = config.simulation.ticks {
                    if simulation.ticks() - start >= limit {
                        log::info!("Tick limit of {} reached", limit);
                        break;
                    }
                }
            }
        }
    }

    trace.flush()?;

    log::info!(
        "Ran {} interactive ticks; {}",
        simulation.ticks() - start,
        simulation.grid()
    );

    if let Some(path) = &config.output.heatmap {
        let cells = armviz::runtime::trace::write_heatmap(path, simulation.grid())?;
        log::info!("Wrote {} cells to {}", cells, path.display());
    }

    Ok(())
}
