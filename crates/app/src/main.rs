//! Runs one scenario of the anti-sway rig and writes its time series as JSON.
//!
//! ```text
//! anti-sway-app scenario.json --dataset recorded.json --compare angle=angle_x --out results.json
//! ```
//!
//! The log level is read from `ANTI_SWAY_LOG` (`error` .. `trace`, default `info`).

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use electrical::{compare, Comparison, DriveConstants, DriveDiagnostics};
use log::{info, warn, LevelFilter};
use mechanics::{SimulationOutput, Simulator};
use serde::Serialize;
use simcore::{peak_abs, Dataset, SimulationConfig};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const LOG_ENV: &str = "ANTI_SWAY_LOG";

#[derive(Parser)]
#[command(name = "anti-sway-app")]
#[command(about = "Simulate the anti-sway trolley rig", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Recorded rig data to compare against (JSON)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// `<simulated>=<recorded>` series pair, may be repeated
    #[arg(long, value_parser = parse_pair, requires = "dataset")]
    compare: Vec<(String, String)>,

    /// Drive constants (JSON), rig defaults when absent
    #[arg(long)]
    drive: Option<PathBuf>,

    /// Results file, stdout when absent
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    output: &'a SimulationOutput,
    drive: DriveDiagnostics,
    comparisons: BTreeMap<String, Comparison>,
}

fn parse_pair(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((sim, rec)) if !sim.is_empty() && !rec.is_empty() => {
            Ok((sim.to_string(), rec.to_string()))
        }
        _ => Err(format!("expected <simulated>=<recorded>, got `{}`", arg)),
    }
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    let level = match std::env::var(LOG_ENV) {
        Ok(value) => LevelFilter::from_str(&value)
            .map_err(|_| format!("{} must be a log level, got `{}`", LOG_ENV, value))?,
        Err(_) => LevelFilter::Info,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn summarize(output: &SimulationOutput) {
    let angle = output.angle();
    let velocity = output.trolley_velocity();
    info!(
        "{:?}: {} samples, final angle {:.5} rad, peak angle {:.5} rad, final velocity {:.5} m/s",
        output.model(),
        output.len(),
        angle[angle.len() - 1],
        peak_abs(angle),
        velocity[velocity.len() - 1]
    );
    match output.first_non_finite() {
        Some(bad) => warn!("non-finite `{}` from sample {}", bad.series, bad.index),
        None => info!("all samples finite"),
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config: SimulationConfig = serde_json::from_str(&fs::read_to_string(&cli.scenario)?)?;
    let output = Simulator::run(&config)?;
    summarize(&output);

    let drive_constants = match &cli.drive {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => DriveConstants::default(),
    };
    let drive = DriveDiagnostics::from_output(&output, &config.plant, &drive_constants);

    let mut comparisons = BTreeMap::new();
    if let Some(path) = &cli.dataset {
        let dataset = Dataset::from_json_str(&fs::read_to_string(path)?)?;
        for (simulated, recorded) in &cli.compare {
            let series = output
                .series(simulated)
                .ok_or_else(|| format!("no simulated series named `{}`", simulated))?;
            let cmp = compare(output.time(), series, &dataset, recorded)?;
            info!(
                "{} vs {}: rmse {:.5}, max |error| {:.5}",
                simulated, recorded, cmp.rmse, cmp.max_abs_error
            );
            comparisons.insert(format!("{}={}", simulated, recorded), cmp);
        }
    }

    let report = Report {
        output: &output,
        drive,
        comparisons,
    };
    let json = serde_json::to_string_pretty(&report)?;
    match &cli.out {
        Some(path) => {
            fs::write(path, json)?;
            info!("results written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging()?;
    run(&cli)
}
