use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use quasiclock_core::clock::ClockMode;
use quasiclock_core::config::EnsembleConfig;
use quasiclock_core::sweep::{amplitude_ramp, run_sweep, SweepConfig};
use quasiclock_core::synchrony::{run_synchrony, SynchronyConfig};

/// Runs the quasiclock simulation pipelines and emits JSON arrays for an
/// external renderer.
#[derive(Parser)]
#[command(name = "quasiclock", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Kuramoto ensemble under both clocks, reduced to r(t).
    Synchrony {
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 50)]
        oscillators: usize,
        #[arg(long, default_value_t = 2.0)]
        coupling: f64,
        #[arg(long, default_value_t = 5.0)]
        clock_strength: f64,
        /// Output path; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Van der Pol amplitude sweep, reduced to stroboscopic (F, x) pairs.
    Bifurcation {
        #[arg(long, value_enum, default_value = "rational")]
        mode: Mode,
        #[arg(long, default_value_t = 5.0)]
        max_amplitude: f64,
        #[arg(long, default_value_t = 200)]
        amplitudes: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Mode {
    Rational,
    Golden,
}

impl From<Mode> for ClockMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Rational => ClockMode::Rational,
            Mode::Golden => ClockMode::Golden,
        }
    }
}

#[derive(Serialize)]
struct SynchronyOutput {
    times: Vec<f64>,
    rational: Vec<f64>,
    golden: Vec<f64>,
}

#[derive(Serialize)]
struct BifurcationOutput {
    amplitude: Vec<f64>,
    position: Vec<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Synchrony {
            seed,
            oscillators,
            coupling,
            clock_strength,
            out,
        } => {
            let base = EnsembleConfig {
                size: oscillators,
                coupling,
                clock_strength,
                seed,
                ..EnsembleConfig::default()
            };

            eprintln!("simulating rational clock...");
            let rational = run_synchrony(&SynchronyConfig {
                ensemble: EnsembleConfig {
                    mode: ClockMode::Rational,
                    ..base.clone()
                },
                ..SynchronyConfig::default()
            })?;

            eprintln!("simulating golden clock...");
            let golden = run_synchrony(&SynchronyConfig {
                ensemble: EnsembleConfig {
                    mode: ClockMode::Golden,
                    ..base
                },
                ..SynchronyConfig::default()
            })?;

            emit(
                &SynchronyOutput {
                    times: rational.times,
                    rational: rational.order_parameter,
                    golden: golden.order_parameter,
                },
                out,
            )
        }
        Command::Bifurcation {
            mode,
            max_amplitude,
            amplitudes,
            out,
        } => {
            eprintln!("sweeping {amplitudes} amplitudes up to {max_amplitude}...");
            let diagram = run_sweep(&SweepConfig {
                amplitudes: amplitude_ramp(max_amplitude, amplitudes),
                mode: mode.into(),
                ..SweepConfig::default()
            })?;
            let (amplitude, position) = diagram.points();
            emit(&BifurcationOutput { amplitude, position }, out)
        }
    }
}

fn emit<T: Serialize>(value: &T, out: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to serialize output")?;
    match out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
