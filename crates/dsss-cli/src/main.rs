//! Command-line front end for the DSSS link simulator.
//!
//! `dsss run` simulates one link and prints the response as JSON on stdout.
//! Requested stage details follow, one JSON document per line. Logs go to
//! stderr.

use clap::{Parser, Subcommand};
use dsss_core::observe::{init_logging, LogConfig};
use dsss_core::{CodingScheme, DsssConfig, StageName};
use dsss_sim::{ErrorResponse, SimError, SimulationEngine, SimulationRequest};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "dsss", version, about = "Direct-sequence spread spectrum link simulator")]
struct Cli {
    /// Configuration file (defaults to $DSSS_CONFIG, then the search path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging, overriding the configured level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print the result
    Run(RunArgs),
    /// Print an example configuration file
    ExampleConfig,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Text to transmit
    message: String,

    /// Transmitter secret
    #[arg(long)]
    tx_secret: String,

    /// Receiver secret (defaults to the transmitter secret)
    #[arg(long)]
    rx_secret: Option<String>,

    /// Chip rate in chips/s
    #[arg(long, default_value_t = 1e5)]
    chip_rate: f64,

    /// Carrier frequency in Hz
    #[arg(long, default_value_t = 1e6)]
    carrier_freq: f64,

    /// Samples per chip
    #[arg(long, default_value_t = 8)]
    oversampling: usize,

    /// In-band noise power (0 disables the noise)
    #[arg(long, default_value_t = 0.0)]
    noise_power: f64,

    /// Noise bandwidth in Hz, centred on the carrier
    #[arg(long, default_value_t = 5e3)]
    noise_bandwidth: f64,

    /// Seed for the channel noise
    #[arg(long)]
    noise_seed: Option<u64>,

    /// Line coding: nrz, manchester, rep3, hamming74
    #[arg(long, default_value_t = CodingScheme::Nrz)]
    coding: CodingScheme,

    /// Also print the detail of these stages (repeatable)
    #[arg(long = "stage")]
    stages: Vec<StageName>,
}

impl RunArgs {
    fn to_request(&self) -> SimulationRequest {
        let rx_secret = self.rx_secret.as_deref().unwrap_or(&self.tx_secret);
        let request = SimulationRequest::new(self.message.as_str(), self.tx_secret.as_str(), rx_secret)
            .with_coding(self.coding)
            .with_noise(self.noise_power, self.noise_bandwidth)
            .with_link(self.chip_rate, self.carrier_freq, self.oversampling);
        match self.noise_seed {
            Some(seed) => request.with_noise_seed(seed),
            None => request,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<DsssConfig, dsss_core::ConfigError> {
    match path {
        Some(path) => DsssConfig::load_from(path),
        None => DsssConfig::load(),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(line) => {
            println!("{line}");
            true
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            false
        }
    }
}

fn report(err: &SimError) -> ExitCode {
    print_json(&ErrorResponse::from(err));
    if err.is_invalid_request() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn run(engine: &SimulationEngine, args: &RunArgs) -> ExitCode {
    let response = match engine.run_simulation(&args.to_request()) {
        Ok(response) => response,
        Err(err) => return report(&err),
    };
    if !print_json(&response) {
        return ExitCode::FAILURE;
    }

    for &stage in &args.stages {
        match engine.get_stage_detail(&response.simulation_id, stage) {
            Ok(detail) => {
                if !print_json(&detail) {
                    return ExitCode::FAILURE;
                }
            }
            Err(err) => return report(&err),
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::ExampleConfig = cli.command {
        print!("{}", DsssConfig::example_yaml());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("dsss: {err}");
            return ExitCode::FAILURE;
        }
    };

    let logging = if cli.verbose {
        LogConfig {
            format: config.logging.format,
            ..LogConfig::verbose()
        }
    } else {
        config.logging.clone()
    };
    init_logging(&logging);
    tracing::debug!(engine = ?config.engine, "engine configured");

    let engine = SimulationEngine::new(config.engine);
    match &cli.command {
        Command::Run(args) => run(&engine, args),
        Command::ExampleConfig => ExitCode::SUCCESS,
    }
}
