//! Lockstake command line tool
//!
//! Previews share purchases, prints the interest schedule and replays
//! staking scenarios against an in-memory ledger.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lockstake_economics::ShareCalculator;
use lockstake_staking::EngineConfig;

mod scenario;

#[derive(Parser)]
#[command(name = "lockstake")]
#[command(about = "Time-lock staking engine tool", version)]
struct Cli {
    /// Path to engine configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the shares a lock would buy at the launch share price
    Preview {
        /// Tokens to lock
        #[arg(short, long)]
        principal: u64,

        /// Lock duration in days
        #[arg(short, long)]
        days: u64,
    },

    /// Print the daily interest divisor schedule
    Schedule {
        #[arg(long, default_value = "1")]
        from: u64,

        #[arg(long, default_value = "1100")]
        to: u64,
    },

    /// Replay a JSON scenario and print the settlement report
    Simulate {
        /// Scenario file
        file: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            Ok(EngineConfig::load(path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Preview { principal, days } => {
            if !(config.min_duration_days..=config.max_duration_days).contains(&days) {
                return Err(format!(
                    "duration must be within {}..={} days",
                    config.min_duration_days, config.max_duration_days
                )
                .into());
            }
            let purchase = ShareCalculator::new(config.max_duration_days).purchase(
                principal,
                days,
                config.initial_share_price,
            )?;
            println!("{}", serde_json::to_string_pretty(&purchase)?);
        }

        Commands::Schedule { from, to } => {
            let periods = config.schedule.periods(from.max(1), to);
            println!("{}", serde_json::to_string_pretty(&periods)?);
        }

        Commands::Simulate { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let scenario: scenario::Scenario = serde_json::from_str(&contents)?;
            log::info!(
                "replaying {} steps from {}",
                scenario.steps.len(),
                file.display()
            );

            let report = scenario::replay(config, &scenario)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
