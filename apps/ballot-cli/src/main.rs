//! # Ballot Scenario Runner
//!
//! ## Usage
//! ```bash
//! # Run a scenario with ./ballot.toml (if present) and BALLOT_* overrides
//! ballot --scenario election.json
//!
//! # Explicit config file
//! ballot --config ./ballot.toml --scenario election.json
//! ```
//!
//! The JSON report goes to stdout, logs go to stderr.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use ballot_cli::{logging, BallotConfig, CliError, Scenario};
use ballot_core::VoterValidator;
use tracing::info;

struct Args {
    config: Option<PathBuf>,
    scenario: PathBuf,
}

fn print_help() {
    println!("Ballot Box Scenario Runner");
    println!();
    println!("Usage: ballot [OPTIONS] --scenario <PATH>");
    println!();
    println!("Options:");
    println!("  -s, --scenario <PATH>  Scenario JSON file");
    println!("  -c, --config <PATH>    Config TOML file (default: ./ballot.toml if present)");
    println!("  -h, --help             Show this help message");
}

/// Returns `None` when help was requested.
fn parse_args() -> Result<Option<Args>, CliError> {
    let args: Vec<String> = env::args().collect();

    let mut config = None;
    let mut scenario = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let path_value = || {
            args.get(i + 1)
                .map(PathBuf::from)
                .ok_or_else(|| CliError::Usage(format!("{flag} requires a path")))
        };

        match flag {
            "--scenario" | "-s" => {
                scenario = Some(path_value()?);
                i += 1;
            }
            "--config" | "-c" => {
                config = Some(path_value()?);
                i += 1;
            }
            "--help" | "-h" => return Ok(None),
            other => return Err(CliError::Usage(format!("Unknown argument: {other}"))),
        }
        i += 1;
    }

    let scenario = scenario.ok_or_else(|| CliError::Usage("--scenario is required".into()))?;
    Ok(Some(Args { config, scenario }))
}

fn main() -> anyhow::Result<()> {
    let Some(args) = parse_args()? else {
        print_help();
        return Ok(());
    };

    let config = BallotConfig::load(args.config.as_deref()).context("loading configuration")?;
    logging::init_logging(&config.logging)?;

    info!(
        min_age = config.validator.min_age,
        required_fields = ?config.validator.required_fields,
        "Configuration loaded"
    );

    let scenario = Scenario::from_path(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?;

    let validator = VoterValidator::new(config.validator.clone());
    let report = scenario.run(&validator);

    let output = if config.output.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");

    Ok(())
}
