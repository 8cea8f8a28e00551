//! wrapkit CLI - Command-line tool for wrapper scenarios
//!
//! This binary provides command-line interfaces for:
//! - run: replay a JSON scenario of wrapper operations and report the result
//! - check-config: validate a TOML configuration file

mod demo;
mod scenario;

use clap::{Parser, Subcommand, ValueEnum};
use scenario::{MemberReport, Scenario, ScenarioReport, WrapperReport};
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wrapkit::{Runtime, RuntimeConfig};

#[derive(Parser)]
#[command(name = "wrapkit")]
#[command(about = "Replay type-homogeneous wrapper scenarios")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON scenario and print the resulting wrappers
    Run {
        /// Scenario file (JSON)
        scenario: PathBuf,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Log filter (overrides RUST_LOG and the config file)
        #[arg(long)]
        log: Option<String>,
    },
    /// Validate a configuration file
    CheckConfig {
        /// Configuration file (TOML)
        config: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Run {
            scenario,
            config,
            format,
            log,
        } => {
            handle_run(scenario, config, format, log)?;
        }
        Commands::CheckConfig { config } => {
            handle_check_config(config)?;
        }
    }

    Ok(())
}

fn handle_run(
    scenario_path: PathBuf,
    config_path: Option<PathBuf>,
    format: OutputFormat,
    log: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    init_logging(log.as_deref(), &config.log_filter)?;

    let input = fs::read_to_string(&scenario_path)
        .map_err(|e| format!("{}: {}", scenario_path.display(), e))?;
    let scenario = Scenario::from_json(&input)?;

    let mut runtime = Runtime::init(config)?;
    let report = scenario.run(runtime.store_mut())?;
    runtime.shutdown()?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    match format {
        OutputFormat::Table => print_report_table(&mut writer, &report)?,
        OutputFormat::Json => print_report_json(&mut writer, &report)?,
    }
    Ok(())
}

fn handle_check_config(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let config = RuntimeConfig::load(&path)?;
    println!("{}: ok", path.display());
    println!("max_members\t{}", config.limits.max_members);
    println!("max_alias_bytes\t{}", config.limits.max_alias_bytes);
    println!(
        "max_inscription_bytes\t{}",
        config.limits.max_inscription_bytes
    );
    println!("log_filter\t{}", config.log_filter);
    Ok(())
}

/// Precedence: `--log`, then `RUST_LOG`, then the config file.
fn init_logging(flag: Option<&str>, configured: &str) -> Result<(), Box<dyn Error>> {
    let filter = match flag {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(configured))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| -> Box<dyn Error> { e })?;
    Ok(())
}

fn print_report_table(
    writer: &mut dyn Write,
    report: &ScenarioReport,
) -> Result<(), Box<dyn Error>> {
    writeln!(writer, "Wrapper\tIdentity\tAlias\tKind\tCount\tMembers")?;
    for wrapper in &report.wrappers {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            wrapper.name.as_deref().unwrap_or("-"),
            wrapper.identity,
            wrapper.alias,
            wrapper.kind,
            wrapper.count,
            format_members(wrapper)
        )?;
    }

    if !report.loose.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Loose\tPayload")?;
        for object in &report.loose {
            writeln!(writer, "{}\t{}", object.object, object.payload)?;
        }
    }
    Ok(())
}

fn format_members(wrapper: &WrapperReport) -> String {
    let members = wrapper
        .members
        .iter()
        .map(|member| match member {
            MemberReport::Payload(payload) => payload.to_string(),
            MemberReport::Wrapper(inner) => format!("{}{}", inner.identity, format_members(inner)),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", members)
}

fn print_report_json(
    writer: &mut dyn Write,
    report: &ScenarioReport,
) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}
