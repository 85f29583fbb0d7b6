//! Driftwatch check binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use drift_check::{evaluate, probe, Cli, CheckError, CheckReport, CheckStatus, ProbeConfig};
use drift_perfdata::{descriptor_path, MetricCatalog};
use drift_rrd::Engine;

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries only the plugin line.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            println!("{}", report.plugin_line());
            ExitCode::from(report.status.exit_code())
        }
        Err(e) => {
            tracing::error!(error = %e, "check aborted");
            println!("DRIFT {} - {e}", CheckStatus::Unknown);
            ExitCode::from(CheckStatus::Unknown.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<CheckReport, CheckError> {
    let descriptor = descriptor_path(&cli.path, &cli.host, &cli.service);
    tracing::debug!(descriptor = %descriptor.display(), "resolving metric catalog");
    let catalog = MetricCatalog::load(&descriptor)?;

    let engine = Engine::with_program(&cli.engine);
    let config = ProbeConfig::from_cli(cli);
    let reports = probe::run(&catalog, &engine, &config)?;

    Ok(evaluate(&reports, cli.warn, cli.crit))
}
