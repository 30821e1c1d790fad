// Main entry point for trx-reporter

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::fs::File;
use std::io::{self, BufReader};
use tracing::{info, warn};

use trx_reporter::cli::Cli;
use trx_reporter::config::{self, Config};
use trx_reporter::events::EventReplayer;
use trx_reporter::logging;
use trx_reporter::report::{ReportDestination, TrxReporter};

fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = Config::load();

    let cli = Cli::parse();

    logging::init(
        cli.verbose,
        config.as_ref().and_then(|c| c.logging.filter.as_deref()),
    );

    if cli.verbose {
        info!("Starting trx-reporter v{}", env!("CARGO_PKG_VERSION"));
    }

    if let Some(shell) = &cli.completion {
        print_completion(shell)?;
        return Ok(());
    }

    if let Some(path) = &cli.init_config {
        let content = Config::default().to_toml();
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;
        println!("Configuration file created: {}", path.display());
        return Ok(());
    }

    let base = config.clone().map(|c| c.reporter).unwrap_or_default();
    let options = cli.reporter_options(base)?;

    if cli.config {
        println!("Current configuration:");
        match &options.output {
            Some(output) => println!("    Output: {}", output),
            None => match std::env::var(config::ENV_TRX_REPORTER_FILE) {
                Ok(env_output) => println!(
                    "    Output: {} (from {})",
                    env_output,
                    config::ENV_TRX_REPORTER_FILE
                ),
                Err(_) => println!("    Output: stdout"),
            },
        }
        println!("    Exclude pending: {}", options.exclude_pending);
        println!("    Warn on excluded pending: {}", options.warn_excluded_pending);
        println!(
            "    Pending as NotExecuted: {}",
            options.treat_pending_as_not_executed
        );
        if config.is_none() {
            println!("\n  No configuration file loaded");
            println!(
                "  Create one with: trx-reporter --init-config {}",
                config::CONFIG_FILE_NAME
            );
        }
        return Ok(());
    }

    let mut reporter = TrxReporter::new(options);
    let mut replayer = EventReplayer::default();

    if cli.reads_stdin() {
        replayer.replay(io::stdin().lock(), &mut reporter)?;
    } else if let Some(path) = &cli.events {
        let file = File::open(path)
            .with_context(|| format!("Failed to open event stream: {}", path.display()))?;
        replayer.replay(BufReader::new(file), &mut reporter)?;
    }

    if !replayer.finished() {
        warn!("Event stream ended without run_end; writing report anyway");
        replayer.finish(&mut reporter)?;
    }

    if let Some(summary) = reporter.summary() {
        if let ReportDestination::File(path) = &summary.destination {
            info!(
                "{} result(s) written to {}",
                summary.results,
                path.display()
            );
        }
    }

    Ok(())
}

fn print_completion(shell: &str) -> Result<()> {
    use clap_complete::{Shell, generate};

    let shell: Shell = shell
        .parse()
        .map_err(|_| anyhow::anyhow!("Unsupported shell: {}", shell))?;
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
