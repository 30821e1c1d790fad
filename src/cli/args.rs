// CLI argument definitions using Clap

use clap::Parser;
use std::path::PathBuf;

use crate::config::{OptionsError, ReporterOptions};

/// Turn a test runner's lifecycle event stream into a TRX report
#[derive(Parser, Debug)]
#[command(name = "trx-reporter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert NDJSON test lifecycle events into a TRX report", long_about = None)]
pub struct Cli {
    /// Event stream to read (NDJSON); `-` or omitted reads stdin
    #[arg(value_name = "EVENTS")]
    pub events: Option<PathBuf>,

    /// Report file path; `[hash]` is replaced with a random hex string
    #[arg(short = 'o', long, value_name = "OUTPUT_FILE")]
    pub output: Option<String>,

    /// Leave pending tests out of the report
    #[arg(long, default_value_t = false)]
    pub exclude_pending: bool,

    /// Warn when pending tests were left out
    #[arg(long, default_value_t = false)]
    pub warn_excluded_pending: bool,

    /// Report pending tests as NotExecuted
    #[arg(long, default_value_t = false)]
    pub treat_pending_as_not_executed: bool,

    /// Mocha-style options, e.g. `output=out.trx,excludePending=true`
    #[arg(long, value_name = "KEY=VALUE,...")]
    pub reporter_options: Option<String>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print shell completion (bash, zsh, fish, elvish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "elvish", "powershell"])]
    pub completion: Option<String>,
}

impl Cli {
    /// Layer the option string and flags over `base` (usually the config file)
    pub fn reporter_options(&self, base: ReporterOptions) -> Result<ReporterOptions, OptionsError> {
        let mut options = base;
        if let Some(raw) = &self.reporter_options {
            options.apply_reporter_options(raw)?;
        }
        if let Some(output) = &self.output {
            options.output = Some(output.clone());
        }
        options.exclude_pending |= self.exclude_pending;
        options.warn_excluded_pending |= self.warn_excluded_pending;
        options.treat_pending_as_not_executed |= self.treat_pending_as_not_executed;
        Ok(options)
    }

    /// Whether events come from stdin
    pub fn reads_stdin(&self) -> bool {
        self.events
            .as_deref()
            .is_none_or(|path| path.as_os_str() == "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_option_string_and_config() {
        let cli = Cli::parse_from([
            "trx-reporter",
            "events.ndjson",
            "--reporter-options",
            "output=from-options.trx,warnExcludedPending=true",
            "--output",
            "from-flag.trx",
            "--exclude-pending",
        ]);
        let base = ReporterOptions {
            output: Some("from-config.trx".to_string()),
            treat_pending_as_not_executed: true,
            ..ReporterOptions::default()
        };

        let options = cli.reporter_options(base).unwrap();

        assert_eq!(options.output.as_deref(), Some("from-flag.trx"));
        assert!(options.exclude_pending);
        assert!(options.warn_excluded_pending);
        assert!(options.treat_pending_as_not_executed);
        assert!(!cli.reads_stdin());
    }

    #[test]
    fn test_option_string_overrides_config() {
        let cli = Cli::parse_from(["trx-reporter", "--reporter-options", "output=b.trx"]);
        let base = ReporterOptions {
            output: Some("a.trx".to_string()),
            ..ReporterOptions::default()
        };
        assert_eq!(
            cli.reporter_options(base).unwrap().output.as_deref(),
            Some("b.trx")
        );
    }

    #[test]
    fn test_dash_reads_stdin() {
        assert!(Cli::parse_from(["trx-reporter"]).reads_stdin());
        assert!(Cli::parse_from(["trx-reporter", "-"]).reads_stdin());
    }
}
