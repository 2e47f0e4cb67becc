use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use colored::Colorize;
use license_check::{ContentMode, FsSourceConfig, LicenseCheckConfig, check_fs, output};

use crate::logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Read each file fully into memory
    Buffer,
    /// Hand each file to the check as an open stream
    Stream,
}

impl From<Mode> for ContentMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Buffer => Self::Buffer,
            Mode::Stream => Self::Stream,
        }
    }
}

/// Check that source files contain a license header
#[derive(Debug, Parser)]
#[command(name = "license-check", version, about)]
pub struct Cli {
    /// Files, directories or glob patterns to check
    #[arg(default_value = ".")]
    pub patterns: Vec<String>,

    /// File holding the license header text
    #[arg(long, value_name = "PATH")]
    pub header: Option<PathBuf>,

    /// JSON or YAML file with `path`, `blocking` and `log` settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fail when a file does not contain the header (`--blocking=false` to disable)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub blocking: Option<bool>,

    /// Log whether each file contains the header (`--log=false` to disable)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub log: Option<bool>,

    /// How file contents are read
    #[arg(long, value_enum, default_value_t = Mode::Buffer)]
    pub mode: Mode,

    /// Glob pattern to exclude (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Maximum size of a buffered file, in bytes
    #[arg(long, value_name = "BYTES", default_value_t = 10_485_760)]
    pub max_file_size: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Merge `--config` with the command-line flags.
    ///
    /// Any flag given on the command line wins over the config file, in
    /// either direction.
    fn check_config(&self) -> Result<LicenseCheckConfig> {
        let mut config = match (&self.config, &self.header) {
            (Some(path), _) => LicenseCheckConfig::from_file(path)?,
            (None, Some(header)) => LicenseCheckConfig::new(header),
            (None, None) => bail!("No license header file given (use --header or --config)"),
        };
        if let Some(header) = &self.header {
            config.path.clone_from(header);
        }
        if let Some(blocking) = self.blocking {
            config.blocking = blocking;
        }
        if let Some(log) = self.log {
            config.log = log;
        }
        Ok(config)
    }

    fn fs_config(&self) -> FsSourceConfig {
        let mut config = FsSourceConfig::default();
        config.patterns.clone_from(&self.patterns);
        config.exclude.clone_from(&self.exclude);
        config.mode = self.mode.into();
        config.max_file_size = self.max_file_size;
        config
    }
}

/// Parse the command line, run the check and print the report.
///
/// Returns whether the run passed.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the header template is
/// missing, or the report cannot be written.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    let config = cli.check_config()?;
    logging::init(cli.verbose, config.log);
    tracing::debug!(
        header = %config.path.display(),
        blocking = config.blocking,
        log = config.log,
        "Resolved configuration"
    );

    let report = check_fs(&config, &cli.fs_config())?;

    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Json => output::write_json(&report, &mut stdout.lock())?,
        OutputFormat::Human => {
            if !stdout.is_terminal() {
                colored::control::set_override(false);
            }
            let mut buf = Vec::new();
            output::write_human(&report, &mut buf)?;
            write_colored(&String::from_utf8_lossy(&buf), &mut stdout.lock())?;
        }
    }

    Ok(report.ok)
}

/// Color the pass/fail verdict lines of a plain-text report.
fn write_colored(text: &str, writer: &mut dyn Write) -> Result<()> {
    for line in text.lines() {
        if line.starts_with('\u{2713}') {
            writeln!(writer, "{}", line.green().bold())?;
        } else if line.starts_with('\u{2717}') {
            writeln!(writer, "{}", line.red().bold())?;
        } else if line.starts_with("The following file") {
            writeln!(writer, "{}", line.red())?;
        } else {
            writeln!(writer, "{line}")?;
        }
    }
    Ok(())
}
