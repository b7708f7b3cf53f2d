//! QtForge Bridge Binary
//!
//! Line-delimited JSON bridge for QtForge scripting plugins.
//!
//! ## Usage
//!
//! The bridge reads requests from stdin and writes responses to stdout:
//!
//! ```bash
//! echo '{"id":1,"type":"ping"}' | qtforge-bridge
//! ```
//!
//! Diagnostics go to stderr (disable with `--quiet`) and/or `--log-file`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use qtforge_bridge::{logging, Bridge, BridgeConfig, LogFormat};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "qtforge-bridge")]
#[command(about = "Line-delimited JSON bridge for QtForge scripting plugins")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "QTFORGE_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Append diagnostics to this file
    #[arg(long, env = "QTFORGE_BRIDGE_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Diagnostic level (trace, debug, info, warn, error)
    #[arg(long, env = "QTFORGE_BRIDGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Diagnostic format
    #[arg(long, value_enum, env = "QTFORGE_BRIDGE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Do not write diagnostics to stderr
    #[arg(short, long, env = "QTFORGE_BRIDGE_QUIET")]
    quiet: bool,

    /// Keep serving after a "shutdown" request; stop only when stdin closes
    #[arg(long, env = "QTFORGE_BRIDGE_IGNORE_SHUTDOWN")]
    ignore_shutdown: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::from_file(path)?,
            None => BridgeConfig::default(),
        };

        if let Some(file) = self.log_file {
            config.log.file = Some(file);
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }
        if self.quiet {
            config.log.stderr = false;
        }
        if self.ignore_shutdown {
            config.shutdown_on_request = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("qtforge-bridge: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // The sink lives only for the run, so the log file is closed on return.
    let dispatch = match logging::dispatch(&config.log) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("qtforge-bridge: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::dispatcher::with_default(&dispatch, || {
        let span = tracing::info_span!("bridge", session = %Uuid::new_v4());
        let _enter = span.enter();

        match serve(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{e:?}");
                ExitCode::FAILURE
            }
        }
    })
}

fn serve(config: &BridgeConfig) -> anyhow::Result<()> {
    info!(pid = std::process::id(), "qtforge-bridge starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut bridge = Bridge::new(stdin.lock(), stdout.lock(), config.bridge_options());

    bridge.run().context("bridge loop failed")?;

    info!("qtforge-bridge shutting down");
    Ok(())
}
