//! Diagnostic log sink.
//!
//! Diagnostics go to stderr and/or a log file, never to stdout, which
//! carries the protocol. The sink is returned as a [`Dispatch`] so the
//! caller decides its scope instead of installing a process-wide global.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing::Dispatch;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{LogConfig, LogFormat};
use crate::error::{BridgeError, BridgeResult};

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Build the diagnostic dispatcher described by `config`.
///
/// `RUST_LOG` is honored; `config.level` is added on top for this crate.
/// The log file, if any, is opened once in append mode and owned by the
/// returned dispatcher.
///
/// # Errors
///
/// Returns an error if the level is invalid or the log file cannot be opened.
pub fn dispatch(config: &LogConfig) -> BridgeResult<Dispatch> {
    let filter = EnvFilter::from_default_env().add_directive(config.directive()?);

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.stderr {
        layers.push(fmt_layer(io::stderr, config.format));
    }

    if let Some(path) = &config.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                BridgeError::Logging(format!(
                    "failed to open log file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        layers.push(fmt_layer(Mutex::new(file), config.format));
    }

    let subscriber = tracing_subscriber::registry().with(filter).with(layers);
    Ok(Dispatch::new(subscriber))
}

fn fmt_layer<W>(writer: W, format: LogFormat) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}
