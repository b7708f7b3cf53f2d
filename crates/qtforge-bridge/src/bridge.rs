//! The request/response loop.
//!
//! One line in, one line out. The loop blocks only while waiting for the
//! next request line; parsing, answering and flushing run to completion
//! before the next read.

use std::io::{BufRead, Write};

use tracing::{debug, error, info, warn};

use crate::error::{BridgeResult, ParseError};
use crate::protocol::{Request, Response};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The request stream was closed.
    EndOfInput,
    /// A `shutdown` request was acknowledged.
    ShutdownRequested,
    /// An I/O or serialization error aborted the loop.
    Failed,
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Waiting for, or handling, a request line.
    Listening,
    /// No further requests will be read.
    Terminated(TerminationReason),
}

/// Behavior switches for a [`Bridge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Stop after acknowledging a `shutdown` request. When off, only the
    /// end of the request stream stops the loop.
    pub shutdown_on_request: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            shutdown_on_request: true,
        }
    }
}

/// Counters for a finished (or aborted) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeSummary {
    /// How the loop ended.
    pub reason: TerminationReason,
    /// Requests acknowledged with `success: true`.
    pub requests: u64,
    /// Lines answered with `success: false`.
    pub malformed: u64,
    /// Blank lines skipped without a response.
    pub skipped: u64,
}

/// Line-delimited JSON bridge over a reader/writer pair.
pub struct Bridge<R, W> {
    reader: R,
    writer: W,
    options: BridgeOptions,
    state: BridgeState,
    requests: u64,
    malformed: u64,
    skipped: u64,
}

impl<R: BufRead, W: Write> Bridge<R, W> {
    /// Create a bridge in the `Listening` state.
    pub fn new(reader: R, writer: W, options: BridgeOptions) -> Self {
        Self {
            reader,
            writer,
            options,
            state: BridgeState::Listening,
            requests: 0,
            malformed: 0,
            skipped: 0,
        }
    }

    /// Current loop state.
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Counters so far.
    pub fn summary(&self) -> BridgeSummary {
        let reason = match self.state {
            BridgeState::Terminated(reason) => reason,
            BridgeState::Listening => TerminationReason::EndOfInput,
        };
        BridgeSummary {
            reason,
            requests: self.requests,
            malformed: self.malformed,
            skipped: self.skipped,
        }
    }

    /// Serve requests until the input closes, a shutdown request arrives,
    /// or an I/O error occurs.
    ///
    /// # Errors
    ///
    /// Returns the first read, write, flush or serialization error. The
    /// bridge is `Terminated(Failed)` afterwards.
    pub fn run(&mut self) -> BridgeResult<BridgeSummary> {
        info!(
            shutdown_on_request = self.options.shutdown_on_request,
            "bridge listening"
        );

        while self.state == BridgeState::Listening {
            if let Err(e) = self.step() {
                self.state = BridgeState::Terminated(TerminationReason::Failed);
                error!(error = %e, "bridge loop aborted");
                return Err(e);
            }
        }

        let summary = self.summary();
        info!(
            reason = ?summary.reason,
            requests = summary.requests,
            malformed = summary.malformed,
            skipped = summary.skipped,
            "bridge stopped"
        );
        Ok(summary)
    }

    /// Read and answer at most one line.
    fn step(&mut self) -> BridgeResult<()> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            info!("request stream closed");
            self.state = BridgeState::Terminated(TerminationReason::EndOfInput);
            return Ok(());
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(text) => text.trim(),
            Err(e) => return self.reject(&ParseError::from(e)),
        };

        if line.is_empty() {
            self.skipped += 1;
            return Ok(());
        }

        debug!(line, "request received");

        let request = match Request::parse(line) {
            Ok(request) => request,
            Err(e) => return self.reject(&e),
        };

        self.send(&Response::received(&request))?;
        self.requests += 1;
        debug!(id = %request.id(), kind = %request.kind(), "response sent");

        if request.is_shutdown() {
            if self.options.shutdown_on_request {
                info!(id = %request.id(), "shutdown requested");
                self.state = BridgeState::Terminated(TerminationReason::ShutdownRequested);
            } else {
                debug!("shutdown request ignored");
            }
        }

        Ok(())
    }

    fn reject(&mut self, err: &ParseError) -> BridgeResult<()> {
        warn!(error = %err, "malformed request");
        self.send(&Response::malformed(err))?;
        self.malformed += 1;
        Ok(())
    }

    fn send(&mut self, response: &Response) -> BridgeResult<()> {
        let line = response.to_line()?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}
