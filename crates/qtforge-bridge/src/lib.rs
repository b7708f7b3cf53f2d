//! QtForge Bridge
//!
//! Line-delimited JSON bridge between a QtForge host process and a
//! scripting-language plugin. The host writes requests to the bridge's
//! stdin and reads one acknowledgement per request from its stdout.
//!
//! ## Protocol
//!
//! One JSON object per line (newline-delimited JSON).
//!
//! Request:
//! ```json
//! {"id": 5, "type": "ping"}
//! ```
//!
//! Response:
//! ```json
//! {"id": 5, "success": true, "message": "Received ping request"}
//! ```
//!
//! Malformed line:
//! ```json
//! {"id": 0, "success": false, "error": "invalid JSON: expected value at line 1 column 1"}
//! ```
//!
//! Blank lines are ignored. A `{"type": "shutdown"}` request is
//! acknowledged and then stops the bridge unless disabled in
//! [`BridgeConfig`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;

pub use bridge::{Bridge, BridgeOptions, BridgeState, BridgeSummary, TerminationReason};
pub use config::{BridgeConfig, LogConfig, LogFormat};
pub use error::{BridgeError, BridgeResult, ParseError};
pub use protocol::{Request, Response, SHUTDOWN_TYPE, UNKNOWN_TYPE};
