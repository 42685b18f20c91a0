//! # ballot-cli
//!
//! Library half of the `ballot` binary: configuration, logging setup and
//! the scenario runner. `main.rs` only parses arguments and wires these
//! together.

pub mod config;
pub mod error;
pub mod logging;
pub mod scenario;

pub use config::{BallotConfig, LogFormat};
pub use error::{CliError, CliResult};
pub use scenario::{Report, Scenario};
