//! Command-line interface and orchestration for fdroid-popular
//!
//! This module implements the CLI commands and wires the catalog, the hosting service
//! client, and the enrichment engine together into end-to-end workflows.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **generate**: Load a catalog, query the star count of every application, and write
//!   the popularity document
//! - **download**: Fetch a catalog and save it to a local file, so that later runs of
//!   `generate` can work from that file
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. The `generate` and `download` commands turn a fatal error
//! into a single `Error: ...` line and an exit status of 1, unless debug mode is on, in
//! which case the error is handed back to `main` intact.
//!
//! Batch sizing, pacing, and request timeouts come from a TOML configuration file.

mod common;
mod config;
mod download;
mod generate;
mod host;
mod init;
mod progress_reporter;
mod run;

#[cfg(debug_assertions)]
pub use config::Config;

pub use download::{DownloadArgs, download};
pub use generate::{GenerateArgs, generate};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
