#![forbid(unsafe_code)]

//! Terminal host for the sortviz engine.
//!
//! `sortviz run` shuffles a sequence, animates the configured algorithm as
//! a bar chart on stdout, and prints a one-line summary. `sortviz
//! algorithms` lists the names `--algorithm` and config files accept.

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;
pub mod render;

pub use cli::{Cli, Commands, RunArgs, run, run_from_env};
pub use error::{CliError, Result};
