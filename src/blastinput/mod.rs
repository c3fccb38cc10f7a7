//! Command-line input handling
//!
//! - `crbh_args` - subcommand arguments and their defaults

pub mod crbh_args;

pub use crbh_args::{resolve_threads, BlastArgs, OutputArgs, TabularArgs};
