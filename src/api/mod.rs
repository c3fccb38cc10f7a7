//! High-level API
//!
//! - `crbh` - the stepwise pipeline over a search backend, and the one-shot
//!   matcher over prebuilt indexes

pub mod crbh;

pub use crbh::{match_indexes, residual_missed, Crbh, MatchOutcome, RunSummary};
