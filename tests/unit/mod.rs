//! Unit test infrastructure for crbh
//!
//! Tests are organized by module:
//! - `common/` - hit record parsing and stream indexing
//! - `algorithm/` - strict matching and rescue properties
//! - `stats/` - significance curve
//! - `api/` - the full pipeline over fixtures
//! - `search/` - search backends and sequence type guessing

pub mod algorithm;
pub mod common;
pub mod stats;
