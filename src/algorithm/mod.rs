//! Reciprocal matching and conditional rescue
//!
//! - `reciprocal` - strict reciprocal best hits and the candidate (missed) set
//! - `rescue` - promotion of candidates against the significance curve

pub mod reciprocal;
pub mod rescue;

pub use reciprocal::{find_reciprocals, StrictMatches};
pub use rescue::find_secondaries;
