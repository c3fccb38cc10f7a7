pub mod curve;
pub mod evalue;

pub use curve::*;
pub use evalue::*;
