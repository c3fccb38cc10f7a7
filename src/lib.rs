//! Conditional reciprocal best hit (CRBH) ortholog detection.
//!
//! Reads BLAST tabular hits in both directions between a query and a target
//! sequence collection, finds strict reciprocal best hits, then rescues
//! further pairs whose e-value is as good as confirmed pairs of similar
//! alignment length.
//!
//! ```no_run
//! use crbh::api::Crbh;
//! use crbh::search::TabularFiles;
//!
//! # fn main() -> crbh::error::Result<()> {
//! let mut run = Crbh::new(TabularFiles::new("q_into_t.1.blast", "t_into_q.2.blast"));
//! let summary = run.run()?;
//! println!("{} strict, {} rescued", summary.strict, summary.rescued);
//! if run.has_reciprocal("contig_1") {
//!     println!("contig_1 has an ortholog");
//! }
//! # Ok(())
//! # }
//! ```

pub mod algorithm;
pub mod api;
pub mod blastinput;
pub mod common;
pub mod error;
pub mod index;
pub mod report;
pub mod search;
pub mod stats;
