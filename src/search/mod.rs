//! Search backends
//!
//! The matching core only needs one tabular hit stream per search direction.
//! A [`SearchBackend`] produces those streams; how (running BLAST+, reading
//! precomputed files, holding text in memory) is up to the implementation.
//!
//! Backends must deliver, for each query id, hits in best-first order, and
//! one independent stream per direction.
//!
//! - `tabular` - precomputed outfmt 6 files or in-memory text
//! - `blast_plus` - NCBI BLAST+ command-line programs
//! - `seqtype` - nucleotide/protein guessing for FASTA inputs

pub mod blast_plus;
pub mod seqtype;
pub mod tabular;

use std::fmt;
use std::io::BufRead;

use anyhow::Result;

pub use blast_plus::{BlastPlus, BlastPlusConfig, Databases};
pub use seqtype::SequenceType;
pub use tabular::{TabularFiles, TabularText};

/// Which way a search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Query collection searched against the target collection.
    Forward,
    /// Target collection searched against the query collection.
    Reverse,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A readable tabular hit stream.
pub type HitStream = Box<dyn BufRead + Send>;

/// Source of tabular hit streams for both search directions.
///
/// `Sync` so both directions can be fetched concurrently.
pub trait SearchBackend: Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Produce the hit stream for `direction`.
    fn search(&self, direction: Direction) -> Result<HitStream>;

    /// Label attached to parse errors for the stream of `direction`.
    fn stream_name(&self, direction: Direction) -> String {
        format!("{}:{}", self.name(), direction)
    }
}

impl<B: SearchBackend + ?Sized> SearchBackend for &B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn search(&self, direction: Direction) -> Result<HitStream> {
        (**self).search(direction)
    }

    fn stream_name(&self, direction: Direction) -> String {
        (**self).stream_name(direction)
    }
}
