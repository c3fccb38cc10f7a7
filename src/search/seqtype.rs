//! Nucleotide/protein guessing for FASTA inputs
//!
//! A sequence is called nucleotide when more than 90% of its first 1000
//! residues (ignoring `N`) are `A`, `C`, `G`, `T` or `U`. A FASTA file is
//! called protein when more than 90% of its records are protein.

use std::path::Path;

use anyhow::{Context, Result};
use bio::io::fasta;

/// Fraction of nucleotide residues above which a sequence is nucleotide.
pub const GUESS_THRESHOLD: f64 = 0.9;

/// Number of leading residues inspected per sequence.
pub const GUESS_WINDOW: usize = 1000;

/// Fraction of protein records above which a file is protein.
pub const PROTEIN_FILE_FRACTION: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceType {
    Nucleotide,
    Protein,
}

impl SequenceType {
    /// `-dbtype` value for makeblastdb.
    pub fn dbtype(&self) -> &'static str {
        match self {
            SequenceType::Nucleotide => "nucl",
            SequenceType::Protein => "prot",
        }
    }
}

/// Guess the type of a single sequence.
///
/// A sequence made only of `N` is called nucleotide.
pub fn guess_sequence(seq: &[u8]) -> SequenceType {
    let window = &seq[..seq.len().min(GUESS_WINDOW)];
    let mut nucleotides = 0usize;
    let mut unknown = 0usize;
    for &b in window {
        match b.to_ascii_uppercase() {
            b'A' | b'C' | b'G' | b'T' | b'U' => nucleotides += 1,
            b'N' => unknown += 1,
            _ => {}
        }
    }
    let total = window.len() - unknown;
    if total == 0 || nucleotides as f64 / total as f64 > GUESS_THRESHOLD {
        SequenceType::Nucleotide
    } else {
        SequenceType::Protein
    }
}

/// Per-file record counts by guessed type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FastaComposition {
    pub records: usize,
    pub protein_records: usize,
}

impl FastaComposition {
    pub fn nucleotide_records(&self) -> usize {
        self.records - self.protein_records
    }

    /// More than 90% of records look like protein.
    pub fn is_protein(&self) -> bool {
        self.protein_records as f64 > self.records as f64 * PROTEIN_FILE_FRACTION
    }

    pub fn all_nucleotide(&self) -> bool {
        self.protein_records == 0
    }

    pub fn file_type(&self) -> SequenceType {
        if self.is_protein() {
            SequenceType::Protein
        } else {
            SequenceType::Nucleotide
        }
    }
}

/// Read every record of `path` and tally guessed types.
pub fn classify_fasta(path: &Path) -> Result<FastaComposition> {
    let reader = fasta::Reader::from_file(path)
        .with_context(|| format!("Failed to open FASTA file: {}", path.display()))?;
    let mut composition = FastaComposition::default();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to read FASTA record in {}", path.display()))?;
        composition.records += 1;
        if guess_sequence(record.seq()) == SequenceType::Protein {
            composition.protein_records += 1;
        }
    }
    Ok(composition)
}
