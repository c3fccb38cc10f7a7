//! Tabular output of reciprocal and candidate hits

pub mod outfmt6;

pub use outfmt6::{
    blast_bit_score, blast_evalue, format_evalue, write_header, write_hit, write_missed, write_reciprocals,
    write_table, NumberStyle, OutputConfig, ReportContext,
};
