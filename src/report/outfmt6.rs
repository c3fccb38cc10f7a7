//! BLAST tabular (`-outfmt 6`) writer for reciprocal and candidate hits
//!
//! Lines are written so that BLAST+ table readers accept them unchanged. With
//! [`NumberStyle::Blast`] the numeric columns follow the rules BLAST+ uses when
//! printing its own tables; [`NumberStyle::Fixed`] prints fixed precision.

use std::io::{self, Write};

use crate::common::{Hit, TABULAR_COLUMNS};
use crate::index::HitTable;

/// How e-values and bit scores are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// Same rules as BLAST+ tabular output.
    Blast,
    /// `{:.2e}` / `{:.6}` e-values, bit score with `bit_score_decimals`.
    Fixed,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Prefix each table with a `#` comment block
    pub include_header: bool,
    pub style: NumberStyle,
    pub delimiter: char,
    /// Decimal places for percent identity
    pub identity_decimals: usize,
    /// Decimal places for bit score under [`NumberStyle::Fixed`]
    pub bit_score_decimals: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::blast_compatible()
    }
}

impl OutputConfig {
    pub fn blast_compatible() -> Self {
        OutputConfig {
            include_header: false,
            style: NumberStyle::Blast,
            delimiter: '\t',
            identity_decimals: 3,
            bit_score_decimals: 1,
        }
    }

    pub fn plain() -> Self {
        OutputConfig {
            style: NumberStyle::Fixed,
            ..Self::blast_compatible()
        }
    }

    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }
}

/// What the comment header names.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub program: String,
    pub version: Option<String>,
    /// Query collection (FASTA or forward hit file)
    pub query_name: Option<String>,
    /// Target collection (FASTA or reverse hit file)
    pub target_name: Option<String>,
}

impl Default for ReportContext {
    fn default() -> Self {
        ReportContext {
            program: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            query_name: None,
            target_name: None,
        }
    }
}

/// `printf("%.*e")` rendering: the exponent is signed and has at least two
/// digits (`1.00e-05`, `1.235e+05`).
fn c_exponent(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// E-value as BLAST+ prints it in tabular output.
///
/// | range     | output     |
/// |-----------|------------|
/// | < 1e-180  | `0.0`      |
/// | < 0.0009  | `%.2e`     |
/// | < 0.1     | `%.3f`     |
/// | < 1       | `%.2f`     |
/// | < 10      | `%.1f`     |
/// | otherwise | `%.0f`     |
pub fn blast_evalue(e_value: f64) -> String {
    match e_value {
        e if e < 1.0e-180 => "0.0".to_string(),
        e if e < 0.0009 => c_exponent(e, 2),
        e if e < 0.1 => format!("{e:.3}"),
        e if e < 1.0 => format!("{e:.2}"),
        e if e < 10.0 => format!("{e:.1}"),
        e => format!("{e:.0}"),
    }
}

/// Bit score as BLAST+ prints it: `%.3e` above 99999, whole number above
/// 99.9, one decimal below.
pub fn blast_bit_score(bit_score: f64) -> String {
    match bit_score {
        b if b > 99999.0 => c_exponent(b, 3),
        b if b > 99.9 => format!("{b:.0}"),
        b => format!("{b:.1}"),
    }
}

pub fn format_evalue(e_value: f64, style: NumberStyle) -> String {
    match style {
        NumberStyle::Blast => blast_evalue(e_value),
        NumberStyle::Fixed if e_value == 0.0 => "0.0".to_string(),
        NumberStyle::Fixed if e_value < 0.001 => format!("{e_value:.2e}"),
        NumberStyle::Fixed => format!("{e_value:.6}"),
    }
}

fn format_bit_score(bit_score: f64, config: &OutputConfig) -> String {
    match config.style {
        NumberStyle::Blast => blast_bit_score(bit_score),
        NumberStyle::Fixed => format!("{:.*}", config.bit_score_decimals, bit_score),
    }
}

/// Write one hit as a single tabular line.
pub fn write_hit<W: Write>(writer: &mut W, hit: &Hit, config: &OutputConfig) -> io::Result<()> {
    let columns = [
        hit.query.clone(),
        hit.target.clone(),
        format!("{:.*}", config.identity_decimals, hit.identity),
        hit.length.to_string(),
        hit.mismatch.to_string(),
        hit.gapopen.to_string(),
        hit.q_start.to_string(),
        hit.q_end.to_string(),
        hit.t_start.to_string(),
        hit.t_end.to_string(),
        format_evalue(hit.e_value, config.style),
        format_bit_score(hit.bit_score, config),
    ];
    let delim = config.delimiter.to_string();
    writeln!(writer, "{}", columns.join(delim.as_str()))
}

/// Write the comment header block
///
/// ```text
/// # CRBH 0.1.0
/// # Query: contigs.fa
/// # Target: proteome.fa
/// # Reciprocal hits
/// # Fields: qseqid, sseqid, pident, length, mismatch, gapopen, qstart, qend, sstart, send, evalue, bitscore
/// # 42 hits found
/// ```
pub fn write_header<W: Write>(
    writer: &mut W,
    context: &ReportContext,
    title: &str,
    num_hits: usize,
) -> io::Result<()> {
    let program = context.program.to_uppercase();
    match &context.version {
        Some(version) => writeln!(writer, "# {program} {version}")?,
        None => writeln!(writer, "# {program}")?,
    }
    for (label, name) in [("Query", &context.query_name), ("Target", &context.target_name)] {
        if let Some(name) = name {
            writeln!(writer, "# {label}: {name}")?;
        }
    }
    writeln!(writer, "# {title}")?;
    if num_hits > 0 {
        writeln!(writer, "# Fields: {}", TABULAR_COLUMNS.join(", "))?;
    }
    writeln!(writer, "# {num_hits} hits found")
}

/// Write every hit of `table`, ids in table order, hits in list order.
pub fn write_table<W: Write>(
    writer: &mut W,
    table: &HitTable,
    config: &OutputConfig,
    context: &ReportContext,
    title: &str,
) -> io::Result<()> {
    if config.include_header {
        write_header(writer, context, title, table.num_hits())?;
    }
    for (_, hits) in table.iter() {
        for hit in hits {
            write_hit(writer, hit, config)?;
        }
    }
    Ok(())
}

/// Write the reciprocal set.
pub fn write_reciprocals<W: Write>(
    writer: &mut W,
    reciprocals: &HitTable,
    config: &OutputConfig,
    context: &ReportContext,
) -> io::Result<()> {
    write_table(writer, reciprocals, config, context, "Reciprocal hits")
}

/// Write candidates that were not promoted.
pub fn write_missed<W: Write>(
    writer: &mut W,
    missed: &HitTable,
    config: &OutputConfig,
    context: &ReportContext,
) -> io::Result<()> {
    write_table(writer, missed, config, context, "Unpromoted candidates")
}
