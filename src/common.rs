use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::CrbhError;
use crate::stats::evalue::transform_evalue;

/// Number of columns in a BLAST tabular (outfmt 6) record.
pub const TABULAR_FIELDS: usize = 12;

/// Column names in the fixed order they appear on a tabular line.
pub const TABULAR_COLUMNS: [&str; TABULAR_FIELDS] = [
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore",
];

/// One alignment between a query sequence and a target sequence, as reported
/// by a pairwise search tool in tabular form.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub query: String,
    pub target: String,
    pub identity: f64,
    pub length: usize,
    pub mismatch: usize,
    pub gapopen: usize,
    pub q_start: usize,
    pub q_end: usize,
    pub t_start: usize,
    pub t_end: usize,
    pub e_value: f64,
    pub bit_score: f64,
}

fn numeric<T: FromStr>(fields: &[&str], idx: usize) -> Result<T, String> {
    fields[idx]
        .parse::<T>()
        .map_err(|_| format!("{} is not a valid number: {:?}", TABULAR_COLUMNS[idx], fields[idx]))
}

impl Hit {
    /// Build a hit from already-split columns.
    ///
    /// Returns the reason as a plain string so the caller can attach the
    /// stream name and line number.
    pub fn from_fields(fields: &[&str]) -> Result<Self, String> {
        if fields.len() != TABULAR_FIELDS {
            return Err(format!(
                "expected {} fields, found {}",
                TABULAR_FIELDS,
                fields.len()
            ));
        }

        let e_value: f64 = numeric(fields, 10)?;
        if !e_value.is_finite() || e_value < 0.0 {
            return Err(format!("evalue must be a finite non-negative number: {:?}", fields[10]));
        }

        Ok(Hit {
            query: fields[0].to_string(),
            target: fields[1].to_string(),
            identity: numeric(fields, 2)?,
            length: numeric(fields, 3)?,
            mismatch: numeric(fields, 4)?,
            gapopen: numeric(fields, 5)?,
            q_start: numeric(fields, 6)?,
            q_end: numeric(fields, 7)?,
            t_start: numeric(fields, 8)?,
            t_end: numeric(fields, 9)?,
            e_value,
            bit_score: numeric(fields, 11)?,
        })
    }

    /// Split a line on tabs/whitespace and parse it.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        Self::from_fields(&fields)
    }

    /// `-log10(e-value)` with the zero floor applied.
    #[inline]
    pub fn transformed_evalue(&self) -> f64 {
        transform_evalue(self.e_value)
    }

    /// True when both hits link the same query to the same target.
    #[inline]
    pub fn same_pair(&self, other: &Hit) -> bool {
        self.query == other.query && self.target == other.target
    }
}

impl FromStr for Hit {
    type Err = CrbhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hit::parse_line(s).map_err(|reason| CrbhError::parse("<record>", 0, reason))
    }
}

/// Compare two e-values, treating both as equal when they are indistinguishable
/// from zero in tabular output (BLAST prints anything below 1e-180 as `0.0`).
#[inline]
pub fn evalue_comp(evalue1: f64, evalue2: f64) -> Ordering {
    const EPSILON: f64 = 1.0e-180;
    if evalue1 < EPSILON && evalue2 < EPSILON {
        Ordering::Equal
    } else if evalue1 < evalue2 {
        Ordering::Less
    } else if evalue1 > evalue2 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
