//! Per-direction grouping of tabular hits
//!
//! A [`DirectionalHitIndex`] holds the hits of one search direction keyed by
//! the originating query id. Within each group the hits keep the order the
//! search backend wrote them in, and that order *is* the rank: position 0 is
//! the backend's best hit for that query. Nothing here re-sorts.
//!
//! Search backends conforming to the BLAST tabular convention sort subjects by
//! best e-value, so the rank-0 hit of a group always carries the group's best
//! e-value. [`DirectionalHitIndex::rank_order_violations`] checks that
//! guarantee so a mis-sorted stream is reported instead of silently producing
//! wrong reciprocal hits.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::common::{evalue_comp, Hit};
use crate::error::{CrbhError, Result};

/// Ordered mapping from sequence id to a list of hits.
///
/// Ids iterate in first-insertion order so every run over the same input
/// visits ids identically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitTable {
    order: Vec<String>,
    hits: FxHashMap<String, Vec<Hit>>,
}

/// Hits confirmed as orthologous, keyed by source id.
pub type ReciprocalSet = HitTable;

/// Rescue candidates, keyed by source id.
pub type MissedSet = HitTable;

impl HitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `hit` to the list for `id`, creating the list if needed.
    pub fn push(&mut self, id: &str, hit: Hit) {
        match self.hits.get_mut(id) {
            Some(list) => list.push(hit),
            None => {
                self.order.push(id.to_string());
                self.hits.insert(id.to_string(), vec![hit]);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&[Hit]> {
        self.hits.get(id).map(|v| v.as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.hits.contains_key(id)
    }

    /// True when the list for `id` already holds a hit with the same
    /// `(query, target)` pair as `hit`.
    pub fn contains_pair(&self, id: &str, hit: &Hit) -> bool {
        self.hits
            .get(id)
            .map_or(false, |list| list.iter().any(|existing| existing.same_pair(hit)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Hit])> + '_ {
        self.order
            .iter()
            .map(move |id| (id.as_str(), self.hits[id].as_slice()))
    }

    /// Number of ids with at least one hit.
    pub fn num_ids(&self) -> usize {
        self.order.len()
    }

    /// Total hits across all ids.
    pub fn num_hits(&self) -> usize {
        self.hits.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Hits of one search direction grouped by source (query) id, in backend
/// rank order.
#[derive(Debug, Clone, Default)]
pub struct DirectionalHitIndex {
    table: HitTable,
    source_name: String,
}

impl DirectionalHitIndex {
    /// Group `records` by their `query` field, preserving input order within
    /// each group. Duplicates are kept.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Hit>,
    {
        let mut table = HitTable::new();
        for hit in records {
            let id = hit.query.clone();
            table.push(&id, hit);
        }
        DirectionalHitIndex {
            table,
            source_name: String::from("<records>"),
        }
    }

    /// Parse a tabular stream and index it.
    ///
    /// Blank lines and `#` comment lines (outfmt 7 headers) are skipped. The
    /// first malformed line, including one that is not valid UTF-8, aborts
    /// with a [`CrbhError::Parse`] naming `source_name` and the 1-based line
    /// number. Read failures stay [`CrbhError::Io`].
    pub fn from_reader<R: BufRead>(reader: R, source_name: &str) -> Result<Self> {
        let mut table = HitTable::new();
        for (idx, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let line = std::str::from_utf8(&line)
                .map_err(|e| CrbhError::parse(source_name, idx + 1, format!("line is not valid UTF-8: {e}")))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let hit = Hit::parse_line(trimmed)
                .map_err(|reason| CrbhError::parse(source_name, idx + 1, reason))?;
            let id = hit.query.clone();
            table.push(&id, hit);
        }
        Ok(DirectionalHitIndex {
            table,
            source_name: source_name.to_string(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Hits for `id` in rank order.
    pub fn hits_for(&self, id: &str) -> Option<&[Hit]> {
        self.table.get(id)
    }

    /// Rank-0 hit for `id`.
    pub fn best_hit(&self, id: &str) -> Option<&Hit> {
        self.table.get(id).and_then(|hits| hits.first())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.table.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Hit])> + '_ {
        self.table.iter()
    }

    pub fn num_sources(&self) -> usize {
        self.table.num_ids()
    }

    pub fn num_hits(&self) -> usize {
        self.table.num_hits()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Number of source ids whose rank-0 hit does not carry the best e-value
    /// in its group.
    pub fn rank_order_violations(&self) -> usize {
        self.table
            .iter()
            .filter(|(_, hits)| {
                let first = hits[0].e_value;
                hits[1..]
                    .iter()
                    .any(|h| evalue_comp(h.e_value, first) == Ordering::Less)
            })
            .count()
    }
}
