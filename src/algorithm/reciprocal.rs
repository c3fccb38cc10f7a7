//! Strict reciprocal best hit detection
//!
//! A query `q` and target `t` are a strict reciprocal best hit when the
//! forward rank-0 hit of `q` is `t` and the reverse rank-0 hit of `t` is `q`.
//! Every other forward hit whose target points back at `q` anywhere in its
//! reverse list is kept as a rescue candidate.

use crate::common::Hit;
use crate::index::{DirectionalHitIndex, MissedSet, ReciprocalSet};
use crate::stats::curve::EvaluePoint;

/// Everything the strict pass produces, handed on to the curve builder and
/// the rescue pass.
#[derive(Debug, Clone, Default)]
pub struct StrictMatches {
    pub reciprocals: ReciprocalSet,
    pub missed: MissedSet,
    /// `(length, transformed e-value)` of each strict hit.
    pub points: Vec<EvaluePoint>,
    /// Longest alignment among strict hits, 0 when there are none.
    pub longest: usize,
    /// Number of strict hits found.
    pub count: usize,
}

impl StrictMatches {
    fn record_strict(&mut self, query_id: &str, hit: &Hit) {
        self.points.push(EvaluePoint {
            length: hit.length,
            significance: hit.transformed_evalue(),
        });
        self.longest = self.longest.max(hit.length);
        self.count += 1;
        self.reciprocals.push(query_id, hit.clone());
    }
}

/// Match `forward` (A searched against B) with `reverse` (B searched against A).
///
/// A forward hit is added to the missed set once for every reverse hit that
/// points back at its query other than the strict rank-0/rank-0 case, so the
/// same hit can appear there several times. The rescue pass deduplicates.
///
/// Query ids with no forward target present in `reverse` produce no entry in
/// either set.
pub fn find_reciprocals(forward: &DirectionalHitIndex, reverse: &DirectionalHitIndex) -> StrictMatches {
    let mut matches = StrictMatches::default();

    for (query_id, hits) in forward.iter() {
        for (query_index, target_hit) in hits.iter().enumerate() {
            let Some(back_hits) = reverse.hits_for(&target_hit.target) else {
                continue;
            };
            for (target_index, back_hit) in back_hits.iter().enumerate() {
                if back_hit.target != query_id {
                    continue;
                }
                if query_index == 0 && target_index == 0 {
                    log::trace!("strict reciprocal: {} <-> {}", query_id, target_hit.target);
                    matches.record_strict(query_id, target_hit);
                } else {
                    matches.missed.push(query_id, target_hit.clone());
                }
            }
        }
    }

    log::debug!(
        "strict pass: {} reciprocal hits, {} candidate entries over {} ids, longest strict alignment {}",
        matches.count,
        matches.missed.num_hits(),
        matches.missed.num_ids(),
        matches.longest
    );

    matches
}
