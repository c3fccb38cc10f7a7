//! Conditional rescue of non-strict reciprocal hits
//!
//! A candidate from the missed set is promoted when its transformed e-value
//! reaches the curve value fitted for its alignment length, i.e. when it is at
//! least as significant as confirmed orthologs of similar length. Candidates
//! whose length has no curve entry are left alone.

use crate::index::{MissedSet, ReciprocalSet};
use crate::stats::curve::SignificanceCurve;

/// Promote qualifying candidates from `missed` into `reciprocals`.
///
/// Hits are only ever appended; a candidate whose `(query, target)` pair is
/// already present for its id is skipped. Returns the number promoted.
pub fn find_secondaries(missed: &MissedSet, curve: &SignificanceCurve, reciprocals: &mut ReciprocalSet) -> usize {
    let mut promoted = 0;

    for (id, candidates) in missed.iter() {
        for hit in candidates {
            let Some(expected) = curve.get(hit.length) else {
                continue;
            };
            let significance = hit.transformed_evalue();
            if significance < expected {
                continue;
            }
            if reciprocals.contains_pair(id, hit) {
                continue;
            }
            log::trace!(
                "rescued {} -> {} (length {}, -log10(e) {:.2} >= {:.2})",
                id,
                hit.target,
                hit.length,
                significance,
                expected
            );
            reciprocals.push(id, hit.clone());
            promoted += 1;
        }
    }

    log::debug!("rescue pass: {} candidates promoted", promoted);
    promoted
}
