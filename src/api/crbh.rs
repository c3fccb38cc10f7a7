//! Conditional reciprocal best hit pipeline
//!
//! Stages run in a fixed order, each consuming what the previous one returned:
//!
//! 1. `load` - fetch both directional hit streams and index them
//! 2. `find_reciprocals` - strict reciprocal best hits and rescue candidates
//! 3. `find_secondaries` - fit the significance curve and promote candidates
//!
//! [`Crbh`] exposes the stages one by one and refuses to run a stage before
//! its inputs exist. [`match_indexes`] runs stages 2-3 over indexes the caller
//! already holds. Neither keeps any state outside the value it returns, so
//! separate runs can proceed on separate threads.

use std::time::Instant;

use crate::algorithm::{find_reciprocals, find_secondaries, StrictMatches};
use crate::error::{CrbhError, Result};
use crate::index::{DirectionalHitIndex, HitTable, MissedSet, ReciprocalSet};
use crate::search::{Direction, SearchBackend};
use crate::stats::curve::SignificanceCurve;

/// Counts reported after a full run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub forward_hits: usize,
    pub reverse_hits: usize,
    pub strict: usize,
    pub rescued: usize,
    /// Candidate entries in the missed set, duplicates included.
    pub missed_entries: usize,
    /// Query ids with at least one reciprocal hit.
    pub reciprocal_ids: usize,
}

/// Output of the matching stages over a pair of indexes.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub reciprocals: ReciprocalSet,
    pub missed: MissedSet,
    pub curve: SignificanceCurve,
    pub strict: usize,
    pub rescued: usize,
}

impl MatchOutcome {
    pub fn has_reciprocal(&self, id: &str) -> bool {
        self.reciprocals.contains(id)
    }
}

/// Run the strict pass, fit the curve and rescue, without a backend.
pub fn match_indexes(forward: &DirectionalHitIndex, reverse: &DirectionalHitIndex) -> MatchOutcome {
    let StrictMatches {
        mut reciprocals,
        missed,
        points,
        longest,
        count,
    } = find_reciprocals(forward, reverse);
    let curve = SignificanceCurve::build(&points, longest);
    let rescued = find_secondaries(&missed, &curve, &mut reciprocals);
    MatchOutcome {
        reciprocals,
        missed,
        curve,
        strict: count,
        rescued,
    }
}

/// Candidates whose `(query, target)` pair did not end up reciprocal.
pub fn residual_missed(missed: &MissedSet, reciprocals: &ReciprocalSet) -> MissedSet {
    let mut residual = HitTable::new();
    for (id, candidates) in missed.iter() {
        for hit in candidates {
            if !reciprocals.contains_pair(id, hit) {
                residual.push(id, hit.clone());
            }
        }
    }
    residual
}

/// Unwrap a backend error, keeping typed pipeline errors raised inside a backend.
fn backend_error(err: anyhow::Error) -> CrbhError {
    match err.downcast::<CrbhError>() {
        Ok(err) => err,
        Err(err) => CrbhError::Backend(err),
    }
}

fn fetch_index<B: SearchBackend>(backend: &B, direction: Direction) -> Result<DirectionalHitIndex> {
    let start = Instant::now();
    let stream = backend.search(direction).map_err(backend_error)?;
    let index = DirectionalHitIndex::from_reader(stream, &backend.stream_name(direction))?;
    log::info!(
        "Loaded {} {} hits for {} sequences in {:.2?}",
        index.num_hits(),
        direction,
        index.num_sources(),
        start.elapsed()
    );
    let violations = index.rank_order_violations();
    if violations > 0 {
        log::warn!(
            "{} of {} {} query groups do not list their best e-value first; rank 0 is taken as the best hit regardless",
            violations,
            index.num_sources(),
            direction
        );
    }
    Ok(index)
}

/// Stepwise CRBH run over one search backend.
pub struct Crbh<B: SearchBackend> {
    backend: B,
    indexes: Option<(DirectionalHitIndex, DirectionalHitIndex)>,
    matches: Option<StrictMatches>,
    curve: Option<SignificanceCurve>,
    rescued: Option<usize>,
}

impl<B: SearchBackend> Crbh<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            indexes: None,
            matches: None,
            curve: None,
            rescued: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Fetch and index both directions concurrently.
    ///
    /// Returns `(forward_hits, reverse_hits)`. Any previous results are
    /// discarded, also when loading fails.
    pub fn load(&mut self) -> Result<(usize, usize)> {
        self.indexes = None;
        self.matches = None;
        self.curve = None;
        self.rescued = None;

        let backend = &self.backend;
        let (forward, reverse) = rayon::join(
            || fetch_index(backend, Direction::Forward),
            || fetch_index(backend, Direction::Reverse),
        );
        let (forward, reverse) = (forward?, reverse?);
        let counts = (forward.num_hits(), reverse.num_hits());
        self.indexes = Some((forward, reverse));
        Ok(counts)
    }

    /// Strict reciprocal pass. Returns the number of strict hits.
    pub fn find_reciprocals(&mut self) -> Result<usize> {
        let (forward, reverse) = self
            .indexes
            .as_ref()
            .ok_or_else(|| CrbhError::state("hit streams must be loaded before finding reciprocals"))?;

        let start = Instant::now();
        let matches = find_reciprocals(forward, reverse);
        let count = matches.count;
        log::info!(
            "Found {} strict reciprocal hits ({} candidates) in {:.2?}",
            count,
            matches.missed.num_hits(),
            start.elapsed()
        );

        self.matches = Some(matches);
        self.curve = None;
        self.rescued = None;
        Ok(count)
    }

    /// Fit the significance curve and rescue candidates. Returns the number
    /// of hits promoted by this call.
    pub fn find_secondaries(&mut self) -> Result<usize> {
        let matches = self
            .matches
            .as_mut()
            .ok_or_else(|| CrbhError::state("reciprocals must be found before adding secondaries"))?;

        let start = Instant::now();
        let curve = SignificanceCurve::build(&matches.points, matches.longest);
        let rescued = find_secondaries(&matches.missed, &curve, &mut matches.reciprocals);
        log::info!(
            "Rescued {} secondary hits using {} fitted lengths in {:.2?}",
            rescued,
            curve.len(),
            start.elapsed()
        );

        self.curve = Some(curve);
        self.rescued = Some(self.rescued.unwrap_or(0) + rescued);
        Ok(rescued)
    }

    /// Run every stage.
    pub fn run(&mut self) -> Result<RunSummary> {
        let (forward_hits, reverse_hits) = self.load()?;
        let strict = self.find_reciprocals()?;
        let rescued = self.find_secondaries()?;
        Ok(RunSummary {
            forward_hits,
            reverse_hits,
            strict,
            rescued,
            missed_entries: self.missed().map_or(0, |m| m.num_hits()),
            reciprocal_ids: self.reciprocals().map_or(0, |r| r.num_ids()),
        })
    }

    /// True when `id` has at least one reciprocal hit so far.
    pub fn has_reciprocal(&self, id: &str) -> bool {
        self.reciprocals().map_or(false, |r| r.contains(id))
    }

    pub fn reciprocals(&self) -> Option<&ReciprocalSet> {
        self.matches.as_ref().map(|m| &m.reciprocals)
    }

    /// Every rescue candidate from the strict pass, promoted or not.
    pub fn missed(&self) -> Option<&MissedSet> {
        self.matches.as_ref().map(|m| &m.missed)
    }

    /// Candidates that are not reciprocal after rescue.
    pub fn residual_missed(&self) -> Option<MissedSet> {
        self.matches
            .as_ref()
            .map(|m| residual_missed(&m.missed, &m.reciprocals))
    }

    pub fn curve(&self) -> Option<&SignificanceCurve> {
        self.curve.as_ref()
    }

    pub fn strict_count(&self) -> Option<usize> {
        self.matches.as_ref().map(|m| m.count)
    }

    pub fn rescued_count(&self) -> Option<usize> {
        self.rescued
    }

    pub fn forward_index(&self) -> Option<&DirectionalHitIndex> {
        self.indexes.as_ref().map(|(f, _)| f)
    }

    pub fn reverse_index(&self) -> Option<&DirectionalHitIndex> {
        self.indexes.as_ref().map(|(_, r)| r)
    }
}
