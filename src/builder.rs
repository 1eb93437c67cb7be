use std::collections::HashSet;

use rand::Rng;

use crate::balance::{self, SetlistLimits};
use crate::catalog::{Catalog, TrackRecord};
use crate::filter::{ConstraintSet, Field, Op, Value};
use crate::plan::{SetPlan, SlotSpec};
use crate::sampler;

/// Working state for one build: the chosen sequence plus the title set
/// backing the uniqueness guarantee. Created at build start, discarded once
/// the final sequence is returned.
#[derive(Default)]
pub struct BuildState<'a> {
    tracks: Vec<&'a TrackRecord>,
    titles: HashSet<String>,
}

impl<'a> BuildState<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track and mark its title as used.
    pub fn push(&mut self, track: &'a TrackRecord) {
        self.titles.insert(track.title.clone());
        self.tracks.push(track);
    }

    /// Insert a track at `index` and mark its title as used.
    pub fn insert(&mut self, index: usize, track: &'a TrackRecord) {
        self.titles.insert(track.title.clone());
        self.tracks.insert(index, track);
    }

    pub fn tracks(&self) -> &[&'a TrackRecord] {
        &self.tracks
    }

    pub fn titles(&self) -> &HashSet<String> {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn into_tracks(self) -> Vec<&'a TrackRecord> {
        self.tracks
    }
}

/// A finished setlist and how the build went.
pub struct Setlist<'a> {
    pub tracks: Vec<&'a TrackRecord>,
    pub total_secs: u32,
    /// Slots abandoned because no unused track satisfied their constraints.
    pub skipped_slots: usize,
    /// Whether the minimum running time was reached.
    pub met_target: bool,
}

/// Build one setlist: plan the slots, fill them in index order, repair the
/// running time, cap the length.
///
/// Slot filling is best-effort. A slot whose constraints cannot be satisfied
/// by an unused track is logged and left unfilled; the build carries on with
/// the remaining slots rather than aborting.
pub fn build<'a, R: Rng>(
    rng: &mut R,
    catalog: &'a Catalog,
    reference_year: i32,
    limits: &SetlistLimits,
) -> Setlist<'a> {
    let plan = SetPlan::cardio_sculpt(rng);
    let mut state = BuildState::new();
    let mut skipped_slots = 0usize;

    for slot in plan.slots() {
        let constraints = slot_constraints(slot, reference_year);
        let pool = constraints.filter(&catalog.tracks);
        match sampler::sample_unique(rng, &pool, state.titles(), &constraints) {
            Ok(track) => state.push(track),
            Err(e) => {
                log::warn!("slot {} left unfilled: {e}", slot.index);
                skipped_slots += 1;
            }
        }
    }

    let filled: u32 = state.tracks().iter().map(|t| t.length_secs).sum();
    let mut total_secs = balance::repair(rng, catalog, &mut state, filled, limits);

    let mut tracks = state.into_tracks();
    if tracks.len() > limits.max_tracks {
        total_secs = balance::truncate(&mut tracks, limits.max_tracks);
    }

    Setlist {
        tracks,
        total_secs,
        skipped_slots,
        met_target: total_secs >= limits.min_total_secs,
    }
}

/// Constraints for one slot: required purpose, plus the recency cutoff when
/// the slot's rule has one.
fn slot_constraints(slot: &SlotSpec, reference_year: i32) -> ConstraintSet {
    let mut constraints = ConstraintSet::purpose(slot.purpose);
    if let Some(cutoff) = slot.recency.cutoff_year(reference_year) {
        constraints = constraints.with(Field::Year, Op::Ge, Value::Int(i64::from(cutoff)));
    }
    constraints
}
