use rand::Rng;
use serde::Deserialize;

use crate::builder::BuildState;
use crate::catalog::{Catalog, Purpose, TrackRecord, format_length};
use crate::filter::ConstraintSet;
use crate::sampler;

/// Duration window and size caps for a finished setlist.
/// Backed by the optional `[setlist]` table in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SetlistLimits {
    /// Minimum total running time in seconds.
    pub min_total_secs: u32,
    /// Hard cap on entry count, including repair insertions.
    pub max_tracks: usize,
    /// Where an extra Moderate track lands during duration repair.
    pub moderate_insert_index: usize,
}

impl Default for SetlistLimits {
    fn default() -> Self {
        Self {
            min_total_secs: 31200,
            max_tracks: 16,
            moderate_insert_index: 7,
        }
    }
}

/// Insert tracks until the sequence reaches the minimum running time or the
/// entry cap, and return the new total.
///
/// Each round prefers one more unique Moderate track at the configured anchor
/// (clamped to the current length). When the Moderate pool is out of unused
/// tracks, a strength-family purpose is drawn at random and its track goes
/// immediately before the closing entry. When neither pool can supply a
/// track the loop stops early and the shortfall is logged; the sequence is
/// still usable.
pub fn repair<'a, R: Rng>(
    rng: &mut R,
    catalog: &'a Catalog,
    state: &mut BuildState<'a>,
    mut total_secs: u32,
    limits: &SetlistLimits,
) -> u32 {
    while total_secs < limits.min_total_secs && state.len() < limits.max_tracks {
        let moderate = ConstraintSet::purpose(Purpose::Moderate);
        let pool = moderate.filter(&catalog.tracks);
        match sampler::sample_unique(rng, &pool, state.titles(), &moderate) {
            Ok(track) => {
                let at = limits.moderate_insert_index.min(state.len());
                state.insert(at, track);
                total_secs += track.length_secs;
                log::debug!("repair: inserted {:?} at {at}", track.title);
            }
            Err(_) => {
                let family = Purpose::STRENGTH_FAMILY;
                let purpose = family[rng.gen_range(0..family.len())];
                let constraints = ConstraintSet::purpose(purpose);
                let pool = constraints.filter(&catalog.tracks);
                match sampler::sample_unique(rng, &pool, state.titles(), &constraints) {
                    Ok(track) => {
                        // Keep the closer last.
                        let at = state.len().saturating_sub(1);
                        state.insert(at, track);
                        total_secs += track.length_secs;
                        log::debug!("repair: inserted {:?} at {at}", track.title);
                    }
                    Err(e) => {
                        log::warn!(
                            "duration repair stopped at {} with {} tracks: {e}",
                            format_length(total_secs),
                            state.len()
                        );
                        break;
                    }
                }
            }
        }
    }
    total_secs
}

/// Cap the sequence at `max_tracks`, keeping the head, and recompute the
/// total from the survivors. Repair insertions may have pushed the closing
/// entry past the boundary; it is not protected.
pub fn truncate(tracks: &mut Vec<&TrackRecord>, max_tracks: usize) -> u32 {
    tracks.truncate(max_tracks);
    tracks.iter().map(|t| t.length_secs).sum()
}
