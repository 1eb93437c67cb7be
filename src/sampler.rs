use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::catalog::TrackRecord;
use crate::filter::ConstraintSet;

/// Draws before giving up on finding an unused track in a pool.
pub const MAX_ATTEMPTS: usize = 10;

/// No unused track satisfied the constraints within the attempt budget.
/// Recoverable: slot filling skips the slot, duration repair falls back or stops.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("no unused track satisfies: {constraints}")]
pub struct ExhaustedCandidates {
    /// The constraint set that could not be satisfied without reusing a title.
    pub constraints: ConstraintSet,
}

/// Draw one track uniformly at random from `pool`, rejecting any whose title
/// is already in `chosen_titles`.
///
/// Rejected draws are retried from the full pool, so an already-used title can
/// recur; after [`MAX_ATTEMPTS`] draws (or on an empty pool) the sampler gives
/// up and reports the constraints it was working under. Pools are expected to
/// be well larger than the number of used titles they overlap.
pub fn sample_unique<'a, R: Rng>(
    rng: &mut R,
    pool: &[&'a TrackRecord],
    chosen_titles: &HashSet<String>,
    constraints: &ConstraintSet,
) -> Result<&'a TrackRecord, ExhaustedCandidates> {
    for _ in 0..MAX_ATTEMPTS {
        let Some(&candidate) = pool.choose(rng) else {
            break; // empty pool, no draw will ever qualify
        };
        if !chosen_titles.contains(&candidate.title) {
            return Ok(candidate);
        }
    }
    Err(ExhaustedCandidates {
        constraints: constraints.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Purpose;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn make_track(title: &str) -> TrackRecord {
        TrackRecord {
            title: title.to_string(),
            purpose: Purpose::Moderate,
            year: 2025,
            length_secs: 300,
            descend_to_floor: false,
            ascend_to_stand: false,
        }
    }

    #[test]
    fn test_samples_from_pool() {
        let tracks: Vec<TrackRecord> = (0..5).map(|i| make_track(&format!("T{i}"))).collect();
        let pool: Vec<&TrackRecord> = tracks.iter().collect();
        let chosen = HashSet::new();
        let constraints = ConstraintSet::purpose(Purpose::Moderate);

        let mut rng = StdRng::seed_from_u64(1);
        let track = sample_unique(&mut rng, &pool, &chosen, &constraints).unwrap();
        assert!(tracks.iter().any(|t| t.title == track.title));
    }

    #[test]
    fn test_never_returns_a_used_title() {
        let tracks: Vec<TrackRecord> = (0..4).map(|i| make_track(&format!("T{i}"))).collect();
        let pool: Vec<&TrackRecord> = tracks.iter().collect();
        let mut chosen = HashSet::new();
        chosen.insert("T0".to_string());
        chosen.insert("T2".to_string());
        let constraints = ConstraintSet::purpose(Purpose::Moderate);

        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Ok(track) = sample_unique(&mut rng, &pool, &chosen, &constraints) {
                assert!(!chosen.contains(&track.title), "seed {seed} reused {}", track.title);
            }
        }
    }

    #[test]
    fn test_empty_pool_is_exhausted() {
        let chosen = HashSet::new();
        let constraints = ConstraintSet::purpose(Purpose::High);
        let mut rng = StdRng::seed_from_u64(1);

        let err = sample_unique(&mut rng, &[], &chosen, &constraints).unwrap_err();
        assert_eq!(err.constraints, constraints);
        assert!(err.to_string().contains("purpose = H"));
    }

    #[test]
    fn test_fully_used_pool_is_exhausted() {
        let tracks: Vec<TrackRecord> = (0..3).map(|i| make_track(&format!("T{i}"))).collect();
        let pool: Vec<&TrackRecord> = tracks.iter().collect();
        let chosen: HashSet<String> = tracks.iter().map(|t| t.title.clone()).collect();
        let constraints = ConstraintSet::purpose(Purpose::Moderate);

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(sample_unique(&mut rng, &pool, &chosen, &constraints).is_err());
        }
    }
}
