use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::Purpose;

/// Number of slots in a set before any duration repair.
pub const SLOT_COUNT: usize = 15;
/// How many slot indices per build may use an older track.
pub const RELAXED_ELIGIBLE: usize = 3;
/// Strict recency admits tracks released this year or last.
pub const STRICT_WINDOW_YEARS: i32 = 1;
/// Relaxed recency admits tracks up to nine years old.
pub const RELAXED_WINDOW_YEARS: i32 = 9;

/// How old a slot's track may be.
///
/// The catalogue is sparser for older tracks, so forcing strict recency on
/// every slot makes many builds infeasible. Each build gets a bounded number
/// of relaxed slots as escape valves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyRule {
    Strict,
    Relaxed,
    Unrestricted,
}

impl RecencyRule {
    /// Oldest admissible release year under this rule, or None when any
    /// age qualifies.
    pub fn cutoff_year(self, reference_year: i32) -> Option<i32> {
        match self {
            Self::Strict => Some(reference_year - STRICT_WINDOW_YEARS),
            Self::Relaxed => Some(reference_year - RELAXED_WINDOW_YEARS),
            Self::Unrestricted => None,
        }
    }
}

/// One position in the set: which purpose it needs and how old its track may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub index: usize,
    pub purpose: Purpose,
    pub recency: RecencyRule,
}

/// The full slot plan for one build, computed up front and immutable after.
/// Both random choices (strength-block order, relaxed indices) are made here
/// so the rest of the build can be driven from an inspectable value.
#[derive(Debug, Clone)]
pub struct SetPlan {
    slots: Vec<SlotSpec>,
}

impl SetPlan {
    /// Build the Cardio Sculpt slot plan.
    ///
    /// Purpose sequence by position: OI, LM, M, MH, H, H, MH, M, M, LM,
    /// then the three strength blocks in random order, one more strength
    /// pick (any of the family, including OPT), and SAE to close.
    ///
    /// Recency: 3 of the 15 indices are drawn as relaxed-eligible; exactly
    /// one of those three is fully unrestricted, the other two allow tracks
    /// up to nine years old. Every other slot is strict.
    pub fn cardio_sculpt<R: Rng>(rng: &mut R) -> Self {
        let mut purposes = Vec::with_capacity(SLOT_COUNT);
        purposes.extend([
            Purpose::OpeningIntensity,
            Purpose::LowerModerate,
            Purpose::Moderate,
            Purpose::ModerateHigh,
            Purpose::High,
            Purpose::High,
            Purpose::ModerateHigh,
            Purpose::Moderate,
            Purpose::Moderate,
            Purpose::LowerModerate,
        ]);

        let mut strength = Purpose::STRENGTH_BLOCK;
        strength.shuffle(rng);
        purposes.extend(strength);

        purposes.push(Purpose::STRENGTH_FAMILY[rng.gen_range(0..Purpose::STRENGTH_FAMILY.len())]);
        purposes.push(Purpose::StretchAndEnd);
        debug_assert_eq!(purposes.len(), SLOT_COUNT);

        let relaxed = rand::seq::index::sample(rng, SLOT_COUNT, RELAXED_ELIGIBLE).into_vec();
        let unrestricted = relaxed[rng.gen_range(0..relaxed.len())];

        let slots = purposes
            .into_iter()
            .enumerate()
            .map(|(index, purpose)| {
                let recency = if index == unrestricted {
                    RecencyRule::Unrestricted
                } else if relaxed.contains(&index) {
                    RecencyRule::Relaxed
                } else {
                    RecencyRule::Strict
                };
                SlotSpec { index, purpose, recency }
            })
            .collect();

        Self { slots }
    }

    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }
}
