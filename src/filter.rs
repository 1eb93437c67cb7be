use std::fmt;

use crate::catalog::{Purpose, TrackRecord};

/// A constrainable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Purpose,
    Year,
    Length,
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Purpose => "purpose",
            Self::Year => "year",
            Self::Length => "length",
        }
    }
}

/// Comparison operator. Equality is the default when building constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    fn compare(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
        }
    }
}

/// A constraint's right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Purpose(Purpose),
    Int(i64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "{t:?}"),
            Self::Purpose(p) => write!(f, "{p}"),
            Self::Int(v) => write!(f, "{v}"),
        }
    }
}

/// One field constraint: `field op value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub field: Field,
    pub op: Op,
    pub value: Value,
}

impl Constraint {
    /// Whether the track satisfies this constraint.
    ///
    /// Ordered operators apply only to scalar fields; applying one to
    /// title or purpose is a programming error and panics.
    fn matches(&self, track: &TrackRecord) -> bool {
        match (self.field, &self.value) {
            (Field::Purpose, Value::Purpose(purpose)) => match self.op {
                Op::Eq => track.purpose == *purpose,
                Op::Ne => track.purpose != *purpose,
                op => panic!("ordered operator {} on purpose field", op.symbol()),
            },
            (Field::Title, Value::Text(title)) => match self.op {
                Op::Eq => track.title == *title,
                Op::Ne => track.title != *title,
                op => panic!("ordered operator {} on title field", op.symbol()),
            },
            (Field::Year, Value::Int(year)) => self.op.compare(i64::from(track.year), *year),
            (Field::Length, Value::Int(secs)) => {
                self.op.compare(i64::from(track.length_secs), *secs)
            }
            (field, value) => panic!("value {value} does not apply to field {}", field.name()),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field.name(), self.op.symbol(), self.value)
    }
}

/// A conjunction of field constraints, evaluated against catalogue records.
/// Transient — built per query, no state beyond the constraints themselves.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most common query: exact purpose match.
    pub fn purpose(purpose: Purpose) -> Self {
        Self::new().with(Field::Purpose, Op::Eq, Value::Purpose(purpose))
    }

    /// Add a constraint.
    pub fn with(mut self, field: Field, op: Op, value: Value) -> Self {
        self.constraints.push(Constraint { field, op, value });
        self
    }

    /// Whether the track satisfies every constraint.
    pub fn matches(&self, track: &TrackRecord) -> bool {
        self.constraints.iter().all(|c| c.matches(track))
    }

    /// Pure filter: the subset of `tracks` satisfying every constraint.
    pub fn filter<'a>(&self, tracks: &'a [TrackRecord]) -> Vec<&'a TrackRecord> {
        tracks.iter().filter(|t| self.matches(t)).collect()
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            return f.write_str("unconstrained");
        }
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{constraint}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_track(title: &str, purpose: Purpose, year: i32, length_secs: u32) -> TrackRecord {
        TrackRecord {
            title: title.to_string(),
            purpose,
            year,
            length_secs,
            descend_to_floor: false,
            ascend_to_stand: false,
        }
    }

    fn sample_tracks() -> Vec<TrackRecord> {
        vec![
            make_track("Ignition", Purpose::OpeningIntensity, 2025, 250),
            make_track("Steady On", Purpose::Moderate, 2024, 300),
            make_track("Deep Cut", Purpose::Moderate, 2017, 280),
            make_track("Vintage Burn", Purpose::Moderate, 0, 320),
            make_track("Core Four", Purpose::StrengthAbs, 2025, 200),
        ]
    }

    #[test]
    fn test_purpose_equality() {
        let tracks = sample_tracks();
        let moderates = ConstraintSet::purpose(Purpose::Moderate).filter(&tracks);
        assert_eq!(moderates.len(), 3);
        assert!(moderates.iter().all(|t| t.purpose == Purpose::Moderate));
    }

    #[test]
    fn test_conjunction() {
        let tracks = sample_tracks();
        let recent_moderates = ConstraintSet::purpose(Purpose::Moderate)
            .with(Field::Year, Op::Ge, Value::Int(2024))
            .filter(&tracks);
        assert_eq!(recent_moderates.len(), 1);
        assert_eq!(recent_moderates[0].title, "Steady On");
    }

    #[test]
    fn test_ordered_operators_on_year() {
        let tracks = sample_tracks();
        let set = |op| {
            ConstraintSet::new()
                .with(Field::Year, op, Value::Int(2024))
                .filter(&tracks)
                .len()
        };
        assert_eq!(set(Op::Gt), 2);
        assert_eq!(set(Op::Ge), 3);
        assert_eq!(set(Op::Lt), 2); // includes the unknown-year sentinel
        assert_eq!(set(Op::Le), 3);
        assert_eq!(set(Op::Ne), 4);
        assert_eq!(set(Op::Eq), 1);
    }

    #[test]
    fn test_length_constraint() {
        let tracks = sample_tracks();
        let long = ConstraintSet::new()
            .with(Field::Length, Op::Gt, Value::Int(290))
            .filter(&tracks);
        assert_eq!(long.len(), 2);
    }

    #[test]
    fn test_title_exclusion() {
        let tracks = sample_tracks();
        let rest = ConstraintSet::new()
            .with(Field::Title, Op::Ne, Value::Text("Ignition".into()))
            .filter(&tracks);
        assert_eq!(rest.len(), 4);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let tracks = sample_tracks();
        let set = ConstraintSet::purpose(Purpose::Moderate)
            .with(Field::Year, Op::Ge, Value::Int(2017));
        let once: Vec<String> = set.filter(&tracks).iter().map(|t| t.title.clone()).collect();
        let twice: Vec<String> = set.filter(&tracks).iter().map(|t| t.title.clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_set_matches_everything() {
        let tracks = sample_tracks();
        assert_eq!(ConstraintSet::new().filter(&tracks).len(), tracks.len());
    }

    #[test]
    fn test_display() {
        let set = ConstraintSet::purpose(Purpose::Moderate)
            .with(Field::Year, Op::Ge, Value::Int(2024));
        assert_eq!(set.to_string(), "purpose = M, year >= 2024");
        assert_eq!(ConstraintSet::new().to_string(), "unconstrained");
    }

    #[test]
    #[should_panic(expected = "ordered operator")]
    fn test_ordered_operator_on_purpose_is_a_bug() {
        let tracks = sample_tracks();
        ConstraintSet::new()
            .with(Field::Purpose, Op::Gt, Value::Purpose(Purpose::Moderate))
            .filter(&tracks);
    }
}
