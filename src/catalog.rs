use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed length {value:?} for track {title:?} (expected MM:SS)")]
    MalformedLength { title: String, value: String },
}

/// Sentinel for tracks with no release year. Sorts older than any real year,
/// so such tracks only qualify for unrestricted slots.
pub const UNKNOWN_YEAR: i32 = 0;

/// Functional role of a track within a set, by catalogue short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "OI")]
    OpeningIntensity,
    #[serde(rename = "LM")]
    LowerModerate,
    #[serde(rename = "M")]
    Moderate,
    #[serde(rename = "MH")]
    ModerateHigh,
    #[serde(rename = "H")]
    High,
    #[serde(rename = "MU")]
    StrengthUpper,
    #[serde(rename = "MA")]
    StrengthAbs,
    #[serde(rename = "MG")]
    StrengthGlutes,
    #[serde(rename = "OPT")]
    Optional,
    #[serde(rename = "SAE")]
    StretchAndEnd,
}

impl Purpose {
    /// The three strength blocks every set carries exactly once.
    pub const STRENGTH_BLOCK: [Purpose; 3] = [
        Purpose::StrengthUpper,
        Purpose::StrengthAbs,
        Purpose::StrengthGlutes,
    ];

    /// Choices for the flexible strength slot and for duration-repair fallback.
    pub const STRENGTH_FAMILY: [Purpose; 4] = [
        Purpose::StrengthUpper,
        Purpose::StrengthAbs,
        Purpose::StrengthGlutes,
        Purpose::Optional,
    ];

    /// Catalogue short code, as stored in the CSV.
    pub fn code(self) -> &'static str {
        match self {
            Self::OpeningIntensity => "OI",
            Self::LowerModerate => "LM",
            Self::Moderate => "M",
            Self::ModerateHigh => "MH",
            Self::High => "H",
            Self::StrengthUpper => "MU",
            Self::StrengthAbs => "MA",
            Self::StrengthGlutes => "MG",
            Self::Optional => "OPT",
            Self::StretchAndEnd => "SAE",
        }
    }

    /// Human-readable label for table output.
    pub fn label(self) -> &'static str {
        match self {
            Self::OpeningIntensity => "opening intensity",
            Self::LowerModerate => "lower moderate",
            Self::Moderate => "moderate",
            Self::ModerateHigh => "moderate-high",
            Self::High => "high",
            Self::StrengthUpper => "strength: upper",
            Self::StrengthAbs => "strength: abs",
            Self::StrengthGlutes => "strength: glutes",
            Self::Optional => "optional",
            Self::StretchAndEnd => "stretch and end",
        }
    }

    /// All purposes, in catalogue display order.
    pub const ALL: [Purpose; 10] = [
        Purpose::OpeningIntensity,
        Purpose::LowerModerate,
        Purpose::Moderate,
        Purpose::ModerateHigh,
        Purpose::High,
        Purpose::StrengthUpper,
        Purpose::StrengthAbs,
        Purpose::StrengthGlutes,
        Purpose::Optional,
        Purpose::StretchAndEnd,
    ];
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One catalogue entry. Read-only after load; builds share records by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    /// Unique identifier within a catalogue.
    pub title: String,
    pub purpose: Purpose,
    /// Release year, [`UNKNOWN_YEAR`] when the catalogue has no value.
    pub year: i32,
    pub length_secs: u32,
    /// Track choreography ends at floor level.
    pub descend_to_floor: bool,
    /// Track choreography starts at floor level and returns to standing.
    pub ascend_to_stand: bool,
}

/// A raw CSV row before normalization. Optional fields may be empty in the file.
#[derive(Debug, Deserialize)]
struct RawRow {
    title: String,
    purpose: Purpose,
    year: Option<i32>,
    length: String,
    descend_to_floor: Option<bool>,
    ascend_to_stand: Option<bool>,
}

/// The full track catalogue, loaded once per invocation.
#[derive(Debug)]
pub struct Catalog {
    pub tracks: Vec<TrackRecord>,
}

impl Catalog {
    /// Load a catalogue from a CSV file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let catalog = Self::from_reader(file)?;
        log::info!("Loaded {} tracks from {}", catalog.tracks.len(), path.display());
        Ok(catalog)
    }

    /// Read catalogue rows from any CSV source, normalizing missing fields:
    /// empty `year` becomes [`UNKNOWN_YEAR`], empty floor flags become false.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut tracks = Vec::new();
        for row in csv_reader.deserialize() {
            let raw: RawRow = row?;
            let length_secs = parse_length(&raw.length).ok_or_else(|| {
                CatalogError::MalformedLength {
                    title: raw.title.clone(),
                    value: raw.length.clone(),
                }
            })?;
            tracks.push(TrackRecord {
                title: raw.title,
                purpose: raw.purpose,
                year: raw.year.unwrap_or(UNKNOWN_YEAR),
                length_secs,
                descend_to_floor: raw.descend_to_floor.unwrap_or(false),
                ascend_to_stand: raw.ascend_to_stand.unwrap_or(false),
            });
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Parse a `MM:SS` length string into total seconds.
/// Returns None for anything that is not two colon-separated integers.
pub fn parse_length(length: &str) -> Option<u32> {
    let (minutes, seconds) = length.split_once(':')?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    let seconds: u32 = seconds.trim().parse().ok()?;
    Some(minutes * 60 + seconds)
}

/// Render total seconds as `M:SS`.
pub fn format_length(total_secs: u32) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("4:05"), Some(245));
        assert_eq!(parse_length("52:30"), Some(3150));
        assert_eq!(parse_length("0:00"), Some(0));
        // Tolerates stray whitespace around the parts
        assert_eq!(parse_length("4: 05"), Some(245));

        assert_eq!(parse_length(""), None);
        assert_eq!(parse_length("245"), None);
        assert_eq!(parse_length("4:xx"), None);
        assert_eq!(parse_length("4:05:02"), None);
        assert_eq!(parse_length("-4:05"), None);
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(245), "4:05");
        assert_eq!(format_length(3150), "52:30");
        assert_eq!(format_length(61), "1:01");
        assert_eq!(format_length(0), "0:00");
    }

    #[test]
    fn test_length_round_trip() {
        for secs in [0, 59, 60, 245, 3150, 31200] {
            assert_eq!(parse_length(&format_length(secs)), Some(secs));
        }
    }

    #[test]
    fn test_from_reader_normalizes_missing_fields() {
        let csv = "\
title,purpose,year,length,descend_to_floor,ascend_to_stand
Warm It Up,OI,2025,4:12,,
Old Favorite,M,,5:00,true,
Floor Work,MA,2024,3:45,false,true
";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);

        let warm = &catalog.tracks[0];
        assert_eq!(warm.title, "Warm It Up");
        assert_eq!(warm.purpose, Purpose::OpeningIntensity);
        assert_eq!(warm.year, 2025);
        assert_eq!(warm.length_secs, 252);
        assert!(!warm.descend_to_floor);
        assert!(!warm.ascend_to_stand);

        let old = &catalog.tracks[1];
        assert_eq!(old.year, UNKNOWN_YEAR);
        assert!(old.descend_to_floor);

        let floor = &catalog.tracks[2];
        assert_eq!(floor.purpose, Purpose::StrengthAbs);
        assert!(floor.ascend_to_stand);
    }

    #[test]
    fn test_from_reader_rejects_malformed_length() {
        let csv = "\
title,purpose,year,length,descend_to_floor,ascend_to_stand
Broken,H,2025,not-a-length,,
";
        let err = Catalog::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            CatalogError::MalformedLength { title, value } => {
                assert_eq!(title, "Broken");
                assert_eq!(value, "not-a-length");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_purpose_codes_round_trip() {
        for purpose in Purpose::ALL {
            assert_eq!(purpose.to_string(), purpose.code());
        }
        assert!(Purpose::STRENGTH_FAMILY.contains(&Purpose::Optional));
        assert!(!Purpose::STRENGTH_BLOCK.contains(&Purpose::Optional));
    }
}
