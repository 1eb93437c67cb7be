use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::builder::Setlist;
use crate::catalog::{Purpose, UNKNOWN_YEAR, format_length};

/// One persisted setlist row. Columns match the catalogue file, with lengths
/// re-rendered as M:SS so the output round-trips through the loader.
#[derive(Serialize)]
struct SetlistRow<'a> {
    title: &'a str,
    purpose: Purpose,
    year: Option<i32>,
    length: String,
    descend_to_floor: bool,
    ascend_to_stand: bool,
}

/// Persist an accepted setlist to a CSV file.
pub fn write_setlist(path: &Path, setlist: &Setlist) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_to(file, setlist)?;
    log::info!("Wrote {} tracks to {}", setlist.tracks.len(), path.display());
    Ok(())
}

/// Write setlist rows to any sink.
pub fn write_to<W: Write>(writer: W, setlist: &Setlist) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for track in &setlist.tracks {
        csv_writer
            .serialize(SetlistRow {
                title: &track.title,
                purpose: track.purpose,
                year: (track.year != UNKNOWN_YEAR).then_some(track.year),
                length: format_length(track.length_secs),
                descend_to_floor: track.descend_to_floor,
                ascend_to_stand: track.ascend_to_stand,
            })
            .with_context(|| format!("Failed to write row for {:?}", track.title))?;
    }
    csv_writer.flush().context("Failed to flush setlist")?;
    Ok(())
}
