//! Speakers from a Sessionize export workbook.
//!
//! The "Accepted speakers" sheet has a header row followed by one speaker per
//! row: id, first name, last name and email in the first four columns.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::{debug, info};

use crate::error::{BadgeError, Result};
use crate::source::Speaker;

pub const ACCEPTED_SPEAKERS_SHEET: &str = "Accepted speakers";

/// Read the accepted speakers, sorted by full name.
pub fn read_speakers(path: &Path) -> Result<Vec<Speaker>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| BadgeError::Spreadsheet(format!("{}: {}", path.display(), e)))?;
    let range = workbook
        .worksheet_range(ACCEPTED_SPEAKERS_SHEET)
        .map_err(|e| {
            BadgeError::Spreadsheet(format!("{}: {}: {}", path.display(), ACCEPTED_SPEAKERS_SHEET, e))
        })?;
    let speakers = speakers_from_range(&range);
    info!(count = speakers.len(), path = %path.display(), "Read speakers");
    Ok(speakers)
}

/// Rows after the header become speakers; blank rows are skipped.
pub fn speakers_from_range(range: &Range<Data>) -> Vec<Speaker> {
    let mut speakers: Vec<Speaker> = range
        .rows()
        .skip(1)
        .filter_map(|row| {
            let cell = |col: usize| cell_text(row.get(col));
            let speaker = Speaker {
                speaker_id: cell(0),
                first_name: cell(1).unwrap_or_default(),
                last_name: cell(2).unwrap_or_default(),
                email: cell(3),
            };
            if speaker.speaker_id.is_none()
                && speaker.first_name.is_empty()
                && speaker.last_name.is_empty()
                && speaker.email.is_none()
            {
                debug!("Skipping blank speaker row");
                return None;
            }
            Some(speaker)
        })
        .collect();
    speakers.sort_by_key(|s| s.full_name());
    speakers
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    let text = match cell? {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        // ids typed as numbers come back as floats
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    };
    Some(text).filter(|t| !t.is_empty())
}
