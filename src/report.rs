//! # Reporting
//!
//! The user-facing side of a run: the per-artist frequency CSV and the
//! console summary.

use crate::aggregate::{sorted_tallies, ArtistCounts, ReferenceTally};
use crate::centroid::{CompassReading, Quadrant};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write every artist with its play count, highest first.
pub fn write_frequencies<W: Write>(counts: &ArtistCounts, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["Artist", "Play Count"])?;
    for (artist, count) in counts.sorted_desc() {
        writer.write_record([artist, count.to_string().as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the frequency CSV to `path`.
pub fn write_frequencies_csv(counts: &ArtistCounts, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_frequencies(counts, file)
        .with_context(|| format!("Failed to write artist frequencies to {}", path.display()))
}

pub fn print_discovered_files(names: &[String]) {
    println!("\nFound the following streaming history files:");
    for name in names {
        println!("- {name}");
    }
}

/// Per-reference-artist play counts, highest first, unplayed included.
pub fn print_reference_counts(tallies: &[ReferenceTally]) {
    println!("\nCompass listens per artist in range:");
    for tally in sorted_tallies(tallies) {
        println!("{}: {}", tally.name(), tally.plays);
    }
}

/// Print the centroid (2 decimals) and the plays per quadrant.
///
/// Quadrants are always listed in `Q1`..`Q4` order, empty ones included:
///
/// ```text
/// Your listening coordinates: (0.25, 0.25)
///
/// Listens per quadrant:
/// Q1 (top right): 3
/// Q2 (top left): 0
/// Q3 (bottom left): 1
/// Q4 (bottom right): 0
/// ```
pub fn print_reading(reading: &CompassReading) {
    println!("\nYour listening coordinates: {:.2}", reading.centroid);
    println!("\nListens per quadrant:");
    for quadrant in Quadrant::ALL {
        println!("{}: {}", quadrant.label(), reading.quadrants.get(quadrant));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ListenEvent;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn counts(artists: &[&str]) -> ArtistCounts {
        let played_at = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let events: Vec<_> = artists
            .iter()
            .map(|a| ListenEvent {
                played_at,
                artist: Some(a.to_string()),
                skipped: false,
            })
            .collect();
        ArtistCounts::from_events(&events)
    }

    #[test]
    fn test_frequencies_sorted_with_header() -> Result<()> {
        let mut out = Vec::new();
        write_frequencies(&counts(&["B", "A", "A", "C, the Band", "A", "B"]), &mut out)?;

        let text = String::from_utf8(out)?;
        assert_eq!(text, "Artist,Play Count\nA,3\nB,2\n\"C, the Band\",1\n");
        Ok(())
    }

    #[test]
    fn test_frequencies_empty_has_header_only() -> Result<()> {
        let mut out = Vec::new();
        write_frequencies(&ArtistCounts::default(), &mut out)?;
        assert_eq!(String::from_utf8(out)?, "Artist,Play Count\n");
        Ok(())
    }

    #[test]
    fn test_frequencies_csv_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("artist_frequencies.csv");
        write_frequencies_csv(&counts(&["A"]), &path)?;
        assert_eq!(std::fs::read_to_string(&path)?, "Artist,Play Count\nA,1\n");
        Ok(())
    }
}
