//! # Reference Table
//!
//! Loads the curated artist → compass coordinate table from CSV.
//!
//! The file needs a header row with at least `Artist`, `x` and `y` columns;
//! any other columns are ignored. Coordinates live in a normalized logical
//! space, nominally `[-1, 1]` on both axes.
//!
//! ```text
//! Artist,x,y
//! Some Artist,0.42,-0.8
//! ```

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const ARTIST_COLUMN: &str = "Artist";
const X_COLUMN: &str = "x";
const Y_COLUMN: &str = "y";

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceArtist {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl ReferenceArtist {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self { name: name.into(), x, y }
    }
}

/// Reference artists in file order, with unique names.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    artists: Vec<ReferenceArtist>,
    index: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Build a table from rows. A repeated name keeps the position of its
    /// first appearance and takes the coordinates of its last one.
    pub fn from_artists(rows: impl IntoIterator<Item = ReferenceArtist>) -> Self {
        let mut table = Self::default();
        for row in rows {
            table.insert(row);
        }
        table
    }

    fn insert(&mut self, row: ReferenceArtist) {
        match self.index.get(&row.name) {
            Some(&pos) => {
                warn!(
                    "Duplicate reference artist '{}': ({}, {}) replaces ({}, {})",
                    row.name, row.x, row.y, self.artists[pos].x, self.artists[pos].y
                );
                self.artists[pos] = row;
            }
            None => {
                self.index.insert(row.name.clone(), self.artists.len());
                self.artists.push(row);
            }
        }
    }

    /// Look up an artist by exact name. Case and surrounding whitespace
    /// both count, so `"ABBA"` and `"abba "` are different artists.
    pub fn get(&self, name: &str) -> Option<&ReferenceArtist> {
        self.index.get(name).map(|&pos| &self.artists[pos])
    }

    /// Same exact-name rule as [`ReferenceTable::get`].
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of `name` in table order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn artists(&self) -> &[ReferenceArtist] {
        &self.artists
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

/// Load the reference table from a CSV file.
///
/// # Errors
///
/// Fails when the file cannot be opened, has no `Artist`/`x`/`y` header, or a
/// row carries a coordinate that is not a finite number.
pub fn load_reference_table(path: &Path) -> Result<ReferenceTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open reference table {}", path.display()))?;

    let table = read_reference_table(file)
        .with_context(|| format!("Invalid reference table {}", path.display()))?;

    debug!("Loaded {} reference artists from {}", table.len(), path.display());
    Ok(table)
}

/// Parse reference CSV from any reader.
///
/// Header names and coordinates are whitespace-trimmed. Artist names are
/// kept byte for byte, since they are matched exactly against the history.
pub fn read_reference_table<R: Read>(reader: R) -> Result<ReferenceTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header row")?.clone();
    let artist_idx = column_index(&headers, ARTIST_COLUMN)?;
    let x_idx = column_index(&headers, X_COLUMN)?;
    let y_idx = column_index(&headers, Y_COLUMN)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, lines are 1-based
        let line = idx + 2;
        let record = result.with_context(|| format!("CSV parse error on line {line}"))?;

        let name = record.get(artist_idx).unwrap_or_default();
        if name.is_empty() {
            warn!("Skipping reference row on line {line}: empty artist name");
            continue;
        }

        let x = parse_coordinate(&record, x_idx, X_COLUMN, line)?;
        let y = parse_coordinate(&record, y_idx, Y_COLUMN, line)?;
        rows.push(ReferenceArtist::new(name, x, y));
    }

    Ok(ReferenceTable::from_artists(rows))
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| anyhow!("Missing required column `{name}` (expected columns: Artist, x, y)"))
}

fn parse_coordinate(record: &StringRecord, idx: usize, column: &str, line: usize) -> Result<f64> {
    let raw = record.get(idx).unwrap_or_default().trim();
    let value: f64 = raw
        .parse()
        .map_err(|_| anyhow!("Line {line}: `{column}` value '{raw}' is not a number"))?;
    if !value.is_finite() {
        bail!("Line {line}: `{column}` value '{raw}' is not finite");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_rows_in_file_order() -> Result<()> {
        let csv = "Artist,x,y\nA,0.5,0.5\nB,-0.5,-0.5\nC,0,1\n";
        let table = read_reference_table(csv.as_bytes())?;

        assert_eq!(table.len(), 3);
        let names: Vec<_> = table.artists().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(table.get("B"), Some(&ReferenceArtist::new("B", -0.5, -0.5)));
        assert_eq!(table.position("C"), Some(2));
        Ok(())
    }

    #[test]
    fn test_extra_columns_and_padded_coordinates() -> Result<()> {
        let csv = "Genre, y ,Artist,x\npop, 0.25 ,Some Band, -1 \n";
        let table = read_reference_table(csv.as_bytes())?;
        assert_eq!(table.get("Some Band"), Some(&ReferenceArtist::new("Some Band", -1.0, 0.25)));
        Ok(())
    }

    #[test]
    fn test_artist_whitespace_is_kept() -> Result<()> {
        let table = read_reference_table("Artist,x,y\n\" Padded \",0.5,0.5\n".as_bytes())?;
        assert!(table.contains(" Padded "));
        assert!(!table.contains("Padded"));
        Ok(())
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "Artist,x\nA,0.5\n";
        let err = read_reference_table(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("`y`"), "unexpected error: {err}");
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let csv = "artist,x,y\nA,0.5,0.5\n";
        assert!(read_reference_table(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_non_numeric_coordinate_names_the_line() {
        let csv = "Artist,x,y\nA,0.5,0.5\nB,left,0.1\n";
        let err = read_reference_table(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 3"), "unexpected error: {err}");
    }

    #[test]
    fn test_empty_artist_rows_are_skipped() -> Result<()> {
        let csv = "Artist,x,y\n,0.5,0.5\nA,0.1,0.2\n";
        let table = read_reference_table(csv.as_bytes())?;
        assert_eq!(table.len(), 1);
        assert!(table.contains("A"));
        Ok(())
    }

    #[test]
    fn test_duplicate_names_last_write_wins() -> Result<()> {
        let csv = "Artist,x,y\nA,0.5,0.5\nB,0.1,0.1\nA,-0.5,-0.25\n";
        let table = read_reference_table(csv.as_bytes())?;

        assert_eq!(table.len(), 2);
        assert_eq!(table.position("A"), Some(0));
        assert_eq!(table.get("A"), Some(&ReferenceArtist::new("A", -0.5, -0.25)));
        Ok(())
    }

    #[test]
    fn test_join_key_is_exact() -> Result<()> {
        let table = read_reference_table("Artist,x,y\nABBA,0,0\n".as_bytes())?;
        assert!(table.contains("ABBA"));
        assert!(!table.contains("abba"));
        assert!(!table.contains("ABBA "));
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Artist,x,y")?;
        writeln!(file, "A,0.5,-0.5")?;

        let table = load_reference_table(file.path())?;
        assert_eq!(table.get("A").map(|a| (a.x, a.y)), Some((0.5, -0.5)));
        Ok(())
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let err = load_reference_table(Path::new("/definitely/not/here/coords.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("coords.csv"));
    }
}
