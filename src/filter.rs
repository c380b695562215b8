//! # Event Filter
//!
//! Turns raw streaming-history records into [`ListenEvent`]s, keeping only the
//! plays that have a usable timestamp, fall inside the requested [`DateRange`]
//! and were not skipped.
//!
//! Bad records never abort a run: each one is logged with the name of the file
//! it came from and dropped, and filtering carries on with the next record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single non-skipped play that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenEvent {
    /// Wall-clock time of the play, as written in the export.
    pub played_at: NaiveDateTime,
    /// Album artist, when the export knows it.
    pub artist: Option<String>,
    /// Always `false` for events returned by [`filter_events`].
    pub skipped: bool,
}

impl ListenEvent {
    /// Calendar date used for range checks.
    pub fn date(&self) -> NaiveDate {
        self.played_at.date()
    }

    /// Artist name, treating an empty string the same as a missing one.
    pub fn artist_name(&self) -> Option<&str> {
        self.artist.as_deref().filter(|name| !name.is_empty())
    }
}

/// Inclusive calendar-date window. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Range from optional inclusive bounds. An inverted range is accepted
    /// and simply contains no dates.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Range with no bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Whether `date` lies inside the range, bounds included.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use listening_compass::filter::DateRange;
    ///
    /// let jan = DateRange::new(NaiveDate::from_ymd_opt(2023, 1, 1), NaiveDate::from_ymd_opt(2023, 1, 31));
    /// assert!(jan.contains(NaiveDate::from_ymd_opt(2023, 1, 31).unwrap()));
    /// assert!(!jan.contains(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()));
    /// ```
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// True when both bounds are set and the start comes after the end.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }
}

/// Fields of a history record the filter cares about. Everything else in the
/// export (track names, platform, ms played, ...) is ignored.
#[derive(Debug, Deserialize)]
struct RawListen {
    #[serde(default)]
    ts: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    skipped: bool,
    #[serde(default, deserialize_with = "scalar_name")]
    master_metadata_album_artist_name: Option<String>,
}

/// Any JSON value as a flag: `null`, `false`, `0`, `""`, `[]` and `{}` are
/// false, everything else is true.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    })
}

/// Artist names are strings, but numbers and booleans are accepted in their
/// JSON spelling. Arrays and objects carry no name.
fn scalar_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Parse an export timestamp into its wall-clock date-time.
///
/// Offsets are parsed but not applied: `2023-01-01T23:30:00-05:00` stays on
/// January 1st. A bare date is taken as midnight.
///
/// # Returns
///
/// * `None` - The string matches none of the accepted shapes
///
/// # Examples
///
/// ```
/// use listening_compass::filter::parse_timestamp;
///
/// let played = parse_timestamp("2023-04-05T22:10:03Z").unwrap();
/// assert_eq!(played.to_string(), "2023-04-05 22:10:03");
/// assert!(parse_timestamp("last tuesday").is_none());
/// ```
pub fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
    let ts = ts.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.naive_local());
    }

    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(ts, fmt) {
            return Some(dt.naive_local());
        }
    }

    // Trailing UTC marker without a full RFC 3339 shape, e.g. a space separator.
    let naive = ts.strip_suffix('Z').unwrap_or(ts);
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Keep the records of one history file that are parseable, in range and not
/// skipped. Output order follows input order.
///
/// `source` only labels diagnostics.
pub fn filter_events<'a, I>(records: I, range: &DateRange, source: &str) -> Vec<ListenEvent>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut kept = Vec::new();
    let mut seen = 0usize;

    for record in records {
        seen += 1;
        let raw = match RawListen::deserialize(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping malformed record #{seen} in {source}: {e}");
                continue;
            }
        };

        let Some(ts) = raw.ts.as_deref().filter(|ts| !ts.is_empty()) else {
            warn!("Skipping record #{seen} in {source}: missing timestamp");
            continue;
        };

        let Some(played_at) = parse_timestamp(ts) else {
            warn!("Error parsing timestamp {ts} in {source}");
            continue;
        };

        if !range.contains(played_at.date()) || raw.skipped {
            continue;
        }

        kept.push(ListenEvent {
            played_at,
            artist: raw.master_metadata_album_artist_name,
            skipped: false,
        });
    }

    debug!("{source}: kept {} of {seen} records", kept.len());
    kept
}
