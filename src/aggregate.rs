//! # Artist Aggregator
//!
//! Counts plays per artist over filtered [`ListenEvent`]s. Two views are
//! produced:
//!
//! - [`ArtistCounts`]: every artist seen, in first-seen order.
//! - [`ReferenceTally`] rows: one per reference artist, in table order,
//!   starting from zero so artists with no plays still show up.
//!
//! Events without an artist name count toward neither view.

use crate::filter::ListenEvent;
use crate::reference::{ReferenceArtist, ReferenceTable};
use std::collections::HashMap;

/// Play counts for every artist seen, keyed by exact artist name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistCounts {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl ArtistCounts {
    /// Count plays per artist, ignoring events with no artist.
    pub fn from_events(events: &[ListenEvent]) -> Self {
        let mut counts = Self::default();
        for artist in events.iter().filter_map(ListenEvent::artist_name) {
            counts.record(artist);
        }
        counts
    }

    fn record(&mut self, artist: &str) {
        match self.index.get(artist) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(artist.to_string(), self.entries.len());
                self.entries.push((artist.to_string(), 1));
            }
        }
    }

    pub fn get(&self, artist: &str) -> u64 {
        self.index.get(artist).map_or(0, |&pos| self.entries[pos].1)
    }

    /// Number of distinct artists.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total plays across all artists.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(artist, count)| (artist.as_str(), *count))
    }

    /// Entries sorted by count, highest first. Ties keep first-seen order.
    pub fn sorted_desc(&self) -> Vec<(&str, u64)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

/// A reference artist joined with its play count.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTally {
    pub artist: ReferenceArtist,
    pub plays: u64,
}

impl ReferenceTally {
    pub fn name(&self) -> &str {
        &self.artist.name
    }
}

/// Count plays for the reference artists only.
///
/// Returns one row per reference artist, in table order, including artists
/// that were never played.
pub fn tally_reference(events: &[ListenEvent], table: &ReferenceTable) -> Vec<ReferenceTally> {
    let mut tallies: Vec<ReferenceTally> = table
        .artists()
        .iter()
        .map(|artist| ReferenceTally { artist: artist.clone(), plays: 0 })
        .collect();

    for artist in events.iter().filter_map(ListenEvent::artist_name) {
        if let Some(pos) = table.position(artist) {
            tallies[pos].plays += 1;
        }
    }

    tallies
}

/// Total plays attributed to reference artists.
pub fn reference_listens(tallies: &[ReferenceTally]) -> u64 {
    tallies.iter().map(|tally| tally.plays).sum()
}

/// Reference tallies sorted by plays, highest first. Ties keep table order.
pub fn sorted_tallies(tallies: &[ReferenceTally]) -> Vec<&ReferenceTally> {
    let mut sorted: Vec<_> = tallies.iter().collect();
    sorted.sort_by(|a, b| b.plays.cmp(&a.plays));
    sorted
}
