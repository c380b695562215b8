//! # Coordinate Weighting
//!
//! Combines reference tallies into a play-weighted centroid and splits the
//! plays across the four compass quadrants.
//!
//! ```text
//! mean_x = Σ(plays_i * x_i) / Σ plays_i
//! mean_y = Σ(plays_i * y_i) / Σ plays_i
//! ```
//!
//! Only artists with at least one play take part. With none, there is no
//! centroid at all rather than a division by zero.

use crate::aggregate::ReferenceTally;
use std::fmt;

/// Play-weighted mean position in logical compass space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "({:.p$}, {:.p$})", self.x, self.y),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

/// Compass quadrant. Points on an axis belong to the non-negative side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// `x >= 0, y >= 0`
    TopRight,
    /// `x < 0, y >= 0`
    TopLeft,
    /// `x < 0, y < 0`
    BottomLeft,
    /// `x >= 0, y < 0`
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopRight,
        Quadrant::TopLeft,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Quadrant of a logical point. `(0, 0)` is `TopRight`.
    pub fn of(x: f64, y: f64) -> Self {
        match (x >= 0.0, y >= 0.0) {
            (true, true) => Quadrant::TopRight,
            (false, true) => Quadrant::TopLeft,
            (false, false) => Quadrant::BottomLeft,
            (true, false) => Quadrant::BottomRight,
        }
    }

    /// Report label, e.g. `Q1 (top right)`.
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::TopRight => "Q1 (top right)",
            Quadrant::TopLeft => "Q2 (top left)",
            Quadrant::BottomLeft => "Q3 (bottom left)",
            Quadrant::BottomRight => "Q4 (bottom right)",
        }
    }
}

/// Plays per quadrant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadrantTotals {
    pub q1: u64,
    pub q2: u64,
    pub q3: u64,
    pub q4: u64,
}

impl QuadrantTotals {
    fn add(&mut self, quadrant: Quadrant, plays: u64) {
        match quadrant {
            Quadrant::TopRight => self.q1 += plays,
            Quadrant::TopLeft => self.q2 += plays,
            Quadrant::BottomLeft => self.q3 += plays,
            Quadrant::BottomRight => self.q4 += plays,
        }
    }

    pub fn get(&self, quadrant: Quadrant) -> u64 {
        match quadrant {
            Quadrant::TopRight => self.q1,
            Quadrant::TopLeft => self.q2,
            Quadrant::BottomLeft => self.q3,
            Quadrant::BottomRight => self.q4,
        }
    }

    pub fn total(&self) -> u64 {
        self.q1 + self.q2 + self.q3 + self.q4
    }
}

/// Result of weighting the listened reference artists.
#[derive(Debug, Clone, PartialEq)]
pub struct CompassReading {
    pub centroid: Centroid,
    pub quadrants: QuadrantTotals,
    /// Plays that went into the centroid.
    pub total_plays: u64,
    /// Reference artists with at least one play.
    pub listened_artists: usize,
}

/// Weight the reference tallies into a centroid and quadrant split.
///
/// Each listened artist pulls the centroid toward its coordinates in
/// proportion to its plays; each of its plays lands in the quadrant of the
/// artist's position, not of the centroid.
///
/// # Returns
///
/// * `None` - No reference artist has a play, so there is nothing to weight
///
/// # Examples
///
/// ```
/// use listening_compass::aggregate::ReferenceTally;
/// use listening_compass::centroid::compute_reading;
/// use listening_compass::reference::ReferenceArtist;
///
/// let tallies = vec![
///     ReferenceTally { artist: ReferenceArtist::new("A", 1.0, 0.0), plays: 1 },
///     ReferenceTally { artist: ReferenceArtist::new("B", -1.0, 0.0), plays: 1 },
/// ];
/// let reading = compute_reading(&tallies).unwrap();
/// assert_eq!(reading.centroid.x, 0.0);
/// assert_eq!(reading.quadrants.total(), 2);
/// ```
#[must_use]
pub fn compute_reading(tallies: &[ReferenceTally]) -> Option<CompassReading> {
    let listened: Vec<&ReferenceTally> = tallies.iter().filter(|t| t.plays > 0).collect();
    if listened.is_empty() {
        return None;
    }

    let mut weighted_x = 0.0;
    let mut weighted_y = 0.0;
    let mut total_plays = 0u64;
    let mut quadrants = QuadrantTotals::default();

    for tally in &listened {
        let plays = tally.plays as f64;
        weighted_x += plays * tally.artist.x;
        weighted_y += plays * tally.artist.y;
        total_plays += tally.plays;
        quadrants.add(Quadrant::of(tally.artist.x, tally.artist.y), tally.plays);
    }

    let total = total_plays as f64;
    Some(CompassReading {
        centroid: Centroid {
            x: weighted_x / total,
            y: weighted_y / total,
        },
        quadrants,
        total_plays,
        listened_artists: listened.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceArtist;

    fn tally(name: &str, x: f64, y: f64, plays: u64) -> ReferenceTally {
        ReferenceTally {
            artist: ReferenceArtist::new(name, x, y),
            plays,
        }
    }

    #[test]
    fn test_two_artist_scenario() {
        let tallies = vec![tally("A", 0.5, 0.5, 3), tally("B", -0.5, -0.5, 1)];
        let reading = compute_reading(&tallies).expect("reading");

        assert!((reading.centroid.x - 0.25).abs() < 1e-12);
        assert!((reading.centroid.y - 0.25).abs() < 1e-12);
        assert_eq!(
            reading.quadrants,
            QuadrantTotals { q1: 3, q2: 0, q3: 1, q4: 0 }
        );
        assert_eq!(reading.total_plays, 4);
        assert_eq!(reading.listened_artists, 2);
    }

    #[test]
    fn test_no_plays_means_no_centroid() {
        assert!(compute_reading(&[]).is_none());
        assert!(compute_reading(&[tally("A", 0.5, 0.5, 0), tally("B", 0.1, 0.1, 0)]).is_none());
    }

    #[test]
    fn test_unplayed_artists_do_not_pull_the_centroid() {
        let tallies = vec![tally("A", 0.8, -0.2, 5), tally("B", -1.0, 1.0, 0)];
        let reading = compute_reading(&tallies).unwrap();
        assert_eq!(reading.centroid, Centroid { x: 0.8, y: -0.2 });
        assert_eq!(reading.listened_artists, 1);
    }

    #[test]
    fn test_axis_points_count_as_non_negative() {
        assert_eq!(Quadrant::of(0.0, 0.0), Quadrant::TopRight);
        assert_eq!(Quadrant::of(-0.1, 0.0), Quadrant::TopLeft);
        assert_eq!(Quadrant::of(0.0, -0.1), Quadrant::BottomRight);
        assert_eq!(Quadrant::of(-0.1, -0.1), Quadrant::BottomLeft);
    }

    #[test]
    fn test_quadrant_sum_matches_total_plays() {
        let tallies = vec![
            tally("A", 0.3, 0.9, 7),
            tally("B", -0.3, 0.9, 2),
            tally("C", -0.3, -0.9, 11),
            tally("D", 0.3, -0.9, 4),
            tally("E", 0.0, 0.0, 1),
            tally("F", -0.7, 0.2, 0),
        ];
        let reading = compute_reading(&tallies).unwrap();
        let played: u64 = tallies.iter().map(|t| t.plays).sum();

        assert_eq!(reading.quadrants.total(), played);
        assert_eq!(reading.total_plays, played);
        let by_label: u64 = Quadrant::ALL.iter().map(|q| reading.quadrants.get(*q)).sum();
        assert_eq!(by_label, played);
    }

    #[test]
    fn test_centroid_stays_within_listened_bounds() {
        let tallies: Vec<_> = (0..40u64)
            .map(|i| {
                let x = ((i * 37) % 200) as f64 / 100.0 - 1.0;
                let y = ((i * 53) % 200) as f64 / 100.0 - 1.0;
                tally(&format!("artist{i}"), x, y, i % 7)
            })
            .collect();
        let reading = compute_reading(&tallies).unwrap();

        let listened: Vec<_> = tallies.iter().filter(|t| t.plays > 0).collect();
        let min_x = listened.iter().map(|t| t.artist.x).fold(f64::INFINITY, f64::min);
        let max_x = listened.iter().map(|t| t.artist.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = listened.iter().map(|t| t.artist.y).fold(f64::INFINITY, f64::min);
        let max_y = listened.iter().map(|t| t.artist.y).fold(f64::NEG_INFINITY, f64::max);

        let c = reading.centroid;
        assert!(min_x - 1e-12 <= c.x && c.x <= max_x + 1e-12, "x {} out of bounds", c.x);
        assert!(min_y - 1e-12 <= c.y && c.y <= max_y + 1e-12, "y {} out of bounds", c.y);
    }

    #[test]
    fn test_centroid_display_precision() {
        let c = Centroid { x: 0.25, y: -0.3333333 };
        assert_eq!(format!("{c:.2}"), "(0.25, -0.33)");
        assert_eq!(format!("{c:.3}"), "(0.250, -0.333)");
    }
}
