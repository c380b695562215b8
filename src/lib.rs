//! Plot where a streaming history lands on an artist compass.
//!
//! Core modules:
//! - [`filter`] - Date-range and skip filtering of raw history records
//! - [`aggregate`] - Per-artist play counts
//! - [`centroid`] - Play-weighted centroid and quadrant split
//!
//! ### Supporting Modules
//!
//! - [`history`] - History file discovery and JSON loading
//! - [`reference`] - Artist → coordinate table loading
//! - [`render`] - Pixel mapping and marker drawing
//! - [`report`] - Frequency CSV and console summary
//! - [`pipeline`] - The full run, stage by stage
//! - [`config`] - Input/output locations and config file handling
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use listening_compass::aggregate::tally_reference;
//! use listening_compass::centroid::compute_reading;
//! use listening_compass::filter::{filter_events, DateRange};
//! use listening_compass::reference::{ReferenceArtist, ReferenceTable};
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({ "ts": "2023-03-01T10:00:00Z", "master_metadata_album_artist_name": "A" }),
//!     json!({ "ts": "2023-03-01T10:04:00Z", "master_metadata_album_artist_name": "A" }),
//!     json!({ "ts": "2023-03-01T10:08:00Z", "master_metadata_album_artist_name": "A" }),
//!     json!({ "ts": "2023-03-01T10:12:00Z", "master_metadata_album_artist_name": "B" }),
//!     json!({ "ts": "2023-03-01T10:16:00Z", "master_metadata_album_artist_name": "B", "skipped": true }),
//! ];
//! let events = filter_events(&records, &DateRange::unbounded(), "example");
//!
//! let table = ReferenceTable::from_artists(vec![
//!     ReferenceArtist::new("A", 0.5, 0.5),
//!     ReferenceArtist::new("B", -0.5, -0.5),
//! ]);
//! let reading = compute_reading(&tally_reference(&events, &table)).expect("plays");
//!
//! assert_eq!(format!("{:.2}", reading.centroid), "(0.25, 0.25)");
//! assert_eq!((reading.quadrants.q1, reading.quadrants.q3), (3, 1));
//! ```
//!
//! ## Error Handling
//!
//! Fallible functions return `anyhow::Result`. Bad history files and records
//! are logged and skipped rather than returned as errors; see [`pipeline`]
//! for how a run ends early.

pub mod aggregate;
pub mod centroid;
pub mod cli;
pub mod completion;
pub mod config;
pub mod filter;
pub mod history;
pub mod pipeline;
pub mod reference;
pub mod render;
pub mod report;
