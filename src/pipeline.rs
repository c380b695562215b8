//! # Compass Pipeline
//!
//! Runs the stages in order:
//!
//! ```text
//! history files → filter → artist counts → reference tallies → reading → image
//! ```
//!
//! Missing inputs and empty results end the run early with an [`Outcome`]
//! instead of an error. Problems with the reference table, the base image or
//! the output files are errors.

use crate::aggregate::{reference_listens, tally_reference, ArtistCounts, ReferenceTally};
use crate::centroid::{compute_reading, CompassReading};
use crate::config::RuntimeConfig;
use crate::filter::{filter_events, DateRange, ListenEvent};
use crate::history::{discover_history_files, display_name, load_history_files};
use crate::reference::load_reference_table;
use crate::render::{plot_centroid, resolve_font, MarkerStyle};
use crate::report;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Non-skipped listens in range, across all artists.
    pub listens: usize,
    pub artist_counts: ArtistCounts,
    pub tallies: Vec<ReferenceTally>,
    pub reading: CompassReading,
    /// Pixel the marker was drawn at.
    pub pixel: (i32, i32),
    pub output_image: PathBuf,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The history folder does not exist or is not a directory.
    InvalidDirectory(PathBuf),
    /// The history folder holds no matching files.
    NoHistoryFiles(PathBuf),
    /// No reference artist was played in range, so there is no centroid.
    NoReferencePlays { listens: usize },
    Plotted(Box<RunSummary>),
}

impl Outcome {
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            Outcome::Plotted(summary) => Some(summary.as_ref()),
            _ => None,
        }
    }
}

/// Run the whole compass over the configured export.
///
/// # Errors
///
/// Fails on configuration problems: unreadable history directory listing,
/// invalid reference table, unreadable base image, or unwritable outputs.
pub fn run(config: &RuntimeConfig, range: &DateRange) -> Result<Outcome> {
    let history_dir = &config.history_dir;
    if !history_dir.is_dir() {
        println!("Error: {} is not a valid directory.", history_dir.display());
        return Ok(Outcome::InvalidDirectory(history_dir.clone()));
    }
    println!("\nFolder path provided: {}", history_dir.display());

    if range.is_inverted() {
        warn!("Start date is after end date; no listens can fall in range");
    }

    let pattern = config.history_pattern();
    let paths = discover_history_files(history_dir, &pattern)?;
    if paths.is_empty() {
        println!("\nNo {}*{} files found in the folder.", pattern.prefix, pattern.suffix);
        return Ok(Outcome::NoHistoryFiles(history_dir.clone()));
    }
    let names: Vec<String> = paths.iter().map(|p| display_name(p)).collect();
    report::print_discovered_files(&names);

    let events = collect_events(&paths, range);
    println!("\nTotal non-skipped listens in range: {}", events.len());

    let artist_counts = ArtistCounts::from_events(&events);
    report::write_frequencies_csv(&artist_counts, &config.frequencies_path)?;
    println!("\nArtist frequencies saved to {}", config.frequencies_path.display());

    let table = load_reference_table(&config.reference_path)?;
    let tallies = tally_reference(&events, &table);
    println!(
        "\nTotal non-skipped compass listens in range: {}",
        reference_listens(&tallies)
    );
    report::print_reference_counts(&tallies);

    let Some(reading) = compute_reading(&tallies) else {
        println!("\nNo matching artists with plays found for coordinate calculation.");
        return Ok(Outcome::NoReferencePlays { listens: events.len() });
    };
    report::print_reading(&reading);

    let font = resolve_font(config.font_path.as_deref());
    let pixel = plot_centroid(
        &config.base_image,
        &config.output_image,
        reading.centroid,
        &config.pixel_bounds,
        &MarkerStyle::default(),
        font.as_ref(),
    )
    .context("Failed to plot the compass")?;
    println!(
        "\nSaved image with dot at ({}, {}) to {}",
        pixel.0,
        pixel.1,
        config.output_image.display()
    );

    Ok(Outcome::Plotted(Box::new(RunSummary {
        listens: events.len(),
        artist_counts,
        tallies,
        reading,
        pixel,
        output_image: config.output_image.clone(),
    })))
}

/// Load and filter every history file, in file order.
pub fn collect_events(paths: &[PathBuf], range: &DateRange) -> Vec<ListenEvent> {
    let mut events = Vec::new();
    for file in load_history_files(paths) {
        let kept = filter_events(&file.records, range, &file.name);
        info!("{}: {} listens in range", file.name, kept.len());
        events.extend(kept);
    }
    events
}
