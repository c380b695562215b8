//! # Listening Compass
//!
//! Reads a streaming history export, counts plays per artist in a date
//! range, weights the artists of a reference table by those plays and marks
//! the resulting centroid on a compass picture.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `config`: Input/output locations and config file handling
//! - `pipeline`: The run itself, from history files to the marked picture
//!
//! ## Usage
//!
//! ```bash
//! # Whole history, export folder in the working directory
//! listening-compass
//!
//! # One year of listening
//! listening-compass --start-date 20230101 --end-date 20231231
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use listening_compass::pipeline::{self, Outcome};
use listening_compass::{cli, completion};
use log::{debug, info};

/// Main entry point.
///
/// Logging goes through `env_logger` and defaults to `info`; set `RUST_LOG`
/// to change it:
/// - `RUST_LOG=debug listening-compass` - Per-file record counts
/// - `RUST_LOG=listening_compass::filter=warn listening-compass` - Only record diagnostics
///
/// Missing history and empty results end with a message and exit status 0.
/// Configuration errors (reference table, images, config file) are returned
/// and exit with status 1.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();

    match args.command {
        Some(cli::Command::Completion { shell }) => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        }
        None => {
            let config = args.run.resolve_config()?;
            let range = args.run.date_range();
            debug!("Resolved configuration: {config:?}");

            match pipeline::run(&config, &range)? {
                Outcome::Plotted(summary) => {
                    info!(
                        "Compass plotted from {} listens ({} on the compass)",
                        summary.listens, summary.reading.total_plays
                    );
                }
                outcome => debug!("Run ended early: {outcome:?}"),
            }
        }
    }

    Ok(())
}
