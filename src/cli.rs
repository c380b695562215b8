//! # Command-Line Interface Module
//!
//! Clap definitions for the compass. Running without a subcommand plots the
//! compass; `completion` prints a shell completion script.
//!
//! ## Examples
//!
//! ```bash
//! listening-compass
//! listening-compass --folder-path-to-jsons ~/Downloads/my_spotify_data --start-date 20240101
//! listening-compass --start-date 20230101 --end-date 20231231 --output 2023.png
//! listening-compass completion fish > ~/.config/fish/completions/listening-compass.fish
//! ```

use crate::config::RuntimeConfig;
use crate::filter::DateRange;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "listening-compass")]
#[command(about = "Calculate and plot your musical compass coordinates from your streaming history")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options of a compass run.
#[derive(ClapArgs, Debug, Default)]
pub struct RunArgs {
    /// Path to folder containing the Extended Streaming History JSON files
    ///
    /// Defaults to "Spotify Extended Streaming History" in the working
    /// directory, or the `history_dir` of the config file.
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub folder_path_to_jsons: Option<PathBuf>,

    /// Start date in YYYYMMDD format (inclusive)
    #[arg(long, value_parser = parse_cli_date)]
    pub start_date: Option<NaiveDate>,

    /// End date in YYYYMMDD format (inclusive)
    #[arg(long, value_parser = parse_cli_date)]
    pub end_date: Option<NaiveDate>,

    /// Artist coordinate table (CSV with Artist, x, y columns)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub coords: Option<PathBuf>,

    /// Compass picture to draw on
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub image: Option<PathBuf>,

    /// Where to save the marked picture
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Where to write per-artist play counts
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub frequencies: Option<PathBuf>,

    /// TrueType font for the coordinate label
    #[arg(long, env = "LISTENING_COMPASS_FONT", value_hint = clap::ValueHint::FilePath)]
    pub font: Option<PathBuf>,

    /// JSON config file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Config file settings with command-line flags applied on top.
    pub fn resolve_config(&self) -> Result<RuntimeConfig> {
        let mut config = RuntimeConfig::load(self.config.as_deref())?;
        self.apply_to(&mut config);
        Ok(config)
    }

    /// Overwrite the settings that were given on the command line.
    pub fn apply_to(&self, config: &mut RuntimeConfig) {
        if let Some(dir) = &self.folder_path_to_jsons {
            config.history_dir = dir.clone();
        }
        if let Some(path) = &self.coords {
            config.reference_path = path.clone();
        }
        if let Some(path) = &self.image {
            config.base_image = path.clone();
        }
        if let Some(path) = &self.output {
            config.output_image = path.clone();
        }
        if let Some(path) = &self.frequencies {
            config.frequencies_path = path.clone();
        }
        if let Some(path) = &self.font {
            config.font_path = Some(path.clone());
        }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate shell completions
    ///
    /// Usage: listening-compass completion bash > ~/.local/share/bash-completion/completions/listening-compass
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Parse a `YYYYMMDD` date argument.
pub fn parse_cli_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|e| format!("invalid date '{value}' ({e}); expected YYYYMMDD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_cli_date() {
        assert_eq!(parse_cli_date("20230115"), Ok(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()));
        assert!(parse_cli_date("2023-01-15").is_err());
        assert!(parse_cli_date("20231301").is_err());
        assert!(parse_cli_date("").is_err());
    }

    #[test]
    fn test_run_flags() {
        let args = Args::try_parse_from([
            "listening-compass",
            "--folder-path-to-jsons",
            "export",
            "--start-date",
            "20230101",
            "--end-date",
            "20231231",
            "-o",
            "out.png",
        ])
        .unwrap();

        assert!(args.command.is_none());
        assert_eq!(args.run.folder_path_to_jsons, Some(PathBuf::from("export")));
        assert_eq!(args.run.start_date, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(args.run.end_date, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(args.run.output, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = RuntimeConfig {
            reference_path: PathBuf::from("/from/config/coords.csv"),
            base_image: PathBuf::from("/from/config/compass.jpg"),
            ..RuntimeConfig::default()
        };
        let run = RunArgs {
            folder_path_to_jsons: Some(PathBuf::from("export")),
            coords: Some(PathBuf::from("mine.csv")),
            ..RunArgs::default()
        };

        run.apply_to(&mut config);
        assert_eq!(config.history_dir, PathBuf::from("export"));
        assert_eq!(config.reference_path, PathBuf::from("mine.csv"));
        assert_eq!(config.base_image, PathBuf::from("/from/config/compass.jpg"));
    }

    #[test]
    fn test_date_range_from_flags() {
        let run = RunArgs {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            ..RunArgs::default()
        };
        let range = run.date_range();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_bad_date_is_a_usage_error() {
        assert!(Args::try_parse_from(["listening-compass", "--start-date", "yesterday"]).is_err());
    }

    #[test]
    fn test_completion_subcommand() {
        let args = Args::try_parse_from(["listening-compass", "completion", "zsh"]).unwrap();
        assert!(matches!(args.command, Some(Command::Completion { shell: Shell::Zsh })));
    }
}
