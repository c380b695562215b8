//! # Streaming History Ingest
//!
//! Finds the audio history files in an export directory and reads each one
//! as a JSON array of raw records.
//!
//! A file that cannot be read or is not a JSON array is reported and left
//! out; the remaining files are still loaded.

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name prefix of audio history files in an export.
pub const DEFAULT_FILE_PREFIX: &str = "Streaming_History_Audio";
/// Default file name suffix of audio history files in an export.
pub const DEFAULT_FILE_SUFFIX: &str = ".json";

/// Which files in the export directory hold listening history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPattern {
    pub prefix: String,
    pub suffix: String,
}

impl Default for HistoryPattern {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            suffix: DEFAULT_FILE_SUFFIX.to_string(),
        }
    }
}

impl HistoryPattern {
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.prefix) && file_name.ends_with(&self.suffix)
    }
}

/// Raw records of one history file.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    pub name: String,
    pub records: Vec<Value>,
}

/// List history files in `dir`, sorted by file name.
///
/// # Errors
///
/// Fails when `dir` cannot be listed.
pub fn discover_history_files(dir: &Path, pattern: &HistoryPattern) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list history directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        let matched = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| pattern.matches(name));

        if matched && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    debug!("Discovered {} history files in {}", files.len(), dir.display());
    Ok(files)
}

/// Read one history file as a JSON array of records.
pub fn read_history_file(path: &Path) -> Result<HistoryFile> {
    let name = display_name(path);
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {name}"))?;

    match value {
        Value::Array(records) => Ok(HistoryFile { name, records }),
        other => Err(anyhow!(
            "Expected a JSON array of listens in {name}, found {}",
            json_kind(&other)
        )),
    }
}

/// Read every file in `paths`, skipping the ones that fail with a warning.
pub fn load_history_files(paths: &[PathBuf]) -> Vec<HistoryFile> {
    paths
        .iter()
        .filter_map(|path| match read_history_file(path) {
            Ok(file) => {
                debug!("Read {} records from {}", file.records.len(), file.name);
                Some(file)
            }
            Err(e) => {
                warn!("Error reading {}: {e:#}", display_name(path));
                None
            }
        })
        .collect()
}

/// File name for messages, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
