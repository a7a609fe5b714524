//! Sighting journal — appends recognition events to a text log and a CSV
//! log, with a per-label cooldown against duplicate entries.

use chrono::{DateTime, Local, TimeDelta};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const TEXT_LOG: &str = "recognition_log.txt";
const CSV_LOG: &str = "recognition_log.csv";
const CSV_HEADER: [&str; 3] = ["Timestamp", "Name", "Confidence (%)"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("cannot create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("log write failed: {0}")]
    Write(#[from] std::io::Error),
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only sighting logs plus the cooldown state that throttles them.
pub struct Journal {
    text: File,
    csv: csv::Writer<File>,
    text_path: PathBuf,
    csv_path: PathBuf,
    cooldown: TimeDelta,
    last_logged: HashMap<String, DateTime<Local>>,
}

impl Journal {
    /// Open (creating as needed) the sighting logs under `log_dir`.
    ///
    /// A freshly created CSV log gets its header row exactly once; existing
    /// logs are appended to untouched.
    pub fn open(log_dir: &Path, cooldown_secs: i64) -> Result<Self, JournalError> {
        std::fs::create_dir_all(log_dir).map_err(|source| JournalError::CreateDir {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let text_path = log_dir.join(TEXT_LOG);
        let csv_path = log_dir.join(CSV_LOG);

        let text = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&text_path)
            .map_err(|source| JournalError::Open {
                path: text_path.clone(),
                source,
            })?;

        let needs_header = !csv_path.exists();
        let csv_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&csv_path)
            .map_err(|source| JournalError::Open {
                path: csv_path.clone(),
                source,
            })?;

        let mut csv = csv::Writer::from_writer(csv_file);
        if needs_header {
            csv.write_record(CSV_HEADER)?;
            csv.flush()?;
        }

        Ok(Self {
            text,
            csv,
            text_path,
            csv_path,
            cooldown: TimeDelta::seconds(cooldown_secs),
            last_logged: HashMap::new(),
        })
    }

    /// Record a sighting unless the same name was logged within the cooldown
    /// window. Returns whether an entry was written.
    ///
    /// The window is strict: a repeat exactly `cooldown` after the prior
    /// entry is still suppressed.
    pub fn record(
        &mut self,
        name: &str,
        confidence: f32,
        now: DateTime<Local>,
    ) -> Result<bool, JournalError> {
        if let Some(last) = self.last_logged.get(name) {
            if now.signed_duration_since(*last) <= self.cooldown {
                return Ok(false);
            }
        }

        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        let confidence_2dp = format!("{confidence:.2}");

        writeln!(self.text, "{stamp} - {name} ({confidence_2dp}%)")?;
        self.text.flush()?;

        self.csv
            .write_record([stamp.as_str(), name, confidence_2dp.as_str()])?;
        self.csv.flush()?;

        self.last_logged.insert(name.to_string(), now);
        tracing::info!(name, confidence = %confidence_2dp, %stamp, "sighting logged");

        Ok(true)
    }

    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
