//! Text reports over the session counters.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{info, warn};

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::Stats;

/// A snapshot of the counters at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    pub generated_at: NaiveDateTime,
    pub stats: Stats,
}

impl Report {
    pub fn new(stats: Stats, now: NaiveDateTime) -> Self {
        Self {
            generated_at: now,
            stats,
        }
    }

    /// Renders the report text.
    pub fn generate(stats: &Stats, now: NaiveDateTime) -> String {
        Self::new(*stats, now).to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(f, "=== Traffic Control System - Report ===")?;
        writeln!(
            f,
            "Generated at: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f)?;
        writeln!(f, "Simulation starts: {}", stats.simulation_starts())?;
        writeln!(f, "Total congestion alerts: {}", stats.total_congestion_alerts())?;
        writeln!(f, "Route optimizations: {}", stats.route_optimizations())?;
        writeln!(f, "Total simulation time (s): {}", stats.total_simulation_seconds())?;
        writeln!(f)?;
        writeln!(f, "Notes:")?;
        writeln!(f, "- Congestion alerts are simulated randomly during runs.")?;
        writeln!(f, "- Route optimization suggestions are sample/demo values.")?;
        writeln!(f)?;
        writeln!(f, "End of report.")
    }
}

/// Saves reports as timestamped text files.
#[derive(Clone, Debug)]
pub struct ReportWriter {
    dir: PathBuf,
    prefix: String,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.dir.clone(), config.prefix.clone())
    }

    /// The file name a report saved at `now` gets.
    pub fn file_name(&self, now: NaiveDateTime) -> String {
        format!("{}_{}.txt", self.prefix, now.format("%Y%m%d_%H%M%S"))
    }

    /// The full path a report saved at `now` gets.
    pub fn path(&self, now: NaiveDateTime) -> PathBuf {
        self.dir.join(self.file_name(now))
    }

    /// Writes `text` to the report file for `now`, returning its path.
    ///
    /// The file is either written in full or left as it was.
    pub fn persist(&self, text: &str, now: NaiveDateTime) -> Result<PathBuf, ReportError> {
        let path = self.path(now);
        match write_atomic(&path, text.as_bytes()) {
            Ok(()) => {
                info!("saved report to {}", path.display());
                Ok(path)
            }
            Err(source) => {
                warn!("failed to save report to {}: {}", path.display(), source);
                Err(ReportError::Io { path, source })
            }
        }
    }
}

/// Writes to `{path}.tmp`, syncs it, then renames it over `path`.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let result = write_synced(&tmp_path, data).and_then(|()| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
