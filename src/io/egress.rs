//! Snapshot egress - writes state snapshots as JSONL
//!
//! One JSON object per line, appended to the configured file or written to
//! stdout when no file is set.

use crate::io::snapshot::StateSnapshot;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

enum Target {
    Stdout,
    File(String),
}

pub struct SnapshotWriter {
    target: Target,
    written: usize,
}

impl SnapshotWriter {
    pub fn new(file_path: Option<&str>) -> Self {
        let target = match file_path {
            Some(path) => {
                info!(file_path = %path, "snapshot_egress_initialized");
                Target::File(path.to_string())
            }
            None => Target::Stdout,
        };
        Self { target, written: 0 }
    }

    /// Write one snapshot. Returns true if successful.
    pub fn write(&mut self, snapshot: &StateSnapshot) -> bool {
        let json = snapshot.to_json();
        let result = match &self.target {
            Target::Stdout => writeln!(std::io::stdout().lock(), "{json}"),
            Target::File(path) => Self::append_line(path, &json),
        };

        match result {
            Ok(()) => {
                self.written += 1;
                true
            }
            Err(e) => {
                error!(error = %e, "snapshot_egress_failed");
                false
            }
        }
    }

    fn append_line(file_path: &str, line: &str) -> std::io::Result<()> {
        let path = Path::new(file_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        debug!(file = %file_path, bytes = %line.len(), "snapshot_written");

        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }
}
