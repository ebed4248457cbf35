//! Filesystem layout and persistence for export and coaching reports.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, SecondsFormat, Utc};
use common::{Error, ExportDocument, Period, PeriodKind, Result};

/// Store rooted at the exports directory.
///
/// Layout:
///
/// ```text
/// exports/
///   2025/08/daily/2025-08-25.json
///   2025/08/weekly/2025-W35.json
///   2025/08/monthly/2025-08.json
///   coaching/weekly/2025-W35.json
///   coaching/monthly/2025-08.json
/// ```
pub struct ExportStore {
    root: PathBuf,
}

impl ExportStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical path for a period's export document. Weekly files are
    /// filed under the year and month of their Monday.
    pub fn document_path(&self, period: &Period) -> PathBuf {
        let start = period.start();
        self.root
            .join(format!("{:04}", start.year()))
            .join(format!("{:02}", start.month()))
            .join(period.kind().dir_name())
            .join(format!("{}.json", period.label()))
    }

    pub fn coaching_path(&self, cadence: &str, label: &str) -> PathBuf {
        self.root
            .join("coaching")
            .join(cadence)
            .join(format!("{}.json", label))
    }

    pub fn load_document(&self, path: &Path) -> Result<ExportDocument> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save_document(&self, path: &Path, doc: &ExportDocument) -> Result<()> {
        let data = serde_json::to_string_pretty(doc)?;
        write_atomic(path, &data)
    }

    pub fn save_coaching(&self, path: &Path, report: &serde_json::Value) -> Result<()> {
        let data = serde_json::to_string_pretty(report)?;
        write_atomic(path, &data)
    }

    /// Every export document under the tree, sorted for a stable batch
    /// order. Coaching reports are not export documents.
    pub fn list_documents(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !self.root.is_dir() {
            return Ok(files);
        }

        for year in fs::read_dir(&self.root)? {
            let year = year?;
            if !year.file_type()?.is_dir() || year.file_name() == "coaching" {
                continue;
            }
            for month in fs::read_dir(year.path())? {
                let month = month?;
                if !month.file_type()?.is_dir() {
                    continue;
                }
                for kind in PeriodKind::ALL {
                    let dir = month.path().join(kind.dir_name());
                    if !dir.is_dir() {
                        continue;
                    }
                    for entry in fs::read_dir(dir)? {
                        let path = entry?.path();
                        if path.extension().and_then(|e| e.to_str()) == Some("json") {
                            files.push(path);
                        }
                    }
                }
            }
        }

        files.sort();
        Ok(files)
    }

    /// Locate a period's document anywhere in the tree. Edge-of-month
    /// weeks are filed under their Monday's month, so a lookup by label
    /// cannot assume which month directory holds the file.
    pub fn find_document(&self, kind: PeriodKind, label: &str) -> Option<PathBuf> {
        let target = format!("{}.json", label);
        let files = self.list_documents().ok()?;
        files.into_iter().find(|path| {
            path.parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
                == Some(kind.dir_name())
                && path.file_name().and_then(|name| name.to_str()) == Some(target.as_str())
        })
    }
}

/// Write via a temp file in the same directory and rename into place,
/// so an interrupted run cannot leave a truncated document behind.
fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Other(format!("no parent directory for {}", path.display())))?;
    fs::create_dir_all(parent)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Timestamp in the `YYYY-MM-DD HH:MM:SS` form export documents carry.
pub fn now_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// RFC 3339 timestamp for coaching reports.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
