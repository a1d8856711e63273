//! JSONL snapshot files
//!
//! Work items live in `.planline/work_items.jsonl` and milestones in
//! `.planline/milestones.jsonl`, one JSON object per line. Reads take a
//! shared lock so a concurrent writer of the cache never yields a torn read.
//! This store never writes records.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;

use crate::domain::{Milestone, Snapshot, WorkItem};

pub const WORK_ITEMS_FILE: &str = "work_items.jsonl";
pub const MILESTONES_FILE: &str = "milestones.jsonl";

/// Read-only access to a project's snapshot files
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store reading from the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".planline"))
    }

    pub fn work_items_path(&self) -> PathBuf {
        self.dir.join(WORK_ITEMS_FILE)
    }

    pub fn milestones_path(&self) -> PathBuf {
        self.dir.join(MILESTONES_FILE)
    }

    /// Reads all work items in file order
    pub fn read_work_items(&self) -> Result<Vec<WorkItem>> {
        read_records(&self.work_items_path(), "work item")
    }

    /// Reads all milestones in file order
    pub fn read_milestones(&self) -> Result<Vec<Milestone>> {
        read_records(&self.milestones_path(), "milestone")
    }

    /// Reads both files into a snapshot
    pub fn read_snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot::new(
            self.read_work_items()?,
            self.read_milestones()?,
        ))
    }
}

fn read_records<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", kind, path.display()))?;

    // Acquire shared lock for reading
    FileExt::lock_shared(&file)
        .with_context(|| format!("Failed to acquire read lock on {}", path.display()))?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!("Failed to read line {} of {}", line_num + 1, path.display())
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let record: T = serde_json::from_str(&line).with_context(|| {
            format!(
                "Failed to parse {} at line {} of {}",
                kind,
                line_num + 1,
                path.display()
            )
        })?;

        records.push(record);
    }

    // Lock is released when file is dropped
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let snapshot = store.read_snapshot().unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn reads_records_in_file_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(WORK_ITEMS_FILE),
            concat!(
                r#"{"id":"b","title":"Second","tags":["x"]}"#,
                "\n\n",
                r#"{"id":"a","title":"First","parent_id":"b","tags":"y, z"}"#,
                "\n",
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join(MILESTONES_FILE),
            r#"{"id":"m1","name":"Beta","target_date":"2024-06-01"}"#,
        )
        .unwrap();

        let store = SnapshotStore::new(dir.path());
        let snapshot = store.read_snapshot().unwrap();

        let ids: Vec<_> = snapshot.work_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(snapshot.work_items[1].tags, vec!["y", "z"]);
        assert_eq!(snapshot.milestones.len(), 1);
    }

    #[test]
    fn loose_optional_fields_do_not_fail_the_load() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(WORK_ITEMS_FILE),
            concat!(
                r#"{"id":"a","title":"A","start_date":20240101,"parent_id":""}"#,
                "\n",
                r#"{"id":"b","title":"B","deliverable_id":"","end_date":"+262142-12-20"}"#,
                "\n",
            ),
        )
        .unwrap();

        let snapshot = SnapshotStore::new(dir.path()).read_snapshot().unwrap();
        assert_eq!(snapshot.work_items.len(), 2);
        assert!(snapshot.work_items[0].start_date.is_none());
        assert!(snapshot.work_items[0].parent_id.is_none());
        assert!(snapshot.work_items[1].deliverable_id.is_none());
        assert!(snapshot.work_items[1].end_date.is_none());
        assert_eq!(snapshot.forest().unwrap().len(), 2);
    }

    #[test]
    fn malformed_line_reports_location() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MILESTONES_FILE),
            concat!(
                r#"{"id":"m1","name":"Beta","target_date":"2024-06-01"}"#,
                "\n",
                r#"{"id":"m2","name":"GA","target_date":"later"}"#,
                "\n",
            ),
        )
        .unwrap();

        let store = SnapshotStore::new(dir.path());
        let err = store.read_milestones().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("line 2"), "unexpected error: {}", message);
    }
}
