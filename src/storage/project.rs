//! Project management
//!
//! Handles project initialization and provides access to the snapshot store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::jsonl::{MILESTONES_FILE, WORK_ITEMS_FILE};
use super::{Config, SnapshotStore};
use crate::domain::Snapshot;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a planline project. Run 'planline init' first.")]
    NotInProject,
}

const DEFAULT_CONFIG: &str = r#"# Planline configuration

# Zoom used by 'planline timeline' (day, week, month)
default_zoom = "week"

# Grouping used by 'planline wbs' (deliverable, phase)
default_grouping = "deliverable"

# Name of the WBS group for work items without a deliverable
unassigned_label = "Unassigned"
"#;

/// A Planline project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".planline").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Existing files are left untouched, so this is safe to run twice.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let planline_dir = root.join(".planline");

        fs::create_dir_all(&planline_dir).with_context(|| {
            format!(
                "Failed to create .planline directory: {}",
                planline_dir.display()
            )
        })?;

        let config_path = planline_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        for name in [WORK_ITEMS_FILE, MILESTONES_FILE] {
            let path = planline_dir.join(name);
            if !path.exists() {
                fs::write(&path, "")
                    .with_context(|| format!("Failed to create {}", path.display()))?;
            }
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .planline directory path
    pub fn planline_dir(&self) -> PathBuf {
        self.root.join(".planline")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the snapshot store
    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::for_project(&self.root)
    }

    /// Reads the current snapshot of work items and milestones
    pub fn load_snapshot(&self) -> Result<Snapshot> {
        self.store().read_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.planline_dir().is_dir());
        assert!(project.planline_dir().join("config.toml").is_file());
        assert!(project.store().work_items_path().is_file());
        assert!(project.store().milestones_path().is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        fs::write(
            dir.path().join(".planline").join(WORK_ITEMS_FILE),
            r#"{"id":"a","title":"Keep me"}"#,
        )
        .unwrap();
        Project::init(dir.path()).unwrap(); // Should not fail or truncate

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.load_snapshot().unwrap().work_items.len(), 1);
    }

    #[test]
    fn default_config_parses() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();
        assert_eq!(project.config().project.unassigned_label, "Unassigned");
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn empty_project_has_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();
        assert!(project.load_snapshot().unwrap().is_empty());
    }
}
