//! # Storage Layer
//!
//! The flat-file boundary between project data and the engine. The engine
//! only ever reads: records are decoded here (dates parsed, tag fields
//! normalized) and handed over as a [`Snapshot`](crate::domain::Snapshot).
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Work items | JSONL (one JSON per line) | `.planline/work_items.jsonl` |
//! | Milestones | JSONL (one JSON per line) | `.planline/milestones.jsonl` |
//! | Config | TOML | `.planline/config.toml` |
//!
//! ## Concurrency Safety
//!
//! [`SnapshotStore`] takes a shared file lock (`fs2`) while reading, so a
//! concurrent writer of the cache files never yields a torn snapshot.
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a Planline project
//! - [`SnapshotStore`] - Read work items and milestones from JSONL
//! - [`Config`] - Project and global configuration

mod config;
mod jsonl;
mod project;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig};
pub use jsonl::{SnapshotStore, MILESTONES_FILE, WORK_ITEMS_FILE};
pub use project::{Project, ProjectError};
