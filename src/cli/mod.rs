//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create `.planline/` with config and empty snapshot files |
//! | `tree` | Work item hierarchy with effort rollups |
//! | `timeline` | Timeline range, periods and bar placement |
//! | `agenda` | Work items and milestones in date order |
//! | `wbs` | Work breakdown structure by deliverable or phase |
//! | `status` | Counts and overall completion |
//! | `report` | Every view in one JSON document |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! planline --verbose timeline --zoom month
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod query;
mod timeline;
mod tree;
mod wbs;

pub use app::{Cli, Commands, Context, run};
pub use output::{Output, OutputFormat};
