//! Main CLI application structure

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::warn;

use super::output::{Output, OutputFormat};
use super::{query, timeline, tree, wbs};
use crate::domain::{Grouping, Snapshot, ZoomMode};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "planline")]
#[command(author, version, about = "Timeline, rollup and WBS views over local project snapshots")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Date treated as today when nothing in the project is dated (YYYY-MM-DD)
    #[arg(long, global = true, env = "PLANLINE_TODAY")]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new planline project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Show the work item hierarchy with effort rollups
    Tree {
        /// Only show nodes up to this depth (0 = roots only)
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Show the timeline range, periods and item placement
    Timeline {
        /// Zoom mode (day, week, month)
        #[arg(long, short = 'z')]
        zoom: Option<ZoomMode>,
    },

    /// Show work items and milestones in date order
    Agenda,

    /// Show the work breakdown structure
    Wbs {
        /// Grouping (deliverable, phase)
        #[arg(long, short = 'g')]
        group_by: Option<Grouping>,

        /// List the work packages of each group
        #[arg(long)]
        items: bool,
    },

    /// Show project status overview
    Status,

    /// Export every view of the project as one document
    Report {
        /// Zoom mode (day, week, month)
        #[arg(long, short = 'z')]
        zoom: Option<ZoomMode>,

        /// Grouping (deliverable, phase)
        #[arg(long, short = 'g')]
        group_by: Option<Grouping>,
    },
}

/// Shared state for commands that read a project
pub struct Context {
    pub project: Project,
    pub snapshot: Snapshot,
    pub today: NaiveDate,
}

impl Context {
    /// Opens the current project and reads its snapshot
    pub fn load(output: &Output, today: NaiveDate) -> Result<Self> {
        let project = Project::open_current()?;
        output.verbose_ctx(
            "load",
            &format!("Opened project at: {}", project.root().display()),
        );

        let snapshot = project.load_snapshot()?;
        output.verbose_ctx(
            "load",
            &format!(
                "Read {} work items and {} milestones",
                snapshot.work_items.len(),
                snapshot.milestones.len()
            ),
        );

        Ok(Self {
            project,
            snapshot,
            today,
        })
    }

    pub fn zoom(&self, requested: Option<ZoomMode>) -> ZoomMode {
        requested.unwrap_or(self.project.config().project.default_zoom)
    }

    pub fn grouping(&self, requested: Option<Grouping>) -> Grouping {
        requested.unwrap_or(self.project.config().project.default_grouping)
    }

    pub fn unassigned_label(&self) -> &str {
        &self.project.config().project.unassigned_label
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn resolve_format(requested: Option<OutputFormat>) -> OutputFormat {
    requested.unwrap_or_else(|| match Config::load_global() {
        Ok(global) => global.default_format.into(),
        Err(e) => {
            warn!("Ignoring global config: {:#}", e);
            OutputFormat::default()
        }
    })
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(resolve_format(cli.format), cli.verbose);
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    output.verbose(&format!("Planline starting, today is {}", today));

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .planline directory at: {}", project.planline_dir().display()),
            );
            output.success(&format!(
                "Initialized planline project at {}",
                project.root().display()
            ));
        }

        Commands::Tree { depth } => {
            let ctx = Context::load(&output, today)?;
            tree::run(&output, &ctx, depth)?
        }

        Commands::Timeline { zoom } => {
            let ctx = Context::load(&output, today)?;
            timeline::run(&output, &ctx, ctx.zoom(zoom))?
        }

        Commands::Agenda => {
            let ctx = Context::load(&output, today)?;
            query::agenda(&output, &ctx)?
        }

        Commands::Wbs { group_by, items } => {
            let ctx = Context::load(&output, today)?;
            wbs::run(&output, &ctx, ctx.grouping(group_by), items)?
        }

        Commands::Status => {
            let ctx = Context::load(&output, today)?;
            query::status(&output, &ctx)?
        }

        Commands::Report { zoom, group_by } => {
            let ctx = Context::load(&output, today)?;
            query::report(&output, &ctx, ctx.zoom(zoom), ctx.grouping(group_by))?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
