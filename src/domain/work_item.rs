//! Work item domain model
//!
//! Work items are the task-like units the engine arranges into trees,
//! aggregates, and places on the timeline. They are plain read-only records
//! taken from a snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::deserialize_optional_date;
use super::id::{deserialize_optional_id, ItemId, MilestoneId};
use super::tags::deserialize_tags;

/// Status of a work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    #[serde(alias = "not-started", alias = "todo")]
    NotStarted,
    #[serde(alias = "in-progress")]
    InProgress,
    #[serde(alias = "in-review")]
    InReview,
    Done,
    Blocked,
}

impl WorkStatus {
    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, WorkStatus::Done)
    }

    /// Returns the project phase this status belongs to
    ///
    /// Blocked items sit outside the phase breakdown.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            WorkStatus::NotStarted => Some(Phase::Planning),
            WorkStatus::InProgress => Some(Phase::Execution),
            WorkStatus::InReview => Some(Phase::Control),
            WorkStatus::Done => Some(Phase::Closure),
            WorkStatus::Blocked => None,
        }
    }

    /// Returns a short display label
    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::NotStarted => "not started",
            WorkStatus::InProgress => "in progress",
            WorkStatus::InReview => "in review",
            WorkStatus::Done => "done",
            WorkStatus::Blocked => "blocked",
        }
    }

    /// All statuses in display order
    pub const ALL: [WorkStatus; 5] = [
        WorkStatus::NotStarted,
        WorkStatus::InProgress,
        WorkStatus::InReview,
        WorkStatus::Done,
        WorkStatus::Blocked,
    ];
}

/// Project management phase, derived from work status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Execution,
    Control,
    Closure,
}

impl Phase {
    /// Phases in breakdown order
    pub const ALL: [Phase; 4] = [
        Phase::Planning,
        Phase::Execution,
        Phase::Control,
        Phase::Closure,
    ];

    /// Returns the status that maps to this phase
    pub fn status(&self) -> WorkStatus {
        match self {
            Phase::Planning => WorkStatus::NotStarted,
            Phase::Execution => WorkStatus::InProgress,
            Phase::Control => WorkStatus::InReview,
            Phase::Closure => WorkStatus::Done,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Planning => "Planning",
            Phase::Execution => "Execution",
            Phase::Control => "Monitoring & Control",
            Phase::Closure => "Closure",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Phase::Planning => "Work packages not yet started",
            Phase::Execution => "Work packages in progress",
            Phase::Control => "Work packages under review",
            Phase::Closure => "Completed work packages",
        }
    }
}

/// A unit of work from the project snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier
    pub id: ItemId,

    /// Human-readable title
    pub title: String,

    /// Parent work item, if any
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<ItemId>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<NaiveDate>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,

    /// Estimated effort in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Actual effort in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,

    #[serde(default)]
    pub status: WorkStatus,

    /// Deliverable (milestone) this item contributes to
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub deliverable_id: Option<MilestoneId>,

    #[serde(
        default,
        deserialize_with = "deserialize_tags",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
}

impl WorkItem {
    /// Creates an undated work item with the given ID and title
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            parent_id: None,
            start_date: None,
            end_date: None,
            estimated_hours: None,
            actual_hours: None,
            status: WorkStatus::NotStarted,
            deliverable_id: None,
            tags: Vec::new(),
        }
    }

    /// Returns the (start, end) pair when both dates are present
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }

    /// Returns true if both dates are present
    pub fn is_dated(&self) -> bool {
        self.date_range().is_some()
    }

    /// Estimated effort in hours, with missing or invalid values counted as zero
    pub fn effort(&self) -> f64 {
        match self.estimated_hours {
            Some(hours) if hours.is_finite() && hours > 0.0 => hours,
            _ => 0.0,
        }
    }

    /// Effort counted as completed: the estimate when done, otherwise zero
    pub fn completed_effort(&self) -> f64 {
        if self.status.is_complete() {
            self.effort()
        } else {
            0.0
        }
    }

    pub fn with_parent(mut self, parent: ItemId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_estimate(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_deliverable(mut self, milestone: MilestoneId) -> Self {
        self.deliverable_id = Some(milestone);
        self
    }
}
