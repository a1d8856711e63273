//! Milestone (deliverable) domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::deserialize_date;
use super::id::MilestoneId;

/// Status of a milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    Achieved,
    Missed,
}

impl MilestoneStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::Achieved => "achieved",
            MilestoneStatus::Missed => "missed",
        }
    }
}

/// A dated target, optionally grouping the work items that deliver it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,

    pub name: String,

    #[serde(deserialize_with = "deserialize_date")]
    pub target_date: NaiveDate,

    #[serde(default)]
    pub status: MilestoneStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Milestone {
    /// Creates a pending milestone
    pub fn new(id: MilestoneId, name: impl Into<String>, target_date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            target_date,
            status: MilestoneStatus::Pending,
            description: None,
        }
    }

    pub fn with_status(mut self, status: MilestoneStatus) -> Self {
        self.status = status;
        self
    }
}
