/// Issue domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::user::OwnerSummary;

/// Issue workflow status.
///
/// The four values form an unordered set: the server enforces no transition
/// graph, so any status may replace any other in a single update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 4] = [
        IssueStatus::Open,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::InProgress => "InProgress",
            IssueStatus::Resolved => "Resolved",
            IssueStatus::Closed => "Closed",
        }
    }
}

impl Default for IssueStatus {
    fn default() -> Self {
        IssueStatus::Open
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(IssueStatus::Open),
            "InProgress" => Ok(IssueStatus::InProgress),
            "Resolved" => Ok(IssueStatus::Resolved),
            "Closed" => Ok(IssueStatus::Closed),
            other => Err(format!(
                "invalid status '{other}' (expected Open, InProgress, Resolved or Closed)"
            )),
        }
    }
}

/// Issue priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl IssuePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Low => "Low",
            IssuePriority::Medium => "Medium",
            IssuePriority::High => "High",
            IssuePriority::Critical => "Critical",
        }
    }
}

impl Default for IssuePriority {
    fn default() -> Self {
        IssuePriority::Medium
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssuePriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(IssuePriority::Low),
            "Medium" => Ok(IssuePriority::Medium),
            "High" => Ok(IssuePriority::High),
            "Critical" => Ok(IssuePriority::Critical),
            other => Err(format!(
                "invalid priority '{other}' (expected Low, Medium, High or Critical)"
            )),
        }
    }
}

/// Issue severity. Independent of priority even though the value sets match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Low => "Low",
            IssueSeverity::Medium => "Medium",
            IssueSeverity::High => "High",
            IssueSeverity::Critical => "Critical",
        }
    }
}

impl Default for IssueSeverity {
    fn default() -> Self {
        IssueSeverity::Medium
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(IssueSeverity::Low),
            "Medium" => Ok(IssueSeverity::Medium),
            "High" => Ok(IssueSeverity::High),
            "Critical" => Ok(IssueSeverity::Critical),
            other => Err(format!(
                "invalid severity '{other}' (expected Low, Medium, High or Critical)"
            )),
        }
    }
}

/// A tracked issue, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Unique issue identifier
    pub id: i64,

    /// Short summary, trimmed, 3-255 characters
    pub title: String,

    /// Full description, trimmed, 10-5000 characters
    pub description: String,

    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub severity: IssueSeverity,

    /// Owning user; immutable after creation
    pub owner_id: i64,

    /// Owner projection (id, email, name) - never credentials
    pub owner: OwnerSummary,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new issue, defaults already applied.
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub severity: IssueSeverity,
}

/// Partial update: `None` fields are left untouched by the storage layer.
#[derive(Debug, Clone, Default)]
pub struct IssueChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub severity: Option<IssueSeverity>,
}

impl IssueChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.severity.is_none()
    }
}

/// Offset pagination metadata returned next to every issue list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    /// Compute the metadata for a page of `total_count` matching rows.
    ///
    /// `limit` must be >= 1; callers clamp it before reaching this point.
    /// The ceiling division saturates so an absurd client-supplied limit
    /// cannot overflow.
    pub fn compute(page: i64, limit: i64, total_count: i64) -> Self {
        let total_pages = total_count.saturating_add(limit - 1) / limit;
        Self {
            page,
            limit,
            total_count,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

/// Per-status issue counts. Serializes with the enum value names as keys so
/// statuses with zero issues still appear explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(rename = "Open")]
    pub open: i64,

    #[serde(rename = "InProgress")]
    pub in_progress: i64,

    #[serde(rename = "Resolved")]
    pub resolved: i64,

    #[serde(rename = "Closed")]
    pub closed: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.open + self.in_progress + self.resolved + self.closed
    }

    /// Record a grouped count for one status.
    pub fn set(&mut self, status: IssueStatus, count: i64) {
        match status {
            IssueStatus::Open => self.open = count,
            IssueStatus::InProgress => self.in_progress = count,
            IssueStatus::Resolved => self.resolved = count,
            IssueStatus::Closed => self.closed = count,
        }
    }
}
