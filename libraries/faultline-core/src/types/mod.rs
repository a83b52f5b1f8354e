/// Domain types
pub mod issue;
pub mod user;

pub use issue::{
    Issue, IssueChanges, IssuePriority, IssueSeverity, IssueStatus, NewIssue, Pagination,
    StatusCounts,
};
pub use user::{OwnerSummary, User};
