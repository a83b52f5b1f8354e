//! Faultline Core
//!
//! Domain types and field validation for the Faultline issue tracker.
//!
//! This crate is I/O free: it defines the `User` and `Issue` domain types,
//! the three four-valued classification enums, and the pure validators
//! shared by every write path.

pub mod types;
pub mod validation;

pub use types::{
    Issue, IssueChanges, IssuePriority, IssueSeverity, IssueStatus, NewIssue, OwnerSummary,
    Pagination, StatusCounts, User,
};
pub use validation::FieldError;
