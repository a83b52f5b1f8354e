//! Issue store and list query engine
//!
//! The list query builds its predicate dynamically: the owner scope is
//! always present, a search term adds a case-insensitive OR over title and
//! description, and each classification filter adds an equality check. The
//! same predicate drives both the page read and the `COUNT(*)`; the two
//! reads are not wrapped in a transaction, so cosmetic drift between them
//! under concurrent writes is accepted.

use chrono::{DateTime, Utc};
use faultline_core::types::{
    Issue, IssueChanges, IssuePriority, IssueSeverity, IssueStatus, NewIssue, OwnerSummary,
    Pagination, StatusCounts,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;

use crate::error::{Result, StorageError};

/// Parameters for the issue list query. `page` and `limit` are already
/// coerced and clamped (>= 1) by the API layer.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub severity: Option<IssueSeverity>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            status: None,
            priority: None,
            severity: None,
        }
    }
}

/// One page of issues plus the pagination metadata for the full match set.
#[derive(Debug)]
pub struct IssueListing {
    pub issues: Vec<Issue>,
    pub pagination: Pagination,
}

#[derive(Debug, sqlx::FromRow)]
struct IssueRow {
    id: i64,
    title: String,
    description: String,
    status: String,
    priority: String,
    severity: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_email: String,
    owner_name: Option<String>,
}

impl TryFrom<IssueRow> for Issue {
    type Error = StorageError;

    fn try_from(row: IssueRow) -> Result<Self> {
        Ok(Issue {
            id: row.id,
            title: row.title,
            description: row.description,
            status: IssueStatus::from_str(&row.status).map_err(StorageError::Corrupt)?,
            priority: IssuePriority::from_str(&row.priority).map_err(StorageError::Corrupt)?,
            severity: IssueSeverity::from_str(&row.severity).map_err(StorageError::Corrupt)?,
            owner: OwnerSummary {
                id: row.owner_id,
                email: row.owner_email,
                name: row.owner_name,
            },
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Issue columns plus the owner projection (id, email, name - never the hash).
const SELECT_ISSUE: &str = "SELECT i.id, i.title, i.description, i.status, i.priority, \
     i.severity, i.owner_id, i.created_at, i.updated_at, \
     u.email AS owner_email, u.name AS owner_name \
     FROM issues i JOIN users u ON u.id = i.owner_id";

/// Append the shared WHERE clause: owner scope AND search AND filters.
fn push_predicate(qb: &mut QueryBuilder<'_, Sqlite>, owner_id: i64, params: &ListParams) {
    qb.push(" WHERE i.owner_id = ").push_bind(owner_id);

    if let Some(term) = params.search.as_deref() {
        // The term is matched literally: LIKE wildcards inside it are
        // escaped so "50%" does not match every "50". SQLite LIKE is
        // already case-insensitive for ASCII.
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{escaped}%");
        qb.push(" AND (i.title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR i.description LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(status) = params.status {
        qb.push(" AND i.status = ").push_bind(status.as_str());
    }
    if let Some(priority) = params.priority {
        qb.push(" AND i.priority = ").push_bind(priority.as_str());
    }
    if let Some(severity) = params.severity {
        qb.push(" AND i.severity = ").push_bind(severity.as_str());
    }
}

/// List one page of the owner's issues, newest first, with total counts for
/// the full predicate (ignoring the page window).
pub async fn list(pool: &SqlitePool, owner_id: i64, params: &ListParams) -> Result<IssueListing> {
    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM issues i");
    push_predicate(&mut count_query, owner_id, params);
    let total_count: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    // Saturating: a huge page or limit yields an offset past every row
    // instead of overflowing
    let offset = params.page.saturating_sub(1).saturating_mul(params.limit);
    let mut page_query = QueryBuilder::<Sqlite>::new(SELECT_ISSUE);
    push_predicate(&mut page_query, owner_id, params);
    // Fixed order, newest created first; id breaks exact-timestamp ties.
    page_query
        .push(" ORDER BY i.created_at DESC, i.id DESC LIMIT ")
        .push_bind(params.limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows: Vec<IssueRow> = page_query.build_query_as().fetch_all(pool).await?;
    let issues = rows
        .into_iter()
        .map(Issue::try_from)
        .collect::<Result<Vec<_>>>()?;

    Ok(IssueListing {
        issues,
        pagination: Pagination::compute(params.page, params.limit, total_count),
    })
}

/// Get an issue by id with its owner projection.
pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Issue>> {
    let sql = format!("{SELECT_ISSUE} WHERE i.id = ?");
    let row = sqlx::query_as::<_, IssueRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(Issue::try_from).transpose()
}

/// Insert a new issue owned by `owner_id`.
pub async fn insert(pool: &SqlitePool, owner_id: i64, new: &NewIssue) -> Result<Issue> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO issues (title, description, status, priority, severity, owner_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.status.as_str())
    .bind(new.priority.as_str())
    .bind(new.severity.as_str())
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("issue", id))
}

/// Apply a partial update. Only the supplied fields are written; `updated_at`
/// is always bumped. Ownership has been verified by the caller.
pub async fn update(pool: &SqlitePool, id: i64, changes: &IssueChanges) -> Result<Issue> {
    let mut query = QueryBuilder::<Sqlite>::new("UPDATE issues SET updated_at = ");
    query.push_bind(Utc::now());

    if let Some(title) = &changes.title {
        query.push(", title = ").push_bind(title);
    }
    if let Some(description) = &changes.description {
        query.push(", description = ").push_bind(description);
    }
    if let Some(status) = changes.status {
        query.push(", status = ").push_bind(status.as_str());
    }
    if let Some(priority) = changes.priority {
        query.push(", priority = ").push_bind(priority.as_str());
    }
    if let Some(severity) = changes.severity {
        query.push(", severity = ").push_bind(severity.as_str());
    }
    query.push(" WHERE id = ").push_bind(id);
    query.build().execute(pool).await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("issue", id))
}

/// Hard-delete an issue. No cascading side effects.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM issues WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Count the owner's issues grouped by status. Every status appears in the
/// result; missing groups stay at the seeded zero.
pub async fn stats(pool: &SqlitePool, owner_id: i64) -> Result<StatusCounts> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM issues WHERE owner_id = ? GROUP BY status")
            .bind(owner_id)
            .fetch_all(pool)
            .await?;

    let mut counts = StatusCounts::default();
    for (status, count) in rows {
        let status = IssueStatus::from_str(&status).map_err(StorageError::Corrupt)?;
        counts.set(status, count);
    }

    Ok(counts)
}
