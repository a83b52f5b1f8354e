/// Issue API routes
use crate::{
    error::{Result, ServerError},
    middleware::CurrentUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use faultline_core::{
    types::{
        Issue, IssueChanges, IssuePriority, IssueSeverity, IssueStatus, NewIssue, Pagination,
        StatusCounts,
    },
    validation,
};
use faultline_storage::issues::{self, ListParams};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::response::Envelope;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub severity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub severity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub severity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IssueListPayload {
    pub issues: Vec<Issue>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct IssuePayload {
    pub issue: Issue,
}

#[derive(Debug, Serialize)]
pub struct StatsPayload {
    pub counts: StatusCounts,
    pub total: i64,
}

/// Lenient page/limit coercion: non-numeric input silently falls back to the
/// default, and values below 1 are clamped so the offset can never go
/// negative.
fn coerce_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(default)
        .max(1)
}

/// Parse an optional equality filter; an out-of-set value is a 400.
fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    raw.map(|s| s.parse::<T>().map_err(ServerError::Validation))
        .transpose()
}

fn parse_issue_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| ServerError::Validation(format!("Invalid issue id: {raw}")))
}

/// Fetch an issue and enforce ownership. Existence is checked first, so a
/// non-owner probing an existing id gets 403 while a truly absent row gets
/// 404 - existence is deliberately not hidden from non-owners.
async fn load_owned_issue(state: &AppState, id: i64, caller_id: i64) -> Result<Issue> {
    let issue = issues::get(state.db.pool(), id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Issue not found".to_string()))?;

    if issue.owner_id != caller_id {
        return Err(ServerError::Forbidden(
            "You do not have access to this issue".to_string(),
        ));
    }

    Ok(issue)
}

/// GET /api/issues
pub async fn list_issues(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<IssueListPayload>>> {
    let params = ListParams {
        page: coerce_positive(query.page.as_deref(), DEFAULT_PAGE),
        limit: coerce_positive(query.limit.as_deref(), DEFAULT_LIMIT),
        search: query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        status: parse_filter(query.status.as_deref())?,
        priority: parse_filter(query.priority.as_deref())?,
        severity: parse_filter(query.severity.as_deref())?,
    };

    let listing = issues::list(state.db.pool(), current.id, &params).await?;

    Ok(Json(Envelope::data(IssueListPayload {
        issues: listing.issues,
        pagination: listing.pagination,
    })))
}

/// GET /api/issues/stats
pub async fn issue_stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Envelope<StatsPayload>>> {
    let counts = issues::stats(state.db.pool(), current.id).await?;

    Ok(Json(Envelope::data(StatsPayload {
        total: counts.total(),
        counts,
    })))
}

/// GET /api/issues/:id
pub async fn get_issue(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<IssuePayload>>> {
    let id = parse_issue_id(&id)?;
    let issue = load_owned_issue(&state, id, current.id).await?;

    Ok(Json(Envelope::data(IssuePayload { issue })))
}

/// POST /api/issues
pub async fn create_issue(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CreateIssueRequest>,
) -> Result<impl IntoResponse> {
    // Fixed evaluation order: title, description, status, priority, severity.
    // The first failing field wins.
    let raw_title = req
        .title
        .as_deref()
        .ok_or_else(|| ServerError::Validation("title is required".to_string()))?;
    let title = validation::validate_title(raw_title)?;

    let raw_description = req
        .description
        .as_deref()
        .ok_or_else(|| ServerError::Validation("description is required".to_string()))?;
    let description = validation::validate_description(raw_description)?;

    let status = match req.status.as_deref() {
        Some(raw) => raw
            .parse::<IssueStatus>()
            .map_err(ServerError::Validation)?,
        None => IssueStatus::default(),
    };
    let priority = match req.priority.as_deref() {
        Some(raw) => raw
            .parse::<IssuePriority>()
            .map_err(ServerError::Validation)?,
        None => IssuePriority::default(),
    };
    let severity = match req.severity.as_deref() {
        Some(raw) => raw
            .parse::<IssueSeverity>()
            .map_err(ServerError::Validation)?,
        None => IssueSeverity::default(),
    };

    let new = NewIssue {
        title,
        description,
        status,
        priority,
        severity,
    };
    let issue = issues::insert(state.db.pool(), current.id, &new).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            IssuePayload { issue },
            "Issue created successfully",
        )),
    ))
}

/// PUT /api/issues/:id
pub async fn update_issue(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateIssueRequest>,
) -> Result<Json<Envelope<IssuePayload>>> {
    let id = parse_issue_id(&id)?;
    let existing = load_owned_issue(&state, id, current.id).await?;

    // Same rules and evaluation order as create; omitted fields stay None
    // and the storage layer leaves them untouched.
    let mut changes = IssueChanges::default();
    if let Some(raw) = req.title.as_deref() {
        changes.title = Some(validation::validate_title(raw)?);
    }
    if let Some(raw) = req.description.as_deref() {
        changes.description = Some(validation::validate_description(raw)?);
    }
    if let Some(raw) = req.status.as_deref() {
        changes.status = Some(raw.parse::<IssueStatus>().map_err(ServerError::Validation)?);
    }
    if let Some(raw) = req.priority.as_deref() {
        changes.priority = Some(
            raw.parse::<IssuePriority>()
                .map_err(ServerError::Validation)?,
        );
    }
    if let Some(raw) = req.severity.as_deref() {
        changes.severity = Some(
            raw.parse::<IssueSeverity>()
                .map_err(ServerError::Validation)?,
        );
    }

    // A body with no recognized fields changes nothing, not even updated_at
    let issue = if changes.is_empty() {
        existing
    } else {
        issues::update(state.db.pool(), id, &changes).await?
    };

    Ok(Json(Envelope::with_message(
        IssuePayload { issue },
        "Issue updated successfully",
    )))
}

/// DELETE /api/issues/:id
pub async fn delete_issue(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<serde_json::Value>>> {
    let id = parse_issue_id(&id)?;
    load_owned_issue(&state, id, current.id).await?;

    issues::delete(state.db.pool(), id).await?;

    Ok(Json(Envelope::with_message(
        serde_json::json!({}),
        "Issue deleted successfully",
    )))
}
