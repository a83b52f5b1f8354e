/// User domain types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account.
///
/// The password hash is deliberately not part of this type: it lives only in
/// the storage layer's credential lookup and can never be serialized into a
/// response by accident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: i64,

    /// Login email, unique across the system
    pub email: String,

    /// Optional display name
    pub name: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Minimal owner projection attached to every issue returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
}

impl From<User> for OwnerSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}
