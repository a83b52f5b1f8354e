/// Shared application state
use crate::services::AuthService;
use faultline_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Both handles are constructed once at startup and injected; nothing here
/// is process-global, so tests build their own state around a throwaway
/// database.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }
}
