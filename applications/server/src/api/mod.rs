/// API route modules
pub mod auth;
pub mod health;
pub mod issues;
pub mod response;

use crate::{middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Build the `/api` router: public auth routes plus the guarded issue routes.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/issues", get(issues::list_issues))
        .route("/issues", post(issues::create_issue))
        .route("/issues/stats", get(issues::issue_stats))
        .route("/issues/:id", get(issues::get_issue))
        .route("/issues/:id", put(issues::update_issue))
        .route("/issues/:id", delete(issues::delete_issue))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state.auth),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(state)
}
