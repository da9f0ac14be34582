//! Route definitions for the link builder API
//!
//! This module maps HTTP routes to their handlers and wires in the
//! application state.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::database::AppState;
use crate::handler::{
    clear_errors, clear_last_link, count_errors, form_defaults, generate_link, get_last_link,
    health, list_errors,
};
use crate::middleware::auth_middleware;

/// Creates and configures the Axum application router with all routes
///
/// # Route Definitions
///
/// - `GET /health` - Liveness probe (public)
/// - `POST /api/links` - Generates a tracked link
/// - `GET /api/links/last` - Returns the last generated link
/// - `DELETE /api/links/last` - Clears the last generated link
/// - `GET /api/errors` - Lists the error log
/// - `DELETE /api/errors` - Clears the error log
/// - `GET /api/errors/count` - Number of logged errors
/// - `GET /api/defaults` - Blank form template
///
/// # Example Usage
///
/// ```no_run
/// # use linkly::config::Config;
/// # use linkly::database::{init_db, AppState};
/// # use linkly::route::create_app;
/// # let db = init_db("linkly.db").unwrap();
/// let state = AppState::new(db, &Config::default());
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    // API routes behind the optional access token
    let api_routes = Router::new()
        .route("/links", post(generate_link))
        .route("/links/last", get(get_last_link).delete(clear_last_link))
        .route("/errors", get(list_errors).delete(clear_errors))
        .route("/errors/count", get(count_errors))
        .route("/defaults", get(form_defaults))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .with_state(state)
}
