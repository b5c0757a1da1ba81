use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // The budgeting frontend is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/transactions/import", post(handlers::import_statement))
        .route("/transactions/{id}", delete(handlers::delete_transaction))
        .route(
            "/budget-limits",
            get(handlers::list_budget_limits).put(handlers::upsert_budget_limit),
        )
        .route(
            "/budget-limits/{category}",
            delete(handlers::delete_budget_limit),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
