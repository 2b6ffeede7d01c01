mod dto;
pub mod handlers;
pub mod repo;
mod services;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/:id", delete(handlers::delete_transaction))
        .route("/ai/insights", get(handlers::get_insights))
        .route("/ai/search", post(handlers::search_transactions))
}
