//! Campaign API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/campaigns", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", get(handler::status))
        .route("/{id}/responses", get(handler::responses));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", axum::routing::put(handler::update))
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/{id}/execute", post(handler::execute))
        .layer(middleware::from_fn(require_role(&[
            "admin",
            "campaign_manager",
        ])));

    read_routes.merge(write_routes)
}
