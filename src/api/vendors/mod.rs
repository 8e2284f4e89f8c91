//! Vendor API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::{require_admin, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/vendors", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", axum::routing::put(handler::update))
        .layer(middleware::from_fn(require_role(&[
            "admin",
            "campaign_manager",
        ])));

    let delete_routes = Router::new()
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/bulk-delete", post(handler::bulk_delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(write_routes).merge(delete_routes)
}
