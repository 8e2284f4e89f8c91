//! Template API 模块 (email + WhatsApp)

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/templates", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/email", get(handler::list_email))
        .route("/email/{id}", get(handler::get_email))
        .route("/whatsapp", get(handler::list_whatsapp))
        .route("/whatsapp/{id}", get(handler::get_whatsapp))
        .route("/preview", post(handler::preview));

    let write_routes = Router::new()
        .route("/email", post(handler::create_email))
        .route("/email/{id}", axum::routing::put(handler::update_email))
        .route("/email/{id}", axum::routing::delete(handler::delete_email))
        .route("/whatsapp", post(handler::create_whatsapp))
        .route("/whatsapp/{id}", axum::routing::put(handler::update_whatsapp))
        .route(
            "/whatsapp/{id}",
            axum::routing::delete(handler::delete_whatsapp),
        )
        .layer(middleware::from_fn(require_role(&[
            "admin",
            "campaign_manager",
        ])));

    read_routes.merge(write_routes)
}
