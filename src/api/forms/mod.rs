//! Form API 模块
//!
//! 认证的表单构建器 CRUD + 公开的表单访问/提交接口。
//! `/api/forms/public/*` 在认证中间件中被豁免。

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/forms", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/public/{slug}", get(handler::public_get))
        .route("/public/{slug}", post(handler::public_submit));

    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/responses", get(handler::responses));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", axum::routing::put(handler::update))
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_role(&[
            "admin",
            "campaign_manager",
        ])));

    public_routes.merge(read_routes).merge(write_routes)
}
