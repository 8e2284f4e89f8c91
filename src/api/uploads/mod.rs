//! Upload API 模块
//!
//! 供应商批量导入 (multipart 电子表格)、xlsx 导出和空白模板下载。

mod handler;

use axum::{Router, body::Bytes, middleware, response::IntoResponse, routing::get, routing::post};
use http::header;

use crate::auth::require_role;
use crate::core::ServerState;

/// Xlsx download response with attachment headers
pub struct XlsxDownload {
    pub file_name: &'static str,
    pub bytes: Bytes,
}

impl IntoResponse for XlsxDownload {
    fn into_response(self) -> axum::response::Response {
        (
            http::StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                        .to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.file_name),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/uploads", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/vendors/export", get(handler::export_vendors))
        .route("/vendors/template", get(handler::download_template))
        .route("/logs", get(handler::recent_logs));

    let write_routes = Router::new()
        .route("/vendors", post(handler::import_vendors))
        .layer(middleware::from_fn(require_role(&[
            "admin",
            "campaign_manager",
        ])));

    read_routes.merge(write_routes)
}
