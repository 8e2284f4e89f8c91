//! Upload API Handlers

use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use serde::Deserialize;

use super::XlsxDownload;
use crate::core::ServerState;
use crate::db::models::UploadLog;
use crate::import::export::{blank_template_xlsx, vendors_to_xlsx};
use crate::import::{ImportSummary, VendorImporter};
use crate::utils::{AppError, AppResult};

/// Accepted spreadsheet extensions
const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

/// Everything for the export; well beyond any realistic vendor count
const EXPORT_LIMIT: usize = 100_000;

/// POST /api/uploads/vendors - 批量导入供应商
///
/// multipart 的 `file` 字段携带电子表格；整个文件要么全部插入
/// 要么整体拒绝。
pub async fn import_vendors(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(|f| f.to_string())
            .ok_or_else(|| AppError::validation("Uploaded file has no name"))?;
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes.to_vec()));
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::validation("Missing multipart field 'file'"))?;

    let extension = file_name.rsplit('.').next().unwrap_or_default().to_lowercase();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::validation(format!(
            "File type .{extension} not allowed; expected .csv, .xlsx or .xls"
        )));
    }
    if bytes.len() > state.config.max_upload_size {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes",
            state.config.max_upload_size
        )));
    }

    let summary = VendorImporter::new(state).run(&file_name, &bytes).await?;
    Ok(Json(summary))
}

/// GET /api/uploads/vendors/export - 导出全部供应商 (xlsx)
pub async fn export_vendors(State(state): State<ServerState>) -> AppResult<XlsxDownload> {
    let vendors = state.vendors().find_all(None, None, 0, EXPORT_LIMIT).await?;
    let bytes = vendors_to_xlsx(&vendors)?;
    Ok(XlsxDownload {
        file_name: "vendors.xlsx",
        bytes: bytes.into(),
    })
}

/// GET /api/uploads/vendors/template - 下载空白导入模板 (xlsx)
pub async fn download_template() -> AppResult<XlsxDownload> {
    let bytes = blank_template_xlsx()?;
    Ok(XlsxDownload {
        file_name: "vendor_import_template.xlsx",
        bytes: bytes.into(),
    })
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

/// GET /api/uploads/logs - 最近的导入异常记录
pub async fn recent_logs(
    State(state): State<ServerState>,
    Query(query): Query<LogsQuery>,
) -> AppResult<Json<Vec<UploadLog>>> {
    let limit = query.limit.unwrap_or(100).min(500);
    let logs = state.upload_logs().find_recent(limit).await?;
    Ok(Json(logs))
}
