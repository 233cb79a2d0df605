use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use dam_models::{AuditAction, AuditLogEntry, AuditLogFilter, AuditResourceType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::handlers::error::{service_error, ErrorResponse};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditLogsQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<AuditAction>,
    pub resource_type: Option<AuditResourceType>,
    pub resource_id: Option<Uuid>,
    pub from_date: Option<chrono::DateTime<chrono::Utc>>,
    pub to_date: Option<chrono::DateTime<chrono::Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AuditLogsResponse {
    pub entries: Vec<AuditLogEntry>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Query the audit ledger
/// GET /api/audit/logs
pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditLogsQuery>,
) -> Result<Json<AuditLogsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let filter = AuditLogFilter {
        user_id: params.user_id,
        action: params.action,
        resource_type: params.resource_type,
        resource_id: params.resource_id,
        from_date: params.from_date,
        to_date: params.to_date,
    };
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(50);

    let (entries, total) = state
        .audit
        .list(&filter, page, limit)
        .await
        .map_err(service_error)?;

    Ok(Json(AuditLogsResponse {
        entries,
        total,
        page,
        limit,
    }))
}

/// Fetch a single ledger entry
/// GET /api/audit/logs/:id
pub async fn get_audit_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AuditLogEntry>, (StatusCode, Json<ErrorResponse>)> {
    let entry = state
        .audit
        .find_by_id(id)
        .await
        .map_err(service_error)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("not_found", "Audit log entry not found")),
            )
        })?;

    Ok(Json(entry))
}
