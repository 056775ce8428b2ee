use axum::{routing::post, Json, Router};
use tracing::info;

use crate::analysis::{
    compose_dashboard, group, profile_dataset, summarize, ColumnKind, ColumnProfile,
    MetricSummary,
};
use super::extract::ApiJson;
use crate::models::{
    AppState, DashboardResponse, DatasetRequest, GroupRequest, MetricsRequest, SeriesResponse,
};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/profile", post(profile_handler))
        .route("/api/metrics", post(metrics_handler))
        .route("/api/group", post(group_handler))
        .route("/api/dashboard", post(dashboard_handler))
        .with_state(state)
}

fn require_column(profile: &ColumnProfile, column: &str) -> AppResult<ColumnKind> {
    profile
        .kind_of(column)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown column: {}", column)))
}

async fn profile_handler(ApiJson(request): ApiJson<DatasetRequest>) -> Json<ColumnProfile> {
    info!(rows = request.data.len(), "Profile request received");
    Json(profile_dataset(&request.data))
}

async fn metrics_handler(
    ApiJson(request): ApiJson<MetricsRequest>,
) -> AppResult<Json<MetricSummary>> {
    info!(rows = request.data.len(), column = %request.column, "Metrics request received");
    if !request.data.is_empty() {
        require_column(&profile_dataset(&request.data), &request.column)?;
    }
    Ok(Json(summarize(&request.data, &request.column)))
}

async fn group_handler(
    ApiJson(request): ApiJson<GroupRequest>,
) -> AppResult<Json<SeriesResponse>> {
    info!(
        rows = request.data.len(),
        group_by = %request.group_by,
        "Group request received"
    );
    if !request.data.is_empty() {
        let profile = profile_dataset(&request.data);
        require_column(&profile, &request.group_by)?;
        if let Some(value_column) = request.value_column.as_deref() {
            require_column(&profile, value_column)?;
        }
    }
    Ok(Json(SeriesResponse {
        data: group(&request.data, &request.group_by, request.value_column.as_deref()),
    }))
}

async fn dashboard_handler(
    ApiJson(request): ApiJson<DatasetRequest>,
) -> Json<DashboardResponse> {
    info!(rows = request.data.len(), "Dashboard request received");
    Json(DashboardResponse {
        charts: compose_dashboard(&request.data),
    })
}
