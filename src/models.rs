use std::sync::Arc;

use crate::analysis::{ChartDescriptor, ChartSeries, DashboardTemplate};
use crate::backend::InsightBackend;
use crate::chat::{ChatMessage, ChatView};
use crate::config::Config;
use crate::dataset::Dataset;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn InsightBackend>,
}

// Backend wire shapes

/// Response of the cleaning backend's upload endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub filename: Option<String>,
    pub rows: usize,
    pub columns: Vec<String>,
    /// Cleaned rows; the whole dataset when small, otherwise the leading rows.
    pub preview: Dataset,
    #[serde(default)]
    pub cleaning_report: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    pub df: &'a Dataset,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub response: Option<AskSummary>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct AskSummary {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct SummaryRequest<'a> {
    pub preview: &'a Dataset,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct ExportRequest<'a> {
    pub report: &'a serde_json::Value,
    pub charts: &'a [ChartDescriptor],
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExportResponse {
    pub file: String,
}

// API Request/Response types

#[derive(Debug, serde::Deserialize)]
pub struct DatasetRequest {
    pub data: Dataset,
}

#[derive(Debug, serde::Deserialize)]
pub struct MetricsRequest {
    pub data: Dataset,
    pub column: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct GroupRequest {
    pub data: Dataset,
    pub group_by: String,
    #[serde(default)]
    pub value_column: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct SeriesResponse {
    pub data: ChartSeries,
}

#[derive(Debug, serde::Serialize)]
pub struct DashboardResponse {
    pub charts: Vec<ChartDescriptor>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    pub data: Dataset,
    pub question: String,
    /// Applied when the question opens the template picker.
    #[serde(default)]
    pub template: Option<DashboardTemplate>,
}

/// Messages produced by one chat turn, and the view it leaves behind.
#[derive(Debug, serde::Serialize)]
pub struct ChatTurnResponse {
    pub messages: Vec<ChatMessage>,
    pub view: ChatView,
    pub template_picker: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub backend_url: String,
}
