//! External collaborators: dataset cleaning, AI answers, summaries and PDF export.

pub mod http;

use async_trait::async_trait;

use crate::analysis::ChartDescriptor;
use crate::dataset::Dataset;
use crate::loader::UploadFile;
use crate::models::{ExportResponse, UploadResponse};
use crate::types::AppResult;

pub use http::HttpBackend;

/// Single-shot request/response calls to the analytics backend. Nothing is retried.
#[async_trait]
pub trait InsightBackend: Send + Sync {
    /// Sends a validated file for server-side cleaning.
    async fn upload(&self, file: &UploadFile) -> AppResult<UploadResponse>;

    /// Asks a free-form question about `dataset`. `None` when the backend had no answer.
    async fn ask(&self, question: &str, dataset: &Dataset) -> AppResult<Option<String>>;

    async fn summary(&self, dataset: &Dataset) -> AppResult<Option<String>>;

    /// Requests a PDF of the report and charts; returns the generated file name.
    async fn export(
        &self,
        report: &serde_json::Value,
        charts: &[ChartDescriptor],
    ) -> AppResult<ExportResponse>;
}
