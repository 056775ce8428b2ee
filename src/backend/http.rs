use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::InsightBackend;
use crate::analysis::ChartDescriptor;
use crate::config::BackendConfig;
use crate::dataset::Dataset;
use crate::loader::UploadFile;
use crate::models::{
    AskRequest, AskResponse, ExportRequest, ExportResponse, SummaryRequest, SummaryResponse,
    UploadResponse,
};
use crate::types::{AppError, AppResult};

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }

    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!(%url, "Calling backend");
        let response = self.client.post(&url).json(body).send().await?;
        decode(endpoint, response).await
    }
}

/// Turns a backend reply into `R`, treating non-success statuses and `error` bodies as
/// failures.
async fn decode<R: DeserializeOwned>(endpoint: &str, response: reqwest::Response) -> AppResult<R> {
    let status = response.status();
    let text = response.text().await?;
    let body: Option<serde_json::Value> = serde_json::from_str(&text).ok();

    let reported = body.as_ref().and_then(|b| {
        ["error", "detail"]
            .iter()
            .find_map(|k| b.get(*k).filter(|v| !v.is_null()))
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
    });

    if !status.is_success() {
        warn!(endpoint, %status, "Backend returned an error status");
        return Err(AppError::Backend(format!(
            "{} returned {}: {}",
            endpoint,
            status,
            reported.unwrap_or(text)
        )));
    }
    if let Some(message) = reported {
        warn!(endpoint, %message, "Backend reported an error");
        return Err(AppError::Backend(message));
    }

    let body = body.ok_or_else(|| {
        AppError::Backend(format!("{} returned a non-JSON body", endpoint))
    })?;
    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl InsightBackend for HttpBackend {
    async fn upload(&self, file: &UploadFile) -> AppResult<UploadResponse> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part("file", part);

        let url = self.url("upload");
        info!(file = %file.file_name, bytes = file.bytes.len(), "Uploading dataset");
        let response = self.client.post(&url).multipart(form).send().await?;
        let upload: UploadResponse = decode("upload", response).await?;
        info!(rows = upload.rows, columns = upload.columns.len(), "Upload cleaned");
        Ok(upload)
    }

    async fn ask(&self, question: &str, dataset: &Dataset) -> AppResult<Option<String>> {
        let reply: AskResponse = self
            .post_json("ask", &AskRequest { question, df: dataset })
            .await?;
        Ok(reply.response.and_then(|r| r.summary))
    }

    async fn summary(&self, dataset: &Dataset) -> AppResult<Option<String>> {
        let reply: SummaryResponse = self
            .post_json("summary", &SummaryRequest { preview: dataset })
            .await?;
        Ok(reply.summary)
    }

    async fn export(
        &self,
        report: &serde_json::Value,
        charts: &[ChartDescriptor],
    ) -> AppResult<ExportResponse> {
        self.post_json("export", &ExportRequest { report, charts }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use crate::dataset::{CellValue, Record};
    use mockito::Matcher;
    use serde_json::json;

    fn backend(server: &mockito::ServerGuard) -> HttpBackend {
        HttpBackend::new(&BackendConfig {
            base_url: format!("{}/", server.url()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn tiny() -> Dataset {
        let mut r = Record::new();
        r.insert("region".to_string(), CellValue::from("East"));
        Dataset::new(vec![r])
    }

    #[tokio::test]
    async fn test_ask_extracts_summary() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ask")
            .match_body(Matcher::Json(json!({
                "question": "which region is best?",
                "df": [{"region": "East"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response":{"summary":"East leads."}}"#)
            .create_async()
            .await;

        let answer = backend(&server)
            .ask("which region is best?", &tiny())
            .await
            .unwrap();
        assert_eq!(answer.as_deref(), Some("East leads."));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ask_without_summary() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/ask")
            .with_status(200)
            .with_body(r#"{"response":{}}"#)
            .create_async()
            .await;
        assert_eq!(backend(&server).ask("q", &tiny()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_summary_sends_preview() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/summary")
            .match_body(Matcher::PartialJson(json!({"preview": [{"region": "East"}]})))
            .with_status(200)
            .with_body(r#"{"summary":"One row."}"#)
            .create_async()
            .await;
        let summary = backend(&server).summary(&tiny()).await.unwrap();
        assert_eq!(summary.as_deref(), Some("One row."));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_backend_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/summary")
            .with_status(500)
            .with_body(r#"{"detail":"pandas exploded"}"#)
            .create_async()
            .await;
        let err = backend(&server).summary(&tiny()).await.unwrap_err();
        match err {
            AppError::Backend(msg) => assert!(msg.contains("pandas exploded")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_multipart() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/upload")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data.*".to_string()),
            )
            .match_body(Matcher::Regex("name=\"file\"; filename=\"sales.csv\"".to_string()))
            .with_status(200)
            .with_body(
                r#"{"filename":"sales.csv","rows":1,"columns":["region"],
                    "preview":[{"region":"East"}],"cleaning_report":{"duplicates_removed":0}}"#,
            )
            .create_async()
            .await;

        let file = UploadFile::new("sales.csv", b"region\nEast\n".to_vec(), &LimitsConfig::default())
            .unwrap();
        let upload = backend(&server).upload(&file).await.unwrap();
        assert_eq!(upload.rows, 1);
        assert_eq!(upload.preview, tiny());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_error_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/upload")
            .with_status(200)
            .with_body(r#"{"error":"Unsupported file format"}"#)
            .create_async()
            .await;
        let file = UploadFile::new("a.json", b"[]".to_vec(), &LimitsConfig::default()).unwrap();
        assert!(matches!(
            backend(&server).upload(&file).await,
            Err(AppError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_export_returns_file() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/export")
            .match_body(Matcher::PartialJson(json!({"report": {"title": "Q1"}, "charts": []})))
            .with_status(200)
            .with_body(r#"{"file":"Insightify_Report.pdf"}"#)
            .create_async()
            .await;
        let exported = backend(&server)
            .export(&json!({"title": "Q1"}), &[])
            .await
            .unwrap();
        assert_eq!(exported.file, "Insightify_Report.pdf");
    }
}
