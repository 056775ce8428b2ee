//! Dataset loading.
//!
//! Files are accepted by MIME type, sniffed from the file name, and parsed locally into
//! a [`Dataset`] under the same size and row limits the cleaning backend applies.

mod formats;

use std::fmt;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::config::LimitsConfig;
use crate::dataset::Dataset;
use crate::types::{AppError, AppResult};

pub use formats::{parse_csv, parse_excel, parse_json, parse_xml};

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/json",
    "text/xml",
    "application/xml",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Excel,
    Json,
    Xml,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/csv" => Some(FileKind::Csv),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(FileKind::Excel)
            }
            "application/json" => Some(FileKind::Json),
            "text/xml" | "application/xml" => Some(FileKind::Xml),
            _ => None,
        }
    }

    /// First allowed MIME type guessed for `file_name`, with its kind.
    pub fn sniff(file_name: &str) -> AppResult<(Self, String)> {
        mime_guess::from_path(file_name)
            .iter()
            .find_map(|m| {
                let essence = m.essence_str().to_string();
                FileKind::from_mime(&essence).map(|kind| (kind, essence))
            })
            .ok_or_else(|| {
                AppError::UnsupportedFile(format!(
                    "{}: please upload a valid file: CSV, Excel, JSON, or XML",
                    file_name
                ))
            })
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Csv => write!(f, "csv"),
            FileKind::Excel => write!(f, "excel"),
            FileKind::Json => write!(f, "json"),
            FileKind::Xml => write!(f, "xml"),
        }
    }
}

/// A validated file ready to be parsed locally or sent to the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub kind: FileKind,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Validates type and size. Nothing is kept when validation fails.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, limits: &LimitsConfig) -> AppResult<Self> {
        let file_name = file_name.into();
        let (kind, mime) = FileKind::sniff(&file_name)?;
        if bytes.len() as u64 > limits.max_upload_bytes {
            return Err(AppError::InvalidInput(format!(
                "File too large. Maximum size allowed is {} bytes.",
                limits.max_upload_bytes
            )));
        }
        Ok(Self {
            file_name,
            mime,
            kind,
            bytes,
        })
    }

    pub async fn from_path(path: &Path, limits: &LimitsConfig) -> AppResult<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::InvalidInput(format!("not a file: {}", path.display())))?;
        // Sniff before reading so unsupported files are rejected without I/O.
        FileKind::sniff(&file_name)?;
        let bytes = fs::read(path).await?;
        Self::new(file_name, bytes, limits)
    }

    /// Parses the file, keeping at most `max_rows` records.
    pub fn parse(&self, max_rows: usize) -> AppResult<Dataset> {
        let mut dataset = match self.kind {
            FileKind::Csv => parse_csv(&self.bytes, max_rows)?,
            FileKind::Excel => parse_excel(&self.bytes, max_rows)?,
            FileKind::Json => parse_json(&self.bytes, max_rows)?,
            FileKind::Xml => parse_xml(&self.bytes, max_rows)?,
        };
        if dataset.len() > max_rows {
            warn!(rows = dataset.len(), max_rows, "Truncating dataset");
            dataset.truncate(max_rows);
        }
        info!(
            file = %self.file_name,
            kind = %self.kind,
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}

/// Reads, validates and parses a local file.
pub async fn load_path(path: &Path, limits: &LimitsConfig) -> AppResult<Dataset> {
    UploadFile::from_path(path, limits).await?.parse(limits.max_rows)
}
