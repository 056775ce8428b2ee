use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the cleaning / AI / export service, without the `/api` suffix.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_upload_bytes: u64,
    pub max_rows: usize,
}

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_MAX_ROWS: usize = 10_000;

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3001".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            backend: BackendConfig {
                base_url: env::var("INSIGHTIFY_BACKEND_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs: env::var("BACKEND_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
            session: SessionConfig {
                dir: env::var("INSIGHTIFY_SESSION_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_session_dir()),
            },
            limits: LimitsConfig {
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .map(|v| v.parse())
                    .unwrap_or(Ok(DEFAULT_MAX_UPLOAD_BYTES))?,
                max_rows: env::var("MAX_ROWS")
                    .map(|v| v.parse())
                    .unwrap_or(Ok(DEFAULT_MAX_ROWS))?,
            },
        })
    }
}

/// XDG data directory, falling back to `~/.local/share`, then the working directory.
fn default_session_dir() -> PathBuf {
    env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::var("HOME")
                .map(|h| PathBuf::from(h).join(".local/share"))
                .unwrap_or_else(|_| PathBuf::from("."))
        })
        .join("insightify")
}
