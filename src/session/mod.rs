//! Session context.
//!
//! Holds the two pieces of state shared between views: the authentication marker and
//! the cached dataset snapshot. The session is passed explicitly to whatever needs it.
//! Any non-empty marker counts as signed in; identity is verified upstream by the
//! identity provider, never here.

pub mod storage;

use std::sync::Arc;

use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::types::{AppError, AppResult};

pub use storage::{FileStore, MemoryStore, SessionStore};

pub const USER_KEY: &str = "user";
pub const DATASET_KEY: &str = "insightify_df";

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn current_user(&self) -> AppResult<Option<String>> {
        Ok(self
            .store
            .get(USER_KEY)
            .await?
            .filter(|u| !u.is_empty()))
    }

    pub async fn is_authenticated(&self) -> AppResult<bool> {
        Ok(self.current_user().await?.is_some())
    }

    /// Gate for protected operations.
    pub async fn require_auth(&self) -> AppResult<String> {
        self.current_user().await?.ok_or(AppError::Unauthenticated)
    }

    pub async fn sign_in(&self, user: &str) -> AppResult<()> {
        let user = user.trim();
        if user.is_empty() {
            return Err(AppError::InvalidInput("user must not be empty".to_string()));
        }
        self.store.set(USER_KEY, user.to_string()).await?;
        info!(user, "Signed in");
        Ok(())
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.store.remove(USER_KEY).await?;
        info!("Signed out");
        Ok(())
    }

    /// Replaces any previously cached dataset.
    pub async fn cache_dataset(&self, dataset: &Dataset) -> AppResult<()> {
        self.store
            .set(DATASET_KEY, serde_json::to_string(dataset)?)
            .await?;
        info!(rows = dataset.len(), "Cached dataset");
        Ok(())
    }

    /// The cached dataset, or `None` when nothing was uploaded yet.
    pub async fn dataset(&self) -> AppResult<Option<Dataset>> {
        let Some(raw) = self.store.get(DATASET_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(dataset) => Ok(Some(dataset)),
            Err(e) => {
                warn!(error = %e, "Cached dataset is corrupt");
                Err(AppError::Parse(format!("cached dataset is corrupt: {}", e)))
            }
        }
    }

    pub async fn clear_dataset(&self) -> AppResult<()> {
        self.store.remove(DATASET_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, Record};
    use tempfile::TempDir;

    fn tiny() -> Dataset {
        let mut r = Record::new();
        r.insert("region".to_string(), CellValue::from("East"));
        r.insert("sales".to_string(), CellValue::Number(4.0));
        Dataset::new(vec![r])
    }

    #[tokio::test]
    async fn test_auth_marker() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated().await.unwrap());
        assert!(matches!(
            session.require_auth().await,
            Err(AppError::Unauthenticated)
        ));

        session.sign_in("ada@example.com").await.unwrap();
        assert_eq!(session.require_auth().await.unwrap(), "ada@example.com");

        session.sign_out().await.unwrap();
        assert!(!session.is_authenticated().await.unwrap());
        assert!(session.sign_in("   ").await.is_err());
    }

    #[tokio::test]
    async fn test_empty_marker_is_not_authenticated() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, String::new()).await.unwrap();
        assert!(!Session::new(store).is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_whitespace_marker_is_authenticated() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "  ".to_string()).await.unwrap();
        let session = Session::new(store);
        assert!(session.is_authenticated().await.unwrap());
        assert_eq!(session.require_auth().await.unwrap(), "  ");
    }

    #[tokio::test]
    async fn test_dataset_snapshot_in_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let session = Session::new(Arc::new(FileStore::with_path(temp_dir.path().to_path_buf())));
        assert_eq!(session.dataset().await.unwrap(), None);

        session.cache_dataset(&tiny()).await.unwrap();
        let reopened = Session::new(Arc::new(FileStore::with_path(temp_dir.path().to_path_buf())));
        assert_eq!(reopened.dataset().await.unwrap(), Some(tiny()));

        reopened.clear_dataset().await.unwrap();
        assert_eq!(session.dataset().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot() {
        let store = Arc::new(MemoryStore::new());
        store.set(DATASET_KEY, "{not json".to_string()).await.unwrap();
        assert!(matches!(
            Session::new(store).dataset().await,
            Err(AppError::Parse(_))
        ));
    }
}
