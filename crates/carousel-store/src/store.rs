use std::sync::Arc;

use async_trait::async_trait;
use carousel_core::LinkRecord;

use crate::error::StoreError;
use crate::links::LinkRepo;

/// The link store as seen by the endpoints.
///
/// Both operations complete fully before returning, so a record returned by
/// `insert` is visible to every later `list_newest_first`.
#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn insert(&self, link: &str) -> Result<LinkRecord, StoreError>;

    async fn list_newest_first(&self) -> Result<Vec<LinkRecord>, StoreError>;
}

/// [`LinkStore`] backed by a SQLite [`LinkRepo`], run on the blocking pool.
#[derive(Clone)]
pub struct SqliteLinkStore {
    repo: Arc<LinkRepo>,
}

impl SqliteLinkStore {
    pub fn new(repo: LinkRepo) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    async fn insert(&self, link: &str) -> Result<LinkRecord, StoreError> {
        let repo = Arc::clone(&self.repo);
        let link = link.to_string();
        tokio::task::spawn_blocking(move || repo.insert(&link)).await?
    }

    async fn list_newest_first(&self) -> Result<Vec<LinkRecord>, StoreError> {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || repo.list_newest_first()).await?
    }
}
