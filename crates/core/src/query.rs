use crate::config::ClientConfig;
use crate::filters::{FilterState, FilterStore};
use crate::traits::ArtifactBackend;
use crate::{Artifact, ClientError, Collection, ListParams, SortOrder, Tag};
use moka::future::Cache;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub type Artifacts = Arc<Vec<Artifact>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    Browse,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrowseKey {
    pub tag_id: Option<String>,
    pub collection_id: Option<String>,
    pub sort: SortOrder,
}

/// The one retrieval the current filters ask for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RetrievalIntent {
    Browse(BrowseKey),
    Search(String),
}

impl RetrievalIntent {
    pub fn from_filters(state: &FilterState) -> Self {
        let text = state.search_query.trim();
        if text.is_empty() {
            RetrievalIntent::Browse(BrowseKey {
                tag_id: state.selected_tag_id.clone(),
                collection_id: state.selected_collection_id.clone(),
                sort: state.sort,
            })
        } else {
            RetrievalIntent::Search(text.to_string())
        }
    }

    pub fn mode(&self) -> QueryMode {
        match self {
            RetrievalIntent::Browse(_) => QueryMode::Browse,
            RetrievalIntent::Search(_) => QueryMode::Search,
        }
    }
}

/// Forces every cached browse and search result stale.
///
/// Each invalidation bumps an epoch that readers can watch to know when to
/// re-read the active query.
#[derive(Clone)]
pub struct CacheInvalidator {
    browse: Cache<BrowseKey, Artifacts>,
    search: Cache<String, Artifacts>,
    epoch: Arc<watch::Sender<u64>>,
}

impl CacheInvalidator {
    pub fn invalidate(&self) {
        self.browse.invalidate_all();
        self.search.invalidate_all();
        self.epoch.send_modify(|epoch| *epoch += 1);
        debug!(epoch = self.epoch(), "artifact caches invalidated");
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.epoch.subscribe()
    }

    pub fn epoch(&self) -> u64 {
        *self.epoch.borrow()
    }
}

pub struct QueryRouter<B> {
    backend: Arc<B>,
    filters: FilterStore,
    page_size: u32,
    artifacts: CacheInvalidator,
    tags: Cache<(), Arc<Vec<Tag>>>,
    collections: Cache<(), Arc<Vec<Collection>>>,
}

impl<B> QueryRouter<B>
where
    B: ArtifactBackend + Send + Sync,
{
    pub fn new(backend: Arc<B>, filters: FilterStore, config: &ClientConfig) -> Self {
        let (epoch, _) = watch::channel(0);
        Self {
            backend,
            filters,
            page_size: config.page_size,
            artifacts: CacheInvalidator {
                browse: Cache::builder()
                    .time_to_live(config.browse_stale_after)
                    .build(),
                search: Cache::builder()
                    .time_to_live(config.search_stale_after)
                    .build(),
                epoch: Arc::new(epoch),
            },
            tags: Cache::builder()
                .time_to_live(config.catalog_stale_after)
                .build(),
            collections: Cache::builder()
                .time_to_live(config.catalog_stale_after)
                .build(),
        }
    }

    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    pub fn invalidator(&self) -> CacheInvalidator {
        self.artifacts.clone()
    }

    /// Ticks on every invalidation; the active query should be re-read then.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.artifacts.subscribe()
    }

    pub fn intent(&self) -> RetrievalIntent {
        RetrievalIntent::from_filters(&self.filters.snapshot())
    }

    /// Whether the query for `mode` may run right now. Exactly one mode is.
    pub fn is_enabled(&self, mode: QueryMode) -> bool {
        self.intent().mode() == mode
    }

    pub fn list_params(&self, key: &BrowseKey) -> ListParams {
        ListParams {
            sort: key.sort,
            tag_id: key.tag_id.clone(),
            collection_id: key.collection_id.clone(),
            limit: self.page_size,
            ..ListParams::default()
        }
    }

    /// Reads the active query, refetching when its cached result is stale.
    pub async fn fetch(&self) -> Result<Artifacts, ClientError> {
        let intent = self.intent();
        self.fetch_intent(&intent).await
    }

    /// Concurrent reads of one key share a single request. A result fetched
    /// across an invalidation is returned but not kept.
    pub async fn fetch_intent(&self, intent: &RetrievalIntent) -> Result<Artifacts, ClientError> {
        let epoch = self.artifacts.epoch();
        match intent {
            RetrievalIntent::Browse(key) => {
                let result = self
                    .artifacts
                    .browse
                    .try_get_with(key.clone(), async {
                        debug!(?key, "browse cache miss");
                        let params = self.list_params(key);
                        self.backend.list_artifacts(&params).await.map(Arc::new)
                    })
                    .await
                    .map_err(ClientError::from_shared)?;
                if self.artifacts.epoch() != epoch {
                    self.artifacts.browse.invalidate(key).await;
                }
                Ok(result)
            }
            RetrievalIntent::Search(text) => {
                let result = self
                    .artifacts
                    .search
                    .try_get_with(text.clone(), async {
                        debug!(query = %text, "search cache miss");
                        self.backend.search_artifacts(text).await.map(Arc::new)
                    })
                    .await
                    .map_err(ClientError::from_shared)?;
                if self.artifacts.epoch() != epoch {
                    self.artifacts.search.invalidate(text).await;
                }
                Ok(result)
            }
        }
    }

    pub async fn tags(&self) -> Result<Arc<Vec<Tag>>, ClientError> {
        self.tags
            .try_get_with((), async { self.backend.list_tags().await.map(Arc::new) })
            .await
            .map_err(ClientError::from_shared)
    }

    pub async fn collections(&self) -> Result<Arc<Vec<Collection>>, ClientError> {
        self.collections
            .try_get_with((), async {
                self.backend.list_collections().await.map(Arc::new)
            })
            .await
            .map_err(ClientError::from_shared)
    }
}
