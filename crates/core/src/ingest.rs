//! Optimistic ingestion: a placeholder goes into the grid before the request
//! is sent and is removed again however the request ends.

use crate::query::CacheInvalidator;
use crate::traits::ArtifactBackend;
use crate::{Artifact, ClientError, PlaceholderId};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// In-flight placeholders, newest first.
#[derive(Debug, Clone)]
pub struct PendingSet {
    items: Arc<watch::Sender<Vec<PlaceholderId>>>,
}

impl Default for PendingSet {
    fn default() -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self {
            items: Arc::new(items),
        }
    }
}

impl PendingSet {
    pub fn snapshot(&self) -> Vec<PlaceholderId> {
        self.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<PlaceholderId>> {
        self.items.subscribe()
    }

    /// Waits until no ingestion is in flight.
    pub async fn wait_empty(&self) {
        let mut items = self.items.subscribe();
        // The sender lives in `self`, so this cannot fail.
        let _ = items.wait_for(|items| items.is_empty()).await;
    }

    fn hold(&self, id: PlaceholderId) -> PlaceholderGuard {
        self.items.send_modify(|items| items.insert(0, id));
        PlaceholderGuard {
            pending: self.clone(),
            id,
        }
    }

    fn remove(&self, id: PlaceholderId) -> bool {
        self.items.send_if_modified(|items| {
            let before = items.len();
            items.retain(|item| *item != id);
            items.len() != before
        })
    }
}

/// Removes its placeholder when dropped: after success, failure, panic or abort.
struct PlaceholderGuard {
    pending: PendingSet,
    id: PlaceholderId,
}

impl Drop for PlaceholderGuard {
    fn drop(&mut self) {
        self.pending.remove(self.id);
    }
}

/// One ingestion started by [`IngestCoordinator::on_url_dropped`].
#[derive(Debug)]
pub struct IngestHandle {
    id: PlaceholderId,
    task: JoinHandle<Result<Artifact, ClientError>>,
}

impl IngestHandle {
    pub fn id(&self) -> PlaceholderId {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the request. The placeholder is still removed; the caches are
    /// left alone.
    pub fn abort(&self) {
        self.task.abort();
    }

    pub async fn outcome(self) -> Result<Artifact, ClientError> {
        match self.task.await {
            Ok(result) => result,
            Err(error) => Err(ClientError::Aborted(error.to_string())),
        }
    }

    pub(crate) async fn settle(&mut self) {
        let _ = (&mut self.task).await;
    }
}

pub struct IngestCoordinator<B> {
    backend: Arc<B>,
    pending: PendingSet,
    invalidator: CacheInvalidator,
    last_error: Arc<watch::Sender<Option<String>>>,
}

impl<B> Clone for IngestCoordinator<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            pending: self.pending.clone(),
            invalidator: self.invalidator.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

impl<B> IngestCoordinator<B>
where
    B: ArtifactBackend + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, invalidator: CacheInvalidator) -> Self {
        let (last_error, _) = watch::channel(None);
        Self {
            backend,
            pending: PendingSet::default(),
            invalidator,
            last_error: Arc::new(last_error),
        }
    }

    pub fn pending(&self) -> &PendingSet {
        &self.pending
    }

    /// Message of the most recent failed ingestion, for a notification surface.
    pub fn last_error(&self) -> watch::Receiver<Option<String>> {
        self.last_error.subscribe()
    }

    /// Starts ingesting `url`. Must be called from within a tokio runtime.
    ///
    /// The placeholder is visible in [`Self::pending`] when this returns.
    pub fn on_url_dropped(&self, url: impl Into<String>) -> IngestHandle {
        let url = url.into();
        let id = PlaceholderId::new();
        let guard = self.pending.hold(id);

        let backend = self.backend.clone();
        let invalidator = self.invalidator.clone();
        let last_error = self.last_error.clone();

        let task = tokio::spawn(async move {
            info!(%url, placeholder = %id, "ingesting url");
            let result = backend.ingest_url(&url).await;
            drop(guard);

            match &result {
                Ok(artifact) => {
                    info!(%url, artifact_id = %artifact.id, "ingested url");
                    invalidator.invalidate();
                }
                Err(error) => {
                    warn!(%url, %error, "ingestion failed");
                    last_error.send_replace(Some(error.to_string()));
                }
            }
            result
        });

        IngestHandle { id, task }
    }
}
