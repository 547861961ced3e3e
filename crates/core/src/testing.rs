use crate::traits::ArtifactBackend;
use crate::{Artifact, ClientError, Collection, ListParams, Tag};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;

pub fn artifact(id: &str) -> Artifact {
    Artifact {
        id: id.to_string(),
        plugin_type: "webpage".to_string(),
        title: format!("artifact {id}"),
        excerpt: None,
        thumbnail_path: None,
        captured_at: Utc::now(),
        source_url: Some(format!("https://example.com/{id}")),
        source_domain: Some("example.com".to_string()),
        is_archived: false,
        is_read: false,
        importance: 0,
        tags: Vec::new(),
    }
}

#[derive(Default)]
struct FakeState {
    artifacts: Vec<Artifact>,
    gates: HashMap<String, oneshot::Receiver<Result<(), String>>>,
    fail_reads: bool,
    read_delay: Option<Duration>,
    list_calls: usize,
    search_calls: usize,
    tag_calls: usize,
    collection_calls: usize,
    ingest_calls: usize,
    last_list_params: Option<ListParams>,
    last_search: Option<String>,
}

/// In-memory archive server. Ingesting a URL stores an artifact whose id is
/// the URL, unless a gate holds the request.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_artifacts(artifacts: Vec<Artifact>) -> Self {
        let backend = Self::default();
        backend.state().artifacts = artifacts;
        backend
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake backend lock poisoned")
    }

    pub fn push_artifact(&self, artifact: Artifact) {
        self.state().artifacts.insert(0, artifact);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state().fail_reads = fail;
    }

    /// Makes list and search requests take `delay` before answering.
    pub fn slow_reads(&self, delay: Duration) {
        self.state().read_delay = Some(delay);
    }

    async fn read_latency(&self) {
        let delay = self.state().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Holds ingestion of `url` until the returned sender resolves it.
    pub fn gate(&self, url: &str) -> oneshot::Sender<Result<(), String>> {
        let (release, gate) = oneshot::channel();
        self.state().gates.insert(url.to_string(), gate);
        release
    }

    pub fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    pub fn search_calls(&self) -> usize {
        self.state().search_calls
    }

    pub fn tag_calls(&self) -> usize {
        self.state().tag_calls
    }

    pub fn collection_calls(&self) -> usize {
        self.state().collection_calls
    }

    pub fn ingest_calls(&self) -> usize {
        self.state().ingest_calls
    }

    pub fn last_list_params(&self) -> Option<ListParams> {
        self.state().last_list_params.clone()
    }

    pub fn last_search(&self) -> Option<String> {
        self.state().last_search.clone()
    }
}

#[async_trait]
impl ArtifactBackend for FakeBackend {
    async fn list_artifacts(&self, params: &ListParams) -> Result<Vec<Artifact>, ClientError> {
        {
            let mut state = self.state();
            state.list_calls += 1;
            state.last_list_params = Some(params.clone());
        }
        self.read_latency().await;

        let state = self.state();
        if state.fail_reads {
            return Err(ClientError::status(
                "fetch artifacts",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        Ok(state.artifacts.clone())
    }

    async fn search_artifacts(&self, query: &str) -> Result<Vec<Artifact>, ClientError> {
        {
            let mut state = self.state();
            state.search_calls += 1;
            state.last_search = Some(query.to_string());
        }
        self.read_latency().await;

        let state = self.state();
        if state.fail_reads {
            return Err(ClientError::status(
                "search artifacts",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        Ok(state.artifacts.clone())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        self.state().tag_calls += 1;
        Ok(vec![Tag {
            id: "t1".to_string(),
            name: "rust".to_string(),
            color: None,
            source: None,
            artifact_count: Some(1),
        }])
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, ClientError> {
        self.state().collection_calls += 1;
        Ok(Vec::new())
    }

    async fn ingest_url(&self, url: &str) -> Result<Artifact, ClientError> {
        let gate = {
            let mut state = self.state();
            state.ingest_calls += 1;
            state.gates.remove(url)
        };

        if let Some(gate) = gate {
            match gate.await {
                Ok(Ok(())) => {}
                Ok(Err(detail)) => return Err(ClientError::Ingest(detail)),
                Err(_) => return Err(ClientError::Ingest("gate dropped".to_string())),
            }
        }

        let stored = artifact(url);
        self.push_artifact(stored.clone());
        Ok(stored)
    }
}
