use crate::{Artifact, ClientError, Collection, ListParams, Tag};
use async_trait::async_trait;
use std::sync::Arc;

/// The archive server as seen by the client.
#[async_trait]
pub trait ArtifactBackend {
    async fn list_artifacts(&self, params: &ListParams) -> Result<Vec<Artifact>, ClientError>;

    async fn search_artifacts(&self, query: &str) -> Result<Vec<Artifact>, ClientError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError>;

    async fn list_collections(&self) -> Result<Vec<Collection>, ClientError>;

    async fn ingest_url(&self, url: &str) -> Result<Artifact, ClientError>;
}

#[async_trait]
impl<T> ArtifactBackend for Arc<T>
where
    T: ArtifactBackend + Send + Sync + ?Sized,
{
    async fn list_artifacts(&self, params: &ListParams) -> Result<Vec<Artifact>, ClientError> {
        (**self).list_artifacts(params).await
    }

    async fn search_artifacts(&self, query: &str) -> Result<Vec<Artifact>, ClientError> {
        (**self).search_artifacts(query).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        (**self).list_tags().await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, ClientError> {
        (**self).list_collections().await
    }

    async fn ingest_url(&self, url: &str) -> Result<Artifact, ClientError> {
        (**self).ingest_url(url).await
    }
}
