use crate::traits::ArtifactBackend;
use crate::{Artifact, ClientError, Collection, ListParams, Tag};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// `ArtifactBackend` over the archive server's `/api` routes.
pub struct RestBackend {
    client: Arc<Client>,
    base_url: Url,
}

impl RestBackend {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: Arc::new(Client::new()),
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        operation: &'static str,
    ) -> Result<T, ClientError> {
        let response = self
            .client
            .get(self.endpoint(path)?)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::status(operation, response.status()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ArtifactBackend for RestBackend {
    async fn list_artifacts(&self, params: &ListParams) -> Result<Vec<Artifact>, ClientError> {
        self.get_json("artifacts", &params.query_pairs(), "fetch artifacts")
            .await
    }

    async fn search_artifacts(&self, query: &str) -> Result<Vec<Artifact>, ClientError> {
        self.get_json("search", &[("q", query.to_string())], "search artifacts")
            .await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        self.get_json("tags", &[], "fetch tags").await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, ClientError> {
        self.get_json("collections", &[], "fetch collections").await
    }

    async fn ingest_url(&self, url: &str) -> Result<Artifact, ClientError> {
        let response = self
            .client
            .post(self.endpoint("ingest")?)
            .query(&[("url", url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ingest_rejection(response).await);
        }

        Ok(response.json().await?)
    }
}

async fn ingest_rejection(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let reason = status.canonical_reason().unwrap_or_else(|| status.as_str());
    ClientError::Ingest(
        rejection_detail(&body).unwrap_or_else(|| format!("Ingest failed: {reason}")),
    )
}

fn rejection_detail(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("detail")
        .and_then(Value::as_str)
        .map(str::to_string)
}
