//! HTTP syncer for a remote score store.
//!
//! Posts `{"actor_id": .., "points": ..}` to an increment endpoint. The
//! store is expected to add `points` to the actor's current score
//! atomically on its side, so no read-modify-write happens here.

use serde::Serialize;
use url::Url;

use super::{SyncError, Syncer};

#[derive(Debug, Serialize)]
struct IncrementRequest<'a> {
    actor_id: &'a str,
    points: u32,
}

/// Syncer backed by an HTTP increment endpoint.
#[derive(Debug, Clone)]
pub struct HttpSyncer {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpSyncer {
    /// # Errors
    /// Returns [`SyncError::InvalidEndpoint`] if `endpoint` is not a URL.
    pub fn new(endpoint: &str) -> Result<Self, SyncError> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
            api_key: None,
        })
    }

    /// Send `api_key` as a bearer token and `apikey` header.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl Syncer for HttpSyncer {
    async fn sync(&self, actor_id: &str, points: u32) -> Result<(), SyncError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&IncrementRequest { actor_id, points });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
