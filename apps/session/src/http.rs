//! HTTP client for the flashcard server.

use std::sync::Arc;

use cloze_core::{Difficulty, ReviewOutcome};
use reqwest::Client;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::source::{FetchRequest, FetchResponse, FlashcardSource, ReviewTransport};

// === API Request Types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlashcardsRequest<'a> {
    limit: usize,
    difficulty: &'a Difficulty,
    reviews: &'a [ReviewOutcome],
    exclude: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    csrf_token: Option<&'a str>,
}

/// Inner state shared across clones.
struct HttpClientInner {
    client: Client,
    endpoint: String,
    csrf_token: Option<String>,
}

/// Client for the `/{l1}/{l2}/flashcards` endpoint.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

impl HttpClient {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            inner: Arc::new(HttpClientInner {
                client: Client::new(),
                endpoint: format!(
                    "{}/{}/{}/flashcards",
                    config.server_url.trim_end_matches('/'),
                    config.l1,
                    config.l2
                ),
                csrf_token: config.csrf_token.clone(),
            }),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    async fn post(
        &self,
        limit: usize,
        difficulty: &Difficulty,
        reviews: &[ReviewOutcome],
        exclude: &[String],
    ) -> Result<FetchResponse> {
        let request = FlashcardsRequest {
            limit,
            difficulty,
            reviews,
            exclude,
            csrf_token: self.inner.csrf_token.as_deref(),
        };

        let mut builder = self.inner.client.post(&self.inner.endpoint).json(&request);
        if let Some(token) = &self.inner.csrf_token {
            builder = builder.header("X-CSRF-Token", token);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(SessionError::Backend { status, message });
        }

        resp.json()
            .await
            .map_err(|e| SessionError::Parse(e.to_string()))
    }

    /// Spawn an upload nobody waits for. The handle is only useful for tests
    /// and for giving the upload a moment before shutdown.
    pub fn send_beacon(
        &self,
        reviews: Vec<ReviewOutcome>,
        difficulty: Difficulty,
    ) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            let count = reviews.len();
            if let Err(e) = client.post(0, &difficulty, &reviews, &[]).await {
                warn!(count, error = %e, "Best-effort review upload failed");
            }
        })
    }
}

impl FlashcardSource for HttpClient {
    async fn fetch_batch(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.post(
            request.limit,
            &request.difficulty,
            &request.reviews,
            &request.exclude,
        )
        .await
    }
}

impl ReviewTransport for HttpClient {
    async fn submit(&self, reviews: Vec<ReviewOutcome>, difficulty: Difficulty) -> Result<()> {
        self.post(0, &difficulty, &reviews, &[]).await.map(|_| ())
    }

    fn submit_best_effort(&self, reviews: Vec<ReviewOutcome>, difficulty: Difficulty) {
        let _ = self.send_beacon(reviews, difficulty);
    }
}
