//! Interfaces to the flashcard server.

use std::future::Future;

use cloze_core::{Difficulty, Item, ReviewOutcome};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Request for a batch of new flashcards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    /// Max number of items to fetch.
    pub limit: usize,
    /// Normalized words that are already buffered.
    pub exclude: Vec<String>,
    /// Review results the server hasn't seen yet.
    pub reviews: Vec<ReviewOutcome>,
    pub difficulty: Difficulty,
}

/// Batch of flashcards returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub items: Vec<Item>,
    /// Authoritative difficulty snapshot, if the server sent one.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Source of new flashcards.
pub trait FlashcardSource: Send + Sync + 'static {
    fn fetch_batch(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Result<FetchResponse>> + Send;
}

/// Uploads review results.
pub trait ReviewTransport: Send + Sync + 'static {
    /// Upload reviews and wait for the server to acknowledge them.
    fn submit(
        &self,
        reviews: Vec<ReviewOutcome>,
        difficulty: Difficulty,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Upload reviews without waiting for an answer. Failures are only logged.
    fn submit_best_effort(&self, reviews: Vec<ReviewOutcome>, difficulty: Difficulty);
}
