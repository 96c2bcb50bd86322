//! Common test utilities for session integration tests.
//!
//! Provides:
//! - ScriptedSource: a FlashcardSource that replays canned responses
//! - RecordingTransport: a ReviewTransport that remembers uploads

#![allow(dead_code)]

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cloze_core::{Difficulty, ReviewOutcome};
use cloze_session::{
    FetchRequest, FetchResponse, FlashcardSource, Result, ReviewTransport, SessionError,
};

/// Flashcard source that replays responses in order, then returns empty batches.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<FetchResponse>>>,
    requests: Mutex<Vec<FetchRequest>>,
    delay: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<FetchResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    /// Like `new`, but every fetch takes `delay` to answer.
    pub fn slow(responses: Vec<Result<FetchResponse>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl FlashcardSource for ScriptedSource {
    async fn fetch_batch(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(FetchResponse::default()))
    }
}

#[derive(Default)]
struct RecordingInner {
    submitted: Mutex<Vec<(Vec<ReviewOutcome>, Difficulty)>>,
    beacons: Mutex<Vec<Vec<ReviewOutcome>>>,
    fail: AtomicBool,
}

/// Review transport that keeps everything it was asked to upload.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<RecordingInner>,
}

impl RecordingTransport {
    /// Make every awaited upload fail with a network error.
    pub fn set_failing(&self, fail: bool) {
        self.inner.fail.store(fail, Ordering::SeqCst);
    }

    pub fn submitted(&self) -> Vec<(Vec<ReviewOutcome>, Difficulty)> {
        self.inner.submitted.lock().unwrap().clone()
    }

    pub fn beacons(&self) -> Vec<Vec<ReviewOutcome>> {
        self.inner.beacons.lock().unwrap().clone()
    }
}

impl ReviewTransport for RecordingTransport {
    async fn submit(&self, reviews: Vec<ReviewOutcome>, difficulty: Difficulty) -> Result<()> {
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(SessionError::Network("connection reset".to_string()));
        }
        self.inner.submitted.lock().unwrap().push((reviews, difficulty));
        Ok(())
    }

    fn submit_best_effort(&self, reviews: Vec<ReviewOutcome>, _difficulty: Difficulty) {
        self.inner.beacons.lock().unwrap().push(reviews);
    }
}
