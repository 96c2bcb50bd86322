//! Item buffer.
//!
//! Prefetches flashcards so the study loop rarely waits on the network, and
//! makes sure no two buffered items test the same word.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use cloze_core::{Difficulty, DifficultyTuner, Item, ReviewOutcome};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::source::{FetchRequest, FetchResponse, FlashcardSource};

/// A refill starts once fewer items than this are buffered. Also the number
/// of items kept when the level changes.
pub const REFILL_THRESHOLD: usize = 3;

pub const MIN_BATCH_SIZE: usize = 10;
pub const MAX_BATCH_SIZE: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = MAX_BATCH_SIZE;

/// Outstanding fetch. Keeps the reviews it carries so they can be put back
/// if the request fails.
struct InFlight {
    handle: JoinHandle<Result<FetchResponse>>,
    reviews: Vec<ReviewOutcome>,
    /// Level changes seen when the request was sent.
    generation: u64,
}

pub struct ItemBuffer<S> {
    source: Arc<S>,
    queue: VecDeque<Item>,
    keys: HashSet<String>,
    tuner: DifficultyTuner,
    pending: Vec<ReviewOutcome>,
    batch_size: usize,
    in_flight: Option<InFlight>,
    /// Number of level changes made by the local tuner.
    generation: u64,
}

impl<S: FlashcardSource> ItemBuffer<S> {
    pub fn new(source: Arc<S>, difficulty: Difficulty) -> Self {
        Self {
            source,
            queue: VecDeque::new(),
            keys: HashSet::new(),
            tuner: DifficultyTuner::new(difficulty),
            pending: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            in_flight: None,
            generation: 0,
        }
    }

    /// Set the number of items requested per fetch (clamped to 10..=50).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE);
        self
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn difficulty(&self) -> &Difficulty {
        self.tuner.state()
    }

    /// Whether a buffered or unresolved item uses this word.
    pub fn is_occupied(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn pending_reviews(&self) -> &[ReviewOutcome] {
        &self.pending
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Reviews the server hasn't acknowledged: pending ones plus those
    /// carried by the outstanding fetch.
    pub fn unsent_reviews(&self) -> usize {
        let carried = self.in_flight.as_ref().map_or(0, |in_flight| in_flight.reviews.len());
        self.pending.len() + carried
    }

    /// Buffered items in delivery order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.queue.iter()
    }

    /// Add item if it's not a duplicate.
    pub fn add(&mut self, item: Item) -> bool {
        let words = item.dedup_keys();
        if let Some(word) = words.iter().find(|word| self.keys.contains(**word)) {
            debug!(word = *word, sentence = item.sentence.id, "Rejected duplicate item");
            return false;
        }

        self.keys.extend(words.into_iter().map(str::to_string));
        self.queue.push_back(item);
        true
    }

    /// Take the next item.
    ///
    /// Starts a refill when the buffer runs low. Only waits for it if nothing
    /// is buffered. Returns `None` if the server has nothing left to review.
    ///
    /// Cancel safe: if the returned future is dropped while waiting, the
    /// fetch stays outstanding and the next call picks it up.
    pub async fn take(&mut self) -> Result<Option<Item>> {
        self.collect_finished().await;

        if self.queue.len() < REFILL_THRESHOLD && self.in_flight.is_none() {
            self.start_fetch();
        }

        if self.queue.is_empty() {
            self.finish_fetch().await?;
        }
        Ok(self.queue.pop_front())
    }

    /// Wait for the outstanding fetch, if any.
    pub async fn wait_for_fetch(&mut self) -> Result<()> {
        self.finish_fetch().await
    }

    /// Stop the outstanding fetch and move the reviews it carried back to
    /// the pending list.
    pub fn abort_fetch(&mut self) {
        if let Some(InFlight { handle, reviews, .. }) = self.in_flight.take() {
            handle.abort();
            self.restore(reviews);
        }
    }

    /// Record the result of a review.
    ///
    /// Frees the reviewed word and feeds new words to the difficulty tuner.
    /// Returns true if the level changed, in which case stale items get
    /// evicted.
    pub fn record_outcome(&mut self, outcome: ReviewOutcome) -> bool {
        self.keys.remove(&outcome.word);

        let changed = outcome.is_new && self.tuner.update(outcome.correct);
        self.pending.push(outcome);

        if changed {
            self.generation += 1;
            info!(level = self.tuner.level(), "Difficulty level changed");
            self.evict_stale();
        }
        changed
    }

    /// Free the words of an item that won't be reviewed.
    pub fn release(&mut self, item: &Item) {
        for word in item.dedup_keys() {
            self.keys.remove(word);
        }
    }

    /// Take all pending reviews for upload.
    pub fn flush(&mut self) -> Vec<ReviewOutcome> {
        std::mem::take(&mut self.pending)
    }

    /// Put back reviews that couldn't be uploaded, ahead of newer ones.
    pub fn restore(&mut self, reviews: Vec<ReviewOutcome>) {
        if reviews.is_empty() {
            return;
        }
        self.pending.splice(0..0, reviews);
    }

    /// Drop items picked for the old level. The first few are kept so the
    /// learner isn't left waiting on a refill.
    fn evict_stale(&mut self) {
        if self.queue.len() <= REFILL_THRESHOLD {
            return;
        }

        let evicted = self.queue.split_off(REFILL_THRESHOLD);
        for item in &evicted {
            self.release(item);
        }
        info!(evicted = evicted.len(), "Evicted stale items");
    }

    fn start_fetch(&mut self) {
        let reviews = self.flush();
        let request = FetchRequest {
            limit: self.batch_size,
            exclude: self.keys.iter().cloned().collect(),
            reviews: reviews.clone(),
            difficulty: self.tuner.state().clone(),
        };
        debug!(
            limit = request.limit,
            exclude = request.exclude.len(),
            reviews = request.reviews.len(),
            "Fetching flashcards"
        );

        let source = Arc::clone(&self.source);
        let handle = tokio::spawn(async move { source.fetch_batch(request).await });
        self.in_flight = Some(InFlight {
            handle,
            reviews,
            generation: self.generation,
        });
    }

    /// Apply a background fetch that already completed. Failures are logged
    /// and the next `take` tries again.
    async fn collect_finished(&mut self) {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.handle.is_finished());
        if !finished {
            return;
        }

        if let Err(e) = self.finish_fetch().await {
            warn!(error = %e, "Background fetch failed");
        }
    }

    /// Wait for the outstanding fetch and apply its result. The fetch stays
    /// in `in_flight` until it has completed.
    async fn finish_fetch(&mut self) -> Result<()> {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return Ok(());
        };
        let joined = (&mut in_flight.handle).await;
        let Some(InFlight {
            reviews,
            generation,
            ..
        }) = self.in_flight.take()
        else {
            return Ok(());
        };

        let response = match joined {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                self.restore(reviews);
                return Err(e);
            }
            Err(e) => {
                self.restore(reviews);
                return Err(e.into());
            }
        };

        // The server's snapshot was computed from the state sent with the
        // request. A local level change since then wins.
        match response.difficulty {
            Some(difficulty) if generation == self.generation => self.tuner.reset(difficulty),
            Some(_) => debug!(level = self.tuner.level(), "Ignored stale difficulty snapshot"),
            None => {}
        }

        let received = response.items.len();
        let mut accepted = 0;
        for item in response.items {
            if self.add(item) {
                accepted += 1;
            }
        }
        debug!(received, accepted, buffered = self.queue.len(), "Fetched flashcards");
        Ok(())
    }
}
