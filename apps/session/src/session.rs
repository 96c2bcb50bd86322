//! Study session: connects the item buffer, grading and review uploads.

use chrono::Utc;
use cloze_core::{EvaluatorSettings, Status};
use tracing::{debug, warn};

use crate::attempt::CardAttempt;
use crate::buffer::ItemBuffer;
use crate::error::Result;
use crate::source::{FlashcardSource, ReviewTransport};
use crate::unsaved::UnsavedTracker;

pub struct Session<S, T> {
    buffer: ItemBuffer<S>,
    transport: T,
    settings: EvaluatorSettings,
    unsaved: UnsavedTracker,
}

impl<S: FlashcardSource, T: ReviewTransport> Session<S, T> {
    pub fn new(buffer: ItemBuffer<S>, transport: T, settings: EvaluatorSettings) -> Self {
        Self {
            buffer,
            transport,
            settings,
            unsaved: UnsavedTracker::default(),
        }
    }

    pub fn buffer(&self) -> &ItemBuffer<S> {
        &self.buffer
    }

    pub fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }

    /// Whether there are reviews the server hasn't acknowledged, including
    /// ones riding along with an outstanding fetch.
    pub fn has_unsaved(&self) -> bool {
        self.unsaved.has_unsaved() || self.buffer.unsent_reviews() > 0
    }

    /// Next flashcard, or `None` if there's nothing left to review.
    ///
    /// A flashcard with an unanswerable blank is dropped and reported as an
    /// error; calling again moves on to the next one.
    pub async fn next_card(&mut self) -> Result<Option<CardAttempt>> {
        let Some(item) = self.buffer.take().await? else {
            return Ok(None);
        };

        if let Err(e) = item.validate() {
            warn!(sentence = item.sentence.id, error = %e, "Skipping invalid flashcard");
            self.buffer.release(&item);
            return Err(e.into());
        }
        Ok(Some(CardAttempt::new(item)?))
    }

    /// Grade the learner's inputs, one per blank.
    pub fn check<I: AsRef<str>>(
        &self,
        attempt: &mut CardAttempt,
        inputs: &[I],
    ) -> Result<Vec<Status>> {
        Ok(attempt.check(inputs, &self.settings)?)
    }

    /// Report a finished card. Returns true if the difficulty level changed.
    ///
    /// A card that was never completed is released without a review.
    pub fn finish(&mut self, attempt: CardAttempt) -> bool {
        if !attempt.is_done() {
            self.buffer.release(attempt.item());
            return false;
        }

        let mut changed = false;
        for outcome in attempt.outcomes(Utc::now()) {
            changed |= self.buffer.record_outcome(outcome);
        }
        changed
    }

    /// Upload pending reviews and wait for the server.
    /// On failure the reviews are kept for the next try.
    pub async fn sync(&mut self) -> Result<usize> {
        let reviews = self.buffer.flush();
        if reviews.is_empty() {
            return Ok(0);
        }

        let count = reviews.len();
        let difficulty = self.buffer.difficulty().clone();
        let edit = self.unsaved.edit();
        match self.transport.submit(reviews.clone(), difficulty).await {
            Ok(()) => {
                edit.save();
                debug!(count, "Uploaded reviews");
                Ok(count)
            }
            Err(e) => {
                self.buffer.restore(reviews);
                Err(e)
            }
        }
    }

    /// Best-effort upload when the session is going away. Doesn't wait and
    /// doesn't retry. An outstanding fetch is aborted and its reviews are
    /// sent along.
    pub fn hide(&mut self) -> usize {
        self.buffer.abort_fetch();
        let reviews = self.buffer.flush();
        let count = reviews.len();
        if count > 0 {
            self.transport
                .submit_best_effort(reviews, self.buffer.difficulty().clone());
        }
        count
    }
}
