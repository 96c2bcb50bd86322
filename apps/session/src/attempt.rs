//! Grading state for one flashcard.

use chrono::{DateTime, Utc};
use cloze_core::{evaluate, ContractError, EvaluatorSettings, Item, Part, ReviewOutcome, Status};

/// A flashcard being answered. The learner may check several times; a blank
/// that was ever graded incorrect counts as a miss.
#[derive(Debug, Clone)]
pub struct CardAttempt {
    item: Item,
    missed: Vec<bool>,
    done: bool,
}

impl CardAttempt {
    /// Fails if a blank has no acceptable answers.
    pub fn new(item: Item) -> Result<Self, ContractError> {
        item.validate()?;
        let blanks = item.blanks().count();
        Ok(Self {
            item,
            missed: vec![false; blanks],
            done: false,
        })
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn blank_count(&self) -> usize {
        self.missed.len()
    }

    /// Preferred answer of each blank, shown after an incorrect answer.
    pub fn hints(&self) -> Vec<&str> {
        self.item
            .blanks()
            .filter_map(Part::preferred)
            .map(|answer| answer.text.as_str())
            .collect()
    }

    /// Grade one input per blank.
    pub fn check<S: AsRef<str>>(
        &mut self,
        inputs: &[S],
        settings: &EvaluatorSettings,
    ) -> Result<Vec<Status>, ContractError> {
        if inputs.len() != self.missed.len() {
            return Err(ContractError::BlankCountMismatch {
                expected: self.missed.len(),
                got: inputs.len(),
            });
        }

        let mut statuses = Vec::with_capacity(inputs.len());
        for ((part, input), missed) in self.item.blanks().zip(inputs).zip(self.missed.iter_mut()) {
            let answers = part.answers.as_deref().unwrap_or_default();
            let status = evaluate(input.as_ref(), answers, settings)?.status;
            if status == Status::Incorrect {
                *missed = true;
            }
            statuses.push(status);
        }

        self.done = statuses.iter().all(|status| *status == Status::Correct);
        Ok(statuses)
    }

    /// Whether every blank was answered correctly on the last check.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// One review per blank, keyed by the blank's preferred word.
    /// Empty until the attempt is done.
    pub fn outcomes(&self, now: DateTime<Utc>) -> Vec<ReviewOutcome> {
        if !self.done {
            return Vec::new();
        }

        self.item
            .blanks()
            .filter_map(Part::preferred)
            .zip(&self.missed)
            .map(|(answer, missed)| {
                ReviewOutcome::new(answer.normalized.clone(), !missed, answer.is_new, now)
            })
            .collect()
    }
}
