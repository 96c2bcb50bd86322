//! Difficulty tuner.
//!
//! Moves the learner's level one step at a time, and only once a Wilson
//! score test says the current level is too easy or too hard.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::wilson::{is_too_easy, is_too_hard};

/// Snapshot of the tuner state, as exchanged with the server.
///
/// `correct` and `incorrect` count outcomes since the last level change.
/// `max: None` means the level is unbounded above.
///
/// Deserialization never fails on a field: anything that isn't a number
/// falls back to the default, and [`Difficulty::sanitized`] fixes the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    #[serde(deserialize_with = "lenient_integer")]
    pub level: i64,
    #[serde(deserialize_with = "lenient_count")]
    pub correct: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub incorrect: u32,
    #[serde(deserialize_with = "lenient_integer")]
    pub min: i64,
    #[serde(deserialize_with = "lenient_bound")]
    pub max: Option<i64>,
}

/// Any JSON value. Only finite numbers are kept.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Number(v) if v.is_finite() => Some(v),
        Lenient::Number(_) | Lenient::Other(_) => None,
    })
}

/// Negative counts become 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_number(deserializer)?;
    Ok(value.map_or(0, |v| v.clamp(0.0, f64::from(u32::MAX)) as u32))
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.map_or(0, |v| v as i64))
}

/// Null or non-numeric means unbounded.
fn lenient_bound<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.map(|v| v as i64))
}

impl Difficulty {
    /// Clamp a snapshot into a consistent state.
    pub fn sanitized(self) -> Self {
        let min = self.min.max(0);
        let max = self.max.map(|max| max.max(min));
        let in_range = self.level >= min && max.map_or(true, |max| self.level <= max);
        Self {
            level: if in_range { self.level } else { min },
            correct: self.correct,
            incorrect: self.incorrect,
            min,
            max,
        }
    }
}

/// Tracks correct/incorrect answers at the current level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DifficultyTuner {
    state: Difficulty,
}

impl DifficultyTuner {
    pub fn new(state: Difficulty) -> Self {
        Self {
            state: state.sanitized(),
        }
    }

    pub fn state(&self) -> &Difficulty {
        &self.state
    }

    pub fn level(&self) -> i64 {
        self.state.level
    }

    /// Replace the whole state, e.g. with a snapshot returned by the server.
    pub fn reset(&mut self, state: Difficulty) {
        self.state = state.sanitized();
    }

    /// Records a review result.
    /// Returns true if the level changed, in which case the counters are reset.
    pub fn update(&mut self, correct: bool) -> bool {
        let state = &mut self.state;
        if correct {
            state.correct = state.correct.saturating_add(1);
        } else {
            state.incorrect = state.incorrect.saturating_add(1);
        }

        let below_max = state.max.map_or(true, |max| state.level < max);
        if is_too_easy(state.correct, state.incorrect) && below_max {
            state.level += 1;
        } else if is_too_hard(state.correct, state.incorrect) && state.level > state.min {
            state.level -= 1;
        } else {
            return false;
        }

        state.correct = 0;
        state.incorrect = 0;
        true
    }
}
