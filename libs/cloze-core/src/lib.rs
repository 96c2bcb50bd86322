//! Core cloze study library shared by study session clients.
//!
//! Provides:
//! - Wilson score bounds and the difficulty tuner built on them
//! - Answer matching for typed blanks (Levenshtein distance)
//! - Digraph input for letters with diacritics
//! - Shared types (Item, Part, Answer, ReviewOutcome, etc.)

pub mod difficulty;
pub mod digraph;
pub mod error;
pub mod matching;
pub mod settings;
pub mod types;
pub mod wilson;

pub use difficulty::{Difficulty, DifficultyTuner};
pub use digraph::substitute_digraphs;
pub use error::{ContractError, Result};
pub use matching::{edit_distance, evaluate, levenshtein_distance, normalize, Evaluation};
pub use settings::EvaluatorSettings;
pub use types::{Answer, Item, Part, ReviewOutcome, Sentence, Status, Translation};
