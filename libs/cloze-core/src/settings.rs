//! Evaluator settings.

use serde::{Deserialize, Serialize};

/// Languages where character-level typos aren't a meaningful near miss.
pub const DEFAULT_NO_ALMOST_LANGUAGES: [&str; 3] = ["cmn", "jpn", "zho"];

/// Maximum edit distance from the preferred answer still graded "almost".
pub const DEFAULT_MAX_TYPOS: usize = 2;

/// Settings for grading typed answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorSettings {
    /// ISO 639-3 code of the language being studied.
    pub language: String,
    /// Languages that never get "almost".
    pub no_almost_languages: Vec<String>,
    pub max_typos: usize,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            language: "spa".to_string(),
            no_almost_languages: DEFAULT_NO_ALMOST_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_typos: DEFAULT_MAX_TYPOS,
        }
    }
}

impl EvaluatorSettings {
    /// Default settings for the given language.
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }

    /// Whether near misses are tolerated for the configured language.
    pub fn allows_almost(&self) -> bool {
        !self
            .no_almost_languages
            .iter()
            .any(|code| code.eq_ignore_ascii_case(&self.language))
    }
}
