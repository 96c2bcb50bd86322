//! Session configuration from environment variables.

use cloze_core::settings::DEFAULT_NO_ALMOST_LANGUAGES;
use cloze_core::EvaluatorSettings;

use crate::buffer::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use crate::error::{Result, SessionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Server origin without a trailing slash.
    pub server_url: String,
    /// Learner's language code.
    pub l1: String,
    /// Target language code.
    pub l2: String,
    pub batch_size: usize,
    pub csrf_token: Option<String>,
    pub no_almost_languages: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            l1: "eng".to_string(),
            l2: "spa".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            csrf_token: None,
            no_almost_languages: DEFAULT_NO_ALMOST_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SessionConfig {
    /// Load from the environment, reading `.env` first if there is one.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables. Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get("CLOZE_SERVER_URL") {
            config.server_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(l1) = get("CLOZE_L1") {
            config.l1 = l1.trim().to_string();
        }
        if let Some(l2) = get("CLOZE_L2") {
            config.l2 = l2.trim().to_string();
        }
        if let Some(size) = get("CLOZE_BATCH_SIZE") {
            let size: usize = size
                .trim()
                .parse()
                .map_err(|e| SessionError::Config(format!("CLOZE_BATCH_SIZE: {e}")))?;
            config.batch_size = size.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE);
        }
        config.csrf_token = get("CLOZE_CSRF_TOKEN");
        if let Some(codes) = lookup("CLOZE_NO_ALMOST_LANGUAGES") {
            config.no_almost_languages = codes
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect();
        }

        if config.l1 == config.l2 {
            return Err(SessionError::Config(format!(
                "CLOZE_L1 and CLOZE_L2 are both {}",
                config.l1
            )));
        }
        Ok(config)
    }

    /// Grading settings for the target language.
    pub fn evaluator_settings(&self) -> EvaluatorSettings {
        EvaluatorSettings {
            language: self.l2.clone(),
            no_almost_languages: self.no_almost_languages.clone(),
            ..Default::default()
        }
    }
}
