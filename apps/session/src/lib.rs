//! Adaptive cloze study session client.
//!
//! Provides:
//! - Item buffer that prefetches flashcards and tunes the difficulty level
//! - Per-card grading state
//! - HTTP client for the flashcard server
//! - Configuration and logging setup for the terminal driver

pub mod attempt;
pub mod buffer;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod session;
pub mod source;
pub mod unsaved;

pub use attempt::CardAttempt;
pub use buffer::ItemBuffer;
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use http::HttpClient;
pub use session::Session;
pub use source::{FetchRequest, FetchResponse, FlashcardSource, ReviewTransport};
