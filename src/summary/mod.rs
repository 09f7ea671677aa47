//! Meeting summarization via a remote chat-completion API.

mod chat;

pub use chat::ChatCompletionSummarizer;

use crate::error::Result;
use async_trait::async_trait;

/// Prefix of the summary returned when the remote API answers with a non-200 status.
pub const REMOTE_ERROR_PREFIX: &str = "Error from AI: ";

/// Trait for summarization services.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a meeting transcript.
    ///
    /// A remote API that answers with an error status still yields `Ok`, with
    /// the summary set to [`REMOTE_ERROR_PREFIX`] followed by the raw response
    /// body. `Err` is reserved for failures to reach the API or to read a
    /// successful response.
    async fn summarize(&self, transcript: &str) -> Result<String>;
}
