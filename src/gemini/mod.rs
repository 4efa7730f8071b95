// Gemini text generation.
// Client, retry policy and the generator trait commentary depends on.

pub mod client;
pub mod retry;

use async_trait::async_trait;

use crate::error::Result;

pub use client::{FinishReason, GeminiClient, Generation};
pub use retry::RetryPolicy;

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
