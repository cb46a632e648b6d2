//! Text-generation providers.

pub mod cli;
pub mod openai;
pub mod provider;

use std::sync::Arc;

use async_trait::async_trait;

pub use openai::OpenAiGenerator;
pub use provider::{
    LlmError, Provider, ProviderSettings, build_generator, check_provider_available,
};

/// A text-generation service: one prompt in, one completion out.
///
/// No streaming, no conversation state. An empty string is a valid answer;
/// callers decide what "no content" means.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }
}
