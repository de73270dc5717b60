use crate::completion::types::ChatRequest;
use anyhow::Result;
use async_trait::async_trait;

/// Anything that can answer a chat-completion request with text.
/// Providers vary, so only the reply text is part of the contract.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the messages and return the assistant's reply
    async fn complete(&self, request: ChatRequest) -> Result<String>;

    /// Get the name of the provider, for logging
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
impl<C: ChatCompletion + ?Sized> ChatCompletion for std::sync::Arc<C> {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        (**self).complete(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
