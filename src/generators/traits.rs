use crate::error::Result;
use crate::models::{GenerationResult, ListingFacts, Section};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Common trait for all copy generation strategies.
/// Implementations hold no per-call state and may be shared across tasks.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    /// Produce the full set of sections for a listing
    async fn generate(
        &self,
        listing: &ListingFacts,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult>;

    /// Apply a free-text editing instruction to one section
    async fn rewrite(
        &self,
        listing: &ListingFacts,
        section: &Section,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> Result<Section>;

    /// Get the name of the strategy, for logging
    fn strategy_name(&self) -> &'static str;
}

#[async_trait]
impl<G: CopyGenerator + ?Sized> CopyGenerator for Box<G> {
    async fn generate(
        &self,
        listing: &ListingFacts,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult> {
        (**self).generate(listing, cancel).await
    }

    async fn rewrite(
        &self,
        listing: &ListingFacts,
        section: &Section,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> Result<Section> {
        (**self).rewrite(listing, section, instruction, cancel).await
    }

    fn strategy_name(&self) -> &'static str {
        (**self).strategy_name()
    }
}
