use crate::error::Result;
use crate::generators::heuristic::HeuristicGenerator;
use crate::generators::traits::CopyGenerator;
use crate::models::{GenerationResult, ListingFacts, Section};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Runs a primary strategy and substitutes heuristic copy when it fails
/// with a recoverable error. Cancellation and validation errors pass through.
pub struct FallbackGenerator<P> {
    primary: P,
    fallback: HeuristicGenerator,
}

impl<P: CopyGenerator> FallbackGenerator<P> {
    pub fn new(primary: P) -> Self {
        Self::with_fallback(primary, HeuristicGenerator::default())
    }

    pub fn with_fallback(primary: P, fallback: HeuristicGenerator) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: CopyGenerator> CopyGenerator for FallbackGenerator<P> {
    async fn generate(
        &self,
        listing: &ListingFacts,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult> {
        match self.primary.generate(listing, cancel).await {
            Err(e) if e.is_recoverable() => {
                warn!(
                    error = %e,
                    primary = self.primary.strategy_name(),
                    "Generation failed, using heuristic copy"
                );
                self.fallback.generate(listing, cancel).await
            }
            other => other,
        }
    }

    async fn rewrite(
        &self,
        listing: &ListingFacts,
        section: &Section,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> Result<Section> {
        match self
            .primary
            .rewrite(listing, section, instruction, cancel)
            .await
        {
            Err(e) if e.is_recoverable() => {
                warn!(
                    error = %e,
                    slug = %section.slug,
                    primary = self.primary.strategy_name(),
                    "Rewrite failed, using heuristic rewrite"
                );
                self.fallback
                    .rewrite(listing, section, instruction, cancel)
                    .await
            }
            other => other,
        }
    }

    fn strategy_name(&self) -> &'static str {
        "Fallback"
    }
}
