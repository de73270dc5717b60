use crate::completion::{ChatCompletion, ChatRequest};
use crate::error::{CopyError, Result};
use crate::generators::rewrite::ensure_instruction;
use crate::generators::traits::CopyGenerator;
use crate::models::{
    word_count, GenerationResult, ListingFacts, PremiumDetails, Section, PREMIUM_SLUG,
    PREMIUM_TITLE, SECTION_LAYOUT,
};
use crate::prompts::{ComposedPrompt, PromptComposer};
use crate::recovery::{recover_section, recover_sections};
use crate::sanitize::sanitize;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Low temperature keeps structured copy close to the facts
pub const STRUCTURED_TEMPERATURE: f32 = 0.4;
pub const REWRITE_TEMPERATURE: f32 = 0.5;
pub const LONG_FORM_TEMPERATURE: f32 = 0.6;

/// Delegates copy to a chat-completion capability.
///
/// Failures are surfaced as [`CopyError`]; wrap in a
/// [`FallbackGenerator`](crate::generators::FallbackGenerator) to get
/// heuristic copy instead.
pub struct ModelBackedGenerator<C> {
    client: C,
    composer: PromptComposer,
}

impl<C: ChatCompletion> ModelBackedGenerator<C> {
    pub fn new(client: C) -> Self {
        Self::with_composer(client, PromptComposer::default())
    }

    pub fn with_composer(client: C, composer: PromptComposer) -> Self {
        Self { client, composer }
    }

    /// One outbound call, raced against cancellation
    async fn call(
        &self,
        prompt: ComposedPrompt,
        temperature: f32,
        listing: &ListingFacts,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let model = listing
            .style_profile
            .as_ref()
            .and_then(|p| p.model_id.as_deref());

        let request = ChatRequest::new(temperature)
            .system(prompt.system)
            .user(prompt.user)
            .model(model);

        debug!(
            provider = self.client.provider_name(),
            temperature,
            prompt_length = request.messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "Calling chat completion"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CopyError::Cancelled),
            reply = self.client.complete(request) => reply.map_err(|e| {
                warn!(error = %e, provider = self.client.provider_name(), "Chat completion failed");
                CopyError::CompletionFailed(format!("{:#}", e))
            }),
        }
    }

    async fn long_form(
        &self,
        listing: &ListingFacts,
        details: &PremiumDetails,
        cancel: &CancellationToken,
    ) -> Result<Section> {
        let prompt = self.composer.long_form(listing, details);
        let reply = self
            .call(prompt, LONG_FORM_TEMPERATURE, listing, cancel)
            .await?;

        let content = sanitize(&reply);
        if content.is_empty() {
            return Err(CopyError::RecoveryFailed(
                "long-form reply was empty".to_string(),
            ));
        }

        info!(
            words = word_count(&content),
            limit = details.word_limit(),
            "Long-form copy generated"
        );

        Ok(Section::new(PREMIUM_SLUG, PREMIUM_TITLE, content))
    }

    async fn structured(
        &self,
        listing: &ListingFacts,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult> {
        let prompt = self.composer.generation(listing);
        let reply = self
            .call(prompt, STRUCTURED_TEMPERATURE, listing, cancel)
            .await?;

        let mut sections = recover_sections(&reply).map_err(|e| {
            warn!(error = %e, "Could not recover sections from model reply");
            e
        })?;

        // Canonical layout order first, unknown slugs after in reply order
        sections.sort_by_key(|section| {
            SECTION_LAYOUT
                .iter()
                .position(|(slug, _)| *slug == section.slug)
                .unwrap_or(SECTION_LAYOUT.len())
        });

        for section in &mut sections {
            section.content = sanitize(&section.content);
        }

        let result = GenerationResult::new(sections);
        info!(
            sections = result.sections.len(),
            words = word_count(&result.full_copy),
            "Structured copy generated"
        );
        Ok(result)
    }
}

#[async_trait]
impl<C: ChatCompletion> CopyGenerator for ModelBackedGenerator<C> {
    async fn generate(
        &self,
        listing: &ListingFacts,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult> {
        if let Some(details) = listing.long_form_details() {
            info!(address = %listing.address, "Premium details present, generating long-form copy");
            match self.long_form(listing, details, cancel).await {
                Ok(section) => return Ok(GenerationResult::new(vec![section])),
                Err(CopyError::Cancelled) => return Err(CopyError::Cancelled),
                Err(e) => {
                    warn!(error = %e, "Long-form generation failed, trying structured sections")
                }
            }
        }

        self.structured(listing, cancel).await
    }

    async fn rewrite(
        &self,
        listing: &ListingFacts,
        section: &Section,
        instruction: &str,
        cancel: &CancellationToken,
    ) -> Result<Section> {
        let instruction = ensure_instruction(instruction)?;

        info!(
            slug = %section.slug,
            words = word_count(&section.content),
            "Rewriting section with model"
        );

        let prompt = self.composer.rewrite(section, instruction, listing);
        let reply = self
            .call(prompt, REWRITE_TEMPERATURE, listing, cancel)
            .await?;

        let mut rewritten = recover_section(&reply, section)?;
        rewritten.content = sanitize(&rewritten.content);

        debug!(
            slug = %rewritten.slug,
            words = word_count(&rewritten.content),
            "Section rewritten"
        );

        Ok(rewritten)
    }

    fn strategy_name(&self) -> &'static str {
        "ModelBacked"
    }
}
