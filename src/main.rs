use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use listing_copy::completion::OpenAiChatClient;
use listing_copy::config::Config;
use listing_copy::models::StyleProfile;
use listing_copy::prompts::PromptComposer;
use listing_copy::styles::{InMemoryStyleProfiles, StyleProfileStore};
use listing_copy::{
    CopyError, CopyGenerator, FallbackGenerator, GenerationResult, HeuristicGenerator, ListingFacts,
    ModelBackedGenerator,
};
use serde::Serialize;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: listing-copy <listing.json> [--style <profiles.json> <id>] [--rewrite <slug> <instruction>]";

struct Args {
    listing_path: String,
    style: Option<(String, String)>,
    rewrite: Option<(String, String)>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let listing_path = args.next().context(USAGE)?;
    let mut style = None;
    let mut rewrite = None;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--style" => {
                let path = args.next().context(USAGE)?;
                let id = args.next().context(USAGE)?;
                style = Some((path, id));
            }
            "--rewrite" => {
                let slug = args.next().context(USAGE)?;
                let instruction = args.by_ref().collect::<Vec<_>>().join(" ");
                rewrite = Some((slug, instruction));
                break;
            }
            other => bail!("unknown argument {:?}\n{}", other, USAGE),
        }
    }

    Ok(Args {
        listing_path,
        style,
        rewrite,
    })
}

#[derive(Serialize)]
struct Output<'a> {
    address: &'a str,
    strategy: &'static str,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    result: &'a GenerationResult,
}

/// Message shown to the user when trying again later may help
fn retry_hint(err: &CopyError) -> Option<&'static str> {
    match err {
        CopyError::Cancelled => Some("Avbrutet. Försök igen."),
        e if e.is_retryable() => Some("Kunde inte skapa annonstext just nu, försök igen."),
        _ => None,
    }
}

fn surface(err: CopyError) -> anyhow::Error {
    if let Some(hint) = retry_hint(&err) {
        eprintln!("{}", hint);
    }
    err.into()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;
    let config = Config::from_env()?;

    let raw = tokio::fs::read_to_string(&args.listing_path)
        .await
        .with_context(|| format!("Failed to read {}", args.listing_path))?;
    let mut listing: ListingFacts =
        serde_json::from_str(&raw).context("Failed to parse listing JSON")?;

    if let Some((path, id)) = &args.style {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path))?;
        let profiles: HashMap<String, StyleProfile> =
            serde_json::from_str(&raw).context("Failed to parse style profiles")?;
        let store: InMemoryStyleProfiles = profiles.into_iter().collect();

        let profile = store.profile(id).await?;
        if profile.is_none() {
            warn!(profile = %id, "Style profile not found, generating without it");
        }
        listing = listing.with_style_profile(profile);
    }

    let heuristic = HeuristicGenerator::new(config.geodata_cap);
    let generator: Box<dyn CopyGenerator> = if config.has_model() {
        let client = OpenAiChatClient::from_config(&config)?;
        let model = ModelBackedGenerator::with_composer(
            client,
            PromptComposer::new(config.geodata_cap),
        );
        Box::new(FallbackGenerator::with_fallback(model, heuristic))
    } else {
        info!("OPENAI_API_KEY not set, using heuristic copy only");
        Box::new(heuristic)
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    info!(
        address = %listing.address,
        strategy = generator.strategy_name(),
        "Generating listing copy"
    );
    let mut result = generator
        .generate(&listing, &cancel)
        .await
        .map_err(surface)?;

    if let Some((slug, instruction)) = &args.rewrite {
        let section = result
            .section(slug)
            .cloned()
            .with_context(|| format!("No section with slug {:?} to rewrite", slug))?;
        let rewritten = generator
            .rewrite(&listing, &section, instruction, &cancel)
            .await
            .map_err(surface)?;
        result.replace_section(rewritten);
        info!(slug = %slug, "Section rewritten");
    }

    for section in &result.sections {
        println!("## {} ({})", section.title, section.slug);
        println!("{}", section.content);
        println!();
    }

    let output = Output {
        address: &listing.address,
        strategy: generator.strategy_name(),
        generated_at: Utc::now(),
        result: &result,
    };
    let json = serde_json::to_string_pretty(&output)?;
    tokio::fs::write("generated_copy.json", json).await?;
    info!("Saved copy to generated_copy.json");

    Ok(())
}
