use async_trait::async_trait;
use listing_copy::completion::{ChatCompletion, ChatRequest};
use listing_copy::geodata::{bullet_lines, summarize};
use listing_copy::models::{
    GeoInsight, PointOfInterest, PremiumDetails, RoomDescription, TransitOption, DEFAULT_TONE,
};
use listing_copy::recovery::{recover_section, recover_sections};
use listing_copy::generators::rewrite::split_sentences;
use listing_copy::sanitize::sanitize;
use listing_copy::{
    CopyError, CopyGenerator, FallbackGenerator, HeuristicGenerator, ListingFacts,
    ModelBackedGenerator, Section,
};
use tokio_util::sync::CancellationToken;

struct Unreachable;

#[async_trait]
impl ChatCompletion for Unreachable {
    async fn complete(&self, _request: ChatRequest) -> anyhow::Result<String> {
        anyhow::bail!("connection refused")
    }

    fn provider_name(&self) -> &'static str {
        "Unreachable"
    }
}

fn storgatan() -> ListingFacts {
    ListingFacts {
        address: "Storgatan 4".to_string(),
        rooms: 2.0,
        living_area: 55.0,
        tone: String::new(),
        highlights: vec!["balkong".to_string()],
        ..Default::default()
    }
}

#[tokio::test]
async fn heuristic_intro_for_storgatan() {
    let result = HeuristicGenerator::default()
        .generate(&storgatan(), &CancellationToken::new())
        .await
        .unwrap();

    let intro = result.section("intro").expect("intro section");
    assert!(!intro.content.is_empty());
    assert!(intro.content.contains("Storgatan 4"));
    assert!(intro.content.contains("balkong"));
    assert!(intro.content.contains(DEFAULT_TONE));
    assert!(result.full_copy.starts_with("Inledning\n"));
}

#[tokio::test]
async fn heuristic_generation_is_byte_identical() {
    let generator = HeuristicGenerator::default();
    let cancel = CancellationToken::new();

    let first = generator.generate(&storgatan(), &cancel).await.unwrap();
    let second = generator.generate(&storgatan(), &cancel).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn shorter_rewrite_keeps_at_most_two_sentences() {
    let section = Section::new(
        "living",
        "Vardagsrum",
        "Rymligt vardagsrum. Stora fönster. Fiskbensparkett. Öppen spis. Utgång till balkong.",
    );

    let rewritten = HeuristicGenerator::default()
        .rewrite(&storgatan(), &section, "Gör texten kortare", &CancellationToken::new())
        .await
        .unwrap();

    assert!(split_sentences(&rewritten.content).len() <= 2);
}

#[tokio::test]
async fn fallback_hides_unreachable_model() {
    let generator = FallbackGenerator::new(ModelBackedGenerator::new(Unreachable));

    let result = generator
        .generate(&storgatan(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.sections.len(), 5);
}

#[tokio::test]
async fn fallback_copy_for_premium_listing_uses_details() {
    let listing = ListingFacts {
        details: Some(PremiumDetails {
            address: Some("Storgatan 4B".to_string()),
            advantages: vec!["Sjöutsikt".to_string(), "Takterrass".to_string()],
            room_descriptions: vec![RoomDescription {
                room: "Kök".to_string(),
                description: "Marmorbänk".to_string(),
            }],
            ..Default::default()
        }),
        ..storgatan()
    };
    let generator = FallbackGenerator::new(ModelBackedGenerator::new(Unreachable));

    let result = generator
        .generate(&listing, &CancellationToken::new())
        .await
        .unwrap();

    for expected in ["Sjöutsikt", "Takterrass", "Marmorbänk", "Storgatan 4B"] {
        assert!(result.full_copy.contains(expected), "missing {expected}");
    }
    assert!(result
        .section("kitchen")
        .unwrap()
        .content
        .contains("Marmorbänk"));
}

#[tokio::test]
async fn direct_model_usage_surfaces_failure() {
    let generator = ModelBackedGenerator::new(Unreachable);

    let err = generator
        .generate(&storgatan(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CopyError::CompletionFailed(_)));
    assert!(err.is_retryable());
}

#[test]
fn recovery_scenarios() {
    let raw = r#"Here's the JSON: {"sections":[{"slug":"intro","title":"T","content":"C"}]} Thanks!"#;
    let sections = recover_sections(raw).unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].slug, "intro");

    assert!(matches!(recover_sections("{}"), Err(CopyError::RecoveryFailed(_))));
    assert!(matches!(
        recover_sections("not json at all"),
        Err(CopyError::RecoveryFailed(_))
    ));

    let fallback = Section::new("intro", "Old Title", "old body");
    let merged = recover_section(r#"{"content":"new body"}"#, &fallback).unwrap();
    assert_eq!(merged.title, "Old Title");
    assert_eq!(merged.content, "new body");
}

#[test]
fn geodata_cap_and_empty_input() {
    let groceries = GeoInsight {
        points_of_interest: ["ICA", "Coop", "Lidl"]
            .iter()
            .map(|name| PointOfInterest {
                name: name.to_string(),
                category: "grocery".to_string(),
                distance: None,
            })
            .collect(),
        transit: vec![TransitOption {
            mode: "Tunnelbana".to_string(),
            description: "Slussen".to_string(),
        }],
    };

    let summary = summarize(&groceries, 2);
    assert!(summary.contains("ICA och Coop"));
    assert!(!summary.contains("Lidl"));
    assert!(bullet_lines(&groceries, 2).contains("- Kommunikationer: Tunnelbana (Slussen)"));

    assert_eq!(summarize(&GeoInsight::default(), 3), "");
}

#[test]
fn sanitize_is_idempotent_on_generated_copy() {
    let copy = HeuristicGenerator::default().compose(&storgatan()).full_copy;
    assert_eq!(sanitize(&sanitize(&copy)), sanitize(&copy));
}
