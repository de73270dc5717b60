//! Tolerant parsing of model replies.
//!
//! Models often wrap the requested JSON in prose ("Here is the JSON: ...") or
//! code fences. Each parse first tries the whole reply, then the span between
//! the first `{` and the last `}`.

use crate::error::{CopyError, Result};
use crate::models::{section_title, Section};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SectionEnvelope {
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SectionPatch {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl SectionPatch {
    fn title(&self) -> Option<&str> {
        filled(&self.title)
    }

    fn content(&self) -> Option<&str> {
        filled(&self.content)
    }
}

/// A field that is present and not blank
fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// The span from the first `{` to the last `}`, if there is one
fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Decode the whole reply, then the brace span, keeping the first result
/// that `accept` approves of
fn decode_tolerant<T, F>(raw: &str, accept: F) -> Option<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> bool,
{
    let direct = serde_json::from_str::<T>(raw.trim()).ok().filter(&accept);
    if direct.is_some() {
        return direct;
    }

    debug!(raw_length = raw.len(), "Direct decode failed, trying brace span");
    brace_span(raw).and_then(|span| serde_json::from_str::<T>(span).ok().filter(&accept))
}

fn preview(raw: &str) -> String {
    raw.chars().take(120).collect()
}

/// Recover the ordered sections of a multi-section reply.
///
/// Sections with a blank slug or null content are dropped and repeated slugs
/// keep their first occurrence. A missing title falls back to the canonical
/// title for the slug.
pub fn recover_sections(raw: &str) -> Result<Vec<Section>> {
    let envelope: SectionEnvelope =
        decode_tolerant(raw, |e: &SectionEnvelope| !e.sections.is_empty()).ok_or_else(|| {
            CopyError::RecoveryFailed(format!("no sections in reply: {:?}", preview(raw)))
        })?;

    let mut sections: Vec<Section> = Vec::with_capacity(envelope.sections.len());
    for raw_section in envelope.sections {
        let slug = raw_section.slug.as_deref().unwrap_or_default().trim().to_string();
        if slug.is_empty() || sections.iter().any(|s| s.slug == slug) {
            continue;
        }
        let Some(content) = raw_section.content else {
            debug!(slug = %slug, "Dropping section without content");
            continue;
        };
        let title = filled(&raw_section.title)
            .map(str::to_string)
            .unwrap_or_else(|| section_title(&slug).to_string());
        sections.push(Section {
            slug,
            title,
            content,
        });
    }

    if sections.is_empty() {
        return Err(CopyError::RecoveryFailed(
            "reply sections had no usable slugs".to_string(),
        ));
    }

    Ok(sections)
}

/// Recover a single rewritten section, merged onto `fallback`.
///
/// Only non-blank fields in the reply replace the fallback's; the slug always
/// stays the fallback's. A reply with neither title nor content is a failure.
pub fn recover_section(raw: &str, fallback: &Section) -> Result<Section> {
    let patch: SectionPatch = decode_tolerant(raw, |p: &SectionPatch| {
        p.title().is_some() || p.content().is_some()
    })
    .ok_or_else(|| {
        CopyError::RecoveryFailed(format!("no title or content in reply: {:?}", preview(raw)))
    })?;

    Ok(Section {
        slug: fallback.slug.clone(),
        title: patch.title().unwrap_or(&fallback.title).to_string(),
        content: patch.content().unwrap_or(&fallback.content).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_sections_wrapped_in_prose() {
        let raw = r#"Here's the JSON: {"sections":[{"slug":"intro","title":"T","content":"C"}]} Thanks!"#;

        let sections = recover_sections(raw).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].slug, "intro");
        assert_eq!(sections[0].title, "T");
        assert_eq!(sections[0].content, "C");
    }

    #[test]
    fn recovers_from_code_fence() {
        let raw = "```json\n{\"sections\":[{\"slug\":\"area\",\"content\":\"Nära parken.\"}]}\n```";

        let sections = recover_sections(raw).unwrap();
        assert_eq!(sections[0].slug, "area");
        assert_eq!(sections[0].title, "Området");
    }

    #[test]
    fn empty_object_fails() {
        assert!(matches!(recover_sections("{}"), Err(CopyError::RecoveryFailed(_))));
    }

    #[test]
    fn plain_text_fails() {
        assert!(matches!(
            recover_sections("not json at all"),
            Err(CopyError::RecoveryFailed(_))
        ));
    }

    #[test]
    fn reversed_braces_fail() {
        assert!(matches!(
            recover_sections("} nothing here {"),
            Err(CopyError::RecoveryFailed(_))
        ));
    }

    #[test]
    fn duplicate_and_blank_slugs_are_dropped() {
        let raw = r#"{"sections":[
            {"slug":"intro","title":"A","content":"första"},
            {"slug":"","title":"B","content":"ingen slug"},
            {"slug":"intro","title":"C","content":"andra"}
        ]}"#;

        let sections = recover_sections(raw).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "första");
    }

    #[test]
    fn null_content_drops_only_that_section() {
        let raw = r#"{"sections":[
            {"slug":"intro","title":"Inledning","content":null},
            {"slug":null,"content":"utan slug"},
            {"slug":"hall","content":"Hallen."}
        ]}"#;

        let sections = recover_sections(raw).unwrap();
        assert_eq!(sections, vec![Section::new("hall", "Hall", "Hallen.")]);
    }

    #[test]
    fn only_null_content_fails() {
        assert!(matches!(
            recover_sections(r#"{"sections":[{"slug":"intro","content":null}]}"#),
            Err(CopyError::RecoveryFailed(_))
        ));
    }

    #[test]
    fn blank_patch_fields_keep_the_fallback() {
        let fallback = Section::new("intro", "Inledning", "old body");

        let merged = recover_section(r#"{"title":"Ny rubrik","content":"  "}"#, &fallback).unwrap();
        assert_eq!(merged, Section::new("intro", "Ny rubrik", "old body"));

        assert!(matches!(
            recover_section(r#"{"content":""}"#, &fallback),
            Err(CopyError::RecoveryFailed(_))
        ));
        assert!(matches!(
            recover_section(r#"{"title":" ","content":null}"#, &fallback),
            Err(CopyError::RecoveryFailed(_))
        ));
    }

    #[test]
    fn patch_preserves_missing_title() {
        let fallback = Section::new("intro", "Old Title", "old body");

        let merged = recover_section(r#"{"content":"new body"}"#, &fallback).unwrap();
        assert_eq!(merged, Section::new("intro", "Old Title", "new body"));
    }

    #[test]
    fn patch_replaces_both_fields_and_keeps_slug() {
        let fallback = Section::new("kitchen", "Kök", "gammalt");
        let raw = r#"Sure! {"slug":"other","title":"Köket","content":"nytt"}"#;

        let merged = recover_section(raw, &fallback).unwrap();
        assert_eq!(merged, Section::new("kitchen", "Köket", "nytt"));
    }

    #[test]
    fn empty_patch_fails() {
        let fallback = Section::new("intro", "Inledning", "text");
        assert!(matches!(
            recover_section("{}", &fallback),
            Err(CopyError::RecoveryFailed(_))
        ));
        assert!(matches!(
            recover_section("ingen json", &fallback),
            Err(CopyError::RecoveryFailed(_))
        ));
    }
}
