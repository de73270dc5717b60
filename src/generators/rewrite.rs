//! Local rewrite policy used when no model is involved.

use crate::error::{CopyError, Result};
use crate::geodata::join_list;
use crate::models::{ListingFacts, Section};
use crate::sanitize::sanitize;

/// Sentences kept when shortening
const SHORTEN_TO_SENTENCES: usize = 2;

/// What an editing instruction asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteIntent {
    Shorten,
    SalesTone,
    Formal,
    Clarify,
    Lengthen,
    Unrecognized,
}

impl RewriteIntent {
    /// Classify an instruction in one pass over its words.
    ///
    /// Words are matched whole or by stem, case-insensitively. When several
    /// intents occur, the earliest variant in declaration order wins.
    pub fn classify(instruction: &str) -> Self {
        instruction
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .filter_map(Self::from_word)
            .min_by_key(|intent| intent.priority())
            .unwrap_or(Self::Unrecognized)
    }

    fn from_word(word: &str) -> Option<Self> {
        // As stems these would also catch "kortet" and "shortly"
        const WORDS: [(&str, RewriteIntent); 3] = [
            ("kort", RewriteIntent::Shorten),
            ("korta", RewriteIntent::Shorten),
            ("short", RewriteIntent::Shorten),
        ];
        const STEMS: [(&str, RewriteIntent); 17] = [
            ("kortare", RewriteIntent::Shorten),
            ("kortfatta", RewriteIntent::Shorten),
            ("förkorta", RewriteIntent::Shorten),
            ("shorte", RewriteIntent::Shorten),
            ("sälj", RewriteIntent::SalesTone),
            ("sales", RewriteIntent::SalesTone),
            ("selling", RewriteIntent::SalesTone),
            ("formell", RewriteIntent::Formal),
            ("formal", RewriteIntent::Formal),
            ("tydlig", RewriteIntent::Clarify),
            ("begriplig", RewriteIntent::Clarify),
            ("clear", RewriteIntent::Clarify),
            ("längre", RewriteIntent::Lengthen),
            ("förläng", RewriteIntent::Lengthen),
            ("utförlig", RewriteIntent::Lengthen),
            ("longer", RewriteIntent::Lengthen),
            ("expand", RewriteIntent::Lengthen),
        ];

        WORDS
            .iter()
            .find(|(whole, _)| word == *whole)
            .or_else(|| STEMS.iter().find(|(stem, _)| word.starts_with(stem)))
            .map(|(_, intent)| *intent)
    }

    fn priority(self) -> u8 {
        match self {
            Self::Shorten => 0,
            Self::SalesTone => 1,
            Self::Formal => 2,
            Self::Clarify => 3,
            Self::Lengthen => 4,
            Self::Unrecognized => 5,
        }
    }
}

/// Split prose into sentences, keeping terminal punctuation
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_break = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_break {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }

    sentences
}

pub fn ensure_instruction(instruction: &str) -> Result<&str> {
    let trimmed = instruction.trim();
    if trimmed.is_empty() {
        return Err(CopyError::ValidationFailed(
            "rewrite instruction must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Apply an intent to section text without a model.
///
/// Shortening is enforced; every other intent appends one sentence.
pub fn apply_intent(intent: RewriteIntent, content: &str, listing: &ListingFacts) -> String {
    let content = content.trim();

    let rewritten = match intent {
        RewriteIntent::Shorten => split_sentences(content)
            .into_iter()
            .take(SHORTEN_TO_SENTENCES)
            .collect::<Vec<_>>()
            .join(" "),
        RewriteIntent::SalesTone => append(
            content,
            "Passa på att boka visning, ett hem som detta är värt att upptäcka.",
        ),
        RewriteIntent::Formal => append(
            content,
            "Ansvarig mäklare lämnar gärna ytterligare information om bostaden.",
        ),
        RewriteIntent::Clarify => append(
            content,
            "Kort sagt är detta en bostad med tydliga kvaliteter.",
        ),
        RewriteIntent::Lengthen => {
            let highlights: Vec<String> = listing
                .highlights
                .iter()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect();
            if highlights.is_empty() {
                append(
                    content,
                    "Här finns goda möjligheter att skapa ett hem efter egen smak.",
                )
            } else {
                append(
                    content,
                    &format!("Bland fördelarna märks även {}.", join_list(&highlights)),
                )
            }
        }
        RewriteIntent::Unrecognized => content.to_string(),
    };

    sanitize(&rewritten)
}

/// Rewrite a section locally, keeping its slug and title
pub fn rewrite_locally(section: &Section, instruction: &str, listing: &ListingFacts) -> Result<Section> {
    let instruction = ensure_instruction(instruction)?;
    let intent = RewriteIntent::classify(instruction);

    Ok(Section {
        slug: section.slug.clone(),
        title: section.title.clone(),
        content: apply_intent(intent, &section.content, listing),
    })
}

fn append(content: &str, sentence: &str) -> String {
    if content.is_empty() {
        sentence.to_string()
    } else {
        format!("{} {}", content, sentence)
    }
}
