//! Prompt construction for generation and single-section rewrites.
//!
//! Composition is plain string formatting and cannot fail.

use crate::geodata;
use crate::models::{
    word_count, ListingFacts, PremiumDetails, Section, StyleProfile, MAX_TOTAL_WORDS,
    SECTION_LAYOUT,
};
use serde_json::{json, Value};

/// Example texts rendered from a style profile
pub const MAX_STYLE_EXAMPLES: usize = 3;

/// System and user message for one model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
}

/// What each section should accomplish, by slug
pub fn section_guideline(slug: &str) -> &'static str {
    match slug {
        "intro" => "Fånga läsarens intresse med bostadens starkaste egenskaper, läge och känsla.",
        "hall" => "Beskriv entré och förvaring kort och konkret.",
        "kitchen" => "Lyft kökets standard, material, utrustning och sociala ytor.",
        "living" => "Beskriv ljus, rymd och planlösning och vad som gör vardagsrummet trivsamt.",
        "area" => "Beskriv närområdet utifrån underlaget: service, kommunikationer, skolor och grönområden.",
        "ad" | "main" => {
            "Skriv en sammanhängande annonstext som lyfter bostadens och områdets främsta fördelar."
        }
        _ => "Skriv tydligt och konkret om det avsnittet handlar om, utan utfyllnad.",
    }
}

/// Accepted length band for a rewrite: within 15% and never below 85%
pub fn rewrite_word_band(original_words: usize) -> (usize, usize) {
    let min = (original_words * 85).div_ceil(100);
    let max = (original_words * 115 / 100).max(min);
    (min, max)
}

#[derive(Debug, Clone)]
pub struct PromptComposer {
    geodata_cap: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(3)
    }
}

impl PromptComposer {
    pub fn new(geodata_cap: usize) -> Self {
        Self {
            geodata_cap: geodata_cap.max(1),
        }
    }

    /// Prompt for the structured multi-section output
    pub fn generation(&self, listing: &ListingFacts) -> ComposedPrompt {
        let mut system = shared_rules(MAX_TOTAL_WORDS);
        system.push_str(
            "- Svara endast med JSON på formatet \
             {\"sections\":[{\"slug\":\"...\",\"title\":\"...\",\"content\":\"...\"}]}, \
             ett objekt per avsnitt i den ordning som anges.\n",
        );

        let sections: Vec<Value> = SECTION_LAYOUT
            .iter()
            .map(|(slug, title)| {
                json!({ "slug": slug, "title": title, "purpose": section_guideline(slug) })
            })
            .collect();

        let payload = json!({
            "listing": self.listing_facts(listing),
            "sections": sections,
        });

        let mut user = String::from("Skriv en bostadsannons utifrån följande underlag.\n\n");
        user.push_str(&pretty(&payload));
        self.push_geodata(&mut user, listing);
        push_style(&mut user, listing.style_profile.as_ref());

        ComposedPrompt { system, user }
    }

    /// Prompt for unified long-form copy, returned as plain text
    pub fn long_form(&self, listing: &ListingFacts, details: &PremiumDetails) -> ComposedPrompt {
        let limit = details.word_limit();

        let mut system = shared_rules(limit);
        system.push_str(
            "- Svara endast med själva annonstexten som löpande prosa, utan rubriker, JSON eller kommentarer.\n",
        );

        let rooms: Vec<Value> = details
            .room_descriptions
            .iter()
            .map(|room| json!({ "room": room.room, "description": room.description }))
            .collect();

        let mut facts = self.listing_facts(listing);
        if let Some(address) = details.address.as_deref().filter(|a| !a.trim().is_empty()) {
            facts["address"] = json!(address.trim());
        }

        let payload = json!({
            "listing": facts,
            "room_descriptions": rooms,
            "advantages": details.advantages,
            "word_limit": limit,
        });

        let mut user = format!(
            "Skriv en sammanhängande annonstext på högst {} ord. {}\n\n",
            limit,
            section_guideline("ad")
        );
        user.push_str(&pretty(&payload));
        self.push_geodata(&mut user, listing);
        push_style(&mut user, listing.style_profile.as_ref());

        ComposedPrompt { system, user }
    }

    /// Prompt for rewriting one section according to a free-text instruction
    pub fn rewrite(
        &self,
        section: &Section,
        instruction: &str,
        listing: &ListingFacts,
    ) -> ComposedPrompt {
        let mut system = String::from(
            "Du redigerar ett enskilt avsnitt i en svensk bostadsannons.\n\
             Regler:\n\
             - Skriv på svenska.\n\
             - Följ redigeringsinstruktionen men behåll fakta från originaltexten.\n\
             - Beskriv inte rummens självklara funktioner.\n\
             - Om en stilprofil anges har dess regler företräde.\n\
             - Svara endast med JSON på formatet {\"title\":\"...\",\"content\":\"...\"}.\n",
        );
        system.push_str(&format!(
            "- Hela annonsen får aldrig överstiga {} ord.\n",
            MAX_TOTAL_WORDS
        ));

        let words = word_count(&section.content);
        let mut user = format!(
            "Avsnitt: {} ({})\nSyfte med avsnittet: {}\n\nOriginaltext ({} ord):\n\"\"\"\n{}\n\"\"\"\n\nInstruktion: {}\n",
            section.title,
            section.slug,
            section_guideline(&section.slug),
            words,
            section.content.trim(),
            instruction.trim(),
        );

        if words > 0 {
            let (min, max) = rewrite_word_band(words);
            user.push_str(&format!(
                "Längdkrav: håll texten inom ±15 % av originalets längd, det vill säga {}–{} ord, och aldrig under {} ord.\n",
                min, max, min
            ));
        }
        user.push_str(
            "Undvik bisatser om vad rummen används till och upprepa inte fakta från andra avsnitt.\n",
        );

        user.push_str("\nFakta om bostaden:\n");
        user.push_str(&pretty(&self.listing_facts(listing)));
        self.push_geodata(&mut user, listing);
        push_style(&mut user, listing.style_profile.as_ref());

        ComposedPrompt { system, user }
    }

    fn listing_facts(&self, listing: &ListingFacts) -> Value {
        json!({
            "address": listing.address,
            "neighborhood": listing.neighborhood,
            "city": listing.city,
            "property_type": listing.property_type,
            "rooms": listing.rooms,
            "living_area_sqm": listing.living_area,
            "monthly_fee_sek": listing.monthly_fee,
            "floor": listing.floor,
            "condition": listing.condition,
            "association": listing.association,
            "tone": listing.effective_tone(),
            "target_audience": listing.target_audience,
            "highlights": listing.highlights,
        })
    }

    fn push_geodata(&self, out: &mut String, listing: &ListingFacts) {
        let bullets = geodata::bullet_lines(&listing.geodata, self.geodata_cap);
        if !bullets.is_empty() {
            out.push_str("\n\nNärområde:\n");
            out.push_str(&bullets);
            out.push('\n');
        }
    }
}

fn shared_rules(word_limit: usize) -> String {
    format!(
        "Du är en erfaren svensk copywriter som skriver bostadsannonser.\n\
         Regler:\n\
         - Skriv all text på svenska.\n\
         - Texten får vara högst {} ord totalt.\n\
         - Beskriv inte rummens självklara funktioner, till exempel att man lagar mat i köket.\n\
         - Hitta inte på fakta som saknas i underlaget.\n\
         - Om en stilprofil anges har dess ton, riktlinjer och förbjudna ord företräde framför dessa allmänna råd.\n",
        word_limit
    )
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn push_style(out: &mut String, profile: Option<&StyleProfile>) {
    if let Some(profile) = profile {
        out.push_str("\n\n");
        out.push_str(&render_style_profile(profile));
    }
}

/// Render a style profile as a prompt block, skipping empty fields
pub fn render_style_profile(profile: &StyleProfile) -> String {
    let mut lines = vec![format!("Stilprofil: {}", profile.name.trim())];

    let field = |label: &str, value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| format!("{}: {}", label, value))
    };
    lines.extend(field("Beskrivning", &profile.description));
    lines.extend(field("Önskad ton", &profile.tone));
    lines.extend(field("Riktlinjer", &profile.guidelines));

    let examples: Vec<&str> = profile
        .example_texts
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .take(MAX_STYLE_EXAMPLES)
        .collect();
    if !examples.is_empty() {
        lines.push("Exempeltexter (imitera rytm och ordval, kopiera inte innehållet):".to_string());
        for (i, example) in examples.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, example));
        }
    }

    let forbidden: Vec<&str> = profile
        .forbidden_words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();
    if !forbidden.is_empty() {
        lines.push(format!("Förbjudna ord (använd aldrig): {}", forbidden.join(", ")));
    }

    lines.join("\n")
}
