use serde::{Deserialize, Serialize};

/// Slug and display title of every section in multi-section mode, in output order
pub const SECTION_LAYOUT: [(&str, &str); 5] = [
    ("intro", "Inledning"),
    ("hall", "Hall"),
    ("kitchen", "Kök"),
    ("living", "Vardagsrum"),
    ("area", "Området"),
];

/// Slug of the single long-form section produced on the premium path
pub const PREMIUM_SLUG: &str = "ad";
pub const PREMIUM_TITLE: &str = "Annonstext";

/// Hard ceiling on the total length of generated copy
pub const MAX_TOTAL_WORDS: usize = 225;

/// Tone used whenever the listing leaves it blank
pub const DEFAULT_TONE: &str = "inbjudande";

/// A point of interest near the property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointOfInterest {
    pub name: String,
    pub category: String,
    /// Walking distance in meters, when known
    #[serde(default)]
    pub distance: Option<u32>,
}

/// A public transit option near the property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitOption {
    pub mode: String,
    #[serde(default)]
    pub description: String,
}

/// Neighborhood context attached to a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeoInsight {
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
    #[serde(default)]
    pub transit: Vec<TransitOption>,
}

impl GeoInsight {
    pub fn is_empty(&self) -> bool {
        self.points_of_interest.is_empty() && self.transit.is_empty()
    }
}

/// Reusable voice constraints a listing can opt into
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub guidelines: String,
    #[serde(default)]
    pub example_texts: Vec<String>,
    #[serde(default)]
    pub forbidden_words: Vec<String>,
    /// Fine-tuned model to route calls to instead of the default model
    #[serde(default)]
    pub model_id: Option<String>,
}

/// Free-text description of one room, supplied by the agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomDescription {
    pub room: String,
    pub description: String,
}

/// Richer brief that switches the model-backed generator to long-form copy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PremiumDetails {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub desired_word_count: Option<usize>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub room_descriptions: Vec<RoomDescription>,
    #[serde(default)]
    pub advantages: Vec<String>,
}

impl PremiumDetails {
    /// Whether the brief asks for unified long-form copy.
    ///
    /// Any of a nested address, an advantage, an explicit word count or an
    /// explicit tone counts. Room descriptions alone do not.
    pub fn requests_long_form(&self) -> bool {
        let filled = |value: &Option<String>| {
            value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
        };

        filled(&self.address)
            || self.advantages.iter().any(|a| !a.trim().is_empty())
            || self.desired_word_count.is_some()
            || filled(&self.tone)
    }

    /// Word limit for long-form copy, never above [`MAX_TOTAL_WORDS`]
    pub fn word_limit(&self) -> usize {
        self.desired_word_count
            .filter(|count| *count > 0)
            .map(|count| count.min(MAX_TOTAL_WORDS))
            .unwrap_or(MAX_TOTAL_WORDS)
    }
}

/// Everything the pipeline knows about one listing for a single call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListingFacts {
    pub address: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub association: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Monthly fee (SEK)
    #[serde(default)]
    pub monthly_fee: i64,
    /// Living area in square meters
    #[serde(default)]
    pub living_area: f32,
    #[serde(default)]
    pub rooms: f32,
    #[serde(default)]
    pub details: Option<PremiumDetails>,
    #[serde(default)]
    pub geodata: GeoInsight,
    #[serde(default)]
    pub style_profile: Option<StyleProfile>,
}

impl ListingFacts {
    pub fn with_style_profile(mut self, profile: Option<StyleProfile>) -> Self {
        self.style_profile = profile;
        self
    }

    pub fn with_geodata(mut self, geodata: GeoInsight) -> Self {
        self.geodata = geodata;
        self
    }

    /// Tone to write in: premium tone, then listing tone, then the default
    pub fn effective_tone(&self) -> &str {
        self.details
            .as_ref()
            .and_then(|d| d.tone.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.tone.trim()).filter(|t| !t.is_empty()))
            .unwrap_or(DEFAULT_TONE)
    }

    /// Premium details, only when they ask for long-form copy
    pub fn long_form_details(&self) -> Option<&PremiumDetails> {
        self.details.as_ref().filter(|d| d.requests_long_form())
    }
}

/// A named, titled block of copy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub slug: String,
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Ordered sections plus the assembled copy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationResult {
    pub sections: Vec<Section>,
    pub full_copy: String,
}

impl GenerationResult {
    /// Build a result, keeping the first section for any repeated slug.
    pub fn new(sections: Vec<Section>) -> Self {
        let mut unique: Vec<Section> = Vec::with_capacity(sections.len());
        for section in sections {
            if !unique.iter().any(|s| s.slug == section.slug) {
                unique.push(section);
            }
        }

        let full_copy = assemble_full_copy(&unique);
        Self {
            sections: unique,
            full_copy,
        }
    }

    pub fn section(&self, slug: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.slug == slug)
    }

    /// Swap in a rewritten section by slug and rebuild the full copy.
    /// Returns false when no section has that slug.
    pub fn replace_section(&mut self, section: Section) -> bool {
        let Some(existing) = self.sections.iter_mut().find(|s| s.slug == section.slug) else {
            return false;
        };
        *existing = section;
        self.full_copy = assemble_full_copy(&self.sections);
        true
    }
}

fn assemble_full_copy(sections: &[Section]) -> String {
    sections
        .iter()
        .filter(|s| !s.content.trim().is_empty())
        .map(|s| {
            let title = s.title.trim();
            if title.is_empty() {
                s.content.trim().to_string()
            } else {
                format!("{}\n{}", title, s.content.trim())
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Title for a known slug, falling back to the slug itself
pub fn section_title(slug: &str) -> &str {
    if slug == PREMIUM_SLUG {
        return PREMIUM_TITLE;
    }
    SECTION_LAYOUT
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, title)| *title)
        .unwrap_or(slug)
}
