use crate::error::Result;
use crate::generators::rewrite::rewrite_locally;
use crate::generators::traits::CopyGenerator;
use crate::geodata::{join_list, summarize};
use crate::models::{GenerationResult, ListingFacts, Section, SECTION_LAYOUT};
use crate::sanitize::sanitize;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Used for the area section when there is no geodata and no neighborhood
const AREA_FALLBACK: &str = "Området erbjuder närhet till service, kommunikationer och grönområden.";

/// Deterministic template-based copy. Never calls out and never fails.
#[derive(Debug, Clone)]
pub struct HeuristicGenerator {
    geodata_cap: usize,
}

impl Default for HeuristicGenerator {
    fn default() -> Self {
        Self::new(3)
    }
}

impl HeuristicGenerator {
    pub fn new(geodata_cap: usize) -> Self {
        Self {
            geodata_cap: geodata_cap.max(1),
        }
    }

    /// Build every section of the multi-section layout
    pub fn compose(&self, listing: &ListingFacts) -> GenerationResult {
        let sections = SECTION_LAYOUT
            .iter()
            .map(|(slug, title)| {
                let content = match *slug {
                    "intro" => intro(listing),
                    "hall" => hall(),
                    "kitchen" => kitchen(listing),
                    "living" => living(listing),
                    _ => self.area(listing),
                };
                let content = with_room_notes(content, &room_notes(listing, slug));
                Section::new(*slug, *title, sanitize(&content))
            })
            .collect();

        GenerationResult::new(sections)
    }

    fn area(&self, listing: &ListingFacts) -> String {
        let summary = summarize(&listing.geodata, self.geodata_cap);
        if !summary.is_empty() {
            return summary;
        }

        let neighborhood = listing.neighborhood.trim();
        if neighborhood.is_empty() {
            AREA_FALLBACK.to_string()
        } else {
            format!(
                "Läget i {} ger närhet till service, kommunikationer och grönområden.",
                neighborhood
            )
        }
    }
}

/// Swedish decimal formatting, dropping a zero fraction: 2.0 -> "2", 1.5 -> "1,5"
pub fn format_decimal(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value).replace('.', ",")
    }
}

/// Thousands separated by spaces: 3449 -> "3 449"
pub fn format_amount(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn size_phrase(listing: &ListingFacts) -> String {
    let mut parts = Vec::new();
    if listing.rooms > 0.0 {
        parts.push(format!("{} rum", format_decimal(listing.rooms)));
    }
    if listing.living_area > 0.0 {
        parts.push(format!("{} kvm", format_decimal(listing.living_area)));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" om {}", parts.join(" och "))
    }
}

fn intro(listing: &ListingFacts) -> String {
    let mut sentences = Vec::new();

    let address = listing
        .details
        .as_ref()
        .and_then(|d| d.address.as_deref())
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| listing.address.trim());
    let mut welcome = format!("Välkommen till {}", address);
    if !listing.neighborhood.trim().is_empty() {
        welcome.push_str(&format!(" i {}", listing.neighborhood.trim()));
    }
    if !listing.city.trim().is_empty() {
        welcome.push_str(&format!(", {}", listing.city.trim()));
    }
    welcome.push('.');
    sentences.push(welcome);

    let subject = match listing.property_type.trim() {
        "" => "Ett hem".to_string(),
        kind => capitalize(kind),
    };
    let floor = match listing.floor.trim() {
        "" => String::new(),
        floor => format!(" på våning {}", floor),
    };
    sentences.push(format!(
        "{}{}{} med en {} känsla.",
        subject,
        size_phrase(listing),
        floor,
        listing.effective_tone()
    ));

    let highlights: Vec<String> = listing
        .highlights
        .iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();
    if !highlights.is_empty() {
        sentences.push(format!(
            "Bostaden erbjuder bland annat {}.",
            join_list(&highlights)
        ));
    }

    let advantages: Vec<String> = listing
        .details
        .iter()
        .flat_map(|d| d.advantages.iter())
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    if !advantages.is_empty() {
        sentences.push(format!(
            "Särskilt värt att nämna är {}.",
            join_list(&advantages)
        ));
    }

    if listing.monthly_fee > 0 {
        let association = match listing.association.trim() {
            "" => String::new(),
            name => format!(" till {}", name),
        };
        sentences.push(format!(
            "Månadsavgiften är {} kr{}.",
            format_amount(listing.monthly_fee),
            association
        ));
    }

    if !listing.target_audience.trim().is_empty() {
        sentences.push(format!(
            "Ett hem som passar {}.",
            listing.target_audience.trim()
        ));
    }

    sentences.join(" ")
}

/// Section a free-form room name belongs to; unknown rooms land in the living section
fn room_slug(room: &str) -> &'static str {
    let room = room.trim().to_lowercase();
    if room.contains("hall") || room.contains("entré") {
        "hall"
    } else if room.contains("kök") || room.contains("kitchen") {
        "kitchen"
    } else {
        "living"
    }
}

/// Room descriptions from the premium brief that belong to `slug`.
/// Rooms that only match by fallback keep their name as a prefix.
fn room_notes(listing: &ListingFacts, slug: &str) -> Vec<String> {
    let Some(details) = &listing.details else {
        return Vec::new();
    };

    details
        .room_descriptions
        .iter()
        .filter(|r| !r.description.trim().is_empty())
        .filter(|r| room_slug(&r.room) == slug)
        .map(|r| {
            let text = ensure_period(r.description.trim());
            let room = r.room.trim().to_lowercase();
            let named = room.contains("vardagsrum") || room.contains("living");
            if slug == "living" && !named && !room.is_empty() {
                format!("{}: {}", capitalize(r.room.trim()), text)
            } else {
                capitalize(&text)
            }
        })
        .collect()
}

fn ensure_period(text: &str) -> String {
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

fn with_room_notes(content: String, notes: &[String]) -> String {
    if notes.is_empty() {
        content
    } else {
        format!("{} {}", content, notes.join(" "))
    }
}

fn hall() -> String {
    "Hallen ger ett välkomnande första intryck och leder vidare till bostadens övriga rum."
        .to_string()
}

fn kitchen(listing: &ListingFacts) -> String {
    match listing.condition.trim() {
        "" => "Köket har ett praktiskt läge i bostaden och bjuder in till umgänge.".to_string(),
        condition => format!(
            "Köket håller samma standard som resten av bostaden, som är i {} skick.",
            condition
        ),
    }
}

fn living(listing: &ListingFacts) -> String {
    format!(
        "Vardagsrummet är hemmets naturliga samlingspunkt med en {} känsla och gott om plats för umgänge.",
        listing.effective_tone()
    )
}

#[async_trait]
impl CopyGenerator for HeuristicGenerator {
    async fn generate(
        &self,
        listing: &ListingFacts,
        _cancel: &CancellationToken,
    ) -> Result<GenerationResult> {
        debug!(address = %listing.address, "Composing heuristic copy");
        Ok(self.compose(listing))
    }

    async fn rewrite(
        &self,
        listing: &ListingFacts,
        section: &Section,
        instruction: &str,
        _cancel: &CancellationToken,
    ) -> Result<Section> {
        debug!(slug = %section.slug, "Rewriting section heuristically");
        rewrite_locally(section, instruction, listing)
    }

    fn strategy_name(&self) -> &'static str {
        "Heuristic"
    }
}
