use crate::models::{GeoInsight, PointOfInterest, TransitOption};

/// At most this many sentences end up in the prose summary
const MAX_SUMMARY_SENTENCES: usize = 3;

/// Normalized point-of-interest category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceCategory {
    Grocery,
    Restaurant,
    Cafe,
    Park,
    Gym,
    Health,
    Service,
    Parking,
    School,
    Other,
}

impl PlaceCategory {
    /// Map a raw provider category onto the fixed label set.
    /// Lookup is exact after trimming and lowercasing; anything unknown is `Other`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "grocery" | "grocery_or_supermarket" | "supermarket" | "convenience_store"
            | "livsmedel" | "livsmedelsbutik" | "matbutik" | "mataffär" => Self::Grocery,
            "restaurant" | "restaurang" | "meal_takeaway" => Self::Restaurant,
            "cafe" | "café" | "kafé" | "bakery" | "bageri" => Self::Cafe,
            "park" | "grönområde" | "playground" | "lekplats" => Self::Park,
            "gym" | "fitness" | "träning" => Self::Gym,
            "health" | "hospital" | "pharmacy" | "apotek" | "doctor" | "vårdcentral"
            | "dentist" | "tandläkare" => Self::Health,
            "service" | "bank" | "post_office" | "post" | "library" | "bibliotek"
            | "shopping_mall" | "köpcentrum" => Self::Service,
            "parking" | "parkering" => Self::Parking,
            "school" | "skola" | "förskola" | "preschool" | "primary_school"
            | "secondary_school" | "university" => Self::School,
            _ => Self::Other,
        }
    }

    /// Heading used in bullet rendering
    pub fn label(self) -> &'static str {
        match self {
            Self::Grocery => "Matbutiker",
            Self::Restaurant => "Restauranger",
            Self::Cafe => "Kaféer",
            Self::Park => "Parker",
            Self::Gym => "Träning",
            Self::Health => "Vård",
            Self::Service => "Service",
            Self::Parking => "Parkering",
            Self::School => "Skolor",
            Self::Other => "Övrigt",
        }
    }
}

/// Join items as "A, B och C"
pub fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} och {}", head.join(", "), last),
    }
}

/// Points of interest grouped by normalized category, in order of first appearance
pub fn group_points(insight: &GeoInsight) -> Vec<(PlaceCategory, Vec<&PointOfInterest>)> {
    let mut groups: Vec<(PlaceCategory, Vec<&PointOfInterest>)> = Vec::new();

    for poi in &insight.points_of_interest {
        let category = PlaceCategory::normalize(&poi.category);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, members)) => members.push(poi),
            None => groups.push((category, vec![poi])),
        }
    }

    groups
}

fn names_in(insight: &GeoInsight, categories: &[PlaceCategory], cap: usize) -> Vec<String> {
    insight
        .points_of_interest
        .iter()
        .filter(|poi| categories.contains(&PlaceCategory::normalize(&poi.category)))
        .map(|poi| poi.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .take(cap)
        .collect()
}

fn transit_label(option: &TransitOption) -> String {
    let description = option.description.trim();
    if description.is_empty() {
        option.mode.trim().to_string()
    } else {
        format!("{} ({})", option.mode.trim(), description)
    }
}

fn transit_labels(insight: &GeoInsight, cap: usize) -> Vec<String> {
    insight
        .transit
        .iter()
        .map(transit_label)
        .filter(|label| !label.is_empty())
        .take(cap)
        .collect()
}

fn point_label(poi: &PointOfInterest) -> String {
    match poi.distance {
        Some(meters) => format!("{} ({} m)", poi.name.trim(), meters),
        None => poi.name.trim().to_string(),
    }
}

/// Short prose about the neighborhood, at most three sentences.
///
/// Priority is groceries, transit, schools, parks, then restaurants and
/// cafés, then service. Returns an empty string when there is nothing to say,
/// and the caller substitutes its own filler.
pub fn summarize(insight: &GeoInsight, cap: usize) -> String {
    let cap = cap.max(1);

    let candidates = [
        (
            names_in(insight, &[PlaceCategory::Grocery], cap),
            "Matbutiker som {} finns i närheten.",
        ),
        (
            transit_labels(insight, cap),
            "Kommunikationerna är goda med {}.",
        ),
        (
            names_in(insight, &[PlaceCategory::School], cap),
            "Skolor som {} ligger nära.",
        ),
        (
            names_in(insight, &[PlaceCategory::Park], cap),
            "För rekreation finns {} runt hörnet.",
        ),
        (
            names_in(insight, &[PlaceCategory::Restaurant, PlaceCategory::Cafe], cap),
            "Restauranger och kaféer som {} bjuder på ett levande kvarter.",
        ),
        (
            names_in(insight, &[PlaceCategory::Service], cap),
            "Service finns i form av {}.",
        ),
    ];

    candidates
        .iter()
        .filter(|(items, _)| !items.is_empty())
        .take(MAX_SUMMARY_SENTENCES)
        .map(|(items, template)| template.replacen("{}", &join_list(items), 1))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One bullet line per non-empty category, transit last, for prompt injection
pub fn bullet_lines(insight: &GeoInsight, cap: usize) -> String {
    let cap = cap.max(1);
    let mut lines = Vec::new();

    for (category, members) in group_points(insight) {
        let labels: Vec<String> = members
            .iter()
            .filter(|poi| !poi.name.trim().is_empty())
            .take(cap)
            .map(|poi| point_label(poi))
            .collect();
        if !labels.is_empty() {
            lines.push(format!("- {}: {}", category.label(), join_list(&labels)));
        }
    }

    let transit = transit_labels(insight, cap);
    if !transit.is_empty() {
        lines.push(format!("- Kommunikationer: {}", join_list(&transit)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(name: &str, category: &str) -> PointOfInterest {
        PointOfInterest {
            name: name.to_string(),
            category: category.to_string(),
            distance: None,
        }
    }

    fn transit(mode: &str, description: &str) -> TransitOption {
        TransitOption {
            mode: mode.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn normalize_is_case_insensitive_and_exact() {
        assert_eq!(PlaceCategory::normalize("Supermarket"), PlaceCategory::Grocery);
        assert_eq!(PlaceCategory::normalize(" PARK "), PlaceCategory::Park);
        assert_eq!(PlaceCategory::normalize("supermarkets"), PlaceCategory::Other);
        assert_eq!(PlaceCategory::normalize("museum"), PlaceCategory::Other);
    }

    #[test]
    fn join_list_uses_och() {
        let items = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_list(&items(&[])), "");
        assert_eq!(join_list(&items(&["ICA"])), "ICA");
        assert_eq!(join_list(&items(&["ICA", "Coop"])), "ICA och Coop");
        assert_eq!(join_list(&items(&["ICA", "Coop", "Lidl"])), "ICA, Coop och Lidl");
    }

    #[test]
    fn cap_limits_rendered_names() {
        let insight = GeoInsight {
            points_of_interest: vec![
                poi("ICA Nära", "grocery"),
                poi("Coop", "grocery"),
                poi("Hemköp", "grocery"),
            ],
            transit: vec![],
        };

        let summary = summarize(&insight, 2);
        assert!(summary.contains("ICA Nära och Coop"));
        assert!(!summary.contains("Hemköp"));

        let bullets = bullet_lines(&insight, 2);
        assert_eq!(bullets, "- Matbutiker: ICA Nära och Coop");
    }

    #[test]
    fn empty_insight_gives_empty_summary() {
        let insight = GeoInsight::default();
        assert_eq!(summarize(&insight, 3), "");
        assert_eq!(bullet_lines(&insight, 3), "");
    }

    #[test]
    fn summary_keeps_priority_and_three_sentences() {
        let insight = GeoInsight {
            points_of_interest: vec![
                poi("Vita Bergen", "park"),
                poi("Café Pascal", "cafe"),
                poi("Katarina skola", "school"),
                poi("Coop", "supermarket"),
                poi("Swedbank", "bank"),
            ],
            transit: vec![transit("Tunnelbana", "Medborgarplatsen")],
        };

        let summary = summarize(&insight, 3);
        assert_eq!(
            summary,
            "Matbutiker som Coop finns i närheten. \
             Kommunikationerna är goda med Tunnelbana (Medborgarplatsen). \
             Skolor som Katarina skola ligger nära."
        );
    }

    #[test]
    fn restaurants_and_cafes_share_a_sentence() {
        let insight = GeoInsight {
            points_of_interest: vec![
                poi("Nytorget Urban Deli", "restaurant"),
                poi("Mellqvist", "Cafe"),
            ],
            transit: vec![],
        };

        assert_eq!(
            summarize(&insight, 3),
            "Restauranger och kaféer som Nytorget Urban Deli och Mellqvist bjuder på ett levande kvarter."
        );
    }

    #[test]
    fn bullets_group_in_first_appearance_order() {
        let insight = GeoInsight {
            points_of_interest: vec![
                PointOfInterest {
                    name: "Björns trädgård".to_string(),
                    category: "park".to_string(),
                    distance: Some(150),
                },
                poi("ICA", "grocery"),
                poi("Tantolunden", "park"),
                poi("Fotografiska", "museum"),
            ],
            transit: vec![transit("Buss", "76"), transit("Pendeltåg", "")],
        };

        assert_eq!(
            bullet_lines(&insight, 3),
            "- Parker: Björns trädgård (150 m) och Tantolunden\n\
             - Matbutiker: ICA\n\
             - Övrigt: Fotografiska\n\
             - Kommunikationer: Buss (76) och Pendeltåg"
        );
    }

    #[test]
    fn summary_is_deterministic() {
        let insight = GeoInsight {
            points_of_interest: vec![poi("ICA", "grocery"), poi("Vitabergsparken", "park")],
            transit: vec![transit("Tunnelbana", "Skanstull")],
        };

        assert_eq!(summarize(&insight, 2), summarize(&insight, 2));
    }
}
