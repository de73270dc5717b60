//! Post-processing applied to every piece of generated copy.

use regex::Regex;
use std::sync::OnceLock;

/// Filler the model keeps producing about what a kitchen and bathroom are for.
/// The full sentence is listed first so it goes before its fragments.
const BOILERPLATE: [&str; 3] = [
    "Köket är utrustat för matlagning och badrummet är till för personlig hygien.",
    "köket är utrustat för matlagning",
    "badrummet är till för personlig hygien",
];

fn boilerplate_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        BOILERPLATE
            .iter()
            .map(|phrase| {
                let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
                Regex::new(&format!("(?i){}", words.join(r"\s+")))
                    .expect("boilerplate pattern is a valid regex")
            })
            .collect()
    })
}

/// Remove boilerplate, normalize whitespace and add paragraph breaks.
///
/// Idempotent. Words and sentence order are never touched.
pub fn sanitize(text: &str) -> String {
    let stripped = strip_boilerplate(text);
    let collapsed = collapse_whitespace(&stripped);
    paragraphize(&collapsed)
}

fn strip_boilerplate(text: &str) -> String {
    let mut current = text.to_string();
    // Removing one match can splice together another
    loop {
        let next = boilerplate_patterns()
            .iter()
            .fold(current.clone(), |acc, re| re.replace_all(&acc, "").into_owned());
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Single spaces within lines, at most one blank line between paragraphs
fn collapse_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    for raw in text.lines() {
        let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

fn paragraphize(text: &str) -> String {
    text.split('\n')
        .map(break_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Break after every second sentence end that is followed by a capital letter
fn break_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len() + 8);
    let mut boundaries = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        out.push(c);

        let ends_sentence = matches!(c, '.' | '!' | '?')
            && chars.get(i + 1) == Some(&' ')
            && chars.get(i + 2).is_some_and(|next| next.is_uppercase());

        if ends_sentence {
            boundaries += 1;
            if boundaries % 2 == 0 {
                out.push_str("\n\n");
                // skip the space the break replaces
                i += 2;
                continue;
            }
        }
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Pieces of text that exercise boilerplate, sentence ends, capitals and whitespace
    const PIECES: &[&str] = &[
        "Köket", "köket", "KÖKET", "är", "utrustat", "för", "matlagning", "och", "badrummet",
        "till", "personlig", "hygien", "hygien.", "Ljus", "Åre", "Ängen", "Öppen", "trea", ".",
        "!", "?", ",", " ", "  ", "\n", "\n\n", "\t",
    ];

    fn copy_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(PIECES.to_vec()), 0..40)
            .prop_map(|pieces| pieces.concat())
    }

    proptest! {
        #[test]
        fn sanitize_twice_equals_once(text in copy_text()) {
            let once = sanitize(&text);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn tokens_outside_boilerplate_keep_their_order(text in copy_text()) {
            let sanitized = sanitize(&text);
            let stripped = strip_boilerplate(&text);
            let expected: Vec<&str> = stripped.split_whitespace().collect();
            let actual: Vec<&str> = sanitized.split_whitespace().collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn removes_boilerplate_sentence_case_insensitively() {
        let input = "Ljus trea. KÖKET ÄR UTRUSTAT FÖR MATLAGNING OCH BADRUMMET ÄR TILL FÖR PERSONLIG HYGIEN. Stor balkong.";
        assert_eq!(sanitize(input), "Ljus trea. Stor balkong.");
    }

    #[test]
    fn removes_fragments() {
        let input = "Här finns ett kök, köket är utrustat för matlagning, med gott om bänkyta.";
        assert_eq!(sanitize(input), "Här finns ett kök, , med gott om bänkyta.");
    }

    #[test]
    fn boilerplate_split_across_whitespace_is_removed() {
        let input = "Fin etta. Köket  är\tutrustat för\nmatlagning och badrummet är till för personlig hygien.";
        assert!(!sanitize(input).to_lowercase().contains("matlagning"));
    }

    #[test]
    fn collapses_whitespace_but_keeps_paragraphs() {
        let input = "  Ljus   trea  \n\n\n  Nära   parken.  ";
        assert_eq!(sanitize(input), "Ljus trea\n\nNära parken.");
    }

    #[test]
    fn breaks_after_every_second_sentence() {
        let input = "Ett. Två. Tre. Fyra. Fem.";
        assert_eq!(sanitize(input), "Ett. Två.\n\nTre. Fyra.\n\nFem.");
    }

    #[test]
    fn lowercase_continuation_is_not_a_boundary() {
        let input = "Avgiften är ca. tretusen kr. Bra läge. Nära parken.";
        assert_eq!(sanitize(input), "Avgiften är ca. tretusen kr. Bra läge.\n\nNära parken.");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "",
            "   ",
            "Ett. Två. Tre. Fyra. Fem.",
            "Ett!  Två? Tre.\nFyra. Fem. Sex. Sju.\n\n\nÅtta. Nio.",
            "Köket är utrustat för matlagning och badrummet är till för personlig hygien. Kvar.",
            "köket är utrustat för köket är utrustat för matlagning matlagning",
            "Stor   hall.  Öppen   planlösning. Ljust.",
        ];

        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn keeps_sentences_and_order() {
        let input = "Ljus trea. Balkong i söderläge. Nära tunnelbanan. Renoverat kök.";
        let output = sanitize(input);
        let words_in: Vec<&str> = input.split_whitespace().collect();
        let words_out: Vec<&str> = output.split_whitespace().collect();
        assert_eq!(words_in, words_out);
    }

    #[test]
    fn nested_boilerplate_is_fully_removed() {
        let input = "köket är utrustat för köket är utrustat för matlagning matlagning";
        assert_eq!(sanitize(input), "");
    }
}
