use std::sync::LazyLock;

use regex::Regex;

use crate::config::SummaryRules;

/// Sentence boundary: terminal punctuation followed by whitespace.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

/// Derive a short display title from post text.
///
/// Takes the first sentence; if that is shorter than
/// `rules.min_sentence_chars` and a second sentence exists, the two are
/// joined with ". ". Anything longer than `rules.max_chars` is cut and ends
/// with the ellipsis. Blank or missing text yields "".
pub fn first_sentence(text: Option<&str>, rules: &SummaryRules) -> String {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return String::new();
    };

    let mut sentences = SENTENCE_END.split(text);
    let first = sentences.next().unwrap_or_default();

    let mut summary = match sentences.next() {
        Some(second) if first.trim().chars().count() < rules.min_sentence_chars => {
            format!("{first}. {second}")
        }
        _ => first.trim().to_string(),
    };

    if summary.chars().count() > rules.max_chars {
        summary = summary.chars().take(rules.truncate_to()).collect();
        summary.push_str(&rules.ellipsis);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize(text: &str) -> String {
        first_sentence(Some(text), &SummaryRules::default())
    }

    #[test]
    fn test_missing_and_blank_give_empty() {
        let rules = SummaryRules::default();
        assert_eq!(first_sentence(None, &rules), "");
        assert_eq!(first_sentence(Some(""), &rules), "");
        assert_eq!(first_sentence(Some("   \n"), &rules), "");
    }

    #[test]
    fn test_takes_first_long_sentence() {
        assert_eq!(
            summarize("We shipped the new analytics pipeline today. It was a long road!"),
            "We shipped the new analytics pipeline today"
        );
    }

    #[test]
    fn test_short_first_sentence_pulls_in_second() {
        assert_eq!(summarize("Hello. World."), "Hello. World.");
        assert_eq!(
            summarize("Big news! We are hiring engineers. Apply now."),
            "Big news. We are hiring engineers"
        );
    }

    #[test]
    fn test_punctuation_without_space_is_not_a_boundary() {
        assert_eq!(summarize("Version 2.0 is out"), "Version 2.0 is out");
    }

    #[test]
    fn test_long_text_is_truncated_to_limit() {
        let text = "a".repeat(150);
        let out = summarize(&text);
        assert_eq!(out.chars().count(), 100);
        assert!(out.ends_with("..."));
        assert!(out.starts_with(&"a".repeat(97)));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(120);
        let out = summarize(&text);
        assert_eq!(out.chars().count(), 100);
    }

    #[test]
    fn test_output_never_exceeds_limit() {
        let inputs = [
            "Short. ".repeat(40),
            format!("Tiny! {}", "word ".repeat(60)),
            "x".repeat(101),
            "Exactly one hundred characters?".to_string(),
        ];
        for input in &inputs {
            assert!(summarize(input).chars().count() <= 100, "{input}");
        }
    }

    #[test]
    fn test_idempotent_on_short_single_sentence() {
        for text in ["Product Launch Day", "Great news!", "Hiring now"] {
            let once = summarize(text);
            assert_eq!(summarize(&once), once);
        }
    }

    #[test]
    fn test_custom_rules() {
        let rules = SummaryRules {
            min_sentence_chars: 0,
            max_chars: 10,
            ellipsis: "…".into(),
        };
        assert_eq!(first_sentence(Some("Hi. There."), &rules), "Hi");
        assert_eq!(first_sentence(Some("abcdefghijklmnop"), &rules), "abcdefghi…");
    }
}
