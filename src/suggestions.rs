//! Chat input suggestions

use serde::{Deserialize, Serialize};

/// Maximum number of suggestions shown at once
pub const MAX_SUGGESTIONS: usize = 5;

/// Inputs shorter than this never show the panel
pub const MIN_QUERY_CHARS: usize = 2;

/// Entries of `all` containing `input` case-insensitively, in list order, capped at
/// [`MAX_SUGGESTIONS`].
#[must_use]
pub fn filter_suggestions<'a>(all: &'a [String], input: &str) -> Vec<&'a str> {
    let needle = input.to_lowercase();
    all.iter()
        .filter(|suggestion| suggestion.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .map(String::as_str)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionPanel {
    pub visible: bool,
    pub items: Vec<String>,
}

impl SuggestionPanel {
    #[must_use]
    pub fn hidden() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_input(all: &[String], input: &str) -> Self {
        if input.chars().count() < MIN_QUERY_CHARS {
            return Self::hidden();
        }

        let items: Vec<String> = filter_suggestions(all, input)
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            visible: !items.is_empty(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn suggestions() -> Vec<String> {
        [
            "What's the weather forecast for fishing?",
            "Show me nearby marine stations",
            "Which fish species are best this season?",
            "Are there any safety alerts?",
            "What are the water conditions?",
            "Best fishing zones near Mumbai",
            "Current wave height information",
            "Salinity levels in coastal areas",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    #[rstest]
    #[case("")]
    #[case("w")]
    #[case("S")]
    fn test_short_input_hides_panel(#[case] input: &str) {
        let panel = SuggestionPanel::for_input(&suggestions(), input);
        assert!(!panel.visible);
        assert!(panel.items.is_empty());
    }

    #[test]
    fn test_no_match_hides_panel() {
        let panel = SuggestionPanel::for_input(&suggestions(), "tsunami");
        assert!(!panel.visible);
    }

    #[test]
    fn test_matches_are_case_insensitive_and_ordered() {
        let all = suggestions();
        let matches = filter_suggestions(&all, "FISH");
        assert_eq!(
            matches,
            vec![
                "What's the weather forecast for fishing?",
                "Which fish species are best this season?",
                "Best fishing zones near Mumbai",
            ]
        );
    }

    #[test]
    fn test_matches_are_capped() {
        let all = suggestions();
        // "e" alone is too short, "e " still matches most entries
        let panel = SuggestionPanel::for_input(&all, "e ");
        assert!(panel.visible);
        assert_eq!(panel.items.len(), MAX_SUGGESTIONS);
        let expected: Vec<&str> = all
            .iter()
            .map(String::as_str)
            .filter(|s| s.to_lowercase().contains("e "))
            .take(MAX_SUGGESTIONS)
            .collect();
        assert_eq!(panel.items, expected);
    }
}
