//! Title similarity.

/// Lower-case and collapse runs of whitespace to single spaces.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity of two titles in `[0, 1]` after normalization.
///
/// Normalized Levenshtein: `1 - distance / max_len`. Two blank titles score 0
/// so an empty query never "matches".
#[must_use]
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (normalize_title(a), normalize_title(b));
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn normalization_collapses_case_and_spacing() {
        assert_eq!(
            normalize_title("  The   Strength of\tWeak Ties "),
            "the strength of weak ties"
        );
    }

    #[rstest]
    #[case("The Strength of Weak Ties", "the strength of weak ties")]
    #[case("The Strength of Weak Ties", "The  Strength  of Weak\nTies")]
    fn equal_after_normalization_scores_one(#[case] a: &str, #[case] b: &str) {
        assert!((title_similarity(a, b) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn small_edits_stay_above_default_threshold() {
        let score = title_similarity("The Strength of Weak Ties", "The Strength of Weak Tie");
        assert!(score >= 0.85, "{score}");
    }

    #[test]
    fn unrelated_titles_fall_below_default_threshold() {
        let score = title_similarity(
            "The Strength of Weak Ties",
            "A Theory of Human Motivation",
        );
        assert!(score < 0.85, "{score}");
    }

    #[test]
    fn score_is_edit_distance_over_longer_length() {
        // 1 edit over 25 characters.
        let score = title_similarity("The Strength of Weak Ties", "The Strength of Weak Tiez");
        assert!((score - 0.96).abs() < 1e-9, "{score}");

        // 10 insertions over 19 characters, well under the default threshold.
        let threshold = feed_config::LookupConfig::default().threshold;
        let score = title_similarity("Weak Ties", "Weak Ties Revisited");
        assert!((score - 9.0 / 19.0).abs() < 1e-9, "{score}");
        assert!(score < threshold);
    }

    #[test]
    fn blank_titles_never_match() {
        assert!(title_similarity("", "").abs() < f64::EPSILON);
        assert!(title_similarity("   ", "anything").abs() < f64::EPSILON);
    }
}
