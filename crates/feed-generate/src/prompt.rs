//! Instruction text for the generation service.
//!
//! The prompt is pure data derived from the plan: track headings with topic
//! guidance and counts, the per-track field requirements, and the output
//! contract (a bare JSON array of exactly `total` objects).

use std::fmt::Write as _;

use feed_core::{FeedPlan, Interest, Track};

/// Render the prompt for `plan`. Deterministic.
#[must_use]
pub fn build_prompt(plan: &FeedPlan) -> String {
    let quotas = plan.quotas();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are an expert research curator creating {} DAILY {}.",
        count_word(quotas.len()),
        if quotas.len() == 1 { "FEED" } else { "FEEDS" }
    );

    for (i, quota) in quotas.iter().enumerate() {
        let track = quota.track;
        out.push('\n');
        let _ = writeln!(
            out,
            "TRACK {} – \u{201c}{}\u{201d} ({})",
            i + 1,
            track.display_name(),
            track.focus()
        );
        let _ = writeln!(out, "  • Track id: \"{}\"", track.as_str());
        out.push_str("  • Topics (you may choose from or related to):\n");
        for topic in track.guidance() {
            let _ = writeln!(out, "      – {topic}");
        }
        let _ = writeln!(out, "  • Exactly {} entries.", quota.count);
    }

    out.push_str("\nFOR EACH ENTRY output a JSON object with:\n");
    out.push_str("  track, title, authors, source, summary, why_notable, tags\n");
    out.push_str("  (track must be the track id given above; authors is an array of names;\n");
    let tags = Interest::ALL
        .iter()
        .map(|interest| format!("\"{}\"", interest.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "   tags must be one of: {tags})");
    out.push_str("  Add source_url only when you are certain the link is real.\n");

    for quota in quotas {
        write_track_fields(&mut out, quota.track);
    }

    let _ = write!(
        out,
        "\nReturn ONLY a JSON array of {} objects, grouped by track in the order above \
         (no markdown, no extra text).\n",
        plan.total()
    );
    out
}

fn write_track_fields(out: &mut String, track: Track) {
    let required = track.required_fields();
    let optional = track.optional_fields();
    if required.is_empty() && optional.is_empty() {
        return;
    }

    let _ = writeln!(out, "\nFOR {} ALSO include:", track.display_name().to_uppercase());
    for field in required {
        let _ = writeln!(out, "  {field}: {}", Track::field_hint(field).unwrap_or(""));
    }
    for field in optional {
        let _ = writeln!(
            out,
            "  {field} (optional): {}",
            Track::field_hint(field).unwrap_or("")
        );
    }
}

fn count_word(n: usize) -> String {
    const WORDS: [&str; 10] = [
        "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
    ];
    WORDS.get(n).map_or_else(|| n.to_string(), |w| (*w).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_core::TrackQuota;
    use pretty_assertions::assert_eq;

    #[test]
    fn daily_prompt_names_both_feeds_and_counts() {
        let prompt = build_prompt(&FeedPlan::default());

        assert!(prompt.starts_with("You are an expert research curator creating TWO DAILY FEEDS."));
        assert!(prompt.contains("TRACK 1 – \u{201c}The Social Layer\u{201d}"));
        assert!(prompt.contains("TRACK 2 – \u{201c}Architectures of Capital\u{201d}"));
        assert_eq!(prompt.matches("Exactly 5 entries.").count(), 2);
        assert!(prompt.contains("Return ONLY a JSON array of 10 objects"));
    }

    #[test]
    fn required_fields_are_listed_per_track() {
        let prompt = build_prompt(&FeedPlan::default());

        assert!(prompt.contains("FOR ARCHITECTURES OF CAPITAL ALSO include:"));
        for field in Track::ArchitecturesOfCapital.required_fields() {
            assert!(prompt.contains(&format!("  {field}: ")), "missing {field}");
        }
        assert!(!prompt.contains("FOR THE SOCIAL LAYER ALSO include"));
        assert!(prompt.contains(r#""interested", "maybe later", "not now""#));
    }

    #[test]
    fn optional_fields_are_marked() {
        let plan = FeedPlan::new(vec![TrackQuota::new(Track::PlaySystems, 3)]).unwrap();
        let prompt = build_prompt(&plan);

        assert!(prompt.contains("ONE DAILY FEED."));
        assert!(prompt.contains("  mechanic: "));
        assert!(prompt.contains("  example (optional): "));
        assert!(prompt.contains("JSON array of 3 objects"));
    }

    #[test]
    fn extended_prompt_mentions_every_track_id() {
        let plan = FeedPlan::preset("extended").unwrap();
        let prompt = build_prompt(&plan);

        for quota in plan.quotas() {
            assert!(prompt.contains(&format!("Track id: \"{}\"", quota.track.as_str())));
        }
        assert!(prompt.contains("FIVE DAILY FEEDS"));
        assert!(prompt.contains("JSON array of 18 objects"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let plan = FeedPlan::preset("extended").unwrap();
        assert_eq!(build_prompt(&plan), build_prompt(&plan));
    }
}
