//! Property-based tests for prompt composition, parsing and aggregation.

use proptest::prelude::*;
use verdict_harness::parser::repair_truncated_verdict;
use verdict_harness::{aggregate, compose_full_prompt, PromptRecord, ResponseParser};

// =============================================================================
// Generators
// =============================================================================

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("safe".to_string()),
        Just("temp_unsafe".to_string()),
        Just("frame_unsafe".to_string()),
    ]
}

/// A stored final response: either a stripped verdict or free text.
fn arb_answer() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..=100, 0u32..=100).prop_map(|(y, n)| format!("No, Yes: {y}%, No: {n}%")),
        (0u32..=100, 0u32..=100).prop_map(|(y, n)| format!("ANS: Yes, Yes: {y}%, No: {n}%")),
        "[a-z ]{0,30}",
    ]
}

fn arb_records() -> impl Strategy<Value = Vec<PromptRecord>> {
    prop::collection::vec((arb_label(), arb_answer()), 0..20).prop_map(|items| {
        items
            .into_iter()
            .map(|(label, answer)| PromptRecord::new("", "q", Some(label), "", answer))
            .collect()
    })
}

/// Raw NDJSON stream mixing valid fragments and junk lines.
fn arb_stream() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[ -~]{0,20}".prop_map(|chunk| serde_json::json!({ "response": chunk }).to_string()),
            "[ -~]{0,20}",
        ],
        0..10,
    )
    .prop_map(|lines| lines.join("\n"))
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn full_prompt_joins_non_empty_context(context in ".{1,40}", prompt in ".{0,40}") {
        prop_assert_eq!(
            compose_full_prompt(&context, &prompt),
            format!("{}\n\n{}", context, prompt)
        );
    }

    #[test]
    fn full_prompt_without_context_is_prompt(prompt in ".{0,40}") {
        prop_assert_eq!(compose_full_prompt("", &prompt), prompt);
    }

    #[test]
    fn parse_is_deterministic(raw in arb_stream()) {
        let parser = ResponseParser::default();
        prop_assert_eq!(parser.parse(&raw), parser.parse(&raw));
    }

    #[test]
    fn repair_is_idempotent(text in ".{0,30}") {
        let once = repair_truncated_verdict(&text);
        prop_assert_eq!(repair_truncated_verdict(&once), once.clone());
        if !text.starts_with("o, ") {
            prop_assert_eq!(once, text);
        }
    }

    #[test]
    fn aggregation_is_order_independent(records in arb_records()) {
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = aggregate(&records);
        let backward = aggregate(&reversed);
        prop_assert_eq!(forward.len(), backward.len());
        for (label, summary) in &forward {
            let other = &backward[label];
            prop_assert_eq!(summary.records, other.records);
            prop_assert_eq!(summary.scored, other.scored);
            match (summary.average, other.average) {
                (Some(a), Some(b)) => {
                    prop_assert!((a.mean_yes - b.mean_yes).abs() < 1e-9);
                    prop_assert!((a.mean_no - b.mean_no).abs() < 1e-9);
                }
                (None, None) => {}
                _ => prop_assert!(false, "average defined in one order only"),
            }
        }
    }

    #[test]
    fn averages_stay_within_bounds(records in arb_records()) {
        for summary in aggregate(&records).values() {
            prop_assert!(summary.scored <= summary.records);
            if let Some(avg) = summary.average {
                prop_assert!((0.0..=100.0).contains(&avg.mean_yes));
                prop_assert!((0.0..=100.0).contains(&avg.mean_no));
            } else {
                prop_assert_eq!(summary.scored, 0);
            }
        }
    }
}
