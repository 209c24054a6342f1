//! Property tests for the data model's wire format and overlap detection.

use officiate_core::{Certification, CertificationSet, Match, MatchId, overlapping_pairs};
use proptest::prelude::*;
use serde_json::json;

fn cert(tag: u8) -> Certification {
    Certification::new(tag).expect("valid tag")
}

fn arb_set() -> impl Strategy<Value = CertificationSet> {
    proptest::collection::vec(0_u8..Certification::MAX, 0..16)
        .prop_map(|tags| tags.into_iter().map(cert).collect())
}

/// `(day, start, duration)` triples; ids are assigned by position.
fn arb_matches() -> impl Strategy<Value = Vec<Match>> {
    proptest::collection::vec((0_u32..3, 0_u32..20, 1_u32..6), 0..24).prop_map(|slots| {
        slots
            .into_iter()
            .enumerate()
            .map(|(id, (day, start, len))| {
                Match::new(id, day, start, start + len, cert(0)).expect("positive duration")
            })
            .collect()
    })
}

fn brute_force_pairs(matches: &[Match]) -> Vec<(MatchId, MatchId)> {
    let mut pairs = Vec::new();
    for (i, a) in matches.iter().enumerate() {
        for b in &matches[i + 1..] {
            if a.overlaps(b) {
                pairs.push((a.id().min(b.id()), a.id().max(b.id())));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn certification_set_survives_json(set in arb_set()) {
        let text = serde_json::to_string(&set).expect("serialize");
        let back: CertificationSet = serde_json::from_str(&text).expect("deserialize");
        prop_assert_eq!(back, set);

        let tags: Vec<u8> = serde_json::from_str(&text).expect("tag list");
        prop_assert_eq!(tags.len(), set.len());
        prop_assert!(tags.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn certification_set_rejects_out_of_range_tags(tag in Certification::MAX..=u8::MAX) {
        let text = json!([0, tag]).to_string();
        prop_assert!(serde_json::from_str::<CertificationSet>(&text).is_err());
    }

    #[test]
    fn match_rejects_empty_or_inverted_range(
        start in 0_u32..1_000,
        back in 0_u32..1_000,
        day in 0_u32..7,
    ) {
        let end = start.saturating_sub(back);
        let text = json!({
            "id": 0,
            "day": day,
            "start": start,
            "end": end,
            "certification": 0,
        })
        .to_string();
        let err = serde_json::from_str::<Match>(&text).expect_err("end <= start");
        prop_assert!(err.to_string().contains("<= start"), "{}", err);
    }

    #[test]
    fn match_accepts_positive_range(start in 0_u32..1_000, len in 1_u32..100) {
        let text = json!({
            "id": 3,
            "day": 1,
            "start": start,
            "end": start + len,
            "certification": 2,
        })
        .to_string();
        let m: Match = serde_json::from_str(&text).expect("valid match");
        prop_assert_eq!(m.duration(), len);
    }

    #[test]
    fn overlapping_pairs_agrees_with_all_pairs_check(matches in arb_matches()) {
        prop_assert_eq!(overlapping_pairs(&matches), brute_force_pairs(&matches));
    }

    #[test]
    fn overlapping_pairs_ignores_input_order(matches in arb_matches()) {
        let mut reversed = matches.clone();
        reversed.reverse();
        prop_assert_eq!(overlapping_pairs(&reversed), overlapping_pairs(&matches));
    }
}
