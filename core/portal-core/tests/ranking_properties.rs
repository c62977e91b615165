//! Property tests for JetBrains candidate ranking.

use std::cmp::Ordering;

use portal_core::recents::jetbrains::rank_order;
use portal_core::recents::{MatchTier, RankedCandidate, RecentProjectCandidate};
use proptest::prelude::*;

fn tier() -> impl Strategy<Value = MatchTier> {
    prop_oneof![
        Just(MatchTier::ExactFrameTitle),
        Just(MatchTier::NameMatchesHint),
        Just(MatchTier::FrameTitleContainsPath),
        Just(MatchTier::NameOverlapsHint),
    ]
}

fn ranked() -> impl Strategy<Value = RankedCandidate> {
    (
        tier(),
        prop::collection::vec("[a-c]{1,2}", 1..4),
        any::<bool>(),
        any::<bool>(),
        0i64..3,
        0i64..3,
        0i32..3,
    )
        .prop_map(
            |(tier, segments, is_opened, is_last_opened, activation, project_open, rank)| {
                let mut candidate =
                    RecentProjectCandidate::bare(format!("/{}", segments.join("/")), rank);
                candidate.is_opened = is_opened;
                candidate.is_last_opened = is_last_opened;
                candidate.activation_timestamp = activation;
                candidate.project_open_timestamp = project_open;
                RankedCandidate { tier, candidate }
            },
        )
}

proptest! {
    #[test]
    fn order_is_antisymmetric(a in ranked(), b in ranked()) {
        prop_assert_eq!(rank_order(&a, &b), rank_order(&b, &a).reverse());
    }

    #[test]
    fn order_is_transitive(a in ranked(), b in ranked(), c in ranked()) {
        if rank_order(&a, &b) != Ordering::Greater && rank_order(&b, &c) != Ordering::Greater {
            prop_assert_ne!(rank_order(&a, &c), Ordering::Greater);
        }
    }

    #[test]
    fn stronger_tier_always_wins(a in ranked(), b in ranked()) {
        if a.tier.rank() < b.tier.rank() {
            prop_assert_eq!(rank_order(&a, &b), Ordering::Less);
        }
    }

    #[test]
    fn equal_only_for_same_path(a in ranked(), b in ranked()) {
        if rank_order(&a, &b) == Ordering::Equal {
            prop_assert_eq!(a.candidate.path, b.candidate.path);
        }
    }

    #[test]
    fn sorting_is_independent_of_input_order(mut items in prop::collection::vec(ranked(), 1..8)) {
        let mut forward = items.clone();
        forward.sort_by(rank_order);
        items.reverse();
        items.sort_by(rank_order);
        prop_assert_eq!(&forward[0].candidate.path, &items[0].candidate.path);
    }
}
