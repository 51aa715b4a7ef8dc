//! Property tests for the split engine's exact-sum contract.
//!
//! Whatever the strategy, the computed shares must sum to the total for
//! every valid input, and identical inputs must produce identical output.

use proptest::prelude::*;

use engine::{
    BASIS_POINTS_PER_WHOLE, MemberSplit, MoneyCents, SplitShare, SplitType, compute_splits,
};

fn participants(n: usize) -> Vec<SplitShare> {
    (0..n).map(|i| SplitShare::new(format!("user-{i}"))).collect()
}

fn sum_cents(splits: &[MemberSplit]) -> i64 {
    splits.iter().map(|split| split.amount.cents()).sum()
}

/// Weight vectors that sum to exactly 100% in basis points.
fn percent_weights() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1u32..1_000, 1..200).prop_map(|raw| {
        let total: u64 = raw.iter().map(|w| u64::from(*w)).sum();
        let mut weights: Vec<i64> = raw
            .iter()
            .map(|w| ((u64::from(*w) * BASIS_POINTS_PER_WHOLE as u64 / total) as i64))
            .collect();
        let assigned: i64 = weights.iter().sum();
        weights[0] += BASIS_POINTS_PER_WHOLE - assigned;
        weights
    })
}

proptest! {
    #[test]
    fn equal_shares_sum_exactly(total in 1i64..=1_000_000_000, n in 1usize..=1000) {
        let shares = participants(n);
        let splits = compute_splits(MoneyCents::new(total), SplitType::Equal, &shares).unwrap();

        prop_assert_eq!(splits.len(), n);
        prop_assert_eq!(sum_cents(&splits), total);

        // No participant is more than one cent away from any other.
        let min = splits.iter().map(|s| s.amount.cents()).min().unwrap();
        let max = splits.iter().map(|s| s.amount.cents()).max().unwrap();
        prop_assert!(max - min <= 1);

        // Topped-up shares come first.
        if min != max {
            let first_small = splits.iter().position(|s| s.amount.cents() == min).unwrap();
            let last_big = splits.iter().rposition(|s| s.amount.cents() == max).unwrap();
            prop_assert!(last_big < first_small);
        }
    }

    #[test]
    fn percent_shares_sum_exactly(total in 1i64..=1_000_000_000, weights in percent_weights()) {
        let shares: Vec<SplitShare> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| SplitShare::with_weight(format!("user-{i}"), *w))
            .collect();
        let splits = compute_splits(MoneyCents::new(total), SplitType::Percent, &shares).unwrap();

        prop_assert_eq!(sum_cents(&splits), total);

        // Every share is within one cent of its floored fraction.
        for (split, weight) in splits.iter().zip(&weights) {
            let (floored, _) = MoneyCents::new(total).scale_by_basis_points(*weight);
            let diff = split.amount.cents() - floored.cents();
            prop_assert!((0..=1).contains(&diff));
        }
    }

    #[test]
    fn custom_shares_are_returned_verbatim(amounts in prop::collection::vec(0i64..1_000_000, 1..200)) {
        let total: i64 = amounts.iter().sum::<i64>().max(1);
        let mut amounts = amounts;
        // Rebalance the first entry so the vector sums to the total.
        let assigned: i64 = amounts.iter().skip(1).sum();
        amounts[0] = total - assigned;
        prop_assume!(amounts[0] >= 0);

        let shares: Vec<SplitShare> = amounts
            .iter()
            .enumerate()
            .map(|(i, cents)| SplitShare::with_weight(format!("user-{i}"), *cents))
            .collect();
        let splits = compute_splits(MoneyCents::new(total), SplitType::Custom, &shares).unwrap();

        prop_assert_eq!(sum_cents(&splits), total);
        for (split, cents) in splits.iter().zip(&amounts) {
            prop_assert_eq!(split.amount.cents(), *cents);
        }
    }

    #[test]
    fn computation_is_idempotent(total in 1i64..=1_000_000, n in 1usize..=50) {
        let shares = participants(n);
        let first = compute_splits(MoneyCents::new(total), SplitType::Equal, &shares).unwrap();
        let second = compute_splits(MoneyCents::new(total), SplitType::Equal, &shares).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn percent_computation_is_idempotent(total in 1i64..=1_000_000, weights in percent_weights()) {
        let shares: Vec<SplitShare> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| SplitShare::with_weight(format!("user-{i}"), *w))
            .collect();
        let first = compute_splits(MoneyCents::new(total), SplitType::Percent, &shares).unwrap();
        let second = compute_splits(MoneyCents::new(total), SplitType::Percent, &shares).unwrap();
        prop_assert_eq!(first, second);
    }
}
