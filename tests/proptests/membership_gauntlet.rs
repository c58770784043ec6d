//! Property gauntlet over the order-independent membership comparison.

use alloy::primitives::Address;
use deploy_sentinel::access_control::{multiset_diff, occurrences};
use proptest::collection::vec;
use proptest::prelude::*;

fn addr_strategy() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from)
}

proptest! {
    #[test]
    fn test_rotations_never_produce_a_diff(
        members in vec(addr_strategy(), 0..16),
        rotation in any::<usize>(),
    ) {
        let mut rotated = members.clone();
        if !rotated.is_empty() {
            let by = rotation % rotated.len();
            rotated.rotate_left(by);
        }
        let (missing, unexpected) = multiset_diff(&members, &rotated);
        prop_assert!(missing.is_empty());
        prop_assert!(unexpected.is_empty());
    }

    #[test]
    fn test_reversal_never_produces_a_diff(members in vec(addr_strategy(), 0..16)) {
        let reversed: Vec<Address> = members.iter().rev().copied().collect();
        let (missing, unexpected) = multiset_diff(&members, &reversed);
        prop_assert!(missing.is_empty());
        prop_assert!(unexpected.is_empty());
    }

    #[test]
    fn test_single_element_change_is_always_detected(
        members in vec(addr_strategy(), 1..16),
        index in any::<usize>(),
        replacement in addr_strategy(),
    ) {
        let mut actual = members.clone();
        let index = index % actual.len();
        prop_assume!(actual[index] != replacement);
        actual[index] = replacement;

        let (missing, unexpected) = multiset_diff(&members, &actual);
        prop_assert!(!missing.is_empty() || !unexpected.is_empty());
    }

    #[test]
    fn test_diff_counts_agree_with_occurrences(
        members in vec(addr_strategy(), 0..12),
        extra in addr_strategy(),
    ) {
        let mut actual = members.clone();
        actual.push(extra);

        let (missing, unexpected) = multiset_diff(&members, &actual);
        prop_assert!(missing.is_empty());
        prop_assert_eq!(unexpected.len(), 1);
        prop_assert_eq!(
            occurrences(&actual, extra),
            occurrences(&members, extra) + 1
        );
    }
}
