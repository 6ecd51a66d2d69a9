//! Property-based tests for budget rules.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::{BudgetStatus, periods_conflict, spend_status};

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(offset))
        .unwrap()
}

proptest! {
    /// Candidate periods entirely before or entirely after an existing
    /// period never conflict.
    #[test]
    fn test_disjoint_periods_never_conflict(
        start in 100u64..200,
        len in 0u64..50,
        before_start in 0u64..40,
        before_len in 0u64..50,
        after_offset in 1u64..40,
        after_len in 0u64..50,
    ) {
        let (s, e) = (day(start), day(start + len));

        // Entirely before: ends strictly before the existing start
        // (before_start + before_len caps at 89, start begins at 100).
        let b_start = day(before_start);
        let b_end = day(before_start + before_len);
        prop_assert!(!periods_conflict(s, e, b_start, b_end));

        // Entirely after: starts strictly after the existing end.
        let a_start = day(start + len + after_offset);
        let a_end = day(start + len + after_offset + after_len);
        prop_assert!(!periods_conflict(s, e, a_start, a_end));
    }

    /// Any candidate endpoint inside the existing period (inclusive)
    /// conflicts.
    #[test]
    fn test_endpoint_inside_conflicts(
        start in 100u64..200,
        len in 0u64..60,
        inside in 0u64..60,
        stretch in 0u64..400,
    ) {
        let inside = inside.min(len);
        let (s, e) = (day(start), day(start + len));
        let hit = day(start + inside);

        // Candidate starting inside, ending anywhere later.
        prop_assert!(periods_conflict(s, e, hit, day(start + inside + stretch)));

        // Candidate ending inside, starting anywhere earlier.
        let new_start = day((start + inside).saturating_sub(stretch));
        prop_assert!(periods_conflict(s, e, new_start, hit));
    }

    /// An existing period strictly inside the candidate is NOT flagged:
    /// neither candidate endpoint falls within the existing period. This
    /// asymmetry is part of the rule, not an accident of the test.
    #[test]
    fn test_enclosing_candidate_not_flagged(
        start in 100u64..200,
        len in 0u64..60,
        margin_before in 1u64..50,
        margin_after in 1u64..50,
    ) {
        let (s, e) = (day(start), day(start + len));
        let new_start = day(start - margin_before);
        let new_end = day(start + len + margin_after);

        prop_assert!(!periods_conflict(s, e, new_start, new_end));
    }

    /// Status classification follows the spend ratio exactly: past the
    /// limit is exceeded, at least 80% of it is a warning, anything less
    /// is healthy. Integer cross-multiplication keeps the oracle exact.
    #[test]
    fn test_spend_status_thresholds(
        limit in 1i64..1_000_000_000,
        spent in 0i64..2_000_000_000,
    ) {
        let status = spend_status(Decimal::from(limit), Decimal::from(spent));

        let expected = if spent > limit {
            BudgetStatus::Exceeded
        } else if 5 * spent >= 4 * limit {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Healthy
        };

        prop_assert_eq!(status, expected);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::budget::types::{Budget, NewBudget};
    use finbook_shared::types::UserId;

    fn test_budget(limit: Decimal, spent: Decimal) -> Budget {
        let mut budget = Budget::new(NewBudget {
            user_id: UserId::new(),
            category: "groceries".to_string(),
            period_start: day(0),
            period_end: day(30),
            limit_amount: limit,
        });
        budget.amount_spent = spent;
        budget
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(
            spend_status(dec!(100), dec!(79.99)),
            BudgetStatus::Healthy
        );
        assert_eq!(spend_status(dec!(100), dec!(80)), BudgetStatus::Warning);
        assert_eq!(spend_status(dec!(100), dec!(100)), BudgetStatus::Warning);
        assert_eq!(
            spend_status(dec!(100), dec!(100.01)),
            BudgetStatus::Exceeded
        );
    }

    #[test]
    fn test_remaining_floors_at_zero() {
        assert_eq!(test_budget(dec!(100), dec!(40)).remaining(), dec!(60));
        assert_eq!(test_budget(dec!(100), dec!(100)).remaining(), dec!(0));
        assert_eq!(test_budget(dec!(100), dec!(130)).remaining(), dec!(0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let budget = test_budget(dec!(100), dec!(0));

        assert!(budget.contains(day(0)));
        assert!(budget.contains(day(15)));
        assert!(budget.contains(day(30)));
        assert!(!budget.contains(day(31)));
    }

    #[test]
    fn test_conflict_on_shared_boundary() {
        // A candidate starting on the existing end day collides.
        assert!(periods_conflict(day(0), day(30), day(30), day(60)));
        // A candidate ending on the existing start day collides.
        assert!(periods_conflict(day(30), day(60), day(0), day(30)));
    }

    #[test]
    fn test_identical_periods_conflict() {
        assert!(periods_conflict(day(0), day(30), day(0), day(30)));
    }

    #[test]
    fn test_summary_reflects_derived_fields() {
        let summary = test_budget(dec!(200), dec!(170)).summarize();

        assert_eq!(summary.remaining, dec!(30));
        assert_eq!(summary.status, BudgetStatus::Warning);
        assert_eq!(summary.category, "groceries");
    }
}
