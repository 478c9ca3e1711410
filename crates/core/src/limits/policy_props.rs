//! Property-based tests for LimitPolicy.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::policy::{DatedAmount, LimitKind, LimitPolicy};

fn cents(max: i64) -> impl Strategy<Value = Decimal> {
    (1i64..=max).prop_map(|c| Decimal::new(c, 2))
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* single amount with no prior volume, the limit is exceeded
    /// exactly when the amount is above the ceiling.
    #[test]
    fn prop_single_amount_threshold(amount in cents(200_000)) {
        let policy = LimitPolicy::default();
        let limit = policy.limit(LimitKind::Deposit);
        prop_assert_eq!(
            policy.deposit_exceeds_daily_limit(amount, &[], noon()),
            amount > limit
        );
    }

    /// *For any* same-day history, the decision depends only on the sum.
    #[test]
    fn prop_same_day_sum_decides(
        prior in proptest::collection::vec((0i64..12 * 60, cents(40_000)), 0..8),
        amount in cents(100_000),
    ) {
        let policy = LimitPolicy::default();
        let day_start = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        let movements: Vec<_> = prior
            .iter()
            .map(|(minute, value)| DatedAmount::new(day_start + Duration::minutes(*minute), *value))
            .collect();
        let total: Decimal = movements.iter().map(|m| m.amount).sum();
        let limit = policy.limit(LimitKind::Withdraw);

        prop_assert_eq!(
            policy.withdraw_exceeds_daily_limit(amount, &movements, noon()),
            amount + total > limit
        );
    }

    /// *For any* history entirely on other days, only the new amount matters.
    #[test]
    fn prop_other_days_ignored(
        days_ago in 1i64..30,
        prior in cents(100_000),
        amount in cents(100_000),
    ) {
        let policy = LimitPolicy::default();
        let movements = [DatedAmount::new(noon() - Duration::days(days_ago), prior)];

        prop_assert_eq!(policy.same_day_total(&movements, noon()), Decimal::ZERO);
        prop_assert!(!policy.deposit_exceeds_daily_limit(amount, &movements, noon()));
    }

    /// *For any* instant, `day_start` is at or before it and on the same
    /// local date.
    #[test]
    fn prop_day_start_bounds(offset_minutes in 0i64..(365 * 24 * 60)) {
        let policy = LimitPolicy::new(
            Decimal::ONE,
            Decimal::ONE,
            chrono_tz::America::New_York,
        ).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + Duration::minutes(offset_minutes);

        let start = policy.day_start(now);
        prop_assert!(start <= now);
        prop_assert_eq!(policy.local_date(start), policy.local_date(now));
    }
}
