//! Property-based tests for business-day arithmetic.

use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};
use pickup::pickup::is_business_day;
use pickup::{add_business_days, pickup_ready_at};
use proptest::prelude::*;

/// Dates between 1990 and roughly 2100.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..40_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

proptest! {
    #[test]
    fn result_never_falls_on_weekend(start in arb_date(), n in 1u32..200) {
        let result = add_business_days(start, n);
        prop_assert!(!matches!(result.weekday(), Weekday::Sat | Weekday::Sun));
    }

    #[test]
    fn weekend_days_plus_n_equals_calendar_days(start in arb_date(), n in 0u32..200) {
        let result = add_business_days(start, n);
        let calendar_days = (result - start).num_days();

        let weekend_days = start
            .iter_days()
            .skip(1)
            .take_while(|d| *d < result)
            .filter(|d| !is_business_day(*d))
            .count() as i64;

        prop_assert_eq!(weekend_days + i64::from(n), calendar_days);
    }

    #[test]
    fn result_is_strictly_later_for_positive_n(start in arb_date(), n in 1u32..200) {
        prop_assert!(add_business_days(start, n) > start);
    }

    #[test]
    fn timestamps_keep_time_of_day(
        start in arb_date(),
        n in 0u32..30,
        secs in 0u32..86_400,
    ) {
        let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap();
        let ts = Utc.from_utc_datetime(&start.and_time(time));

        let ready = pickup_ready_at(&ts, n).unwrap();
        prop_assert_eq!(ready.time(), ts.time());
        prop_assert_eq!(ready.date_naive(), add_business_days(start, n));
    }
}

#[test]
fn documented_examples() {
    let friday = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();
    let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

    assert_eq!(add_business_days(friday, 3), NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
    assert_eq!(add_business_days(monday, 3), NaiveDate::from_ymd_opt(2024, 6, 13).unwrap());
}
