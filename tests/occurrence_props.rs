// tests/occurrence_props.rs

use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, TimeZone, Timelike, Weekday};
use proptest::prelude::*;

use invoker::schedule::next_occurrence;
use invoker::types::Cadence;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// Instants between 1970 and ~2096 in a fixed-offset zone between -12h and +14h.
fn now_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000, -720i32..=840).prop_map(|(secs, nanos, offset_min)| {
        let zone = FixedOffset::east_opt(offset_min * 60).unwrap();
        zone.timestamp_opt(secs, nanos).unwrap()
    })
}

proptest! {
    #[test]
    fn weekly_is_strictly_after_now_and_on_target(
        now in now_strategy(),
        day in 0usize..7,
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let weekday = WEEKDAYS[day];
        let next = next_occurrence(&Cadence::Weekly { weekday, hour, minute }, &now);

        prop_assert!(next > now);
        prop_assert!(next - now <= TimeDelta::days(7));
        prop_assert_eq!(next.weekday(), weekday);
        prop_assert_eq!(next.hour(), hour);
        prop_assert_eq!(next.minute(), minute);
        prop_assert_eq!(next.second(), 0);
    }

    #[test]
    fn weekly_at_exact_target_is_one_week_later(
        now in now_strategy(),
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let at_target = now
            .timezone()
            .with_ymd_and_hms(now.year(), now.month(), now.day(), hour, minute, 0)
            .unwrap();
        let cadence = Cadence::Weekly { weekday: at_target.weekday(), hour, minute };

        prop_assert_eq!(next_occurrence(&cadence, &at_target), at_target + TimeDelta::days(7));
    }

    #[test]
    fn daily_is_smallest_matching_instant_after_now(
        now in now_strategy(),
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let next = next_occurrence(&Cadence::Daily { hour, minute }, &now);

        prop_assert!(next > now);
        prop_assert!(next - TimeDelta::hours(24) <= now);
        prop_assert_eq!(next.hour(), hour);
        prop_assert_eq!(next.minute(), minute);
        prop_assert_eq!(next.second(), 0);
    }

    #[test]
    fn every_minute_is_next_boundary(now in now_strategy()) {
        let next = next_occurrence(&Cadence::EveryMinute, &now);

        prop_assert!(next > now);
        prop_assert!(next - now <= TimeDelta::minutes(1));
        prop_assert_eq!(next.second(), 0);
        prop_assert_eq!(next.nanosecond(), 0);
    }
}
