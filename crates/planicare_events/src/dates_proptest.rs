#[cfg(test)]
mod tests {
    use crate::dates::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use proptest::prelude::*;

    fn instant(offset_minutes: i64) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap() + Duration::minutes(offset_minutes)
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            a in 0i64..5000, la in 1i64..600,
            b in 0i64..5000, lb in 1i64..600,
        ) {
            let forward = intervals_overlap(instant(a), instant(a + la), instant(b), instant(b + lb));
            let backward = intervals_overlap(instant(b), instant(b + lb), instant(a), instant(a + la));
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn adjacent_intervals_never_overlap(start in 0i64..5000, len in 1i64..600, gap in 0i64..600) {
            let first_end = start + len;
            let second_start = first_end + gap;
            prop_assert!(!intervals_overlap(
                instant(start),
                instant(first_end),
                instant(second_start),
                instant(second_start + len),
            ));
        }

        #[test]
        fn occurrence_days_respect_step_and_bounds(
            step in prop::sample::select(vec![1i64, 7, 14]),
            span in 0i64..200,
            week_days_only in any::<bool>(),
        ) {
            let seed = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
            let until = seed + Duration::days(span);
            let days = occurrence_days(seed, until, step, week_days_only);

            for day in &days {
                prop_assert!(*day > seed);
                prop_assert!(*day <= until);
                let elapsed = (*day - seed).num_days();
                prop_assert_eq!(elapsed % step, 0);
                if week_days_only {
                    prop_assert!(is_week_day(*day));
                }
            }
        }
    }
}
