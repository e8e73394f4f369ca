// --- File: crates/planicare_events/src/dates.rs ---
//! Business-calendar date helpers.
//!
//! All "same day" reasoning happens in the configured business time zone,
//! never in UTC: an intervention ending at 23:30 Paris time is still a
//! single-day event even though it crosses midnight UTC in winter.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

/// Calendar day of an instant in the business time zone.
pub fn day_of(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Whether two instants fall on the same business-calendar day.
pub fn same_day(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    day_of(a, tz) == day_of(b, tz)
}

/// Whether the half-open intervals `[a_start, a_end)` and
/// `[b_start, b_end)` intersect. Touching boundaries do not.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Moves `instant` to `day`, preserving its local time-of-day.
///
/// Ambiguous local times (fall-back) resolve to the earlier instant; times
/// inside a spring-forward gap are pushed one hour later.
pub fn on_day(instant: DateTime<Utc>, day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let local_time = instant.with_timezone(&tz).time();
    let naive = NaiveDateTime::new(day, local_time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(resolved) => resolved.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|resolved| resolved.with_timezone(&Utc))
            .unwrap_or(instant),
    }
}

pub fn is_week_day(day: NaiveDate) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Forward walk of occurrence days: every `step_days`-th day after
/// `seed_day` (exclusive) up to `until` (inclusive), optionally restricted
/// to Monday through Friday.
pub fn occurrence_days(
    seed_day: NaiveDate,
    until: NaiveDate,
    step_days: i64,
    week_days_only: bool,
) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = seed_day + Duration::days(step_days);
    while day <= until {
        if !week_days_only || is_week_day(day) {
            days.push(day);
        }
        day += Duration::days(step_days);
    }
    days
}
