// src/schedule/occurrence.rs

//! Next-occurrence arithmetic for the supported cadences.
//!
//! All functions are pure and generic over the time zone of `now`; the
//! returned instant is expressed in the same zone. An instant equal to `now`
//! counts as already passed, so every result is strictly after `now`.

use std::time::Duration;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone, Timelike, Weekday};

use crate::types::Cadence;

const MINUTE: Duration = Duration::from_secs(60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);
const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Next trigger instant of `cadence`, strictly after `now`.
pub fn next_occurrence<Tz: TimeZone>(cadence: &Cadence, now: &DateTime<Tz>) -> DateTime<Tz> {
    match *cadence {
        Cadence::Weekly {
            weekday,
            hour,
            minute,
        } => next_weekly(now, weekday, hour, minute),
        Cadence::Daily { hour, minute } => next_daily(now, hour, minute),
        Cadence::EveryMinute => next_minute(now),
    }
}

/// Fixed spacing between firings once a job has fired for the first time.
pub fn rearm_interval(cadence: &Cadence) -> Duration {
    match cadence {
        Cadence::Weekly { .. } => WEEK,
        Cadence::Daily { .. } => DAY,
        Cadence::EveryMinute => MINUTE,
    }
}

/// Next `weekday` at `hour:minute`.
///
/// If today is `weekday` and the time is not strictly in the future, the
/// result is the same time one week later.
pub fn next_weekly<Tz: TimeZone>(
    now: &DateTime<Tz>,
    weekday: Weekday,
    hour: u32,
    minute: u32,
) -> DateTime<Tz> {
    let today = now.date_naive();
    let candidate = at_wall_time(now, today, hour, minute);

    let target = weekday.num_days_from_sunday();
    let current = now.weekday().num_days_from_sunday();
    let mut days_ahead = (target + 7 - current) % 7;
    if days_ahead == 0 && candidate <= *now {
        days_ahead = 7;
    }

    let date = today
        .checked_add_days(Days::new(u64::from(days_ahead)))
        .unwrap_or(today);
    at_wall_time(now, date, hour, minute)
}

/// Today at `hour:minute` if still ahead, otherwise 24 hours later.
pub fn next_daily<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32, minute: u32) -> DateTime<Tz> {
    let candidate = at_wall_time(now, now.date_naive(), hour, minute);
    if candidate > *now {
        candidate
    } else {
        candidate + TimeDelta::hours(24)
    }
}

/// Start of the next whole minute. Never `now`, even on a boundary.
pub fn next_minute<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let into_minute = TimeDelta::seconds(i64::from(now.second()))
        + TimeDelta::nanoseconds(i64::from(now.nanosecond()));
    now.clone() - into_minute + TimeDelta::minutes(1)
}

/// `date` at `hour:minute:00` in the zone of `now`.
///
/// Ambiguous wall times (clocks going back) resolve to the earlier instant;
/// wall times skipped by a forward transition are interpreted with the
/// offset currently in effect.
fn at_wall_time<Tz: TimeZone>(
    now: &DateTime<Tz>,
    date: NaiveDate,
    hour: u32,
    minute: u32,
) -> DateTime<Tz> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    let naive = date.and_time(time);
    let tz = now.timezone();

    tz.from_local_datetime(&naive).earliest().unwrap_or_else(|| {
        let offset = i64::from(now.offset().fix().local_minus_utc());
        tz.from_utc_datetime(&(naive - TimeDelta::seconds(offset)))
    })
}
