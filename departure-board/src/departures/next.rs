//! Next-departure calculation for a daily recurring schedule.
//!
//! A schedule departs at its first departure time and then every
//! `frequency` minutes until the end of the calendar day. Occurrences that
//! would spill past 23:59:59 are dropped; the next one is the first
//! departure time on the following day. The sequence is not carried across
//! midnight.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::domain::{DepartureError, DepartureTime};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Compute the next departure at or after `reference`.
///
/// Returns the smallest `first + k * frequency_minutes` (k >= 0) on the
/// reference date that is not before `reference`. If that would land past
/// the end of the reference date, returns `first` on the next date.
///
/// `reference` is taken as an explicit argument so that every route in one
/// ranking pass is evaluated against the same instant.
///
/// # Errors
///
/// [`DepartureError::InvalidSchedule`] if `frequency_minutes` is not
/// positive; the route is left blank for the caller to fill in.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use departure_board::departures::next_departure;
/// use departure_board::domain::DepartureTime;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let first = DepartureTime::parse_hhmm("08:00").unwrap();
///
/// let now = day.and_hms_opt(8, 15, 0).unwrap();
/// let next = next_departure(first, 30, now).unwrap();
/// assert_eq!(next, day.and_hms_opt(8, 30, 0).unwrap());
/// ```
pub fn next_departure(
    first: DepartureTime,
    frequency_minutes: i64,
    reference: NaiveDateTime,
) -> Result<NaiveDateTime, DepartureError> {
    if frequency_minutes <= 0 {
        return Err(DepartureError::InvalidSchedule {
            route: String::new(),
            reason: format!("frequency must be positive, got {frequency_minutes}"),
        });
    }

    let date = reference.date();
    let anchor = date.and_time(first.as_naive());
    if anchor >= reference {
        return Ok(anchor);
    }

    let end_of_day = date.and_time(end_of_day());

    // A full day's interval always overshoots, so larger values behave the same
    let step_minutes = frequency_minutes.min(MINUTES_PER_DAY);
    let step_nanos = step_minutes * 60 * 1_000_000_000;

    // `behind` is under one day, so it always fits in nanoseconds
    let behind = reference - anchor;
    let behind_nanos = behind
        .num_nanoseconds()
        .ok_or(DepartureError::OutOfRange)?;

    // Fewest whole steps that reach or pass the reference instant
    let steps = (behind_nanos + step_nanos - 1) / step_nanos;
    let candidate = anchor
        .checked_add_signed(Duration::minutes(steps * step_minutes))
        .ok_or(DepartureError::OutOfRange)?;

    if candidate > end_of_day {
        let next_date = date.succ_opt().ok_or(DepartureError::OutOfRange)?;
        return Ok(next_date.and_time(first.as_naive()));
    }

    Ok(candidate)
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).expect("23:59:59 is a valid time")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32, s: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, s).unwrap()
    }

    fn hm(s: &str) -> DepartureTime {
        DepartureTime::parse_hhmm(s).unwrap()
    }

    #[test]
    fn before_first_departure_returns_first() {
        let d = date(2024, 3, 15);
        let next = next_departure(hm("08:00"), 30, at(d, 7, 0, 0)).unwrap();
        assert_eq!(next, at(d, 8, 0, 0));
    }

    #[test]
    fn between_departures_advances_one_interval() {
        let d = date(2024, 3, 15);
        let next = next_departure(hm("08:00"), 30, at(d, 8, 15, 0)).unwrap();
        assert_eq!(next, at(d, 8, 30, 0));
    }

    #[test]
    fn exactly_at_first_departure_is_not_advanced() {
        let d = date(2024, 3, 15);
        let next = next_departure(hm("08:00"), 30, at(d, 8, 0, 0)).unwrap();
        assert_eq!(next, at(d, 8, 0, 0));
    }

    #[test]
    fn exactly_at_later_departure_is_not_advanced() {
        let d = date(2024, 3, 15);
        let next = next_departure(hm("08:00"), 30, at(d, 9, 30, 0)).unwrap();
        assert_eq!(next, at(d, 9, 30, 0));
    }

    #[test]
    fn one_second_after_departure_moves_to_next() {
        let d = date(2024, 3, 15);
        let next = next_departure(hm("08:00"), 30, at(d, 8, 30, 1)).unwrap();
        assert_eq!(next, at(d, 9, 0, 0));
    }

    #[test]
    fn sub_second_reference_moves_to_next() {
        let d = date(2024, 3, 15);
        let reference = d.and_hms_milli_opt(8, 0, 0, 1).unwrap();
        let next = next_departure(hm("08:00"), 15, reference).unwrap();
        assert_eq!(next, at(d, 8, 15, 0));
    }

    #[test]
    fn spill_past_midnight_rolls_to_next_day_anchor() {
        let d = date(2024, 3, 15);
        let next = next_departure(hm("23:50"), 30, at(d, 23, 55, 0)).unwrap();
        assert_eq!(next, at(date(2024, 3, 16), 23, 50, 0));
    }

    #[test]
    fn rollover_drops_phase() {
        // 22:00 + 45 -> 22:45, 23:30, then 00:15 spills: next is 22:00 tomorrow
        let d = date(2024, 3, 15);
        let next = next_departure(hm("22:00"), 45, at(d, 23, 31, 0)).unwrap();
        assert_eq!(next, at(date(2024, 3, 16), 22, 0, 0));
    }

    #[test]
    fn last_minute_of_day_still_counts() {
        let d = date(2024, 3, 15);
        let next = next_departure(hm("23:00"), 59, at(d, 23, 30, 0)).unwrap();
        assert_eq!(next, at(d, 23, 59, 0));
    }

    #[test]
    fn rollover_crosses_month_and_year() {
        let d = date(2023, 12, 31);
        let next = next_departure(hm("06:00"), 60, at(d, 23, 59, 30)).unwrap();
        assert_eq!(next, at(date(2024, 1, 1), 6, 0, 0));
    }

    #[test]
    fn huge_frequency_means_once_per_day() {
        let d = date(2024, 3, 15);
        let next = next_departure(hm("00:00"), i64::MAX, at(d, 0, 0, 1)).unwrap();
        assert_eq!(next, at(date(2024, 3, 16), 0, 0, 0));
    }

    #[test]
    fn non_positive_frequency_is_invalid() {
        let d = date(2024, 3, 15);
        for freq in [0, -1, -30] {
            let err = next_departure(hm("08:00"), freq, at(d, 9, 0, 0)).unwrap_err();
            assert!(matches!(err, DepartureError::InvalidSchedule { .. }));
        }
    }

    #[test]
    fn last_representable_date_overflows() {
        let reference = NaiveDate::MAX.and_hms_opt(23, 55, 0).unwrap();
        assert_eq!(
            next_departure(hm("23:50"), 30, reference),
            Err(DepartureError::OutOfRange)
        );
    }
}
