//! Departure ranking across all routes.
//!
//! Every route is evaluated against one shared reference instant and the
//! results are ordered soonest-first.

use chrono::{Duration, NaiveDateTime};

use super::next::next_departure;
use crate::domain::{DepartureError, ScheduleRecord};

/// A concrete upcoming departure, computed for one reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedDeparture {
    /// When the departure happens, in the reference zone.
    pub occurs_at: NaiveDateTime,

    /// Time left until `occurs_at`; never negative.
    pub remaining: Duration,
}

impl ComputedDeparture {
    /// Compute the next departure of `schedule` as seen from `reference`.
    pub fn for_schedule(
        schedule: &ScheduleRecord,
        reference: NaiveDateTime,
    ) -> Result<Self, DepartureError> {
        let occurs_at = next_departure(
            schedule.first_departure,
            schedule.frequency_minutes,
            reference,
        )
        .map_err(|e| e.for_route(&schedule.route_id))?;

        Ok(Self {
            occurs_at,
            remaining: occurs_at - reference,
        })
    }
}

/// A schedule paired with its next departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedDeparture<'a> {
    pub schedule: &'a ScheduleRecord,
    pub departure: ComputedDeparture,
}

/// Rank schedules by their next departure.
///
/// Returns one entry per schedule, sorted by departure instant. Routes
/// departing at the same instant keep their input order.
///
/// # Errors
///
/// The first schedule that cannot produce a departure fails the whole
/// ranking; records are never skipped.
pub fn rank_departures(
    schedules: &[ScheduleRecord],
    reference: NaiveDateTime,
) -> Result<Vec<RankedDeparture<'_>>, DepartureError> {
    let mut ranked = schedules
        .iter()
        .map(|schedule| {
            ComputedDeparture::for_schedule(schedule, reference)
                .map(|departure| RankedDeparture { schedule, departure })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // sort_by_key is stable, which keeps input order on ties
    ranked.sort_by_key(|r| r.departure.occurs_at);

    Ok(ranked)
}
