//! Wire format for ranked departures.
//!
//! The pull endpoint and the push feed send the same JSON array.

use serde::Serialize;

use crate::departures::RankedDeparture;
use crate::domain::{ScheduleRecord, format_hms};

/// One route in the ranked departure list.
///
/// The schedule's own fields are echoed at the top level alongside
/// `nextDeparture`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureResult {
    #[serde(flatten)]
    pub schedule: ScheduleRecord,

    pub next_departure: NextDepartureResult,
}

/// The computed next departure of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextDepartureResult {
    /// Departure date, YYYY-MM-DD
    pub date: String,

    /// Departure time, HH:MM:SS
    pub time: String,

    /// Time left until departure, HH:MM:SS
    pub remaining: String,
}

impl DepartureResult {
    /// Create from a ranked departure.
    pub fn from_ranked(ranked: &RankedDeparture<'_>) -> Self {
        let occurs_at = ranked.departure.occurs_at;
        Self {
            schedule: ranked.schedule.clone(),
            next_departure: NextDepartureResult {
                date: occurs_at.format("%Y-%m-%d").to_string(),
                time: occurs_at.format("%H:%M:%S").to_string(),
                remaining: format_hms(ranked.departure.remaining),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::departures::ComputedDeparture;
    use crate::domain::DepartureTime;
    use chrono::NaiveDate;

    #[test]
    fn serializes_to_board_shape() {
        let schedule = ScheduleRecord::new(
            12,
            "Depot",
            "Harbour",
            DepartureTime::from_hm(8, 0).unwrap(),
            30,
        );
        let reference = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 15, 1)
            .unwrap();
        let ranked = RankedDeparture {
            schedule: &schedule,
            departure: ComputedDeparture::for_schedule(&schedule, reference).unwrap(),
        };

        let value = serde_json::to_value(DepartureResult::from_ranked(&ranked)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "busNumber": 12,
                "startPoint": "Depot",
                "endPoint": "Harbour",
                "firstDepartureTime": "08:00",
                "frequencyMinutes": 30,
                "nextDeparture": {
                    "date": "2024-03-15",
                    "time": "08:30:00",
                    "remaining": "00:14:59"
                }
            })
        );
    }
}
