//! Schedule records: a route's daily recurrence definition.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DepartureTime;

/// Opaque route identifier, e.g. a line number.
///
/// Schedule files may write the identifier as any JSON number (negative
/// and fractional included) or a string. Either form is kept as written so
/// it can be echoed back unchanged.
///
/// # Examples
///
/// ```
/// use departure_board::domain::RouteId;
///
/// let id: RouteId = serde_json::from_str("12").unwrap();
/// assert_eq!(id.to_string(), "12");
///
/// let id: RouteId = serde_json::from_str("\"N1\"").unwrap();
/// assert_eq!(id.to_string(), "N1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteId {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteId::Number(n) => write!(f, "{n}"),
            RouteId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RouteId {
    fn from(n: u64) -> Self {
        RouteId::Number(n.into())
    }
}

impl From<serde_json::Number> for RouteId {
    fn from(n: serde_json::Number) -> Self {
        RouteId::Number(n)
    }
}

impl From<&str> for RouteId {
    fn from(s: &str) -> Self {
        RouteId::Text(s.to_string())
    }
}

/// A route's recurrence definition, loaded from the schedule source.
///
/// `frequency_minutes` is kept as written; a non-positive value is rejected
/// when the record is used to compute a departure, not when it is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    #[serde(rename = "busNumber")]
    pub route_id: RouteId,

    #[serde(rename = "startPoint")]
    pub origin: String,

    #[serde(rename = "endPoint")]
    pub destination: String,

    /// First departure of each service day.
    #[serde(rename = "firstDepartureTime")]
    pub first_departure: DepartureTime,

    /// Interval between consecutive departures within a day.
    #[serde(rename = "frequencyMinutes")]
    pub frequency_minutes: i64,
}

impl ScheduleRecord {
    /// Create a new schedule record.
    pub fn new(
        route_id: impl Into<RouteId>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        first_departure: DepartureTime,
        frequency_minutes: i64,
    ) -> Self {
        Self {
            route_id: route_id.into(),
            origin: origin.into(),
            destination: destination.into(),
            first_departure,
            frequency_minutes,
        }
    }
}
