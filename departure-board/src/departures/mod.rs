//! Departure computation.
//!
//! Projects each schedule forward to its next concrete departure and ranks
//! the results. Everything here is a pure function of its inputs plus an
//! explicit reference instant.

mod clock;
mod next;
mod rank;

pub use clock::{Clock, FixedClock, SystemClock};
pub use next::next_departure;
pub use rank::{ComputedDeparture, RankedDeparture, rank_departures};
