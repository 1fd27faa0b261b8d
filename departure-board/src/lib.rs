//! Live departure board server.
//!
//! Publishes a continuously refreshed ranking of upcoming departures,
//! derived from daily recurring schedules, to any number of connected
//! clients.

pub mod board;
pub mod config;
pub mod departures;
pub mod domain;
pub mod schedules;
pub mod sessions;
pub mod web;
