//! Server configuration.
//!
//! Read from `BOARD_*` environment variables; anything unset takes its
//! default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

/// Largest reference-zone offset from UTC, either way (minutes).
const MAX_OFFSET_MINS: i32 = 24 * 60 - 1;

/// Errors from reading configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("{var}: cannot parse {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the departure board server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// Path to the JSON schedule file.
    pub schedules_path: PathBuf,

    /// Directory of static assets served at the root.
    pub static_dir: PathBuf,

    /// Broadcast interval per session (milliseconds).
    pub tick_ms: u64,

    /// Offset of the reference zone from UTC (minutes).
    pub utc_offset_mins: i32,

    /// Reload period for the in-memory schedule snapshot (seconds).
    /// When unset, the schedule file is read on every request.
    pub reload_secs: Option<u64>,
}

impl BoardConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("BOARD_ADDR") {
            config.addr = parse("BOARD_ADDR", value)?;
        }
        if let Some(value) = lookup("BOARD_SCHEDULES") {
            config.schedules_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("BOARD_STATIC_DIR") {
            config.static_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("BOARD_TICK_MS") {
            config.tick_ms = parse_positive("BOARD_TICK_MS", value)?;
        }
        if let Some(value) = lookup("BOARD_UTC_OFFSET_MINUTES") {
            let mins: i32 = parse("BOARD_UTC_OFFSET_MINUTES", value.clone())?;
            if !(-MAX_OFFSET_MINS..=MAX_OFFSET_MINS).contains(&mins) {
                return Err(ConfigError::Invalid {
                    var: "BOARD_UTC_OFFSET_MINUTES",
                    value,
                    reason: "offset must be within one day".into(),
                });
            }
            config.utc_offset_mins = mins;
        }
        if let Some(value) = lookup("BOARD_RELOAD_SECS") {
            config.reload_secs = Some(parse_positive("BOARD_RELOAD_SECS", value)?);
        }

        Ok(config)
    }

    /// Returns the broadcast interval as a Duration.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Returns the reload period as a Duration, if reloading is enabled.
    pub fn reload_interval(&self) -> Option<Duration> {
        self.reload_secs.map(Duration::from_secs)
    }

    /// Returns the reference zone.
    pub fn utc_offset(&self) -> FixedOffset {
        // Range checked when parsed; fall back to UTC for hand-built configs
        self.utc_offset_mins
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            schedules_path: PathBuf::from("buses.json"),
            static_dir: PathBuf::from("public"),
            tick_ms: 1000,
            utc_offset_mins: 0,
            reload_secs: None,
        }
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

fn parse_positive(var: &'static str, value: String) -> Result<u64, ConfigError> {
    let n: u64 = parse(var, value.clone())?;
    if n == 0 {
        return Err(ConfigError::Invalid {
            var,
            value,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(n)
}
