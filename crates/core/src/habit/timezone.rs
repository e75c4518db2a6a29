//! Per-habit timezone: an IANA zone name or a fixed UTC offset.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Largest offset accepted in the `+HH:MM` notation (UTC+14 is the real-world max).
const MAX_OFFSET_HOURS: i32 = 14;

/// How far past a spring-forward gap we search for the first valid local minute.
const MAX_GAP_MINUTES: i64 = 180;

/// The timezone a habit's reset time and calendar dates are interpreted in.
///
/// Accepts IANA names (`"Europe/Berlin"`, `"UTC"`) and fixed offsets
/// (`"+05:30"`, `"UTC-08:00"`, `"GMT+9"`, `"-0330"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl HabitTimezone {
    pub const UTC: HabitTimezone = HabitTimezone::Named(Tz::UTC);

    /// Calendar date of `instant` as observed in this timezone.
    pub fn local_date(&self, instant: Timestamp) -> NaiveDate {
        match self {
            HabitTimezone::Named(tz) => instant.with_timezone(tz).date_naive(),
            HabitTimezone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// Absolute instant of a local wall-clock time in this timezone.
    ///
    /// Ambiguous times (autumn fold) resolve to the earlier instant. Times that
    /// do not exist (spring-forward gap) resolve to the first valid instant
    /// after the gap.
    pub fn resolve_local(&self, local: NaiveDateTime) -> Timestamp {
        match self {
            HabitTimezone::Named(tz) => resolve_in(tz, local),
            HabitTimezone::Fixed(offset) => resolve_in(offset, local),
        }
    }
}

fn resolve_in<Z: TimeZone>(tz: &Z, local: NaiveDateTime) -> Timestamp {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return dt.to_utc();
    }
    (1..=MAX_GAP_MINUTES)
        .find_map(|m| {
            tz.from_local_datetime(&(local + chrono::Duration::minutes(m)))
                .earliest()
        })
        .map(|dt| dt.to_utc())
        .unwrap_or_else(|| local.and_utc())
}

fn parse_fixed_offset(s: &str) -> Option<FixedOffset> {
    let rest = s
        .strip_prefix("UTC")
        .or_else(|| s.strip_prefix("GMT"))
        .unwrap_or(s);

    let (sign, digits) = if let Some(d) = rest.strip_prefix('+') {
        (1, d)
    } else if let Some(d) = rest.strip_prefix('-') {
        (-1, d)
    } else {
        return None;
    };

    let (h, m) = match digits.split_once(':') {
        Some(parts) => parts,
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };

    let is_field = |f: &str| !f.is_empty() && f.len() <= 2 && f.bytes().all(|b| b.is_ascii_digit());
    if !is_field(h) || !is_field(m) {
        return None;
    }

    let hours: i32 = h.parse().ok()?;
    let minutes: i32 = m.parse().ok()?;
    if hours > MAX_OFFSET_HOURS || minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl FromStr for HabitTimezone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CoreError::Validation("timezone must not be empty".into()));
        }
        if let Ok(tz) = s.parse::<Tz>() {
            return Ok(HabitTimezone::Named(tz));
        }
        parse_fixed_offset(s)
            .map(HabitTimezone::Fixed)
            .ok_or_else(|| CoreError::Validation(format!("unknown timezone '{s}'")))
    }
}

impl fmt::Display for HabitTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HabitTimezone::Named(tz) => f.write_str(tz.name()),
            HabitTimezone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl Default for HabitTimezone {
    fn default() -> Self {
        Self::UTC
    }
}

impl Serialize for HabitTimezone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HabitTimezone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
