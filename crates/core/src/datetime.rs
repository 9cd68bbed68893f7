//! Chat timestamp formatting relative to today and yesterday

use crate::error::{CoreError, CoreResult};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// Naive layouts, read in the viewer's time zone
const NAIVE_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset layouts not covered by RFC 3339
const OFFSET_PATTERNS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%#z"];

/// strftime patterns and the label used for yesterday
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormat {
    /// Time of day, for today's messages
    pub time: String,
    /// Calendar date, for anything older than yesterday
    pub date: String,
    pub yesterday: String,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            time: "%H:%M".to_string(),
            date: "%-m/%-d/%Y".to_string(),
            yesterday: "Yesterday".to_string(),
        }
    }
}

impl DateFormat {
    /// Layout used by the Russian-language chat UI
    pub fn russian() -> Self {
        Self {
            time: "%H:%M".to_string(),
            date: "%d.%m.%Y".to_string(),
            yesterday: "Вчера".to_string(),
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        for pattern in [&self.time, &self.date] {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(CoreError::InvalidDateFormat {
                    format: pattern.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Parse an ISO-like timestamp into `tz`.
///
/// Timestamps with an offset keep their instant, naive date-times are local
/// to `tz` and a bare date means UTC midnight.
pub fn parse_instant<Tz: TimeZone>(input: &str, tz: &Tz) -> CoreResult<DateTime<Tz>> {
    let input = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(tz));
    }
    for pattern in OFFSET_PATTERNS {
        if let Ok(instant) = DateTime::parse_from_str(input, pattern) {
            return Ok(instant.with_timezone(tz));
        }
    }

    for pattern in NAIVE_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                // Local time skipped by a DST jump; move past the gap
                .or_else(|| {
                    tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
                        .earliest()
                })
                .ok_or_else(|| CoreError::invalid_date(input));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
        return Ok(midnight.with_timezone(tz));
    }

    Err(CoreError::invalid_date(input))
}

/// Format `input` relative to `now`, in `now`'s time zone.
///
/// Both day boundaries are inclusive: local midnight today is "today".
pub fn format_date_at<Tz>(input: &str, now: &DateTime<Tz>, format: &DateFormat) -> CoreResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let instant = parse_instant(input, &now.timezone())?;
    let shown = instant.naive_local();

    let today = now.date_naive().and_time(NaiveTime::MIN);
    let yesterday = today - TimeDelta::days(1);

    if shown >= today {
        render(&instant, &format.time)
    } else if shown >= yesterday {
        Ok(format.yesterday.clone())
    } else {
        render(&instant, &format.date)
    }
}

/// Format `input` relative to the current local time
pub fn format_date(input: &str, format: &DateFormat) -> CoreResult<String> {
    format_date_at(input, &Local::now(), format)
}

fn render<Tz>(instant: &DateTime<Tz>, pattern: &str) -> CoreResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    write!(out, "{}", instant.format(pattern)).map_err(|_| CoreError::InvalidDateFormat {
        format: pattern.to_string(),
    })?;
    Ok(out)
}
