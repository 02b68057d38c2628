use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};
use tracing::{debug, warn};

use crate::{provider::entities::WorkRecord, utils::time::MINUTES_PER_DAY};

/// Minute used when an entry on a past or future day has no end time (23:59).
pub const END_OF_DAY_MINUTE: i64 = MINUTES_PER_DAY - 1;

/// Ends before this minute that are not after the start are read as continuing past midnight.
pub const MIDDAY_MINUTE: i64 = 12 * 60;

/// Result of reading `HH:mm` text. Malformed text is not an error: it is treated as midnight so
/// that one bad entry doesn't abort the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedMinute {
    Valid(i64),
    Malformed,
}

impl ParsedMinute {
    pub fn minutes(self) -> i64 {
        match self {
            ParsedMinute::Valid(v) => v,
            ParsedMinute::Malformed => 0,
        }
    }
}

pub fn parse_minute_of_day(text: &str) -> ParsedMinute {
    let Some((hours, minutes)) = text.trim().split_once(':') else {
        return ParsedMinute::Malformed;
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours) || !digits(minutes) {
        return ParsedMinute::Malformed;
    }
    match (hours.parse::<i64>(), minutes.parse::<i64>()) {
        (Ok(h), Ok(m)) if (0..24).contains(&h) && (0..60).contains(&m) => {
            ParsedMinute::Valid(h * 60 + m)
        }
        _ => ParsedMinute::Malformed,
    }
}

/// Attributes a segment can be labelled by. Copied from the originating record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingLabels {
    pub client: Arc<str>,
    pub ticket: Option<Arc<str>>,
    pub kind: Option<Arc<str>>,
    pub group: Option<Arc<str>>,
}

impl From<&WorkRecord> for GroupingLabels {
    fn from(record: &WorkRecord) -> Self {
        Self {
            client: record.client.clone(),
            ticket: record.ticket.clone(),
            kind: record.kind.clone(),
            group: record.group.clone(),
        }
    }
}

/// A validated entry for one computation pass. `end_minute` is always greater than
/// `start_minute` and goes past 1440 when the entry continues into the next day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInterval {
    pub id: i64,
    pub start_minute: i64,
    pub end_minute: i64,
    pub labels: GroupingLabels,
}

impl TimeInterval {
    pub fn duration_minutes(&self) -> i64 {
        self.end_minute - self.start_minute
    }
}

/// Turns raw records into valid intervals. `now` decides what an open entry on the anchor date
/// ends at; entries with a non-positive duration are dropped.
pub fn normalize_records(
    records: &[WorkRecord],
    anchor: NaiveDate,
    now: DateTime<Local>,
) -> Vec<TimeInterval> {
    let open_end = if anchor == now.date_naive() {
        minute_of(now.time())
    } else {
        END_OF_DAY_MINUTE
    };

    records
        .iter()
        .filter_map(|record| normalize_record(record, open_end))
        .collect()
}

fn normalize_record(record: &WorkRecord, open_end: i64) -> Option<TimeInterval> {
    let start = read_minute(record.id, &record.start_time);
    let mut end = match record.end_time.as_deref() {
        Some(text) => read_minute(record.id, text),
        None => open_end,
    };

    if end <= start && end < MIDDAY_MINUTE {
        end += MINUTES_PER_DAY;
    }

    if end - start <= 0 {
        debug!(
            "Dropping record {} with non-positive duration {start}..{end}",
            record.id
        );
        return None;
    }

    Some(TimeInterval {
        id: record.id,
        start_minute: start,
        end_minute: end,
        labels: record.into(),
    })
}

fn read_minute(id: i64, text: &str) -> i64 {
    let parsed = parse_minute_of_day(text);
    if parsed == ParsedMinute::Malformed {
        warn!("Record {id} has malformed time {text:?}, treating it as midnight");
    }
    parsed.minutes()
}

fn minute_of(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}
