use chrono::{Duration, NaiveDate};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// This is the standard way of converting a date to a record file name in workclock.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats a minute value as `HH:mm`. Values past midnight wrap into the next day.
pub fn format_minute_of_day(minute: i64) -> String {
    let minute = minute.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Formats a duration as `Xh Ym`. The hour part is omitted when zero and the minute part is
/// omitted for whole hours.
pub fn format_duration(v: Duration) -> String {
    let hours = v.num_hours();
    let minutes = v.num_minutes() % 60;
    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::{format_duration, format_minute_of_day};

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::zero()), "0m");
        assert_eq!(format_duration(Duration::minutes(30)), "30m");
        assert_eq!(format_duration(Duration::minutes(120)), "2h");
        assert_eq!(format_duration(Duration::minutes(135)), "2h 15m");
    }

    #[test]
    fn minute_formatting_wraps_past_midnight() {
        assert_eq!(format_minute_of_day(0), "00:00");
        assert_eq!(format_minute_of_day(1410), "23:30");
        assert_eq!(format_minute_of_day(1470), "00:30");
    }
}
