use chrono::{DateTime, Duration, TimeZone};
use serde::Serialize;
use tracing::{debug, instrument};

/// Anything a range can be bounded by. Implemented for minute-of-day values and timestamps, the
/// merge only cares about ordering and the duration between two points.
pub trait CoveragePoint: Ord + Clone {
    fn duration_until(&self, later: &Self) -> Duration;
}

impl CoveragePoint for i64 {
    fn duration_until(&self, later: &Self) -> Duration {
        Duration::minutes(later - self)
    }
}

impl<Tz: TimeZone> CoveragePoint for DateTime<Tz> {
    fn duration_until(&self, later: &Self) -> Duration {
        later.clone() - self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoveredRange<P> {
    pub start: P,
    pub end: P,
}

impl<P: CoveragePoint> CoveredRange<P> {
    pub fn duration(&self) -> Duration {
        self.start.duration_until(&self.end)
    }
}

/// Union of a set of ranges. `total_overlap` is the time counted more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResult<P> {
    #[serde(with = "minutes_ser")]
    pub total_covered: Duration,
    #[serde(with = "minutes_ser")]
    pub total_overlap: Duration,
    pub merged_ranges: Vec<CoveredRange<P>>,
}

impl<P> CoverageResult<P> {
    pub fn empty() -> Self {
        Self {
            total_covered: Duration::zero(),
            total_overlap: Duration::zero(),
            merged_ranges: vec![],
        }
    }
}

/// Merges ranges into the minimal ordered set of non-overlapping ranges. Ranges that touch are
/// merged as well. Reversed ranges are ignored.
#[instrument(skip_all)]
pub fn merge_coverage<P: CoveragePoint>(
    ranges: impl IntoIterator<Item = (P, P)>,
) -> CoverageResult<P> {
    let mut ranges = ranges
        .into_iter()
        .filter(|(start, end)| {
            let valid = start <= end;
            if !valid {
                debug!("Ignoring reversed range in coverage");
            }
            valid
        })
        .map(|(start, end)| CoveredRange { start, end })
        .collect::<Vec<_>>();

    if ranges.is_empty() {
        return CoverageResult::empty();
    }

    let total_duration_sum = ranges
        .iter()
        .fold(Duration::zero(), |sum, range| sum + range.duration());

    ranges.sort_by(|a, b| a.start.cmp(&b.start));

    let mut ranges = ranges.into_iter();
    let mut merged = Vec::new();
    let mut current = match ranges.next() {
        Some(first) => first,
        None => return CoverageResult::empty(),
    };
    for next in ranges {
        if next.start <= current.end {
            if next.end > current.end {
                current.end = next.end;
            }
        } else {
            merged.push(std::mem::replace(&mut current, next));
        }
    }
    merged.push(current);

    let total_covered = merged
        .iter()
        .fold(Duration::zero(), |sum, range| sum + range.duration());
    let total_overlap = (total_duration_sum - total_covered).max(Duration::zero());

    CoverageResult {
        total_covered,
        total_overlap,
        merged_ranges: merged,
    }
}

mod minutes_ser {
    use chrono::Duration;
    use serde::Serializer;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_minutes())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use super::{merge_coverage, CoveredRange};

    #[test]
    fn merges_overlapping_and_keeps_gaps() {
        let result = merge_coverage([(480i64, 540), (510, 570), (600, 630)]);

        assert_eq!(
            result.merged_ranges,
            vec![
                CoveredRange { start: 480, end: 570 },
                CoveredRange { start: 600, end: 630 },
            ]
        );
        assert_eq!(result.total_covered, Duration::minutes(120));
        assert_eq!(result.total_overlap, Duration::minutes(30));
    }

    #[test]
    fn empty_input_is_zero() {
        let result = merge_coverage(Vec::<(i64, i64)>::new());
        assert_eq!(result.total_covered, Duration::zero());
        assert_eq!(result.total_overlap, Duration::zero());
        assert!(result.merged_ranges.is_empty());
    }

    #[test]
    fn unsorted_and_contained_ranges() {
        let result = merge_coverage([(700i64, 760), (480, 720), (500, 510)]);
        assert_eq!(
            result.merged_ranges,
            vec![CoveredRange { start: 480, end: 760 }]
        );
        assert_eq!(result.total_covered, Duration::minutes(280));
        assert_eq!(result.total_overlap, Duration::minutes(30));
    }

    #[test]
    fn touching_ranges_merge_without_overlap() {
        let result = merge_coverage([(480i64, 540), (540, 600)]);
        assert_eq!(result.merged_ranges.len(), 1);
        assert_eq!(result.total_overlap, Duration::zero());
    }

    #[test]
    fn works_with_timestamps() {
        let at = |h, m| {
            Utc.from_utc_datetime(&NaiveDateTime::new(
                NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
                NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            ))
        };
        let result = merge_coverage([(at(8, 0), at(9, 0)), (at(8, 30), at(9, 30))]);
        assert_eq!(result.total_covered, Duration::minutes(90));
        assert_eq!(result.total_overlap, Duration::minutes(30));
        assert_eq!(result.merged_ranges[0].end, at(9, 30));
    }
}
