//! The chart engine. A day's records go through the following stages:
//!  - [interval] turns raw `HH:mm` text into validated minute ranges.
//!  - [overlap] sweeps over the ranges to find time shared between entries.
//!  - [coverage] merges the ranges into the time actually covered.
//!  - [angle] and [segments] place every range on a 24 hour dial.
//!
//! Every pass starts from scratch, nothing is kept between calls to [compute_day].

pub mod angle;
pub mod coverage;
pub mod interval;
pub mod overlap;
pub mod segments;

use chrono::{DateTime, Duration, Local, NaiveDate};
use coverage::{merge_coverage, CoverageResult};
use interval::{normalize_records, TimeInterval};
use overlap::analyze_overlaps;
use segments::{build_segments, AngularSegment};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{config::ChartConfig, provider::entities::WorkRecord};

/// Result of one computation pass over a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayChart {
    pub date: NaiveDate,
    pub config: ChartConfig,
    pub segments: Vec<AngularSegment>,
    pub total_overlapped_minutes: i64,
    /// Coverage of the day in minutes. Ranges past midnight end after minute 1440.
    pub coverage: CoverageResult<i64>,
}

impl DayChart {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn total_overlap(&self) -> Duration {
        Duration::minutes(self.total_overlapped_minutes)
    }
}

/// Coverage of already normalized intervals.
pub fn interval_coverage(intervals: &[TimeInterval]) -> CoverageResult<i64> {
    merge_coverage(
        intervals
            .iter()
            .map(|interval| (interval.start_minute, interval.end_minute)),
    )
}

/// Runs the whole pipeline for `date`. `now` decides where entries without an end stop when
/// `date` is today.
#[instrument(skip(records, now), fields(records = records.len()))]
pub fn compute_day(
    records: &[WorkRecord],
    date: NaiveDate,
    config: ChartConfig,
    now: DateTime<Local>,
) -> DayChart {
    let intervals = normalize_records(records, date, now);
    let overlaps = analyze_overlaps(&intervals);
    let coverage = interval_coverage(&intervals);
    let segments = build_segments(&intervals, &overlaps.annotations, &config);

    debug!(
        "Computed {} segments, {} minutes overlapped, {} covered",
        segments.len(),
        overlaps.total_overlapped_minutes,
        coverage.total_covered.num_minutes()
    );

    DayChart {
        date,
        config,
        segments,
        total_overlapped_minutes: overlaps.total_overlapped_minutes,
        coverage,
    }
}


#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

    use super::{compute_day, interval_coverage, overlap::analyze_overlaps, test_support::interval};
    use crate::{
        config::{ChartConfig, GroupingMode},
        engine::coverage::CoveredRange,
        provider::entities::WorkRecord,
        utils::logging::TEST_LOGGING,
    };

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

    fn test_now() -> DateTime<Local> {
        Local
            .from_local_datetime(&NaiveDateTime::new(
                TEST_DATE,
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            ))
            .earliest()
            .unwrap()
    }

    fn scenario_records() -> Vec<WorkRecord> {
        vec![
            WorkRecord::new(1, "08:00", Some("09:00"), "Acme").with_ticket("A"),
            WorkRecord::new(2, "08:30", Some("09:30"), "Acme").with_ticket("B"),
            WorkRecord::new(3, "10:00", Some("10:30"), "Initech").with_ticket("C"),
        ]
    }

    #[test]
    fn overlap_and_coverage_agree() {
        *TEST_LOGGING;
        let chart = compute_day(
            &scenario_records(),
            TEST_DATE,
            ChartConfig::default(),
            test_now(),
        );

        assert_eq!(chart.total_overlapped_minutes, 30);
        assert_eq!(chart.coverage.total_covered, Duration::minutes(120));
        assert_eq!(chart.coverage.total_overlap, Duration::minutes(30));
        assert_eq!(
            chart.coverage.merged_ranges,
            vec![
                CoveredRange { start: 480, end: 570 },
                CoveredRange { start: 600, end: 630 },
            ]
        );

        let by_id = |id| {
            chart
                .segments
                .iter()
                .find(|s| s.record_id == id)
                .unwrap()
                .clone()
        };
        assert_eq!(by_id(1).overlapped_minutes, 30);
        assert_eq!(by_id(2).overlapped_minutes, 30);
        assert_eq!(by_id(3).overlapped_minutes, 0);
        assert!(by_id(1).explode && by_id(2).explode);
        assert!(!by_id(3).explode);
        assert_eq!(by_id(1).start_angle_deg, 210.);
        assert_eq!(by_id(3).start_angle_deg, 240.);
    }

    #[test]
    fn sweep_total_matches_coverage_for_pairwise_overlaps() {
        let sets = [
            vec![interval(1, 480, 540), interval(2, 510, 570), interval(3, 600, 630)],
            vec![interval(1, 0, 1440), interval(2, 600, 700)],
            vec![interval(1, 1380, 1470), interval(2, 1440, 1500), interval(3, 60, 90)],
            vec![interval(1, 100, 200), interval(2, 150, 300), interval(3, 250, 400)],
            vec![interval(1, 100, 200), interval(2, 200, 300)],
            vec![],
        ];
        for intervals in sets {
            let sweep = analyze_overlaps(&intervals);
            let coverage = interval_coverage(&intervals);
            assert_eq!(
                Duration::minutes(sweep.total_overlapped_minutes),
                coverage.total_overlap,
                "{intervals:?}"
            );
        }
    }

    #[test]
    fn pipeline_is_idempotent() {
        let records = scenario_records();
        let config = ChartConfig::default().with_mode(GroupingMode::ByClient);
        let first = compute_day(&records, TEST_DATE, config, test_now());
        let second = compute_day(&records, TEST_DATE, config, test_now());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_day_is_an_explicit_empty_chart() {
        let chart = compute_day(&[], TEST_DATE, ChartConfig::default(), test_now());
        assert!(chart.is_empty());
        assert_eq!(chart.total_overlap(), Duration::zero());
        assert_eq!(chart.coverage.total_covered, Duration::zero());
        assert!(chart.coverage.merged_ranges.is_empty());
    }

    #[test]
    fn grouping_mode_changes_labels_only() {
        let records = scenario_records();
        let individual = compute_day(&records, TEST_DATE, ChartConfig::default(), test_now());
        let by_client = compute_day(
            &records,
            TEST_DATE,
            ChartConfig::default().with_mode(GroupingMode::ByClient),
            test_now(),
        );

        assert_eq!(&*individual.segments[0].group_label, "Acme - A");
        assert_eq!(&*by_client.segments[0].group_label, "Acme");
        for (a, b) in individual.segments.iter().zip(&by_client.segments) {
            assert_eq!(a.start_angle_deg, b.start_angle_deg);
            assert_eq!(a.color, b.color);
        }
    }
}
