use std::collections::BTreeSet;

use tracing::{instrument, trace};

use super::interval::TimeInterval;

/// How much of an interval ran alongside at least one other interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapAnnotation {
    /// Sum of every overlapped window this interval took part in. An interval running next to
    /// two others at once gets credited for both, so this measures exposure rather than wall time.
    pub overlapped_minutes: i64,
    pub explode: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlapReport {
    pub total_overlapped_minutes: i64,
    /// Indexed like the analyzed intervals.
    pub annotations: Vec<OverlapAnnotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Start,
    End,
}

#[derive(Debug, Clone, Copy)]
struct BoundaryEvent {
    minute: i64,
    kind: EventKind,
    interval: usize,
}

/// Sweep-line over interval boundaries. Any window in which two or more intervals are active
/// counts once towards the day total and once for each active interval.
/// The day total is therefore the wall-clock time covered by at least two intervals, not the
/// number of redundant layers.
#[instrument(skip_all, fields(intervals = intervals.len()))]
pub fn analyze_overlaps(intervals: &[TimeInterval]) -> OverlapReport {
    let mut events = Vec::with_capacity(intervals.len() * 2);
    for (index, interval) in intervals.iter().enumerate() {
        events.push(BoundaryEvent {
            minute: interval.start_minute,
            kind: EventKind::Start,
            interval: index,
        });
        events.push(BoundaryEvent {
            minute: interval.end_minute,
            kind: EventKind::End,
            interval: index,
        });
    }
    // Stable, so coincident events keep insertion order.
    events.sort_by_key(|event| event.minute);

    let mut annotations = vec![OverlapAnnotation::default(); intervals.len()];
    let mut total_overlapped_minutes = 0;
    let mut active = BTreeSet::<usize>::new();
    let mut previous_minute = events.first().map_or(0, |event| event.minute);

    for event in events {
        if active.len() >= 2 {
            let window = event.minute - previous_minute;
            trace!(
                "Window {previous_minute}..{} shared by {}",
                event.minute,
                active.len()
            );
            total_overlapped_minutes += window;
            for index in &active {
                annotations[*index].overlapped_minutes += window;
            }
        }

        match event.kind {
            EventKind::Start => active.insert(event.interval),
            EventKind::End => active.remove(&event.interval),
        };
        previous_minute = event.minute;
    }

    for annotation in &mut annotations {
        annotation.explode = annotation.overlapped_minutes > 0;
    }

    OverlapReport {
        total_overlapped_minutes,
        annotations,
    }
}
