use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;

use crate::{
    config::{ChartConfig, GroupingMode},
    utils::time::{format_duration, format_minute_of_day},
};

use super::{
    angle::{minute_to_angle, sweep_angle},
    interval::{GroupingLabels, TimeInterval},
    overlap::OverlapAnnotation,
};

/// Arcs narrower than this get no label at all.
pub const MIN_LABEL_SWEEP: f64 = 8.;
/// Arcs narrower than this only show the start hour.
pub const COMPACT_LABEL_SWEEP: f64 = 12.;
/// Arcs narrower than this only show the start time.
pub const START_ONLY_LABEL_SWEEP: f64 = 25.;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

pub const PALETTE: [Rgba; 12] = [
    Rgba::opaque(0x4e, 0x79, 0xa7),
    Rgba::opaque(0xf2, 0x8e, 0x2b),
    Rgba::opaque(0xe1, 0x57, 0x59),
    Rgba::opaque(0x76, 0xb7, 0xb2),
    Rgba::opaque(0x59, 0xa1, 0x4f),
    Rgba::opaque(0xed, 0xc9, 0x48),
    Rgba::opaque(0xb0, 0x7a, 0xa1),
    Rgba::opaque(0xff, 0x9d, 0xa7),
    Rgba::opaque(0x9c, 0x75, 0x5f),
    Rgba::opaque(0xba, 0xb0, 0xac),
    Rgba::opaque(0x1f, 0x9e, 0x89),
    Rgba::opaque(0x6a, 0x3d, 0x9a),
];

/// Same record id, same color, regardless of where the record sits in the day.
pub fn color_for_record(id: i64) -> Rgba {
    PALETTE[id.rem_euclid(PALETTE.len() as i64) as usize]
}

pub fn grouping_label(labels: &GroupingLabels, mode: GroupingMode) -> Arc<str> {
    fn or_placeholder(value: Option<&Arc<str>>, placeholder: &str) -> Arc<str> {
        match value {
            Some(v) if !v.trim().is_empty() => v.clone(),
            _ => placeholder.into(),
        }
    }

    match mode {
        GroupingMode::Individual => {
            let client = or_placeholder(Some(&labels.client), "No client");
            match labels.ticket.as_ref().filter(|t| !t.trim().is_empty()) {
                Some(ticket) => format!("{client} - {ticket}").into(),
                None => client,
            }
        }
        GroupingMode::ByTicket => or_placeholder(labels.ticket.as_ref(), "No ticket"),
        GroupingMode::ByClient => or_placeholder(Some(&labels.client), "No client"),
        GroupingMode::ByType => or_placeholder(labels.kind.as_ref(), "No type"),
        GroupingMode::ByGroup => or_placeholder(labels.group.as_ref(), "No group"),
    }
}

/// Caption drawn on the arc, reduced as the arc gets narrower.
pub fn arc_label(sweep: f64, start_minute: i64, end_minute: i64) -> String {
    if sweep < MIN_LABEL_SWEEP {
        String::new()
    } else if sweep < COMPACT_LABEL_SWEEP {
        format!("{}h", start_minute.rem_euclid(24 * 60) / 60)
    } else if sweep < START_ONLY_LABEL_SWEEP {
        format_minute_of_day(start_minute)
    } else {
        format!(
            "{} - {}",
            format_minute_of_day(start_minute),
            format_minute_of_day(end_minute)
        )
    }
}

/// Descriptor of one arc on the day dial, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AngularSegment {
    pub record_id: i64,
    pub label: String,
    pub group_label: Arc<str>,
    pub color: Rgba,
    pub start_angle_deg: f64,
    pub sweep_angle_deg: f64,
    pub start_time_text: String,
    pub end_time_text: String,
    pub tooltip_text: String,
    pub overlapped_minutes: i64,
    pub explode: bool,
}

fn tooltip(
    start_text: &str,
    end_text: &str,
    group_label: &str,
    duration_minutes: i64,
    overlapped_minutes: i64,
) -> String {
    let mut text = format!(
        "{start_text} - {end_text}\n{group_label}\nDuration: {}",
        format_duration(Duration::minutes(duration_minutes))
    );
    if overlapped_minutes > 0 {
        text += &format!(
            "\nWarning: overlaps other entries for {}",
            format_duration(Duration::minutes(overlapped_minutes))
        );
    }
    text
}

/// Builds one segment per interval, ordered by start angle. `annotations` is indexed like
/// `intervals`.
pub fn build_segments(
    intervals: &[TimeInterval],
    annotations: &[OverlapAnnotation],
    config: &ChartConfig,
) -> Vec<AngularSegment> {
    let mut segments = intervals
        .iter()
        .zip(annotations)
        .map(|(interval, annotation)| {
            let sweep = sweep_angle(interval.start_minute, interval.end_minute);
            let group_label = grouping_label(&interval.labels, config.mode);
            let start_time_text = format_minute_of_day(interval.start_minute);
            let end_time_text = format_minute_of_day(interval.end_minute);
            let tooltip_text = tooltip(
                &start_time_text,
                &end_time_text,
                &group_label,
                interval.duration_minutes(),
                annotation.overlapped_minutes,
            );

            AngularSegment {
                record_id: interval.id,
                label: arc_label(sweep, interval.start_minute, interval.end_minute),
                group_label,
                color: color_for_record(interval.id),
                start_angle_deg: minute_to_angle(interval.start_minute),
                sweep_angle_deg: sweep,
                start_time_text,
                end_time_text,
                tooltip_text,
                overlapped_minutes: annotation.overlapped_minutes,
                explode: annotation.explode && config.show_overlaps,
            }
        })
        .collect::<Vec<_>>();

    segments.sort_by(|a, b| a.start_angle_deg.total_cmp(&b.start_angle_deg));
    segments
}
