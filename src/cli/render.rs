use std::io::Write;

use ansi_term::Colour;
use anyhow::Result;

use crate::{
    engine::{segments::AngularSegment, DayChart},
    utils::time::{format_duration, format_minute_of_day},
};

/// Consumer of computed charts.
pub trait Renderer {
    fn render(&mut self, chart: &DayChart) -> Result<()>;
}

/// Prints one line per segment with a colored swatch, followed by the day totals.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn render_segment(&mut self, segment: &AngularSegment) -> Result<()> {
        let swatch = Colour::RGB(segment.color.r, segment.color.g, segment.color.b).paint("██");
        writeln!(
            self.out,
            "{swatch} {}-{}\t{:>6.1}°\t{:>5.1}°\t{}\t{}{}",
            segment.start_time_text,
            segment.end_time_text,
            segment.start_angle_deg,
            segment.sweep_angle_deg,
            segment.group_label,
            segment.label,
            if segment.explode { "\t[overlap]" } else { "" }
        )?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, chart: &DayChart) -> Result<()> {
        if chart.is_empty() {
            writeln!(self.out, "No data for {}", chart.date)?;
            return Ok(());
        }

        for segment in &chart.segments {
            self.render_segment(segment)?;
        }
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Entries: {}\tCovered: {}\tOverlapping: {}",
            chart.segments.len(),
            format_duration(chart.coverage.total_covered),
            format_duration(chart.total_overlap())
        )?;
        Ok(())
    }
}

/// The "time actually covered" report.
pub struct CoverageReport<W: Write> {
    out: W,
}

impl<W: Write> CoverageReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for CoverageReport<W> {
    fn render(&mut self, chart: &DayChart) -> Result<()> {
        let coverage = &chart.coverage;
        if coverage.merged_ranges.is_empty() {
            writeln!(self.out, "No data for {}", chart.date)?;
            return Ok(());
        }

        writeln!(
            self.out,
            "Time actually covered on {}: {}",
            chart.date,
            format_duration(coverage.total_covered)
        )?;
        for range in &coverage.merged_ranges {
            writeln!(
                self.out,
                "  {} - {}\t{}",
                format_minute_of_day(range.start),
                format_minute_of_day(range.end),
                format_duration(range.duration())
            )?;
        }
        writeln!(
            self.out,
            "Counted more than once: {}",
            format_duration(coverage.total_overlap)
        )?;
        Ok(())
    }
}

pub struct JsonRenderer<W: Write> {
    out: W,
    coverage_only: bool,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            coverage_only: false,
        }
    }

    pub fn coverage_only(out: W) -> Self {
        Self {
            out,
            coverage_only: true,
        }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, chart: &DayChart) -> Result<()> {
        if self.coverage_only {
            serde_json::to_writer_pretty(&mut self.out, &chart.coverage)?;
        } else {
            serde_json::to_writer_pretty(&mut self.out, chart)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}
