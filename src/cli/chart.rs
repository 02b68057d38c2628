use std::{fmt::Display, io};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    config::{ChartConfig, GroupingMode},
    engine::DayChart,
    provider::RecordProvider,
    session::ChartSession,
    utils::clock::DefaultClock,
};

use super::{
    render::{CoverageReport, JsonRenderer, Renderer, TerminalRenderer},
    Args,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct DaySelection {
    #[arg(
        long,
        short,
        help = "Day to show. Examples are \"today\", \"yesterday\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Debug, Parser)]
pub struct ChartCommand {
    #[command(flatten)]
    day: DaySelection,
    #[arg(short, long, help = "Attribute segments are labelled by. Defaults to settings")]
    mode: Option<GroupingMode>,
    #[arg(long, help = "Don't mark overlapping segments")]
    hide_overlaps: bool,
    #[arg(long, help = "Print the chart as json")]
    json: bool,
}

#[derive(Debug, Parser)]
pub struct CoverageCommand {
    #[command(flatten)]
    day: DaySelection,
    #[arg(long, help = "Print the coverage as json")]
    json: bool,
}

/// Command to process `chart` command. Prints every entry of the day as a dial segment.
pub async fn process_chart_command(
    ChartCommand {
        day,
        mode,
        hide_overlaps,
        json,
    }: ChartCommand,
    settings: ChartConfig,
    provider: impl RecordProvider,
) -> Result<()> {
    let date = parse_day(day, Local::now())?;
    let mut config = settings;
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }
    if hide_overlaps {
        config = config.with_show_overlaps(false);
    }

    let chart = load_chart(provider, date, config).await?;

    let stdout = io::stdout().lock();
    if json {
        JsonRenderer::new(stdout).render(&chart)
    } else {
        TerminalRenderer::new(stdout).render(&chart)
    }
}

/// Command to process `coverage` command. Prints merged ranges and the time actually covered.
pub async fn process_coverage_command(
    CoverageCommand { day, json }: CoverageCommand,
    settings: ChartConfig,
    provider: impl RecordProvider,
) -> Result<()> {
    let date = parse_day(day, Local::now())?;
    let chart = load_chart(provider, date, settings).await?;

    let stdout = io::stdout().lock();
    if json {
        JsonRenderer::coverage_only(stdout).render(&chart)
    } else {
        CoverageReport::new(stdout).render(&chart)
    }
}

async fn load_chart(
    provider: impl RecordProvider,
    date: NaiveDate,
    config: ChartConfig,
) -> Result<DayChart> {
    let session = ChartSession::new(provider, Box::new(DefaultClock), date, config);
    match session.refresh().await?.chart() {
        Some(chart) => Ok(chart.as_ref().clone()),
        // Nothing else drives this session.
        None => Err(anyhow!("Chart computation for {date} was superseded")),
    }
}

fn parse_day(
    DaySelection { date, date_style }: DaySelection,
    now: DateTime<Local>,
) -> Result<NaiveDate> {
    let dialect: chrono_english::Dialect = date_style.into();
    match date.map(|s| parse_date_string(&s, now, dialect)) {
        Some(Ok(v)) => Ok(v.date_naive()),
        Some(Err(e)) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {e}"),
            )
            .into()),
        None => Ok(now.date_naive()),
    }
}
