pub mod chart;
pub mod render;

use std::path::PathBuf;

use anyhow::Result;
use chart::{process_chart_command, process_coverage_command, ChartCommand, CoverageCommand};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    config::load_settings,
    provider::record_storage::RecordStorageImpl,
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Workclock", version, long_about = None)]
#[command(about = "Radial day chart and overlap analysis for work-log entries", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default uses $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Display a day's entries as segments of a 24 hour dial")]
    Chart {
        #[command(flatten)]
        command: ChartCommand,
    },
    #[command(about = "Display how much of a day is actually covered by entries")]
    Coverage {
        #[command(flatten)]
        command: CoverageCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args.dir.map_or_else(create_application_default_path, Ok)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;

    let settings = load_settings(&app_dir)?;
    let provider = RecordStorageImpl::new(app_dir.join("records"))?;

    match args.commands {
        Commands::Chart { command } => process_chart_command(command, settings, provider).await,
        Commands::Coverage { command } => {
            process_coverage_command(command, settings, provider).await
        }
    }
}
