//! Cycling Activity Dashboard
//!
//! Opens the interactive dashboard, exports every table and chart, or prints
//! the period tables to stdout.

use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ridestats::analysis;
use ridestats::app::App;
use ridestats::config::{ActivityFilter, InputSource, PipelineConfig};
use ridestats::plotting::{ChartFormat, ChartStyle};
use ridestats::report::{export_report, write_summary};

#[derive(Parser, Debug)]
#[command(author, version, about = "Cycling activity dashboard", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive dashboard
    Dashboard(SourceArgs),
    /// Write every table as CSV and every chart as PNG or SVG
    Report(ReportArgs),
    /// Print the year, month and week tables
    Summary(SourceArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// JSON pipeline config; flags below override its fields
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Activity log CSV
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "prebucketed_dir")]
    input: Option<PathBuf>,

    /// Directory holding Calendar-Years/Months/Weeks.csv summaries
    #[arg(long, value_hint = ValueHint::DirPath)]
    prebucketed_dir: Option<PathBuf>,

    /// Activity label kept from the pre-bucketed summaries
    #[arg(long, requires = "prebucketed_dir")]
    activity: Option<String>,

    /// Accepted activity type (repeatable); `--type all` accepts every type
    #[arg(short = 't', long = "type")]
    types: Vec<String>,

    /// Leave rides longer than this many hours out of weekly time totals
    #[arg(long, conflicts_with = "no_time_cutoff")]
    max_ride_hours: Option<f64>,

    /// Count every ride in weekly time totals
    #[arg(long, action = ArgAction::SetTrue)]
    no_time_cutoff: bool,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Directory the report is written to
    #[arg(short, long, default_value = "report", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    /// Chart file format
    #[arg(long, value_enum, default_value_t = FormatOpt::Png)]
    format: FormatOpt,

    /// Chart width in pixels
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 400)]
    height: u32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatOpt {
    Png,
    Svg,
}

impl From<FormatOpt> for ChartFormat {
    fn from(value: FormatOpt) -> Self {
        match value {
            FormatOpt::Png => ChartFormat::Png,
            FormatOpt::Svg => ChartFormat::Svg,
        }
    }
}

impl SourceArgs {
    /// Start from the config file (or defaults) and apply the flags on top.
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(path) = &self.input {
            config.source = InputSource::ActivityLog { path: path.clone() };
        }
        if let Some(directory) = &self.prebucketed_dir {
            config.source = InputSource::Prebucketed {
                directory: directory.clone(),
                activity: self.activity.clone().unwrap_or_else(|| "Cycle".to_string()),
            };
        }
        if !self.types.is_empty() {
            config.filter = if self.types.iter().any(|t| t.eq_ignore_ascii_case("all")) {
                ActivityFilter::accept_all()
            } else {
                ActivityFilter::new(self.types.iter().cloned())
            };
        }
        if let Some(hours) = self.max_ride_hours {
            config.max_ride_hours = Some(hours);
        }
        if self.no_time_cutoff {
            config.max_ride_hours = None;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose || cfg!(feature = "dev") {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Dashboard(args) => handle_dashboard(args),
        Command::Report(args) => handle_report(args),
        Command::Summary(args) => handle_summary(args),
    }
}

fn handle_dashboard(args: SourceArgs) -> Result<()> {
    let config = args.pipeline_config()?;
    info!(source = ?config.source, "opening dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Cycling Data"),
        ..Default::default()
    };

    eframe::run_native(
        "Cycling Data",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(config)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| anyhow!("dashboard failed: {e}"))
}

fn handle_report(args: ReportArgs) -> Result<()> {
    let config = args.source.pipeline_config()?;
    let data = analysis::run(&config)?;

    let style = ChartStyle {
        width: args.width,
        height: args.height,
        ..ChartStyle::default()
    };
    let files = export_report(&data, &args.out_dir, args.format.into(), &style)
        .with_context(|| format!("writing report to {}", args.out_dir.display()))?;

    for path in files.tables.iter().chain(&files.charts) {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_summary(args: SourceArgs) -> Result<()> {
    let config = args.pipeline_config()?;
    let data = analysis::run(&config)?;

    let stdout = io::stdout();
    write_summary(&mut stdout.lock(), &data)?;
    Ok(())
}
