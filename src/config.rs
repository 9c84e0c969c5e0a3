use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    charts::ChartOptions,
    render::{ChartRenderer, JsonRenderer, SvgRenderer},
};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PLOTS_DIR: &str = "plots";

#[derive(Debug, Parser)]
#[command(
    name = "queueplot",
    version,
    about = "Aggregate concurrent-queue benchmark logs and chart them"
)]
pub struct Cli {
    /// Log filter, e.g. `info` or `queueplot=debug`; RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render one chart per kind for every (duration, batch) combination.
    Plot(PlotArgs),
    /// Print one JSON object per aggregated log.
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct PlotArgs {
    #[arg(long, env = "QUEUEPLOT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    #[arg(long, env = "QUEUEPLOT_PLOTS_DIR", default_value = DEFAULT_PLOTS_DIR)]
    pub plots_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Also chart throughput and speedup over all operations, failed ones included.
    #[arg(long)]
    pub all_ops: bool,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[arg(long, env = "QUEUEPLOT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
}

impl OutputFormat {
    pub fn renderer(self) -> Box<dyn ChartRenderer> {
        match self {
            OutputFormat::Svg => Box::new(SvgRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}

/// Settings of one report run, independent of how they were supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotConfig {
    pub data_dir: PathBuf,
    pub plots_dir: PathBuf,
    pub format: OutputFormat,
    pub charts: ChartOptions,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            plots_dir: PathBuf::from(DEFAULT_PLOTS_DIR),
            format: OutputFormat::default(),
            charts: ChartOptions::default(),
        }
    }
}

impl From<PlotArgs> for PlotConfig {
    fn from(args: PlotArgs) -> Self {
        Self {
            data_dir: args.data_dir,
            plots_dir: args.plots_dir,
            format: args.format,
            charts: ChartOptions {
                include_all_ops: args.all_ops,
            },
        }
    }
}
