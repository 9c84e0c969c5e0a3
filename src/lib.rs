//! Aggregation and charting of concurrent-queue benchmark logs.
//! Run `cargo bench` to measure log aggregation with Criterion.

pub mod aggregate;
pub mod bench_utils;
pub mod catalog;
pub mod charts;
pub mod config;
pub mod errors;
pub mod filename;
pub mod record;
pub mod render;
pub mod report;

pub use crate::aggregate::{aggregate_file, aggregate_log};
pub use crate::catalog::{LogIndex, ParameterCatalog, RunGroup};
pub use crate::charts::{Chart, ChartKind, ChartOptions};
pub use crate::config::{OutputFormat, PlotConfig};
pub use crate::errors::PlotError;
pub use crate::filename::RunIdentity;
pub use crate::record::{OpCounts, RunRecord, order_by_threads};
pub use crate::render::{ChartRenderer, JsonRenderer, SvgRenderer};
pub use crate::report::{ReportSummary, generate_report, summarize_runs};
