use std::{fs, path::PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    PlotError,
    aggregate::aggregate_file,
    catalog::{GroupOutcome, LogIndex, SkipReason},
    charts::build_charts,
    config::PlotConfig,
    record::RunRecord,
    render::ChartRenderer,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedGroup {
    pub batch: u32,
    pub duration: u32,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub logs: usize,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedGroup>,
}

/// Aggregates every log under `config.data_dir` and writes the charts of
/// each (batch, duration) combination to `config.plots_dir`.
pub fn generate_report(
    config: &PlotConfig,
    renderer: &dyn ChartRenderer,
) -> Result<ReportSummary, PlotError> {
    fs::create_dir_all(&config.plots_dir)
        .map_err(|e| PlotError::io(format!("{}: {e}", config.plots_dir.display())))?;
    let index = LogIndex::scan(&config.data_dir)?;
    let catalog = index.catalog();
    let mut summary = ReportSummary {
        logs: index.entries().len(),
        ..ReportSummary::default()
    };

    for &batch in &catalog.batches {
        for &duration in &catalog.durations {
            let group = match index.load_group(batch, duration, &catalog)? {
                GroupOutcome::Ready(group) => group,
                GroupOutcome::Missing(reason) => {
                    warn!(batch, duration, "{reason} for batch and duration, skipping");
                    summary.skipped.push(SkippedGroup {
                        batch,
                        duration,
                        reason,
                    });
                    continue;
                }
            };
            for chart in build_charts(&group, &catalog, config.charts)? {
                let body = renderer.render(&chart)?;
                let path = config
                    .plots_dir
                    .join(format!("{}.{}", chart.name, renderer.extension()));
                fs::write(&path, body)
                    .map_err(|e| PlotError::io(format!("{}: {e}", path.display())))?;
                info!(path = %path.display(), "wrote chart");
                summary.written.push(path);
            }
        }
    }
    Ok(summary)
}

/// Aggregates every log of `data_dir`, in file name order.
pub fn summarize_runs(config: &PlotConfig) -> Result<Vec<RunRecord>, PlotError> {
    let index = LogIndex::scan(&config.data_dir)?;
    index
        .entries()
        .iter()
        .map(|entry| aggregate_file(index.dir(), &entry.file_name))
        .collect()
}
