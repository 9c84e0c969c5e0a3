//! Chart model handed to a [`crate::render::ChartRenderer`]: one panel per
//! pattern, one series per program, x = thread count.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    PlotError,
    catalog::{ParameterCatalog, RunGroup},
    filename::{CAS_PROGRAM, SEQUENTIAL_PROGRAM},
    record::RunRecord,
};

pub const PALETTE: [&str; 12] = [
    "#EA558F", "#F39345", "#FEC927", "#9BC437", "#00AD91", "#00ADC1", "#0084C2", "#006699",
    "#685DA4", "#9A5A9F", "#BD4492", "#CB2649",
];

/// First palette slot used for the per-pattern CAS series.
const CAS_COLOR_OFFSET: usize = 5;

pub fn palette_color(idx: usize) -> &'static str {
    PALETTE[idx % PALETTE.len()]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Throughput,
    ThroughputAll,
    Speedup,
    SpeedupAll,
    DequeueFails,
    FreelistInserts,
    FreelistMax,
    CasSuccess,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    Log,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        ChartKind::Throughput,
        ChartKind::ThroughputAll,
        ChartKind::Speedup,
        ChartKind::SpeedupAll,
        ChartKind::DequeueFails,
        ChartKind::FreelistInserts,
        ChartKind::FreelistMax,
        ChartKind::CasSuccess,
    ];

    pub fn stem(self) -> &'static str {
        match self {
            ChartKind::Throughput => "throughput",
            ChartKind::ThroughputAll => "throughput_all",
            ChartKind::Speedup => "speedup",
            ChartKind::SpeedupAll => "speedup_all",
            ChartKind::DequeueFails => "deq_fails",
            ChartKind::FreelistInserts => "freelist_insert",
            ChartKind::FreelistMax => "freelist_max",
            ChartKind::CasSuccess => "cas_succ",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            ChartKind::Throughput => "Throughput [succ. ops / s]",
            ChartKind::ThroughputAll => "Throughput [ops / s]",
            ChartKind::Speedup => "Speedup",
            ChartKind::SpeedupAll => "Speedup (all ops)",
            ChartKind::DequeueFails => "Dequeue fails",
            ChartKind::FreelistInserts => "Freelist inserts",
            ChartKind::FreelistMax => "Freelist max length",
            ChartKind::CasSuccess => "CAS success rate",
        }
    }

    pub fn y_scale(self) -> AxisScale {
        match self {
            ChartKind::DequeueFails => AxisScale::Linear,
            _ => AxisScale::Log,
        }
    }

    pub fn has_baseline_line(self) -> bool {
        matches!(self, ChartKind::Throughput | ChartKind::ThroughputAll)
    }

    /// Kinds counting failed operations too are opt-in.
    pub fn is_all_ops(self) -> bool {
        matches!(self, ChartKind::ThroughputAll | ChartKind::SpeedupAll)
    }

    pub fn file_stem(self, duration: u32, batch: u32) -> String {
        format!("{}_t{duration}_b{batch}", self.stem())
    }

    fn value(self, record: &RunRecord, baseline: &RunRecord) -> Result<f64, PlotError> {
        match self {
            ChartKind::Throughput => Ok(record.throughput()),
            ChartKind::ThroughputAll => Ok(record.throughput_all()),
            ChartKind::Speedup => record.speedup(baseline),
            ChartKind::SpeedupAll => record.speedup_all(baseline),
            ChartKind::DequeueFails => Ok(record.deq_fail),
            ChartKind::FreelistInserts => Ok(record.freelist_insert),
            ChartKind::FreelistMax => Ok(record.freelist_max as f64),
            ChartKind::CasSuccess => record.cas_success_rate(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChartOptions {
    pub include_all_ops: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub points: Vec<Point>,
}

/// Horizontal line at a constant value, drawn for the baseline program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub label: String,
    pub color: String,
    pub y: f64,
    pub x_from: f64,
    pub x_to: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: Option<String>,
    pub reference: Option<ReferenceLine>,
    pub series: Vec<Series>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub x_range: (f64, f64),
    pub panels: Vec<Panel>,
}

/// Builds every enabled chart of one (batch, duration) group.
pub fn build_charts(
    group: &RunGroup,
    catalog: &ParameterCatalog,
    options: ChartOptions,
) -> Result<Vec<Chart>, PlotError> {
    let mut charts = Vec::new();
    for kind in ChartKind::ALL {
        if kind.is_all_ops() && !options.include_all_ops {
            continue;
        }
        let chart = match kind {
            ChartKind::CasSuccess => {
                if !group.has_program(CAS_PROGRAM) {
                    warn!(
                        batch = group.batch,
                        duration = group.duration,
                        "no {CAS_PROGRAM} logfiles, skipping CAS success chart"
                    );
                    continue;
                }
                build_cas_chart(group, catalog)?
            }
            _ => build_pattern_chart(kind, group, catalog)?,
        };
        charts.push(chart);
    }
    Ok(charts)
}

pub fn build_pattern_chart(
    kind: ChartKind,
    group: &RunGroup,
    catalog: &ParameterCatalog,
) -> Result<Chart, PlotError> {
    let x_to = f64::from(catalog.max_threads());
    let reference = if kind.has_baseline_line() {
        Some(ReferenceLine {
            label: SEQUENTIAL_PROGRAM.to_string(),
            color: palette_color(0).to_string(),
            y: kind.value(&group.baseline, &group.baseline)?,
            x_from: 1.0,
            x_to,
        })
    } else {
        None
    };
    let mut panels = Vec::with_capacity(catalog.patterns.len());
    for pattern in &catalog.patterns {
        let series = catalog
            .programs
            .iter()
            .enumerate()
            .map(|(idx, program)| {
                let records = group.records(program, pattern);
                Ok(Series {
                    label: program.clone(),
                    color: palette_color(idx + 1).to_string(),
                    points: points(kind, records, &group.baseline)?,
                })
            })
            .collect::<Result<Vec<_>, PlotError>>()?;
        panels.push(Panel {
            title: Some(format!("Pattern: {pattern}")),
            reference: reference.clone(),
            series,
        });
    }
    Ok(chart(kind, group, x_to, panels))
}

/// Single panel for the CAS program with one series per pattern.
pub fn build_cas_chart(group: &RunGroup, catalog: &ParameterCatalog) -> Result<Chart, PlotError> {
    let kind = ChartKind::CasSuccess;
    let x_to = f64::from(catalog.max_threads());
    let series = catalog
        .patterns
        .iter()
        .enumerate()
        .map(|(idx, pattern)| {
            Ok(Series {
                label: pattern.clone(),
                color: palette_color(CAS_COLOR_OFFSET + idx).to_string(),
                points: points(kind, group.records(CAS_PROGRAM, pattern), &group.baseline)?,
            })
        })
        .collect::<Result<Vec<_>, PlotError>>()?;
    let panels = vec![Panel {
        title: None,
        reference: None,
        series,
    }];
    Ok(chart(kind, group, x_to, panels))
}

fn points(
    kind: ChartKind,
    records: &[RunRecord],
    baseline: &RunRecord,
) -> Result<Vec<Point>, PlotError> {
    records
        .iter()
        .map(|record| {
            Ok(Point {
                x: f64::from(record.threads()),
                y: kind.value(record, baseline)?,
            })
        })
        .collect()
}

fn chart(kind: ChartKind, group: &RunGroup, x_to: f64, panels: Vec<Panel>) -> Chart {
    Chart {
        kind,
        name: kind.file_stem(group.duration, group.batch),
        x_label: "Threads".to_string(),
        y_label: kind.y_label().to_string(),
        x_scale: AxisScale::Log,
        y_scale: kind.y_scale(),
        x_range: (1.0, x_to),
        panels,
    }
}
