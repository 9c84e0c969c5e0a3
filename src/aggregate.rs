//! Turns the repeated summary blocks of one harness log into a [`RunRecord`].

use std::{fs, path::Path};

use tracing::debug;

use crate::{
    PlotError,
    filename::RunIdentity,
    record::{OpCounts, RunRecord},
};

pub const SUMMARY_MARKER: &str = "Summary STATS:";

/// Field labels of a summary block, in the order the harness prints them.
pub const SUMMARY_FIELDS: [&str; 9] = [
    "duration",
    "enq_succ",
    "enq_fail",
    "deq_succ",
    "deq_fail",
    "freelist_insert",
    "freelist_max",
    "cas_succ",
    "cas_fail",
];

const HEADER_LINES: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SummaryBlock {
    pub duration: f64,
    pub enq_succ: u64,
    pub enq_fail: u64,
    pub deq_succ: u64,
    pub deq_fail: u64,
    pub freelist_insert: u64,
    pub freelist_max: u64,
    pub cas_succ: u64,
    pub cas_fail: u64,
}

#[derive(Clone, Copy, Debug, Default)]
struct Totals {
    blocks: u32,
    duration: f64,
    enq_succ: u64,
    enq_fail: u64,
    deq_succ: u64,
    deq_fail: u64,
    freelist_insert: u64,
    freelist_max: u64,
    cas_succ: u64,
    cas_fail: u64,
}

impl Totals {
    /// Counters saturate at `u64::MAX`.
    fn add(&mut self, block: &SummaryBlock) {
        self.blocks = self.blocks.saturating_add(1);
        self.duration += block.duration;
        self.enq_succ = self.enq_succ.saturating_add(block.enq_succ);
        self.enq_fail = self.enq_fail.saturating_add(block.enq_fail);
        self.deq_succ = self.deq_succ.saturating_add(block.deq_succ);
        self.deq_fail = self.deq_fail.saturating_add(block.deq_fail);
        self.freelist_insert = self.freelist_insert.saturating_add(block.freelist_insert);
        self.freelist_max = self.freelist_max.max(block.freelist_max);
        self.cas_succ = self.cas_succ.saturating_add(block.cas_succ);
        self.cas_fail = self.cas_fail.saturating_add(block.cas_fail);
    }
}

/// Reads `dir/file_name` and aggregates it.
pub fn aggregate_file(dir: &Path, file_name: &str) -> Result<RunRecord, PlotError> {
    let path = dir.join(file_name);
    let content = fs::read_to_string(&path)
        .map_err(|e| PlotError::io(format!("{}: {e}", path.display())))?;
    aggregate_log(file_name, &content)
}

/// Aggregates the content of one log. The identity decoded from `file_name`
/// must agree with the header of `content`.
pub fn aggregate_log(file_name: &str, content: &str) -> Result<RunRecord, PlotError> {
    let identity = RunIdentity::parse(file_name)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < HEADER_LINES {
        return Err(PlotError::truncated(format!(
            "{file_name}: expected {HEADER_LINES} header lines, found {}",
            lines.len()
        )));
    }

    let declared_threads = header_u32(file_name, lines[0])?;
    if declared_threads != identity.threads {
        return Err(PlotError::ThreadsMismatch {
            file: file_name.to_string(),
            filename: identity.threads,
            declared: declared_threads,
        });
    }
    let declared_duration = header_u32(file_name, lines[1])?;
    if declared_duration != identity.duration {
        return Err(PlotError::DurationMismatch {
            file: file_name.to_string(),
            filename: identity.duration,
            declared: declared_duration,
        });
    }
    let repetitions = header_u32(file_name, lines[2])?;
    let enqueues = parse_op_counts(lines[3]).map_err(|e| context(file_name, e))?;
    let dequeues = parse_op_counts(lines[4]).map_err(|e| context(file_name, e))?;

    let body = &lines[HEADER_LINES..];
    let mut totals = Totals::default();
    for (idx, line) in body.iter().enumerate() {
        if line.trim() != SUMMARY_MARKER {
            continue;
        }
        let block = parse_summary_block(&body[idx + 1..])
            .map_err(|e| context(file_name, e))?;
        totals.add(&block);
    }

    if totals.blocks != repetitions {
        return Err(PlotError::RepetitionMismatch {
            file: file_name.to_string(),
            declared: repetitions,
            found: totals.blocks,
        });
    }
    if repetitions == 0 {
        return Err(PlotError::ZeroRepetitions(file_name.to_string()));
    }

    let reps = f64::from(repetitions);
    let record = RunRecord {
        file_name: file_name.to_string(),
        identity,
        repetitions,
        enqueues,
        dequeues,
        duration_secs: totals.duration / reps,
        enq_succ: totals.enq_succ as f64 / reps,
        enq_fail: totals.enq_fail as f64 / reps,
        deq_succ: totals.deq_succ as f64 / reps,
        deq_fail: totals.deq_fail as f64 / reps,
        freelist_insert: totals.freelist_insert as f64 / reps,
        freelist_max: totals.freelist_max,
        cas_succ: totals.cas_succ as f64 / reps,
        cas_fail: totals.cas_fail as f64 / reps,
    };
    if record.duration_secs.is_nan() || record.duration_secs <= 0.0 {
        return Err(PlotError::degenerate(format!(
            "{file_name}: average duration {} is not positive",
            record.duration_secs
        )));
    }
    debug!(
        file = file_name,
        repetitions,
        throughput = record.throughput(),
        "aggregated run"
    );
    Ok(record)
}

/// Parses the nine lines following a summary marker.
pub fn parse_summary_block(lines: &[&str]) -> Result<SummaryBlock, PlotError> {
    if lines.len() < SUMMARY_FIELDS.len() {
        return Err(PlotError::truncated(format!(
            "summary block has {} of {} lines",
            lines.len(),
            SUMMARY_FIELDS.len()
        )));
    }
    let mut values = [""; 9];
    for (slot, (line, label)) in values
        .iter_mut()
        .zip(lines.iter().zip(SUMMARY_FIELDS.iter()))
    {
        *slot = field_value(line, label)?;
    }
    Ok(SummaryBlock {
        duration: parse_f64(values[0])?,
        enq_succ: parse_u64(values[1])?,
        enq_fail: parse_u64(values[2])?,
        deq_succ: parse_u64(values[3])?,
        deq_fail: parse_u64(values[4])?,
        freelist_insert: parse_u64(values[5])?,
        freelist_max: parse_u64(values[6])?,
        cas_succ: parse_u64(values[7])?,
        cas_fail: parse_u64(values[8])?,
    })
}

/// Parses a raw batch line: `... [1 2 3 ]`, `... (1, 8)` or `... 4`.
pub fn parse_op_counts(line: &str) -> Result<OpCounts, PlotError> {
    if let Some((_, rest)) = line.split_once('[') {
        let inner = rest.split(']').next().unwrap_or(rest);
        let values = inner
            .split_whitespace()
            .map(parse_u64)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(OpCounts::Sequence(values));
    }
    if let Some((_, rest)) = line.split_once('(') {
        let inner = rest.split(')').next().unwrap_or(rest);
        let (min, max) = inner
            .split_once(',')
            .ok_or_else(|| PlotError::parse(format!("malformed batch range {line:?}")))?;
        return Ok(OpCounts::Range {
            min: parse_u64(min.trim())?,
            max: parse_u64(max.trim())?,
        });
    }
    Ok(OpCounts::Scalar(parse_u64(last_token(line)?)?))
}

fn field_value<'a>(line: &'a str, label: &str) -> Result<&'a str, PlotError> {
    let (found, rest) = line
        .trim()
        .split_once(':')
        .ok_or_else(|| PlotError::UnexpectedField {
            expected: label.to_string(),
            found: line.trim().to_string(),
        })?;
    if found.trim() != label {
        return Err(PlotError::UnexpectedField {
            expected: label.to_string(),
            found: found.trim().to_string(),
        });
    }
    rest.split_whitespace()
        .next()
        .ok_or_else(|| PlotError::parse(format!("missing value for {label}")))
}

fn last_token(line: &str) -> Result<&str, PlotError> {
    line.split_whitespace()
        .last()
        .ok_or_else(|| PlotError::parse("empty line where a value was expected"))
}

fn header_u32(file_name: &str, line: &str) -> Result<u32, PlotError> {
    last_token(line)
        .and_then(parse_u32)
        .map_err(|e| context(file_name, e))
}

fn parse_u32(token: &str) -> Result<u32, PlotError> {
    token
        .parse()
        .map_err(|_| PlotError::parse(format!("malformed integer {token:?}")))
}

fn parse_u64(token: &str) -> Result<u64, PlotError> {
    token
        .parse()
        .map_err(|_| PlotError::parse(format!("malformed integer {token:?}")))
}

fn parse_f64(token: &str) -> Result<f64, PlotError> {
    token
        .parse()
        .map_err(|_| PlotError::parse(format!("malformed number {token:?}")))
}

fn context(file_name: &str, err: PlotError) -> PlotError {
    match err {
        PlotError::Parse(msg) => PlotError::Parse(format!("{file_name}: {msg}")),
        PlotError::TruncatedLog(msg) => PlotError::TruncatedLog(format!("{file_name}: {msg}")),
        other => other,
    }
}
