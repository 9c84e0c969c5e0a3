use serde::{Deserialize, Serialize};

use crate::{PlotError, filename::RunIdentity};

/// Raw enqueue/dequeue batch configuration line of a log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpCounts {
    Scalar(u64),
    Sequence(Vec<u64>),
    /// Batch sizes drawn uniformly from `min..=max` per operation.
    Range { min: u64, max: u64 },
}

impl OpCounts {
    /// Expands the counts to exactly `slots` values.
    pub fn broadcast(&self, slots: usize) -> Result<Vec<u64>, PlotError> {
        match self {
            OpCounts::Scalar(value) => Ok(vec![*value; slots]),
            OpCounts::Sequence(values) if values.len() == slots => Ok(values.clone()),
            OpCounts::Sequence(values) => Err(PlotError::LengthMismatch {
                expected: slots,
                found: values.len(),
            }),
            OpCounts::Range { min, max } => Err(PlotError::parse(format!(
                "random batch range ({min}, {max}) has no per-slot value"
            ))),
        }
    }
}

/// Aggregated statistics of one log file, averaged over its repetitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub file_name: String,
    pub identity: RunIdentity,
    pub repetitions: u32,
    pub enqueues: OpCounts,
    pub dequeues: OpCounts,
    pub duration_secs: f64,
    pub enq_succ: f64,
    pub enq_fail: f64,
    pub deq_succ: f64,
    pub deq_fail: f64,
    pub freelist_insert: f64,
    pub freelist_max: u64,
    pub cas_succ: f64,
    pub cas_fail: f64,
}

impl RunRecord {
    pub fn threads(&self) -> u32 {
        self.identity.threads
    }

    pub fn is_baseline(&self) -> bool {
        self.identity.is_baseline()
    }

    /// Successful operations per second.
    pub fn throughput(&self) -> f64 {
        (self.enq_succ + self.deq_succ) / self.duration_secs
    }

    /// All attempted operations per second, failed ones included.
    pub fn throughput_all(&self) -> f64 {
        (self.enq_succ + self.enq_fail + self.deq_succ + self.deq_fail) / self.duration_secs
    }

    pub fn cas_success_rate(&self) -> Result<f64, PlotError> {
        let attempts = self.cas_succ + self.cas_fail;
        if attempts == 0.0 {
            return Err(PlotError::UndefinedCasRate);
        }
        Ok(self.cas_succ / attempts)
    }

    pub fn speedup(&self, baseline: &RunRecord) -> Result<f64, PlotError> {
        ratio(self.throughput(), baseline.throughput(), "throughput")
    }

    pub fn speedup_all(&self, baseline: &RunRecord) -> Result<f64, PlotError> {
        ratio(self.throughput_all(), baseline.throughput_all(), "throughput_all")
    }
}

fn ratio(value: f64, base: f64, what: &str) -> Result<f64, PlotError> {
    if base == 0.0 {
        return Err(PlotError::degenerate(format!("baseline {what} is zero")));
    }
    Ok(value / base)
}

/// Drops baseline records and orders the rest by thread count. The sort is
/// stable, so records sharing a thread count keep their input order.
pub fn order_by_threads(records: Vec<RunRecord>) -> Vec<RunRecord> {
    let mut ordered: Vec<RunRecord> = records.into_iter().filter(|r| !r.is_baseline()).collect();
    ordered.sort_by_key(RunRecord::threads);
    ordered
}
