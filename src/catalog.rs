use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::debug;

use crate::{
    PlotError,
    aggregate::aggregate_file,
    filename::RunIdentity,
    record::{RunRecord, order_by_threads},
};

/// Distinct experiment parameters seen across a set of logs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParameterCatalog {
    pub patterns: BTreeSet<String>,
    pub batches: BTreeSet<u32>,
    pub durations: BTreeSet<u32>,
    /// Concurrent programs only; the baseline is tracked separately.
    pub programs: BTreeSet<String>,
    pub threads: BTreeSet<u32>,
}

impl ParameterCatalog {
    pub fn collect<'a, I>(identities: I) -> Self
    where
        I: IntoIterator<Item = &'a RunIdentity>,
    {
        let mut catalog = Self::default();
        for id in identities {
            if !id.pattern.is_empty() {
                catalog.patterns.insert(id.pattern.clone());
            }
            catalog.batches.insert(id.batch);
            catalog.durations.insert(id.duration);
            if !id.is_baseline() {
                catalog.programs.insert(id.program.clone());
            }
            catalog.threads.insert(id.threads);
        }
        catalog
    }

    pub fn max_threads(&self) -> u32 {
        self.threads.last().copied().unwrap_or(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub file_name: String,
    pub identity: RunIdentity,
}

impl LogEntry {
    pub fn decode(file_name: String) -> Result<Self, PlotError> {
        let identity = RunIdentity::parse(&file_name)?;
        Ok(Self {
            file_name,
            identity,
        })
    }
}

/// Decoded listing of a log directory, sorted by file name.
#[derive(Clone, Debug)]
pub struct LogIndex {
    dir: PathBuf,
    entries: Vec<LogEntry>,
}

impl LogIndex {
    /// Lists the regular, non-hidden files of `dir` and decodes their names.
    /// Any name that breaks the convention aborts the scan.
    pub fn scan(dir: &Path) -> Result<Self, PlotError> {
        let listing =
            fs::read_dir(dir).map_err(|e| PlotError::io(format!("{}: {e}", dir.display())))?;
        let mut names = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|e| PlotError::io(e.to_string()))?;
            let file_type = entry.file_type().map_err(|e| PlotError::io(e.to_string()))?;
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        Self::from_names(dir, names)
    }

    pub fn from_names<I, S>(dir: &Path, names: I) -> Result<Self, PlotError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = names
            .into_iter()
            .map(|name| LogEntry::decode(name.into()))
            .collect::<Result<Vec<_>, PlotError>>()?;
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        debug!(dir = %dir.display(), logs = entries.len(), "indexed log directory");
        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn catalog(&self) -> ParameterCatalog {
        ParameterCatalog::collect(self.entries.iter().map(|e| &e.identity))
    }

    pub fn select(&self, batch: u32, duration: u32) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.identity.batch == batch && e.identity.duration == duration)
            .collect()
    }

    /// Aggregates every log of the (batch, duration) combination, or reports
    /// why the combination cannot be charted.
    pub fn load_group(
        &self,
        batch: u32,
        duration: u32,
        catalog: &ParameterCatalog,
    ) -> Result<GroupOutcome, PlotError> {
        let selected = self.select(batch, duration);
        if selected.is_empty() {
            return Ok(GroupOutcome::Missing(SkipReason::NoLogs));
        }
        let Some(baseline) = selected.iter().find(|e| e.identity.is_baseline()) else {
            return Ok(GroupOutcome::Missing(SkipReason::NoBaseline));
        };
        let baseline = aggregate_file(&self.dir, &baseline.file_name)?;

        let mut series = BTreeMap::new();
        for program in &catalog.programs {
            let mut by_pattern = BTreeMap::new();
            for pattern in &catalog.patterns {
                let records = selected
                    .iter()
                    .filter(|e| &e.identity.program == program && &e.identity.pattern == pattern)
                    .map(|e| aggregate_file(&self.dir, &e.file_name))
                    .collect::<Result<Vec<_>, _>>()?;
                by_pattern.insert(pattern.clone(), order_by_threads(records));
            }
            series.insert(program.clone(), by_pattern);
        }
        Ok(GroupOutcome::Ready(RunGroup {
            batch,
            duration,
            baseline,
            series,
        }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoLogs,
    NoBaseline,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoLogs => write!(f, "no logfiles"),
            SkipReason::NoBaseline => write!(f, "no sequential logfiles"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum GroupOutcome {
    Ready(RunGroup),
    Missing(SkipReason),
}

/// Aggregated records of one (batch, duration) combination.
#[derive(Clone, Debug)]
pub struct RunGroup {
    pub batch: u32,
    pub duration: u32,
    pub baseline: RunRecord,
    /// program -> pattern -> records ordered by thread count
    pub series: BTreeMap<String, BTreeMap<String, Vec<RunRecord>>>,
}

impl RunGroup {
    pub fn records(&self, program: &str, pattern: &str) -> &[RunRecord] {
        self.series
            .get(program)
            .and_then(|patterns| patterns.get(pattern))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_program(&self, program: &str) -> bool {
        self.series.contains_key(program)
    }
}
