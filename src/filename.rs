//! Decoding of the harness' log file naming convention:
//! `<prefix>_<program>_[t<threads>_]d<duration>_b<batch>[_<pattern>].<ext>`.
//!
//! The baseline program carries neither a thread nor a pattern field, so the
//! position of every later field depends on the program.

use serde::{Deserialize, Serialize};

use crate::PlotError;

/// Program name of the sequential baseline.
pub const SEQUENTIAL_PROGRAM: &str = "seq";
/// Program whose logs feed the CAS success rate chart.
pub const CAS_PROGRAM: &str = "cas";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunIdentity {
    pub program: String,
    pub threads: u32,
    pub duration: u32,
    pub batch: u32,
    pub pattern: String,
}

impl RunIdentity {
    pub fn parse(name: &str) -> Result<Self, PlotError> {
        Ok(Self {
            program: program(name)?,
            threads: threads(name)?,
            duration: duration(name)?,
            batch: batch(name)?,
            pattern: pattern(name)?,
        })
    }

    pub fn is_baseline(&self) -> bool {
        is_baseline(&self.program)
    }
}

pub fn is_baseline(program: &str) -> bool {
    program == SEQUENTIAL_PROGRAM
}

pub fn program(name: &str) -> Result<String, PlotError> {
    field(name, 1).map(str::to_string)
}

pub fn threads(name: &str) -> Result<u32, PlotError> {
    if is_baseline(&program(name)?) {
        return Ok(1);
    }
    marked_int(name, field(name, 2)?, 't')
}

pub fn duration(name: &str) -> Result<u32, PlotError> {
    let idx = if is_baseline(&program(name)?) { 2 } else { 3 };
    marked_int(name, field(name, idx)?, 'd')
}

pub fn batch(name: &str) -> Result<u32, PlotError> {
    let idx = if is_baseline(&program(name)?) { 3 } else { 4 };
    marked_int(name, strip_extension(field(name, idx)?), 'b')
}

pub fn pattern(name: &str) -> Result<String, PlotError> {
    if is_baseline(&program(name)?) {
        return Ok(String::new());
    }
    let pattern = strip_extension(field(name, 5)?);
    if pattern.is_empty() {
        return Err(PlotError::invalid_filename(name, "empty pattern field"));
    }
    Ok(pattern.to_string())
}

fn field(name: &str, idx: usize) -> Result<&str, PlotError> {
    name.split('_')
        .nth(idx)
        .ok_or_else(|| PlotError::invalid_filename(name, format!("missing field {}", idx + 1)))
}

fn strip_extension(field: &str) -> &str {
    field.split('.').next().unwrap_or(field)
}

fn marked_int(name: &str, field: &str, marker: char) -> Result<u32, PlotError> {
    let digits = field.strip_prefix(marker).ok_or_else(|| {
        PlotError::invalid_filename(name, format!("field {field:?} lacks marker '{marker}'"))
    })?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PlotError::invalid_filename(
            name,
            format!("field {field:?} has no integer after '{marker}'"),
        ));
    }
    let value = digits.parse::<u32>().map_err(|_| {
        PlotError::invalid_filename(name, format!("field {field:?} overflows"))
    })?;
    if value == 0 {
        return Err(PlotError::invalid_filename(
            name,
            format!("field {field:?} is non-positive"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension_keeps_bare_field() {
        assert_eq!(strip_extension("b16"), "b16");
        assert_eq!(strip_extension("b16.log"), "b16");
        assert_eq!(strip_extension("fifo.txt"), "fifo");
    }

    #[test]
    fn test_marked_int_rejects_wrong_marker() {
        let err = marked_int("x", "d10", 't').unwrap_err();
        assert!(matches!(err, PlotError::InvalidFilename { .. }));
    }
}
