use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlotError {
    #[error("invalid log file name {name}: {reason}")]
    InvalidFilename { name: String, reason: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("threads in filename ({filename}) != threads in file ({declared}) for {file}")]
    ThreadsMismatch {
        file: String,
        filename: u32,
        declared: u32,
    },
    #[error("duration in filename ({filename}) != duration in file ({declared}) for {file}")]
    DurationMismatch {
        file: String,
        filename: u32,
        declared: u32,
    },
    #[error("repetitions ({declared}) != reported summaries ({found}) for {file}")]
    RepetitionMismatch {
        file: String,
        declared: u32,
        found: u32,
    },
    #[error("zero repetitions declared in {0}")]
    ZeroRepetitions(String),
    #[error("truncated log: {0}")]
    TruncatedLog(String),
    #[error("unexpected summary field: expected {expected}, found {found:?}")]
    UnexpectedField { expected: String, found: String },
    #[error("length mismatch: expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("cas success rate undefined: no cas attempts recorded")]
    UndefinedCasRate,
    #[error("degenerate metric: {0}")]
    DegenerateMetric(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("render error: {0}")]
    Render(String),
}

impl PlotError {
    pub fn invalid_filename<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        PlotError::InvalidFilename {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        PlotError::Parse(msg.into())
    }

    pub fn truncated<T: Into<String>>(msg: T) -> Self {
        PlotError::TruncatedLog(msg.into())
    }

    pub fn degenerate<T: Into<String>>(msg: T) -> Self {
        PlotError::DegenerateMetric(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        PlotError::Io(msg.into())
    }

    pub fn render<T: Into<String>>(msg: T) -> Self {
        PlotError::Render(msg.into())
    }
}
