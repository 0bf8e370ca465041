//! One observed benchmark run, as read from the results log or from
//! a job output file.

use std::{fmt::Display, num::NonZeroU32, str::FromStr};

use kstring::KString;

/// Number of processes (MPI ranks) a run used.
pub type ProcessCount = NonZeroU32;

/// The identifier of the graph input file a run was given. Never
/// empty and never contains whitespace, since the log formats are
/// whitespace separated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(KString);

impl FileId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for FileId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileId {
    type Err = MeasurementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.contains(char::is_whitespace) {
            return Err(MeasurementParseError::InvalidFileId(s.into()));
        }
        Ok(FileId(KString::from_ref(s)))
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeasurementParseError {
    #[error("invalid input file identifier {0:?}: must be non-empty and without whitespace")]
    InvalidFileId(String),
    #[error("invalid process count {0:?}: expecting a positive integer")]
    InvalidProcessCount(String),
    #[error("invalid time {0:?}: expecting a non-negative number of seconds")]
    InvalidTime(String),
    #[error("expecting {expected} fields, got {got}")]
    FieldCount { expected: usize, got: usize },
}

pub fn parse_process_count(s: &str) -> Result<ProcessCount, MeasurementParseError> {
    s.parse()
        .map_err(|_| MeasurementParseError::InvalidProcessCount(s.into()))
}

/// Seconds; rejects negative, NaN and infinite values.
pub fn parse_time(s: &str) -> Result<f64, MeasurementParseError> {
    match s.parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0. => Ok(t),
        _ => Err(MeasurementParseError::InvalidTime(s.into())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Only known for runs read from job output files
    pub algorithm: Option<KString>,
    pub file_id: FileId,
    pub num_processes: ProcessCount,
    /// Elapsed wall-clock time in seconds
    pub time: f64,
}

impl Measurement {
    /// Parse the first line of a job output file:
    /// `<algorithm> <file> <num_processes> <time>`.
    pub fn from_job_output_line(line: &str) -> Result<Self, MeasurementParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [algorithm, file_id, num_processes, time] = fields[..] else {
            return Err(MeasurementParseError::FieldCount {
                expected: 4,
                got: fields.len(),
            });
        };
        Ok(Measurement {
            algorithm: Some(KString::from_ref(algorithm)),
            file_id: file_id.parse()?,
            num_processes: parse_process_count(num_processes)?,
            time: parse_time(time)?,
        })
    }
}
