//! The results log: a whitespace separated table with a header row,
//! as appended to by the benchmark after every run, e.g.:
//!
//! ```text
//! file_name num_processes Time
//! graph_1000.txt 4 0.512300
//! graph_1000.txt 8 0.301200
//! ```
//!
//! `read_results_log` is used by `plot-results`. `append_result` is
//! library API for benchmark drivers written in Rust, no binary here
//! calls it.

use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::Path,
};

use anyhow::{anyhow, bail, Context, Result};

use crate::{
    debug, info,
    measurement::{parse_process_count, parse_time, FileId, Measurement, ProcessCount},
};

pub const FILE_NAME_COLUMN: &str = "file_name";
pub const NUM_PROCESSES_COLUMN: &str = "num_processes";
pub const TIME_COLUMN: &str = "Time";

/// The header written by `append_result` for a new log file.
pub const HEADER: &str = "file_name num_processes Time";

/// Position of the required columns within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndices {
    file_name: usize,
    num_processes: usize,
    time: usize,
    num_columns: usize,
}

impl ColumnIndices {
    fn from_header(header: &str) -> Result<Self> {
        let columns: Vec<&str> = header.split_whitespace().collect();
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| anyhow!("missing column {name:?} in header {columns:?}"))
        };
        Ok(ColumnIndices {
            file_name: find(FILE_NAME_COLUMN)?,
            num_processes: find(NUM_PROCESSES_COLUMN)?,
            time: find(TIME_COLUMN)?,
            num_columns: columns.len(),
        })
    }

    fn parse_row(&self, line: &str) -> Result<Measurement> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != self.num_columns {
            bail!(
                "expecting {} fields as in the header, got {}",
                self.num_columns,
                fields.len()
            )
        }
        Ok(Measurement {
            algorithm: None,
            file_id: fields[self.file_name].parse()?,
            num_processes: parse_process_count(fields[self.num_processes])?,
            time: parse_time(fields[self.time])?,
        })
    }
}

/// Read all records of the results log at `path`. Everything that
/// doesn't fit the format is an error: a missing file, a missing
/// header or required column, rows with the wrong number of fields
/// or with unparseable values. Blank lines are ignored. A log with
/// only the header gives an empty vector.
pub fn read_results_log(path: &Path) -> Result<Vec<Measurement>> {
    let input = File::open(path).with_context(|| anyhow!("opening results log {path:?}"))?;
    let input = BufReader::new(input);

    let mut columns: Option<ColumnIndices> = None;
    let mut measurements = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let linenum = i + 1;
        let line = line.with_context(|| anyhow!("reading results log {path:?}:{linenum}"))?;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(columns) = &columns {
            let measurement = columns
                .parse_row(&line)
                .with_context(|| anyhow!("parsing results log {path:?}:{linenum}"))?;
            measurements.push(measurement);
        } else {
            let cols = ColumnIndices::from_header(&line)
                .with_context(|| anyhow!("parsing header of results log {path:?}:{linenum}"))?;
            debug!("results log {path:?}: columns {cols:?}");
            columns = Some(cols);
        }
    }
    if columns.is_none() {
        bail!("results log {path:?} is missing the header line")
    }
    info!("read {} records from {path:?}", measurements.len());
    Ok(measurements)
}

/// Append one record to the results log at `path`, creating its
/// directory and the file with the header line first if necessary.
pub fn append_result(
    path: &Path,
    file_id: &FileId,
    num_processes: ProcessCount,
    time: f64,
) -> Result<()> {
    if !(time.is_finite() && time >= 0.) {
        bail!("refusing to log invalid time {time} for {file_id}")
    }
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| anyhow!("creating directory {dir:?}"))?;
        }
    }
    let is_new = !path.exists();
    let mut out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| anyhow!("opening results log {path:?} for appending"))?;
    if is_new {
        writeln!(out, "{HEADER}").with_context(|| anyhow!("writing header to {path:?}"))?;
    }
    writeln!(out, "{file_id} {num_processes} {time:.6}")
        .with_context(|| anyhow!("writing to results log {path:?}"))
}
