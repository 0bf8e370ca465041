//! Reading results from the output files of batch jobs (e.g.
//! `parallel_mst.o12345` as written by PBS), where the benchmark
//! prints `<algorithm> <file> <num_processes> <time>` as the first
//! line. Jobs that failed or were cut off leave other content there;
//! those files are skipped.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};

use crate::{
    debug, info,
    measurement::{Measurement, MeasurementParseError},
};

#[derive(Debug, Default)]
pub struct JobOutputs {
    pub measurements: Vec<Measurement>,
    /// All files that matched the pattern, in the order read
    pub processed: Vec<PathBuf>,
    /// The subset of `processed` whose first line was not a record
    pub skipped: Vec<PathBuf>,
}

/// The bytes of the first line of the file at `path`, including the
/// line ending if there is one. An empty file gives an empty vector.
fn read_first_line(path: &Path) -> Result<Vec<u8>> {
    let input = File::open(path).with_context(|| anyhow!("opening job output {path:?}"))?;
    let mut line = Vec::new();
    BufReader::new(input)
        .read_until(b'\n', &mut line)
        .with_context(|| anyhow!("reading first line of job output {path:?}"))?;
    Ok(line)
}

/// The paths matching `pattern` (a glob pattern for file names) in
/// `dir`, in lexical order. Directories are left out.
pub fn job_output_paths(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| anyhow!("job output directory path is not unicode: {dir:?}"))?;
    let full_pattern = if dir_str.is_empty() {
        pattern.to_owned()
    } else {
        format!(
            "{}/{pattern}",
            glob::Pattern::escape(dir_str.trim_end_matches('/'))
        )
    };
    let mut paths = Vec::new();
    for entry in glob::glob(&full_pattern)
        .with_context(|| anyhow!("invalid job output file pattern {full_pattern:?}"))?
    {
        let path = entry.with_context(|| anyhow!("listing job output files in {dir:?}"))?;
        if path.is_file() {
            paths.push(path);
        } else {
            debug!("ignoring non-file {path:?}");
        }
    }
    Ok(paths)
}

/// Collect the records from all job output files matching `pattern`
/// in `dir`. A first line that doesn't consist of exactly 4 fields is
/// not an error, the file is just skipped, as is one that isn't valid
/// UTF-8. A line that does, but whose values don't parse, is an
/// error.
pub fn read_job_outputs(dir: &Path, pattern: &str) -> Result<JobOutputs> {
    let mut outputs = JobOutputs::default();
    for path in job_output_paths(dir, pattern)? {
        info!("processing file {path:?}");
        let line = match String::from_utf8(read_first_line(&path)?) {
            Ok(line) => line,
            Err(e) => {
                debug!("skipping {path:?}: first line is not UTF-8: {e}");
                outputs.skipped.push(path.clone());
                outputs.processed.push(path);
                continue;
            }
        };
        match Measurement::from_job_output_line(&line) {
            Ok(measurement) => outputs.measurements.push(measurement),
            Err(MeasurementParseError::FieldCount { expected: _, got }) => {
                debug!("skipping {path:?}: first line has {got} fields: {line:?}");
                outputs.skipped.push(path.clone());
            }
            Err(e) => {
                return Err(e).with_context(|| anyhow!("parsing first line of job output {path:?}"))
            }
        }
        outputs.processed.push(path);
    }
    Ok(outputs)
}
