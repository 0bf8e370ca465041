//! Averaging repeated runs: the mean time for each (input file,
//! process count) pair.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::measurement::{FileId, Measurement, ProcessCount};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct RunningSum {
    sum: f64,
    count: u64,
}

impl RunningSum {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Mean time per (input file, process count). Iteration is in key
/// order, i.e. sorted by file identifier, then process count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatedTimes {
    means: BTreeMap<(FileId, ProcessCount), f64>,
}

impl AggregatedTimes {
    pub fn from_measurements<'m>(measurements: impl IntoIterator<Item = &'m Measurement>) -> Self {
        let mut sums: BTreeMap<(FileId, ProcessCount), RunningSum> = BTreeMap::new();
        for m in measurements {
            sums.entry((m.file_id.clone(), m.num_processes))
                .or_default()
                .add(m.time);
        }
        let means = sums
            .into_iter()
            .map(|(key, running)| (key, running.mean()))
            .collect();
        AggregatedTimes { means }
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    pub fn mean(&self, file_id: &FileId, num_processes: ProcessCount) -> Option<f64> {
        self.means
            .get(&(file_id.clone(), num_processes))
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileId, ProcessCount, f64)> {
        self.means
            .iter()
            .map(|((file_id, num_processes), mean)| (file_id, *num_processes, *mean))
    }

    /// The distinct file identifiers, sorted.
    pub fn file_ids(&self) -> impl Iterator<Item = &FileId> {
        self.means.keys().map(|(file_id, _)| file_id).dedup()
    }

    /// (process count, mean time) for `file_id`, sorted by process
    /// count; empty if the file is unknown.
    pub fn series(&self, file_id: &FileId) -> Vec<(ProcessCount, f64)> {
        self.iter()
            .filter(|(id, _, _)| *id == file_id)
            .map(|(_, num_processes, mean)| (num_processes, mean))
            .collect()
    }
}
