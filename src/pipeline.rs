//! From raw timing records to chart files: ingestion (in one of two
//! modes), averaging, rendering.

use std::{collections::HashSet, path::PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::{
    aggregate::AggregatedTimes,
    chart::ChartSpec,
    info,
    job_output::read_job_outputs,
    measurement::Measurement,
    plot_config::PlotConfig,
    proper_filename::unique_sanitized_file_name_with_extension,
    results_log::read_results_log,
};

/// Where the timing records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionMode {
    /// The results log (`PlotConfig::results_log`); any problem with
    /// it is an error
    ResultsLog,
    /// The first lines of the job output files
    /// (`PlotConfig::job_output_pattern` in
    /// `PlotConfig::job_output_dir`); files without a record there are
    /// skipped
    JobOutputs,
}

#[derive(Debug)]
pub struct Ingested {
    pub measurements: Vec<Measurement>,
    /// The input files that were read
    pub processed_files: Vec<PathBuf>,
}

pub fn ingest(config: &PlotConfig, mode: IngestionMode) -> Result<Ingested> {
    match mode {
        IngestionMode::ResultsLog => Ok(Ingested {
            measurements: read_results_log(&config.results_log)?,
            processed_files: vec![config.results_log.clone()],
        }),
        IngestionMode::JobOutputs => {
            let outputs = read_job_outputs(&config.job_output_dir, &config.job_output_pattern)?;
            Ok(Ingested {
                measurements: outputs.measurements,
                processed_files: outputs.processed,
            })
        }
    }
}

#[derive(Debug)]
pub struct PlotReport {
    pub processed_files: Vec<PathBuf>,
    pub combined_chart: PathBuf,
    /// One per distinct input file identifier, in identifier order
    pub per_file_charts: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum PlotOutcome {
    Plotted(PlotReport),
    /// Nothing to plot; no files were written.
    NoData { processed_files: Vec<PathBuf> },
}

/// Write the combined chart and one chart per input file into
/// `config.plot_dir`, creating it if necessary. Every chart gets its
/// own file, input files whose names sanitize to the same chart name
/// (or to the combined chart's) get a `~N` suffix. Returns the
/// combined chart path and the per-file chart paths.
pub fn render_charts(
    config: &PlotConfig,
    times: &AggregatedTimes,
) -> Result<(PathBuf, Vec<PathBuf>)> {
    let plot_dir = &config.plot_dir;
    std::fs::create_dir_all(plot_dir)
        .with_context(|| anyhow!("creating plot directory {plot_dir:?}"))?;

    let combined_chart = plot_dir.join(&config.combined_plot_file);
    ChartSpec::combined(times, config.combined_chart_size).render_svg(&combined_chart)?;
    info!("wrote {combined_chart:?}");

    let mut taken = HashSet::from([config.combined_plot_file.as_str().to_owned()]);
    let mut per_file_charts = Vec::new();
    for file_id in times.file_ids() {
        let file_name =
            unique_sanitized_file_name_with_extension(file_id.as_str(), "svg", &mut taken)
                .map_err(|e| anyhow!("no chart file name for input file {file_id:?}: {e}"))?;
        let path = plot_dir.join(&file_name);
        ChartSpec::single(times, file_id, config.single_chart_size).render_svg(&path)?;
        info!("wrote {path:?}");
        per_file_charts.push(path);
    }
    Ok((combined_chart, per_file_charts))
}

/// The whole pipeline. Read errors are propagated; finding no
/// records gives `PlotOutcome::NoData` without touching the plot
/// directory.
pub fn plot_results(config: &PlotConfig, mode: IngestionMode) -> Result<PlotOutcome> {
    let Ingested {
        measurements,
        processed_files,
    } = ingest(config, mode)?;
    if measurements.is_empty() {
        return Ok(PlotOutcome::NoData { processed_files });
    }
    let times = AggregatedTimes::from_measurements(&measurements);
    info!(
        "{} records averaged into {} data points",
        measurements.len(),
        times.len()
    );
    let (combined_chart, per_file_charts) = render_charts(config, &times)?;
    Ok(PlotOutcome::Plotted(PlotReport {
        processed_files,
        combined_chart,
        per_file_charts,
    }))
}
