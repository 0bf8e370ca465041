use std::path::PathBuf;

use anyhow::Result;

use crate::{config_file::LoadConfigFile, proper_filename::ProperFilename, utillib::home::home_dir};

/// Where `plot-results` reads from and writes to. All fields are
/// optional in a config file; relative paths are relative to the
/// working directory.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct PlotConfig {
    /// The results log as appended to by the benchmark, read in the
    /// default mode
    pub results_log: PathBuf,

    /// Directory for the chart files, created if missing
    pub plot_dir: PathBuf,

    /// File name of the chart with all input files, within `plot_dir`
    pub combined_plot_file: ProperFilename,

    /// Directory in which to look for job output files (`--hpc` mode)
    pub job_output_dir: PathBuf,

    /// Glob pattern for the job output file names
    pub job_output_pattern: String,

    /// Width and height of the combined chart, in pixels
    pub combined_chart_size: (u32, u32),

    /// Width and height of the per-input-file charts, in pixels
    pub single_chart_size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            results_log: "logs/results.log".into(),
            plot_dir: "logs/plots".into(),
            combined_plot_file: "combined_plot.svg"
                .parse()
                .expect("constant is a proper file name"),
            job_output_dir: ".".into(),
            job_output_pattern: "parallel_mst.o*".into(),
            combined_chart_size: (1000, 600),
            single_chart_size: (800, 500),
        }
    }
}

impl LoadConfigFile for PlotConfig {
    fn default_config_path_without_suffix() -> Result<Option<PathBuf>> {
        let home = home_dir()?;
        Ok(Some(home.join(".mst-bench-plot")))
    }
}
