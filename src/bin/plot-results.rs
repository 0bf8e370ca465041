use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use mst_bench_tools::config_file::LoadConfigFile;
use mst_bench_tools::get_terminal_width::get_terminal_width;
use mst_bench_tools::pipeline::{plot_results, IngestionMode, PlotOutcome, PlotReport};
use mst_bench_tools::plot_config::PlotConfig;
use mst_bench_tools::utillib::logging::{set_log_level, LogLevelOpt};
use mst_bench_tools::{debug, warn};

include!("../../include/mst_bench_version.rs");

/// Average the timings of repeated MST benchmark runs per input file
/// and process count, and plot them: one chart with all input files,
/// and one chart per input file.
#[derive(clap::Parser, Debug)]
#[clap(version = MST_BENCH_VERSION)]
#[clap(next_line_help = true)]
#[clap(set_term_width = get_terminal_width(4))]
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpt,

    /// Path to a config file (.json5, .json, .yml or .yaml). If not
    /// given, `~/.mst-bench-plot.*` is loaded if it exists, otherwise
    /// the defaults are used (`logs/results.log`, `logs/plots/`,
    /// `parallel_mst.o*`).
    #[clap(long)]
    config: Option<PathBuf>,

    /// Read the first line of each batch job output file
    /// (`parallel_mst.o*`) instead of the results log. Files where
    /// that line is not `<algorithm> <file> <num_processes> <time>`
    /// are skipped.
    #[clap(long)]
    hpc: bool,
}

fn main() -> Result<()> {
    let Opts {
        log_level,
        config,
        hpc,
    } = Opts::parse();

    set_log_level(log_level.try_into()?);

    let config = PlotConfig::load_config(config.as_ref(), |msg| {
        debug!("no config file: {msg}");
        Ok(PlotConfig::default())
    })?;
    let mode = if hpc {
        IngestionMode::JobOutputs
    } else {
        IngestionMode::ResultsLog
    };

    match plot_results(&config, mode)? {
        PlotOutcome::NoData { processed_files } => {
            for path in &processed_files {
                println!("Processed file: {}", path.display());
            }
            match mode {
                IngestionMode::JobOutputs => warn!(
                    "No valid data found in output files ({:?} in {:?}).",
                    config.job_output_pattern, config.job_output_dir
                ),
                IngestionMode::ResultsLog => {
                    warn!("No data found in {:?}.", config.results_log)
                }
            }
        }
        PlotOutcome::Plotted(PlotReport {
            processed_files,
            combined_chart,
            per_file_charts,
        }) => {
            for path in &processed_files {
                println!("Processed file: {}", path.display());
            }
            println!(
                "Plots saved in '{}' ({} per input file)",
                config.plot_dir.display(),
                per_file_charts.len()
            );
            println!("Combined plot saved as '{}'", combined_chart.display());
        }
    }

    Ok(())
}
