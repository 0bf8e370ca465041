use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::Result;
use approx::assert_relative_eq;
use mst_bench_tools::aggregate::AggregatedTimes;
use mst_bench_tools::measurement::FileId;
use mst_bench_tools::pipeline::{ingest, plot_results, IngestionMode, PlotOutcome};
use mst_bench_tools::plot_config::PlotConfig;
use mst_bench_tools::results_log::{append_result, read_results_log, HEADER};

fn config_in(dir: &Path) -> PlotConfig {
    PlotConfig {
        results_log: dir.join("logs/results.log"),
        plot_dir: dir.join("logs/plots"),
        job_output_dir: dir.to_owned(),
        ..PlotConfig::default()
    }
}

fn procs(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn append_then_read_back() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("logs/results.log");
    let g1: FileId = "graph_1000.txt".parse()?;
    let g2: FileId = "data/graph_5000.txt".parse()?;
    append_result(&log, &g1, procs(2), 1.5)?;
    append_result(&log, &g1, procs(2), 2.5)?;
    append_result(&log, &g2, procs(8), 0.1234567)?;

    let contents = std::fs::read_to_string(&log)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        [
            HEADER,
            "graph_1000.txt 2 1.500000",
            "graph_1000.txt 2 2.500000",
            "data/graph_5000.txt 8 0.123457"
        ]
    );

    let measurements = read_results_log(&log)?;
    assert_eq!(measurements.len(), 3);
    let times = AggregatedTimes::from_measurements(&measurements);
    assert_eq!(times.mean(&g1, procs(2)), Some(2.0));
    assert_relative_eq!(times.mean(&g2, procs(8)).unwrap(), 0.123457);
    Ok(())
}

#[test]
fn append_rejects_bad_values() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("results.log");
    let g: FileId = "g.txt".parse()?;
    assert!(append_result(&log, &g, procs(1), -1.0).is_err());
    assert!(append_result(&log, &g, procs(1), f64::NAN).is_err());
    assert!(!log.exists());
    Ok(())
}

#[test]
fn results_log_errors_are_fatal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path());

    let e = plot_results(&config, IngestionMode::ResultsLog).unwrap_err();
    assert!(format!("{e:#}").contains("results.log"), "{e:#}");

    std::fs::create_dir_all(dir.path().join("logs"))?;
    for bad in [
        "file_name procs Time\ng.txt 2 1.0\n",
        "file_name num_processes Time\ng.txt 2\n",
        "file_name num_processes Time\ng.txt 2 slow\n",
        "file_name num_processes Time\ng.txt 0 1.0\n",
        "\n\n",
    ] {
        std::fs::write(&config.results_log, bad)?;
        assert!(
            plot_results(&config, IngestionMode::ResultsLog).is_err(),
            "{bad:?}"
        );
    }
    assert!(!config.plot_dir.exists());
    Ok(())
}

#[test]
fn results_log_to_charts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path());
    std::fs::create_dir_all(dir.path().join("logs"))?;
    std::fs::write(
        &config.results_log,
        "file_name num_processes Time host\n\
         data/g1.txt 1 4.0 n1\n\
         data/g1.txt 2 2.0 n1\n\
         \n\
         data/g1.txt 2 3.0 n2\n\
         g2.txt 2 1.0 n1\n\
         g2.txt 4 0.5 n1\n",
    )?;

    let report = match plot_results(&config, IngestionMode::ResultsLog)? {
        PlotOutcome::Plotted(report) => report,
        other => panic!("expected charts, got {other:?}"),
    };
    assert_eq!(report.processed_files, [config.results_log.clone()]);
    assert_eq!(
        report.combined_chart,
        config.plot_dir.join("combined_plot.svg")
    );
    assert_eq!(
        report.per_file_charts,
        [
            config.plot_dir.join("data__g1.txt.svg"),
            config.plot_dir.join("g2.txt.svg")
        ]
    );
    assert_eq!(
        file_names(&config.plot_dir),
        ["combined_plot.svg", "data__g1.txt.svg", "g2.txt.svg"]
    );
    for path in report
        .per_file_charts
        .iter()
        .chain(std::iter::once(&report.combined_chart))
    {
        let svg = std::fs::read_to_string(path)?;
        assert!(svg.contains("<svg"), "{path:?}");
    }

    // Running again overwrites, the existing directory is fine
    assert!(matches!(
        plot_results(&config, IngestionMode::ResultsLog)?,
        PlotOutcome::Plotted(_)
    ));
    assert_eq!(file_names(&config.plot_dir).len(), 3);
    Ok(())
}

#[test]
fn clashing_chart_names_get_their_own_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path());
    std::fs::create_dir_all(dir.path().join("logs"))?;
    std::fs::write(
        &config.results_log,
        "file_name num_processes Time\n\
         combined_plot 2 1.0\n\
         a/b 2 2.0\n\
         a__b 2 3.0\n\
         g.txt 2 4.0\n",
    )?;

    let report = match plot_results(&config, IngestionMode::ResultsLog)? {
        PlotOutcome::Plotted(report) => report,
        other => panic!("expected charts, got {other:?}"),
    };
    assert_eq!(report.per_file_charts.len(), 4);
    assert_eq!(
        file_names(&config.plot_dir),
        [
            "a__b.svg",
            "a__b~2.svg",
            "combined_plot.svg",
            "combined_plot~2.svg",
            "g.txt.svg"
        ]
    );
    for path in &report.per_file_charts {
        assert!(path.is_file(), "{path:?}");
    }
    let combined = std::fs::read_to_string(&report.combined_chart)?;
    assert!(combined.contains("Performance Comparison by Input File"));
    let single = std::fs::read_to_string(config.plot_dir.join("combined_plot~2.svg"))?;
    assert!(single.contains("Performance for combined_plot"));
    Ok(())
}

#[test]
fn largest_process_count_is_plotted() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path());
    std::fs::create_dir_all(dir.path().join("logs"))?;
    std::fs::write(
        &config.results_log,
        format!("{HEADER}\ng.txt {} 1.0\ng.txt 1 2.0\n", u32::MAX),
    )?;
    assert!(matches!(
        plot_results(&config, IngestionMode::ResultsLog)?,
        PlotOutcome::Plotted(_)
    ));
    assert!(config.plot_dir.join("g.txt.svg").is_file());
    Ok(())
}

#[test]
fn header_only_results_log_writes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path());
    std::fs::create_dir_all(dir.path().join("logs"))?;
    std::fs::write(&config.results_log, format!("{HEADER}\n"))?;
    assert!(matches!(
        plot_results(&config, IngestionMode::ResultsLog)?,
        PlotOutcome::NoData { .. }
    ));
    assert!(!config.plot_dir.exists());
    Ok(())
}

fn write_job_output(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn job_outputs_to_charts() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path());
    write_job_output(dir.path(), "parallel_mst.o1", "mpi_mst g1.txt 2 3.0\nmore output\n");
    write_job_output(dir.path(), "parallel_mst.o2", "mpi_mst g1.txt 2 1.0\n");
    write_job_output(dir.path(), "parallel_mst.o3", "mpi_mst g1.txt 4 0.5\n");
    write_job_output(dir.path(), "parallel_mst.o4", "Segmentation fault\n");
    write_job_output(dir.path(), "parallel_mst.o5", "serial_mst g2.txt 1 9.0\n");
    write_job_output(dir.path(), "results.txt", "mpi_mst g3.txt 1 9.0\n");

    let ingested = ingest(&config, IngestionMode::JobOutputs)?;
    assert_eq!(ingested.processed_files.len(), 5);
    assert_eq!(ingested.measurements.len(), 4);
    let times = AggregatedTimes::from_measurements(&ingested.measurements);
    assert_eq!(times.mean(&"g1.txt".parse::<FileId>()?, procs(2)), Some(2.0));

    let report = match plot_results(&config, IngestionMode::JobOutputs)? {
        PlotOutcome::Plotted(report) => report,
        other => panic!("expected charts, got {other:?}"),
    };
    assert_eq!(report.per_file_charts.len(), 2);
    assert_eq!(
        file_names(&config.plot_dir),
        ["combined_plot.svg", "g1.txt.svg", "g2.txt.svg"]
    );
    Ok(())
}

#[test]
fn job_outputs_without_records_write_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path());
    write_job_output(dir.path(), "parallel_mst.o1", "");
    write_job_output(dir.path(), "parallel_mst.o2", "mpi_mst g1.txt 2\n");
    write_job_output(dir.path(), "parallel_mst.o3", "mpi_mst g1.txt 2 1.0 extra\n");

    match plot_results(&config, IngestionMode::JobOutputs)? {
        PlotOutcome::NoData { processed_files } => assert_eq!(processed_files.len(), 3),
        other => panic!("expected no data, got {other:?}"),
    }
    assert!(!dir.path().join("logs").exists());
    Ok(())
}
