//! Line charts of mean time over process count, written as SVG.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{Palette, Palette99};

use crate::{
    aggregate::AggregatedTimes,
    io_utils::tempfile_utils::Tempfile,
    measurement::{FileId, ProcessCount},
};

pub const X_DESC: &str = "Number of Processes";
pub const Y_DESC: &str = "Time (s)";

/// The line for one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: FileId,
    /// Sorted by process count
    pub points: Vec<(ProcessCount, f64)>,
}

/// Everything that goes into one chart image.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub series: Vec<ChartSeries>,
    /// Width and height in pixels
    pub size: (u32, u32),
    pub show_legend: bool,
}

impl ChartSpec {
    /// One series per input file.
    pub fn combined(times: &AggregatedTimes, size: (u32, u32)) -> Self {
        let series = times
            .file_ids()
            .map(|file_id| ChartSeries {
                label: file_id.clone(),
                points: times.series(file_id),
            })
            .collect();
        ChartSpec {
            title: "Performance Comparison by Input File".into(),
            series,
            size,
            show_legend: true,
        }
    }

    /// Only the series for `file_id`.
    pub fn single(times: &AggregatedTimes, file_id: &FileId, size: (u32, u32)) -> Self {
        ChartSpec {
            title: format!("Performance for {file_id}"),
            series: vec![ChartSeries {
                label: file_id.clone(),
                points: times.series(file_id),
            }],
            size,
            show_legend: false,
        }
    }

    /// The x axis range, with one process count of room on each side
    /// (in u64 so that `u32::MAX` processes still fit).
    fn x_range(&self) -> std::ops::Range<u64> {
        let counts = || {
            self.series
                .iter()
                .flat_map(|s| s.points.iter().map(|(n, _)| u64::from(n.get())))
        };
        match (counts().min(), counts().max()) {
            (Some(min), Some(max)) => (min - 1)..(max + 1),
            _ => 0..2,
        }
    }

    /// From 0 to a bit above the largest mean.
    fn y_range(&self) -> std::ops::Range<f64> {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(_, t)| *t))
            .fold(0., f64::max);
        if max > 0. {
            0.0..max * 1.1
        } else {
            0.0..1.0
        }
    }

    fn draw(&self, root: &DrawingArea<SVGBackend, Shift>) -> Result<()> {
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(self.x_range(), self.y_range())?;

        chart
            .configure_mesh()
            .x_desc(X_DESC)
            .y_desc(Y_DESC)
            .draw()?;

        for (i, series) in self.series.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            let points: Vec<(u64, f64)> = series
                .points
                .iter()
                .map(|(n, t)| (u64::from(n.get()), *t))
                .collect();
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(series.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart.draw_series(
                points
                    .iter()
                    .map(|point| Circle::new(*point, 4, color.filled())),
            )?;
        }

        if self.show_legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }
        Ok(())
    }

    /// Render to `path`, via a temporary file so that a failure
    /// leaves nothing behind. All drawing state is released before
    /// returning.
    pub fn render_svg(&self, path: &Path) -> Result<()> {
        let tempfile = Tempfile::new(path)?;
        {
            let root = SVGBackend::new(&tempfile.temp_path, self.size).into_drawing_area();
            self.draw(&root)
                .with_context(|| anyhow!("drawing chart {:?}", self.title))?;
            root.present()
                .with_context(|| anyhow!("writing chart to {:?}", tempfile.temp_path))?;
        }
        tempfile.finish()?;
        Ok(())
    }
}
