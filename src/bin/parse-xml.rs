use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use mst_bench_tools::get_terminal_width::get_terminal_width;
use mst_bench_tools::graph_xml::convert_xml_file;
use mst_bench_tools::info;
use mst_bench_tools::utillib::logging::{set_log_level, LogLevelOpt};

include!("../../include/mst_bench_version.rs");

/// Convert an XML graph description (`<node>` and `<edge source
/// target weight>` elements) to an edge list text file next to it,
/// with the extension replaced by `.txt`.
#[derive(clap::Parser, Debug)]
#[clap(version = MST_BENCH_VERSION)]
#[clap(next_line_help = true)]
#[clap(set_term_width = get_terminal_width(4))]
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpt,

    /// The XML file to convert
    xml_file: PathBuf,
}

fn main() -> Result<()> {
    let Opts {
        log_level,
        xml_file,
    } = Opts::parse();

    set_log_level(log_level.try_into()?);

    let out_path = convert_xml_file(&xml_file)?;
    info!("wrote {out_path:?}");

    Ok(())
}
