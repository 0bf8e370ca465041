pub mod aggregate;
pub mod chart;
pub mod config_file;
pub mod get_terminal_width;
pub mod graph_xml;
pub mod io_utils;
pub mod job_output;
pub mod measurement;
pub mod pipeline;
pub mod plot_config;
pub mod proper_filename;
pub mod results_log;
pub mod utillib;
