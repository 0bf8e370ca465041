// Use logging library instead?

use std::{
    io::{stderr, StderrLock, Write},
    sync::atomic::{AtomicU8, Ordering},
    time::SystemTime,
};

use anyhow::{bail, Result};
use chrono::{DateTime, Local, SecondsFormat};

/// Start a log line on stderr: timestamp and source location. The
/// caller writes the message into the returned lock.
pub fn write_time(file: &str, line: u32, column: u32) -> StderrLock<'static> {
    let t: DateTime<Local> = SystemTime::now().into();
    let t_str = t.to_rfc3339_opts(SecondsFormat::Millis, false);
    let mut lock = stderr().lock();
    write!(&mut lock, "{t_str}\t{file}:{line}:{column}\t").expect("stderr must not fail");
    lock
}

// Do *not* make the fields public here to force going through `TryFrom`, OK?
#[derive(Debug, clap::Args)]
pub struct LogLevelOpt {
    /// Show which files are being read and written
    #[clap(short, long)]
    verbose: bool,

    /// Show information that helps debug this program (implies
    /// `--verbose`)
    #[clap(short, long)]
    debug: bool,

    /// Disable warnings (e.g. about finding no data). Conflicts with
    /// `--verbose` and `--debug`.
    #[clap(short, long)]
    quiet: bool,
}

impl TryFrom<LogLevelOpt> for LogLevel {
    type Error = anyhow::Error;

    fn try_from(value: LogLevelOpt) -> Result<Self> {
        let LogLevelOpt {
            verbose,
            debug,
            quiet,
        } = value;
        match (verbose, debug, quiet) {
            (false, false, false) => Ok(LogLevel::Warn),
            (true, false, false) => Ok(LogLevel::Info),
            (_, true, false) => Ok(LogLevel::Debug),
            (false, false, true) => Ok(LogLevel::Quiet),
            (_, _, true) => {
                bail!("option `--quiet` conflicts with the options `--verbose` and `--debug`")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Do not log anything
    Quiet = 0,
    /// The default, only `warn!` statements output anything
    Warn = 1,
    /// Report the files that are read and written
    Info = 2,
    /// Highest amount of log statements, for debugging this program
    Debug = 3,
}

impl LogLevel {
    fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(LogLevel::Quiet),
            1 => Some(LogLevel::Warn),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

static LOGLEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);

pub fn set_log_level(val: LogLevel) {
    LOGLEVEL.store(val as u8, Ordering::Relaxed);
}

#[inline]
pub fn log_level() -> LogLevel {
    let level = LOGLEVEL.load(Ordering::Relaxed);
    LogLevel::from_level(level).expect("no possibility to store invalid u8")
}

#[macro_export]
macro_rules! warn {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Warn {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}

#[macro_export]
macro_rules! info {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Info {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}

#[macro_export]
macro_rules! debug {
    { $($arg:tt)* } => {
        if $crate::utillib::logging::log_level() >= $crate::utillib::logging::LogLevel::Debug {
            use std::io::Write;
            let mut lock = $crate::utillib::logging::write_time(file!(), line!(), column!());
            writeln!(&mut lock, $($arg)*).expect("stderr must not fail");
        }
    }
}

#[test]
fn t_levels() {
    for i in 0..=3 {
        let level = LogLevel::from_level(i).expect("valid level");
        assert_eq!(level as u8, i);
    }
    assert_eq!(LogLevel::from_level(4), None);
    assert!(LogLevel::Debug > LogLevel::Info);
    assert!(LogLevel::Quiet < LogLevel::Warn);
}

#[test]
fn t_log_level_opt() {
    let opt = |verbose, debug, quiet| LogLevelOpt {
        verbose,
        debug,
        quiet,
    };
    assert_eq!(LogLevel::try_from(opt(false, false, false)).unwrap(), LogLevel::Warn);
    assert_eq!(LogLevel::try_from(opt(true, false, false)).unwrap(), LogLevel::Info);
    assert_eq!(LogLevel::try_from(opt(true, true, false)).unwrap(), LogLevel::Debug);
    assert_eq!(LogLevel::try_from(opt(false, false, true)).unwrap(), LogLevel::Quiet);
    assert!(LogLevel::try_from(opt(true, false, true)).is_err());
}
