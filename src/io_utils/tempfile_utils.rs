//! Writing output files via a temporary file in the same directory
//! that is renamed into place once complete, so that readers (and
//! failed runs) never leave a half-written target behind.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use nix::unistd::getpid;

use crate::info;

#[derive(Debug, thiserror::Error)]
pub enum TempfileError {
    #[error("path is missing file name part")]
    MissingFileName,
    #[error("IO error while {0}: {1:#}")]
    IOError(&'static str, std::io::Error),
}

/// Append a suffix `.tmp~<pid>` to the file name of `target_path`.
pub fn temp_path(target_path: impl AsRef<Path>) -> Result<PathBuf, TempfileError> {
    let target_path = target_path.as_ref();
    let file_name = target_path
        .file_name()
        .ok_or(TempfileError::MissingFileName)?;
    let mut file_name = file_name.to_owned();
    file_name.push(format!(".tmp~{}", getpid()));
    Ok(target_path.with_file_name(file_name))
}

/// A temporary path for `target_path`. Removed on drop unless
/// `finish` was called.
#[derive(Debug)]
pub struct Tempfile {
    pub target_path: PathBuf,
    pub temp_path: PathBuf,
    finished: bool,
}

impl Tempfile {
    pub fn new(target_path: impl Into<PathBuf>) -> Result<Self, TempfileError> {
        let target_path = target_path.into();
        let temp_path = temp_path(&target_path)?;
        Ok(Tempfile {
            target_path,
            temp_path,
            finished: false,
        })
    }

    /// Rename the temporary file to the target path.
    pub fn finish(mut self) -> Result<(), TempfileError> {
        std::fs::rename(&self.temp_path, &self.target_path)
            .map_err(|e| TempfileError::IOError("renaming to target", e))?;
        // tell Drop that it should do nothing
        self.finished = true;
        Ok(())
    }
}

impl Drop for Tempfile {
    fn drop(&mut self) {
        if !self.finished {
            match std::fs::remove_file(&self.temp_path) {
                Ok(()) => (),
                Err(e) => match e.kind() {
                    std::io::ErrorKind::NotFound => (),
                    _ => info!("error deleting temporary file {:?}: {e:#}", self.temp_path),
                },
            }
        }
    }
}

/// Create the file at `target_path` with the contents written by
/// `write`, via a temporary file.
pub fn write_file_atomically(
    target_path: impl Into<PathBuf>,
    write: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<(), TempfileError> {
    let tempfile = Tempfile::new(target_path)?;
    let file = File::create(&tempfile.temp_path)
        .map_err(|e| TempfileError::IOError("creating temporary file", e))?;
    let mut out = BufWriter::new(file);
    write(&mut out).map_err(|e| TempfileError::IOError("writing temporary file", e))?;
    let file = out
        .into_inner()
        .map_err(|e| TempfileError::IOError("flushing temporary file", e.into_error()))?;
    file.sync_all()
        .map_err(|e| TempfileError::IOError("syncing temporary file", e))?;
    drop(file);
    tempfile.finish()
}
