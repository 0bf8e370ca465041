use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// The value of `$HOME`, which must be set.
pub fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("the HOME environment variable is not set"))
}
