//! Generic config file loader

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigBackend {
    Json5,
    Yaml,
}

impl ConfigBackend {
    pub fn load_config_file<T: DeserializeOwned>(self, path: &Path) -> Result<T> {
        let s = std::fs::read_to_string(path)
            .with_context(|| anyhow!("loading config file from {path:?}"))?;
        match self {
            ConfigBackend::Json5 => json5::from_str(&s)
                .with_context(|| anyhow!("decoding JSON5 from config file {path:?}")),
            ConfigBackend::Yaml => serde_yml::from_str(&s)
                .with_context(|| anyhow!("decoding YAML from config file {path:?}")),
        }
    }
}

pub const FILE_EXTENSIONS: &[(&str, ConfigBackend)] = &[
    ("json5", ConfigBackend::Json5),
    ("json", ConfigBackend::Json5),
    ("yml", ConfigBackend::Yaml),
    ("yaml", ConfigBackend::Yaml),
];

pub fn backend_from_path(path: &Path) -> Result<ConfigBackend> {
    let Some(ext) = path.extension() else {
        bail!(
            "given file path does not have an extension \
             for determining the file type: {path:?}"
        )
    };
    let Some(ext) = ext.to_str() else {
        bail!("given file path has an extension that is not unicode: {path:?}")
    };
    FILE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, backend)| *backend)
        .ok_or_else(|| anyhow!("given file path has an unknown extension {ext:?}: {path:?}"))
}

/// `path` with `.extension` appended to the file name (unlike
/// `Path::with_extension`, keeps any existing extension).
fn add_extension(path: &Path, extension: &str) -> Option<PathBuf> {
    let mut file_name = path.file_name()?.to_owned();
    file_name.push(".");
    file_name.push(extension);
    Some(path.with_file_name(file_name))
}

pub trait LoadConfigFile: DeserializeOwned {
    /// The extensions from `FILE_EXTENSIONS` are appended and tried
    /// in turn.
    fn default_config_path_without_suffix() -> Result<Option<PathBuf>>;

    /// If `path` is given, the file must exist or an error is
    /// returned. Otherwise the default location is checked
    /// (`default_config_path_without_suffix`) and if exactly one file
    /// with a fitting extension exists, it is loaded. If none exists,
    /// `or_else` is called with a message mentioning what was tried;
    /// it can issue an error or generate a default config value.
    fn load_config<P: AsRef<Path>>(
        path: Option<P>,
        or_else: impl FnOnce(String) -> Result<Self>,
    ) -> Result<Self> {
        if let Some(path) = path {
            let path = path.as_ref();
            let backend = backend_from_path(path)?;
            return backend.load_config_file(path);
        }
        let Some(base) = Self::default_config_path_without_suffix()? else {
            return or_else(
                "no path was given and there is no default config location".into(),
            );
        };
        let mut found = Vec::new();
        let mut tried = Vec::new();
        for (extension, backend) in FILE_EXTENSIONS {
            let path = add_extension(&base, extension)
                .ok_or_else(|| anyhow!("path is missing a file name: {base:?}"))?;
            if path.exists() {
                found.push((path.clone(), *backend));
            }
            tried.push(path);
        }
        match found.as_slice() {
            [] => or_else(format!("tried the default paths: {tried:?}")),
            [(path, backend)] => backend.load_config_file(path),
            _ => {
                let paths: Vec<_> = found.iter().map(|(path, _)| path).collect();
                bail!("multiple config file paths found, leading to ambiguity: {paths:?}")
            }
        }
    }
}
