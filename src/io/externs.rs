//! Bundled default externs.
//!
//! The set is loaded once per process from a directory of `*.js` files and
//! shared read-only by every compilation afterwards. Callers that read inputs
//! concurrently should initialize it first.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::io::sources::Extern;

/// Default location of the bundled externs, relative to the working directory.
pub const DEFAULT_EXTERNS_DIR: &str = "externs";

/// Environment variable overriding [`DEFAULT_EXTERNS_DIR`].
pub const EXTERNS_DIR_ENV: &str = "CLOSUREC_EXTERNS_DIR";

static DEFAULT_EXTERNS: OnceCell<Vec<Extern>> = OnceCell::new();

/// Directory the default externs are loaded from when none is given.
pub fn default_externs_dir() -> PathBuf {
    std::env::var_os(EXTERNS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXTERNS_DIR))
}

/// Load every `*.js` file in `dir` as a path-less extern, ordered by file name.
///
/// A directory that does not exist yields an empty set.
pub fn load_externs(dir: &Path) -> Result<Vec<Extern>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No default externs directory at {:?}", dir);
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(Error::Externs {
                dir: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Externs {
            dir: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "js") {
            files.push(path);
        }
    }
    files.sort();

    let mut externs = Vec::with_capacity(files.len());
    for path in files {
        let content = fs::read_to_string(&path).map_err(|source| Error::Externs {
            dir: dir.to_path_buf(),
            source,
        })?;
        externs.push(Extern::unnamed(content));
    }

    info!("Loaded {} default externs from {:?}", externs.len(), dir);
    Ok(externs)
}

/// Initialize the process-wide default externs from `dir`.
///
/// Only the first successful call loads anything; later calls return the
/// cached set regardless of `dir`.
pub fn init_default_externs(dir: &Path) -> Result<&'static [Extern]> {
    DEFAULT_EXTERNS
        .get_or_try_init(|| load_externs(dir))
        .map(Vec::as_slice)
}

/// The process-wide default externs, loading them from
/// [`default_externs_dir`] on first use.
pub fn default_externs() -> Result<&'static [Extern]> {
    if let Some(externs) = DEFAULT_EXTERNS.get() {
        return Ok(externs);
    }
    init_default_externs(&default_externs_dir())
}
