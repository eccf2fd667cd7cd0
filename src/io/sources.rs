//! Input acquisition: resolves logical inputs (file paths or standard input)
//! into in-memory buffers.
//!
//! Reads are issued concurrently, one task per input, and each completion is
//! stored in the slot matching the input's position. The returned sequence
//! therefore mirrors the caller's order no matter which read finishes first.
use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Name used for a buffer that has no path (standard input, bundled externs).
pub const STDIN_NAME: &str = "stdin";

/// Command-line spelling of the standard-input sentinel.
pub const STDIN_SENTINEL: &str = "-";

/// A unit of source text fed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBuffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(alias = "src")]
    pub content: String,
}

/// Declaration-only input. Shaped like a `SourceBuffer`, but never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(alias = "src")]
    pub content: String,
}

/// Common view over source and extern buffers.
pub trait InputBuffer {
    fn from_parts(path: Option<String>, content: String) -> Self
    where
        Self: Sized;

    fn path(&self) -> Option<&str>;

    fn content(&self) -> &str;

    /// Name shown to the engine and in diagnostics.
    fn display_name(&self) -> &str {
        self.path().unwrap_or(STDIN_NAME)
    }

    /// Whether a diagnostic reported against `file` refers to this buffer.
    fn matches(&self, file: &str) -> bool {
        match self.path() {
            Some(path) => path == file,
            None => file == STDIN_NAME,
        }
    }
}

impl SourceBuffer {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            content: content.into(),
        }
    }

    /// A buffer without a path, as read from standard input.
    pub fn unnamed(content: impl Into<String>) -> Self {
        Self {
            path: None,
            content: content.into(),
        }
    }
}

impl Extern {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            content: content.into(),
        }
    }

    pub fn unnamed(content: impl Into<String>) -> Self {
        Self {
            path: None,
            content: content.into(),
        }
    }
}

impl InputBuffer for SourceBuffer {
    fn from_parts(path: Option<String>, content: String) -> Self {
        Self { path, content }
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

impl InputBuffer for Extern {
    fn from_parts(path: Option<String>, content: String) -> Self {
        Self { path, content }
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// A logical input identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Path recorded on the resulting buffer; `None` for standard input.
    pub fn buffer_path(&self) -> Option<String> {
        match self {
            InputSource::Stdin => None,
            InputSource::File(path) => Some(path.display().to_string()),
        }
    }
}

impl From<&str> for InputSource {
    fn from(value: &str) -> Self {
        if value == STDIN_SENTINEL {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(value))
        }
    }
}

impl From<&Path> for InputSource {
    fn from(value: &Path) -> Self {
        if value.as_os_str() == STDIN_SENTINEL {
            InputSource::Stdin
        } else {
            InputSource::File(value.to_path_buf())
        }
    }
}

impl From<PathBuf> for InputSource {
    fn from(value: PathBuf) -> Self {
        InputSource::from(value.as_path())
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "{}", STDIN_NAME),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Capability for reading one input to a string.
pub trait SourceReader: Send + Sync + 'static {
    fn read(&self, source: &InputSource) -> impl Future<Output = io::Result<String>> + Send;
}

/// Reads files through tokio and drains standard input to end-of-stream.
///
/// Standard input can only be consumed once, so the drained text is kept and
/// handed to every `-` in the input list.
#[derive(Debug, Default)]
pub struct FsReader {
    stdin: tokio::sync::OnceCell<String>,
}

impl FsReader {
    pub fn new() -> Self {
        Self::default()
    }
}

async fn drain_stdin() -> io::Result<String> {
    let mut stdin = tokio::io::stdin();
    let mut buf = Vec::new();
    let mut chunk = vec![0u8; 8 * 1024];
    loop {
        let n = stdin.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

impl SourceReader for FsReader {
    fn read(&self, source: &InputSource) -> impl Future<Output = io::Result<String>> + Send {
        async move {
            match source {
                InputSource::Stdin => self.stdin.get_or_try_init(drain_stdin).await.cloned(),
                InputSource::File(path) => tokio::fs::read_to_string(path).await,
            }
        }
    }
}

/// Read every input concurrently and return the buffers in input order.
///
/// The first failure cancels the reads still in flight and is returned as a
/// single error naming the failing input; no partial result is produced.
pub async fn acquire<B, R>(inputs: &[InputSource], reader: Arc<R>) -> Result<Vec<B>>
where
    B: InputBuffer,
    R: SourceReader,
{
    let mut slots: Vec<Option<B>> = inputs.iter().map(|_| None).collect();
    let mut tasks = JoinSet::new();

    for (index, source) in inputs.iter().cloned().enumerate() {
        let reader = Arc::clone(&reader);
        tasks.spawn(async move {
            let result = reader.read(&source).await;
            (index, source, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, source, result) = joined.map_err(|e| Error::Io(io::Error::other(e)))?;
        match result {
            Ok(content) => {
                debug!("Read {} ({} bytes)", source, content.len());
                slots[index] = Some(B::from_parts(source.buffer_path(), content));
            }
            Err(e) => {
                warn!("Failed to read {}: {}", source, e);
                tasks.abort_all();
                return Err(Error::read(source.to_string(), e));
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Acquire the compilation sources. An empty list means standard input.
pub async fn acquire_sources<R: SourceReader>(
    inputs: &[InputSource],
    reader: Arc<R>,
) -> Result<Vec<SourceBuffer>> {
    if inputs.is_empty() {
        return acquire(&[InputSource::Stdin], reader).await;
    }
    acquire(inputs, reader).await
}

/// Acquire user-supplied externs. An empty list stays empty.
pub async fn acquire_externs<R: SourceReader>(
    inputs: &[InputSource],
    reader: Arc<R>,
) -> Result<Vec<Extern>> {
    acquire(inputs, reader).await
}
