//! Boundary to the external optimizing compiler.
//!
//! The engine is an opaque capability: it takes one [`EngineConfig`] and
//! returns compiled code plus diagnostics. [`process::ProcessEngine`] drives a
//! Closure Compiler executable; tests substitute their own implementations.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::defines::Defines;
use crate::io::sources::{Extern, SourceBuffer};
use crate::types::{CompilationLevel, LanguageMode, WarningLevel};

pub mod process;
pub use process::ProcessEngine;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single warning or error reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Engine diagnostic key, e.g. `JSC_UNDEFINED_VARIABLE`.
    pub kind: String,
    pub description: String,
    pub file: Option<String>,
    /// 1-based; negative when unknown.
    pub line_no: i64,
    /// 0-based column; negative when unknown.
    pub char_no: i64,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity,
            kind: kind.into(),
            description: description.into(),
            file: None,
            line_no: -1,
            char_no: -1,
        }
    }

    pub fn warning(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, description)
    }

    pub fn error(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, description)
    }

    /// Attach a source location.
    pub fn at(mut self, file: impl Into<String>, line_no: i64, char_no: i64) -> Self {
        self.file = Some(file.into());
        self.line_no = line_no;
        self.char_no = char_no;
        self
    }
}

/// Outcome of one engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationResult {
    pub compiled_code: String,
    pub source_map: Option<String>,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

/// Everything handed to the engine for a single invocation.
#[derive(Debug, Clone)]
pub struct EngineConfig<'a> {
    pub js_code: &'a [SourceBuffer],
    /// User externs first, then the default set.
    pub externs: Vec<&'a Extern>,
    pub defines: &'a Defines,
    pub language_in: LanguageMode,
    pub language_out: Option<LanguageMode>,
    pub compilation_level: Option<CompilationLevel>,
    pub warning_level: Option<WarningLevel>,
    pub create_source_map: bool,
    pub process_common_js_modules: bool,
    /// A default extern set is part of `externs` and stands in for the
    /// compiler's built-in environment.
    pub default_externs: bool,
}

/// Raw engine output. Diagnostic collections are whatever the engine hands
/// back; the adapter copies them into plain vectors.
#[derive(Debug)]
pub struct EngineOutput<D> {
    pub compiled_code: String,
    pub source_map: Option<String>,
    pub warnings: D,
    pub errors: D,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running the compiler: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed compiler output: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("compiler exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// The optimizing compiler, invoked once per compilation.
pub trait Engine {
    type Diagnostics: IntoIterator<Item = Diagnostic>;

    fn invoke(&self, config: &EngineConfig<'_>)
    -> Result<EngineOutput<Self::Diagnostics>, EngineError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    type Diagnostics = E::Diagnostics;

    fn invoke(
        &self,
        config: &EngineConfig<'_>,
    ) -> Result<EngineOutput<Self::Diagnostics>, EngineError> {
        (**self).invoke(config)
    }
}
