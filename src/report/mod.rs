//! Diagnostic reporting.
//!
//! Renders engine warnings and errors against the buffers they were reported
//! in: a header, the description, up to four lines of context either side of
//! the offending line, and a caret under the reported column. Warnings are
//! written first so errors end up last on screen.
use std::io::{self, Write};

use crate::engine::{CompilationResult, Diagnostic, Severity};
use crate::io::sources::{Extern, InputBuffer, SourceBuffer};
use crate::types::ColorMode;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[91m"; // Bright red
    pub const WARNING: &str = "\x1b[93m"; // Bright yellow
    pub const CARET: &str = "\x1b[92m"; // Bright green
    pub const RESET: &str = "\x1b[0m";
}

/// Lines of context shown before and after the offending line.
pub const MAX_CONTEXT_LINES: usize = 4;

/// Whether `result` should fail the build. Warnings alone never do.
pub fn has_fatal_errors(result: &CompilationResult) -> bool {
    !result.errors.is_empty()
}

/// Blank out everything in the first `char_no` UTF-16 code units of `line`
/// except tabs, so a caret appended to it lines up under the reported column.
pub fn caret_prefix(line: &str, char_no: i64) -> String {
    const TAB: u16 = b'\t' as u16;
    let width = usize::try_from(char_no).unwrap_or(0);
    line.encode_utf16()
        .take(width)
        .map(|unit| if unit == TAB { '\t' } else { ' ' })
        .collect()
}

/// Find the content a diagnostic was reported against.
///
/// A lone buffer is used whatever its path. Otherwise sources are searched
/// before externs, since the same name may appear in both.
pub fn resolve_buffer<'a>(
    file: Option<&str>,
    sources: &'a [SourceBuffer],
    externs: &'a [Extern],
) -> Option<&'a str> {
    let file = file?;
    match (sources, externs) {
        ([only], []) => return Some(only.content()),
        ([], [only]) => return Some(only.content()),
        _ => {}
    }
    sources
        .iter()
        .find(|b| b.matches(file))
        .map(InputBuffer::content)
        .or_else(|| externs.iter().find(|b| b.matches(file)).map(InputBuffer::content))
}

/// Writes caret-annotated diagnostics to a line-oriented sink.
pub struct DiagnosticRenderer<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> DiagnosticRenderer<W> {
    pub fn new(writer: W, mode: ColorMode) -> Self {
        Self {
            writer,
            colors: mode.enabled(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.colors {
            format!("{color}{text}{}", colors::RESET)
        } else {
            text.to_string()
        }
    }

    /// Render every warning, then every error.
    pub fn render(
        &mut self,
        result: &CompilationResult,
        sources: &[SourceBuffer],
        externs: &[Extern],
    ) -> io::Result<()> {
        for diagnostic in result.warnings.iter().chain(&result.errors) {
            self.render_diagnostic(diagnostic, sources, externs)?;
        }
        self.writer.flush()
    }

    pub fn render_diagnostic(
        &mut self,
        diagnostic: &Diagnostic,
        sources: &[SourceBuffer],
        externs: &[Extern],
    ) -> io::Result<()> {
        match diagnostic.file.as_deref() {
            None if diagnostic.line_no < 0 => writeln!(self.writer, "{}", diagnostic.kind)?,
            file => writeln!(
                self.writer,
                "{}:{} ({})",
                file.unwrap_or("null"),
                diagnostic.line_no,
                diagnostic.kind
            )?,
        }
        writeln!(self.writer, "{}", diagnostic.description)?;

        if let Some(content) = resolve_buffer(diagnostic.file.as_deref(), sources, externs) {
            self.write_context(diagnostic, content)?;
        }
        writeln!(self.writer)
    }

    fn write_context(&mut self, diagnostic: &Diagnostic, content: &str) -> io::Result<()> {
        let lines: Vec<&str> = content.split('\n').collect();
        let index = usize::try_from(diagnostic.line_no - 1).ok();

        // Leading context is all or nothing: fewer than four preceding lines show none.
        if let Some(start) = index.and_then(|i| i.checked_sub(MAX_CONTEXT_LINES)) {
            for line in lines.iter().skip(start).take(MAX_CONTEXT_LINES) {
                writeln!(self.writer, "{}", line)?;
            }
        }

        let line = index.and_then(|i| lines.get(i).copied()).unwrap_or("");
        let color = match diagnostic.severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
        };
        let caret = format!("{}^", caret_prefix(line, diagnostic.char_no));
        writeln!(self.writer, "{}", self.paint(line, color))?;
        writeln!(self.writer, "{}", self.paint(&caret, colors::CARET))?;

        if let Some(index) = index {
            for line in lines.iter().skip(index + 1).take(MAX_CONTEXT_LINES) {
                writeln!(self.writer, "{}", line)?;
            }
        }
        Ok(())
    }
}

/// Render `result` to `writer` and report whether it should fail the build.
pub fn report<W: Write>(
    writer: W,
    result: &CompilationResult,
    sources: &[SourceBuffer],
    externs: &[Extern],
    mode: ColorMode,
) -> io::Result<bool> {
    DiagnosticRenderer::new(writer, mode).render(result, sources, externs)?;
    Ok(has_fatal_errors(result))
}
