//! Closure Compiler driven as a child process.
//!
//! Sources travel as a JSON stream on stdin (`--json_streams=BOTH`), externs
//! as temporary files, and diagnostics come back as JSON on stderr
//! (`--error_format=JSON`).
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{Diagnostic, Engine, EngineConfig, EngineError, EngineOutput, Severity};
use crate::core::defines::DefineValue;
use crate::io::sources::{Extern, InputBuffer};

/// Compiler command used when nothing else is configured.
pub const DEFAULT_COMPILER: &str = "google-closure-compiler";

/// Environment variable holding the compiler command line.
pub const COMPILER_ENV: &str = "CLOSUREC_COMPILER";

#[derive(Serialize)]
struct StreamInput<'a> {
    path: &'a str,
    src: &'a str,
}

#[derive(Deserialize)]
struct StreamOutput {
    #[serde(default)]
    src: String,
    #[serde(default, alias = "sourceMap")]
    source_map: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonDiagnostic {
    level: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    line: Option<i64>,
    #[serde(default)]
    column: Option<i64>,
    #[serde(default)]
    key: Option<String>,
}

/// Runs a Closure Compiler executable once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEngine {
    program: String,
    leading_args: Vec<String>,
}

impl Default for ProcessEngine {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMPILER.to_string(),
            leading_args: Vec::new(),
        }
    }
}

impl ProcessEngine {
    /// Build from a command and its leading arguments, e.g. `["java", "-jar", "compiler.jar"]`.
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = command.into_iter().map(Into::into);
        match parts.next() {
            Some(program) => Self {
                program,
                leading_args: parts.collect(),
            },
            None => Self::default(),
        }
    }

    /// Build from a whitespace-separated command line.
    pub fn from_command_line(line: &str) -> Self {
        Self::new(line.split_whitespace())
    }

    /// Use `CLOSUREC_COMPILER` when set, the default compiler otherwise.
    pub fn from_env() -> Self {
        match std::env::var(COMPILER_ENV) {
            Ok(line) if !line.trim().is_empty() => Self::from_command_line(&line),
            _ => Self::default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compiler flags for `config`, with externs already written to `extern_files`.
    pub fn arguments(&self, config: &EngineConfig<'_>, extern_files: &[PathBuf]) -> Vec<String> {
        let mut args = vec![
            "--json_streams=BOTH".to_string(),
            "--error_format=JSON".to_string(),
        ];
        // Without a default set the compiler keeps its built-in browser externs.
        if config.default_externs {
            args.push("--env=CUSTOM".to_string());
        }
        args.push(format!("--language_in={}", config.language_in.as_flag()));
        if let Some(out) = config.language_out {
            args.push(format!("--language_out={}", out.as_flag()));
        }
        if let Some(level) = config.compilation_level {
            args.push(format!("--compilation_level={}", level.as_flag()));
        }
        if let Some(level) = config.warning_level {
            args.push(format!("--warning_level={}", level.as_flag()));
        }
        for (name, value) in config.defines {
            if matches!(value, DefineValue::Undefined) {
                warn!("Skipping define {:?} without a value", name);
                continue;
            }
            args.push(format!("--define={}={}", name, value));
        }
        if config.create_source_map {
            args.push("--create_source_map=%outname%.map".to_string());
        }
        if config.process_common_js_modules {
            args.push("--process_common_js_modules".to_string());
        }
        for path in extern_files {
            args.push(format!("--externs={}", path.display()));
        }
        args
    }
}

/// Write each extern to a temporary `.js` file. Returns the files (deleted on
/// drop) and a map from temp path back to the name diagnostics should show.
fn write_extern_files(
    externs: &[&Extern],
) -> io::Result<(Vec<NamedTempFile>, HashMap<String, String>)> {
    let mut files = Vec::with_capacity(externs.len());
    let mut names = HashMap::new();
    for (index, ext) in externs.iter().enumerate() {
        let mut file = tempfile::Builder::new()
            .prefix("closurec-extern-")
            .suffix(".js")
            .tempfile()?;
        file.write_all(ext.content().as_bytes())?;
        file.flush()?;

        let shown = match ext.path() {
            Some(path) => path.to_string(),
            None => format!("default-extern-{}.js", index),
        };
        names.insert(file.path().display().to_string(), shown);
        files.push(file);
    }
    Ok((files, names))
}

/// Pull the JSON diagnostic array out of the compiler's stderr, tolerating
/// any text around it. `None` when there is no parsable array.
fn parse_diagnostics(stderr: &str) -> Option<Vec<JsonDiagnostic>> {
    let start = stderr.find('[')?;
    let mut stream =
        serde_json::Deserializer::from_str(&stderr[start..]).into_iter::<Vec<JsonDiagnostic>>();
    match stream.next() {
        Some(Ok(diagnostics)) => Some(diagnostics),
        Some(Err(e)) => {
            debug!("Compiler stderr is not a diagnostic array: {}", e);
            None
        }
        None => None,
    }
}

fn to_diagnostic(raw: JsonDiagnostic, renamed: &HashMap<String, String>) -> Option<Diagnostic> {
    let severity = match raw.level.as_str() {
        "error" => Severity::Error,
        "warning" => Severity::Warning,
        _ => return None,
    };
    let file = raw
        .source
        .filter(|s| !s.is_empty())
        .map(|s| renamed.get(&s).cloned().unwrap_or(s));
    Some(Diagnostic {
        severity,
        kind: raw.key.unwrap_or_else(|| severity.to_string()),
        description: raw.description,
        file,
        line_no: raw.line.unwrap_or(-1),
        char_no: raw.column.unwrap_or(-1),
    })
}

fn parse_stream_output(stdout: &[u8]) -> Result<(String, Option<String>), EngineError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok((String::new(), None));
    }
    let outputs: Vec<StreamOutput> = serde_json::from_slice(stdout)?;
    let mut code = String::new();
    let mut source_map = None;
    for output in outputs {
        code.push_str(&output.src);
        if let Some(map) = output.source_map.filter(|m| !m.is_empty()) {
            source_map = Some(map);
        }
    }
    let trimmed = code.trim_end_matches(['\n', '\r']).len();
    code.truncate(trimmed);
    Ok((code, source_map))
}

impl Engine for ProcessEngine {
    type Diagnostics = Vec<Diagnostic>;

    fn invoke(
        &self,
        config: &EngineConfig<'_>,
    ) -> Result<EngineOutput<Self::Diagnostics>, EngineError> {
        let (extern_files, renamed) = write_extern_files(&config.externs)?;
        let extern_paths: Vec<PathBuf> = extern_files
            .iter()
            .map(|f| f.path().to_path_buf())
            .collect();
        let args = self.arguments(config, &extern_paths);

        let inputs: Vec<StreamInput<'_>> = config
            .js_code
            .iter()
            .map(|buffer| StreamInput {
                path: buffer.display_name(),
                src: buffer.content(),
            })
            .collect();
        let payload = serde_json::to_vec(&inputs)?;

        debug!(
            "Running {} {} {}",
            self.program,
            self.leading_args.join(" "),
            args.join(" ")
        );
        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("compiler stdin is not piped"))?;

        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(&payload));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output?;
        if let Err(e) = written {
            // The compiler may stop reading early when it fails; its stderr says why.
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        drop(extern_files);

        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        for raw in parse_diagnostics(&stderr).unwrap_or_default() {
            match to_diagnostic(raw, &renamed) {
                Some(d) if d.severity == Severity::Error => errors.push(d),
                Some(d) => warnings.push(d),
                None => {}
            }
        }

        if !output.status.success() && errors.is_empty() {
            return Err(EngineError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let (compiled_code, source_map) = parse_stream_output(&output.stdout)?;
        debug!(
            "Compiler finished: {} bytes, {} warnings, {} errors",
            compiled_code.len(),
            warnings.len(),
            errors.len()
        );

        Ok(EngineOutput {
            compiled_code,
            source_map,
            warnings,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defines::{Defines, parse_defines};
    use crate::io::sources::SourceBuffer;
    use crate::types::{CompilationLevel, LanguageMode, WarningLevel};

    fn config<'a>(
        js_code: &'a [SourceBuffer],
        externs: Vec<&'a Extern>,
        defines: &'a Defines,
    ) -> EngineConfig<'a> {
        EngineConfig {
            js_code,
            externs,
            defines,
            language_in: LanguageMode::Es6,
            language_out: None,
            compilation_level: None,
            warning_level: None,
            create_source_map: false,
            process_common_js_modules: false,
            default_externs: false,
        }
    }

    #[test]
    fn command_line_splits_program_from_arguments() {
        let engine = ProcessEngine::from_command_line("java -jar  compiler.jar");
        assert_eq!(engine.program(), "java");
        assert_eq!(engine.leading_args, vec!["-jar", "compiler.jar"]);
        assert_eq!(ProcessEngine::from_command_line("  "), ProcessEngine::default());
    }

    #[test]
    fn arguments_cover_every_option() {
        let sources = [SourceBuffer::unnamed("var a;")];
        let defines = parse_defines(["DEBUG=false", "NAME='x'", "BARE"]);
        let mut cfg = config(&sources, Vec::new(), &defines);
        cfg.language_out = Some(LanguageMode::Es5);
        cfg.compilation_level = Some(CompilationLevel::Advanced);
        cfg.warning_level = Some(WarningLevel::Verbose);
        cfg.create_source_map = true;
        cfg.process_common_js_modules = true;
        cfg.default_externs = true;

        let args = ProcessEngine::default().arguments(&cfg, &[PathBuf::from("/tmp/e.js")]);
        assert_eq!(
            args,
            vec![
                "--json_streams=BOTH",
                "--error_format=JSON",
                "--env=CUSTOM",
                "--language_in=ECMASCRIPT_2015",
                "--language_out=ECMASCRIPT5",
                "--compilation_level=ADVANCED",
                "--warning_level=VERBOSE",
                "--define=DEBUG=false",
                "--define=NAME='x'",
                "--create_source_map=%outname%.map",
                "--process_common_js_modules",
                "--externs=/tmp/e.js",
            ]
        );
    }

    #[test]
    fn builtin_environment_kept_without_default_externs() {
        let sources = [SourceBuffer::unnamed("console.log(1);")];
        let user = Extern::new("lib.js", "var lib;");
        let defines = Defines::new();
        let cfg = config(&sources, vec![&user], &defines);

        let args = ProcessEngine::default().arguments(&cfg, &[PathBuf::from("/tmp/lib.js")]);
        assert!(!args.iter().any(|a| a.starts_with("--env")), "{args:?}");
        assert!(args.contains(&"--externs=/tmp/lib.js".to_string()));
    }

    #[test]
    fn diagnostics_are_found_inside_surrounding_text() {
        let stderr = "note: starting\n[{\"level\":\"error\",\"description\":\"Parse error.\",\
                      \"source\":\"a.js\",\"line\":2,\"column\":4,\"key\":\"JSC_PARSE_ERROR\"},\
                      {\"level\":\"info\",\"description\":\"ignored\"}]\n1 error(s)\n";
        let parsed = parse_diagnostics(stderr).unwrap();
        assert_eq!(parsed.len(), 2);

        let diagnostics: Vec<Diagnostic> = parsed
            .into_iter()
            .filter_map(|d| to_diagnostic(d, &HashMap::new()))
            .collect();
        assert_eq!(
            diagnostics,
            vec![Diagnostic::error("JSC_PARSE_ERROR", "Parse error.").at("a.js", 2, 4)]
        );
    }

    #[test]
    fn extern_temp_paths_are_renamed() {
        let mut renamed = HashMap::new();
        renamed.insert("/tmp/closurec-extern-1.js".to_string(), "dom.js".to_string());
        let raw = JsonDiagnostic {
            level: "warning".into(),
            description: "dup".into(),
            source: Some("/tmp/closurec-extern-1.js".into()),
            line: None,
            column: None,
            key: None,
        };
        let diagnostic = to_diagnostic(raw, &renamed).unwrap();
        assert_eq!(diagnostic.file.as_deref(), Some("dom.js"));
        assert_eq!(diagnostic.kind, "warning");
        assert_eq!(diagnostic.line_no, -1);
    }

    #[test]
    fn garbage_stderr_has_no_diagnostics() {
        assert!(parse_diagnostics("Exception in thread [main]").is_none());
        assert!(parse_diagnostics("").is_none());
    }

    #[test]
    fn stream_output_is_concatenated_and_trimmed() {
        let stdout = br#"[{"src":"var x=3;\n","path":"compiled.js","source_map":"{}"}]"#;
        let (code, map) = parse_stream_output(stdout).unwrap();
        assert_eq!(code, "var x=3;");
        assert_eq!(map.as_deref(), Some("{}"));
        assert_eq!(parse_stream_output(b"\n").unwrap(), (String::new(), None));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let engine = ProcessEngine::new(["closurec-test-no-such-compiler"]);
        let defines = Defines::new();
        let err = engine.invoke(&config(&[], Vec::new(), &defines)).unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn runs_a_compiler_script() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-compiler.sh");
        std::fs::write(
            &script,
            concat!(
                "cat > /dev/null\n",
                "printf '%s\\n' '[{\"src\":\"var x=3;\\n\",\"path\":\"compiled.js\"}]'\n",
                "printf '%s\\n' '[{\"level\":\"warning\",\"description\":\"unused\",",
                "\"source\":\"stdin\",\"line\":1,\"column\":6,\"key\":\"JSC_UNUSED\"}]' >&2\n",
            ),
        )
        .unwrap();

        let engine = ProcessEngine::new(["sh".to_string(), script.display().to_string()]);
        let sources = [SourceBuffer::unnamed("const x = 1 + 2;")];
        let ext = Extern::new("dom.js", "var document;");
        let defines = Defines::new();
        let output = engine
            .invoke(&config(&sources, vec![&ext], &defines))
            .unwrap();

        assert_eq!(output.compiled_code, "var x=3;");
        assert!(output.errors.is_empty());
        assert_eq!(
            output.warnings,
            vec![Diagnostic::warning("JSC_UNUSED", "unused").at("stdin", 1, 6)]
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_compiler_without_diagnostics_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("broken.sh");
        std::fs::write(&script, "cat > /dev/null\necho 'out of memory' >&2\nexit 3\n").unwrap();

        let engine = ProcessEngine::new(["sh".to_string(), script.display().to_string()]);
        let defines = Defines::new();
        let err = engine.invoke(&config(&[], Vec::new(), &defines)).unwrap_err();
        match err {
            EngineError::Failed { stderr, .. } => assert_eq!(stderr, "out of memory"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
