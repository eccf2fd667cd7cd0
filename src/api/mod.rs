//! High-level, ergonomic library API: merge flags with the baseline
//! configuration, invoke the engine once, and hand back a plain
//! `CompilationResult`. Prefer these entrypoints over driving an
//! [`Engine`](crate::engine::Engine) directly.
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::params::{CompileFlags, RawFlags};
use crate::engine::{CompilationResult, Engine, EngineConfig};
use crate::error::Result;
use crate::io::externs::default_externs;
use crate::io::sources::{Extern, InputSource, SourceReader, acquire_externs, acquire_sources};
use crate::types::LanguageMode;

/// Input language assumed when flags leave it unset.
pub const DEFAULT_LANGUAGE_IN: LanguageMode = LanguageMode::Es6;

/// Flags together with the result they produced, so diagnostics can be
/// rendered against the exact buffers the engine saw.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub flags: CompileFlags,
    pub result: CompilationResult,
}

/// Compile `flags` against an explicit default extern set.
///
/// The engine is invoked exactly once. Its failures are returned unchanged.
pub fn compile_with_externs<E: Engine>(
    engine: &E,
    flags: &CompileFlags,
    defaults: &[Extern],
) -> Result<CompilationResult> {
    let externs: Vec<&Extern> = flags.externs.iter().chain(defaults).collect();
    let config = EngineConfig {
        js_code: &flags.js_code,
        externs,
        defines: &flags.defines,
        language_in: flags.language_in.unwrap_or(DEFAULT_LANGUAGE_IN),
        language_out: flags.language_out,
        compilation_level: flags.compilation_level,
        warning_level: flags.warning_level,
        create_source_map: flags.create_source_map,
        process_common_js_modules: flags.process_common_js_modules,
        default_externs: !defaults.is_empty(),
    };
    debug!(
        "Invoking engine with {} sources, {} externs, {} defines",
        config.js_code.len(),
        config.externs.len(),
        config.defines.len()
    );

    let output = engine.invoke(&config)?;
    let result = CompilationResult {
        compiled_code: output.compiled_code,
        source_map: output.source_map,
        warnings: output.warnings.into_iter().collect(),
        errors: output.errors.into_iter().collect(),
    };
    info!(
        "Compiled {} bytes with {} warnings and {} errors",
        result.compiled_code.len(),
        result.warnings.len(),
        result.errors.len()
    );
    Ok(result)
}

/// Compile `flags` with the process-wide default externs.
pub fn compile<E: Engine>(engine: &E, flags: &CompileFlags) -> Result<CompilationResult> {
    compile_with_externs(engine, flags, default_externs()?)
}

/// Read `inputs` and `externs`, append them to the buffers already in `raw`,
/// normalize, and compile.
///
/// The default externs are loaded before any read is started. Sources and
/// externs are read concurrently; the first failure abandons both.
pub async fn compile_inputs<E, R>(
    engine: &E,
    inputs: &[InputSource],
    externs: &[InputSource],
    raw: RawFlags,
    reader: Arc<R>,
) -> Result<Compilation>
where
    E: Engine,
    R: SourceReader,
{
    let defaults = default_externs()?;

    let mut flags = raw.normalize();
    // Buffers supplied inline count as inputs; stdin is only implied when there are none.
    let inline_only = inputs.is_empty() && !flags.js_code.is_empty();
    let sources = async {
        if inline_only {
            Ok(Vec::new())
        } else {
            acquire_sources(inputs, Arc::clone(&reader)).await
        }
    };
    let (sources, user_externs) =
        tokio::try_join!(sources, acquire_externs(externs, Arc::clone(&reader)))?;
    flags.js_code.extend(sources);
    flags.externs.extend(user_externs);

    let result = compile_with_externs(engine, &flags, defaults)?;
    Ok(Compilation { flags, result })
}
