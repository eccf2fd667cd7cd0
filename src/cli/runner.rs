use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use closurec::api::compile_inputs;
use closurec::core::defines::{RawDefines, normalize_defines, parse_defines};
use closurec::io::externs::default_externs_dir;
use closurec::{
    FsReader, InputSource, ProcessEngine, RawFlags, init_default_externs, report, write_compiled,
};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_flagfile(path: &Path) -> Result<RawFlags, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::Flagfile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AppError::FlagfileFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Flag-file options overridden by whatever was given on the command line.
/// Command-line defines are applied after flag-file defines.
pub fn build_flags(args: &CliArgs) -> Result<RawFlags, AppError> {
    let mut raw = match &args.flagfile {
        Some(path) => load_flagfile(path)?,
        None => RawFlags::default(),
    };

    if !args.defines.is_empty() {
        let mut defines = normalize_defines(raw.defines.take());
        defines.extend(parse_defines(&args.defines));
        raw.defines = Some(RawDefines::Typed(defines));
    }
    raw.compilation_level = args.compilation_level.or(raw.compilation_level);
    raw.warning_level = args.warning_level.or(raw.warning_level);
    raw.language_in = args.language_in.or(raw.language_in);
    raw.language_out = args.language_out.or(raw.language_out);
    raw.create_source_map |= args.create_source_map;
    raw.process_common_js_modules |= args.process_common_js_modules;

    Ok(raw)
}

pub async fn run(args: CliArgs) -> Result<ExitCode, AppError> {
    if args.log {
        init_logging();
    }

    let engine = match &args.compiler {
        Some(line) => ProcessEngine::from_command_line(line),
        None => ProcessEngine::from_env(),
    };
    info!("Using compiler: {}", engine.program());

    // Loaded before any input read is spawned.
    let externs_dir = args.externs_dir.clone().unwrap_or_else(default_externs_dir);
    init_default_externs(&externs_dir)?;

    let raw = build_flags(&args)?;
    let inputs: Vec<InputSource> = args
        .inputs
        .iter()
        .map(|p| InputSource::from(p.as_path()))
        .collect();
    let externs: Vec<InputSource> = args
        .externs
        .iter()
        .map(|p| InputSource::from(p.as_path()))
        .collect();
    debug!("Inputs: {:?}", inputs);

    let compilation =
        compile_inputs(&engine, &inputs, &externs, raw, Arc::new(FsReader::new())).await?;

    let failed = report(
        io::stderr().lock(),
        &compilation.result,
        &compilation.flags.js_code,
        &compilation.flags.externs,
        args.color,
    )?;

    if failed {
        info!("Compilation failed with {} errors", compilation.result.errors.len());
        return Ok(ExitCode::FAILURE);
    }

    write_compiled(io::stdout().lock(), &compilation.result)?;
    Ok(ExitCode::SUCCESS)
}
