use clap::{ArgAction, Parser};
use std::path::PathBuf;

use closurec::{ColorMode, CompilationLevel, LanguageMode, WarningLevel};

#[derive(Parser, Debug)]
#[command(
    name = "closurec",
    version,
    about = "Compile JavaScript with the Closure Compiler and report diagnostics against your sources",
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Input files. `-` or no files at all reads standard input
    #[arg(value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Extern declaration file (repeatable)
    #[arg(long = "externs", value_name = "PATH")]
    pub externs: Vec<PathBuf>,

    /// Compile-time constant override, e.g. DEBUG=false (repeatable)
    #[arg(long = "defines", value_name = "NAME=VALUE")]
    pub defines: Vec<String>,

    /// Append an inline base64 source map to the output
    #[arg(long = "createSourceMap", default_value_t = false)]
    pub create_source_map: bool,

    /// Optimization level
    #[arg(long = "compilationLevel", value_enum)]
    pub compilation_level: Option<CompilationLevel>,

    /// Diagnostic verbosity
    #[arg(long = "warningLevel", value_enum)]
    pub warning_level: Option<WarningLevel>,

    /// Input language level (default ES6)
    #[arg(long = "languageIn", value_enum)]
    pub language_in: Option<LanguageMode>,

    /// Output language level
    #[arg(long = "languageOut", value_enum)]
    pub language_out: Option<LanguageMode>,

    /// Rewrite CommonJS `require()` modules
    #[arg(long = "processCommonJsModules", default_value_t = false)]
    pub process_common_js_modules: bool,

    /// JSON file with compiler options (jsCode, externs, defines, compilationLevel, ...)
    #[arg(long, value_name = "FILE")]
    pub flagfile: Option<PathBuf>,

    /// Compiler command line (default: $CLOSUREC_COMPILER or google-closure-compiler)
    #[arg(long, value_name = "COMMAND")]
    pub compiler: Option<String>,

    /// Directory of default extern files (default: $CLOSUREC_EXTERNS_DIR or ./externs)
    #[arg(long = "externs-dir", value_name = "DIR")]
    pub externs_dir: Option<PathBuf>,

    /// Colorize diagnostics
    #[arg(long, value_enum, default_value_t = ColorMode::Always)]
    pub color: ColorMode,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
