#![doc = r##"
closurec: a front end for the Closure Compiler.

This crate feeds JavaScript sources to an external optimizing compiler and turns
its raw results into actionable output: compiled code on one channel, and
warnings/errors rendered against your own source text (with context lines and a
caret under the reported column) on another. It powers the `closurec` CLI and can
be embedded in your own Rust tools.

The compiler itself is an external collaborator behind the [`Engine`] trait.
[`ProcessEngine`] drives a Closure Compiler executable
(`google-closure-compiler`, or whatever `CLOSUREC_COMPILER` names).

Stability
---------
The public library API is experimental in initial releases and may evolve.

Quick start: compile in-memory sources
--------------------------------------
```rust,no_run
use closurec::{CompilationLevel, CompileFlags, ProcessEngine, SourceBuffer, compile};

fn main() -> closurec::Result<()> {
    let mut flags = CompileFlags::with_sources(vec![
        SourceBuffer::new("app.js", "const x = 1 + 2;"),
    ]);
    flags.compilation_level = Some(CompilationLevel::Advanced);

    let result = compile(&ProcessEngine::from_env(), &flags)?;
    println!("{}", result.compiled_code);
    Ok(())
}
```

Loose flags and `defines`
-------------------------
`defines` may be given as one string, a list of strings, or a typed map. Values
are inferred as booleans, then numbers, and otherwise kept verbatim (quotes
included).

```rust
use closurec::{DefineValue, RawFlags};

let raw = RawFlags::from_json(r#"{"defines": ["DEBUG=false", "LEVEL=2", "NAME=\"app\""]}"#).unwrap();
let flags = raw.normalize();
assert_eq!(flags.defines["DEBUG"], DefineValue::Bool(false));
assert_eq!(flags.defines["LEVEL"], DefineValue::Number(2.0));
assert_eq!(flags.defines["NAME"], DefineValue::String("\"app\"".into()));
```

Rendering diagnostics
---------------------
```rust
use closurec::{ColorMode, CompilationResult, Diagnostic, SourceBuffer, report};

let sources = [SourceBuffer::new("a.js", "var x = 1;\nif (x)\nconsole.info(1);")];
let result = CompilationResult {
    errors: vec![Diagnostic::error("JSC_EXAMPLE", "example").at("a.js", 2, 4)],
    ..Default::default()
};

let mut out = Vec::new();
let failed = report(&mut out, &result, &sources, &[], ColorMode::Never).unwrap();
assert!(failed);
assert!(String::from_utf8(out).unwrap().contains("if (x)\n    ^\n"));
```

Error handling
--------------
All fallible library functions return `closurec::Result<T>`; match on
`closurec::Error` to handle specific cases such as unreadable inputs or
compiler failures.

Useful modules
--------------
- [`api`]: high-level entry points (compile flags, or read inputs and compile).
- [`io`]: concurrent input acquisition, default externs, output channel.
- [`core`]: loose and normalized flags, `defines` parsing.
- [`engine`]: the compiler boundary and the process-backed engine.
- [`report`]: diagnostic rendering and the pass/fail decision.
- [`types`]: option enums (`CompilationLevel`, `WarningLevel`, `LanguageMode`, `ColorMode`).
- [`error`]: crate-level `Error` and `Result`.
"##]

// Core modules (public)
pub mod api;
pub mod core;
pub mod engine;
pub mod error;
pub mod io;
pub mod report;
pub mod types;

// Curated public API surface
// Types
pub use core::defines::{DefineValue, Defines, RawDefines};
pub use core::params::{CompileFlags, RawFlags};
pub use engine::{CompilationResult, Diagnostic, Engine, EngineConfig, EngineError, Severity};
pub use error::{Error, Result};
pub use types::{ColorMode, CompilationLevel, LanguageMode, WarningLevel};

// Inputs and outputs
pub use io::{
    Extern, FsReader, InputBuffer, InputSource, SourceBuffer, SourceReader, acquire_externs,
    acquire_sources, default_externs, init_default_externs, write_compiled,
};

// Engines
pub use engine::process::ProcessEngine;

// High-level API re-exports
pub use api::{Compilation, compile, compile_inputs, compile_with_externs};
pub use report::{DiagnosticRenderer, has_fatal_errors, report};
