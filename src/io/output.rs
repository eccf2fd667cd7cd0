//! Output channel for compiled code.
use std::io::Write;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};

use crate::engine::CompilationResult;

const SOURCE_MAP_URL_PREFIX: &str = "//# sourceMappingURL=data:application/json;base64,";

/// Trailing comment embedding `source_map` as a base64 data URL.
pub fn source_map_comment(source_map: &str) -> String {
    format!(
        "{}{}",
        SOURCE_MAP_URL_PREFIX,
        BASE64_STANDARD.encode(source_map.as_bytes())
    )
}

/// Write the compiled code, followed by the inline source map when one was produced.
pub fn write_compiled<W: Write>(mut writer: W, result: &CompilationResult) -> std::io::Result<()> {
    writeln!(writer, "{}", result.compiled_code)?;
    if let Some(map) = result.source_map.as_deref().filter(|m| !m.is_empty()) {
        writeln!(writer, "{}", source_map_comment(map))?;
    }
    writer.flush()
}
