use serde::{Deserialize, Serialize};

use crate::core::defines::{Defines, RawDefines, normalize_defines};
use crate::error::Result;
use crate::io::sources::{Extern, SourceBuffer};
use crate::types::{CompilationLevel, LanguageMode, WarningLevel};

/// Compilation options as written in flag files or passed by callers.
/// `defines` is still in its loose form here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFlags {
    pub js_code: Vec<SourceBuffer>,
    pub externs: Vec<Extern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defines: Option<RawDefines>,
    pub language_in: Option<LanguageMode>,
    pub language_out: Option<LanguageMode>,
    pub compilation_level: Option<CompilationLevel>,
    pub warning_level: Option<WarningLevel>,
    pub create_source_map: bool,
    pub process_common_js_modules: bool,
}

impl RawFlags {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve `defines` into its typed form.
    pub fn normalize(self) -> CompileFlags {
        CompileFlags {
            js_code: self.js_code,
            externs: self.externs,
            defines: normalize_defines(self.defines),
            language_in: self.language_in,
            language_out: self.language_out,
            compilation_level: self.compilation_level,
            warning_level: self.warning_level,
            create_source_map: self.create_source_map,
            process_common_js_modules: self.process_common_js_modules,
        }
    }
}

/// Normalized compilation options, ready for the engine adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileFlags {
    pub js_code: Vec<SourceBuffer>,
    pub externs: Vec<Extern>,
    pub defines: Defines,
    pub language_in: Option<LanguageMode>,
    pub language_out: Option<LanguageMode>,
    pub compilation_level: Option<CompilationLevel>,
    pub warning_level: Option<WarningLevel>,
    pub create_source_map: bool,
    pub process_common_js_modules: bool,
}

impl CompileFlags {
    /// Flags compiling `sources` with every other option left at its default.
    pub fn with_sources(sources: Vec<SourceBuffer>) -> Self {
        Self {
            js_code: sources,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defines::DefineValue;

    #[test]
    fn parses_flag_file_with_engine_option_names() {
        let json = r#"{
            "jsCode": [{"path": "a.js", "src": "var a = 1;"}],
            "compilationLevel": "ADVANCED",
            "warningLevel": "VERBOSE",
            "languageIn": "ES6",
            "createSourceMap": true,
            "processCommonJsModules": true,
            "defines": "DEBUG=false"
        }"#;

        let flags = RawFlags::from_json(json).unwrap().normalize();
        assert_eq!(flags.js_code, vec![SourceBuffer::new("a.js", "var a = 1;")]);
        assert_eq!(flags.compilation_level, Some(CompilationLevel::Advanced));
        assert_eq!(flags.warning_level, Some(WarningLevel::Verbose));
        assert_eq!(flags.language_in, Some(LanguageMode::Es6));
        assert!(flags.create_source_map);
        assert!(flags.process_common_js_modules);
        assert_eq!(flags.defines.get("DEBUG"), Some(&DefineValue::Bool(false)));
    }

    #[test]
    fn empty_flag_file_is_all_defaults() {
        let flags = RawFlags::from_json("{}").unwrap();
        assert_eq!(flags, RawFlags::default());
        assert!(flags.normalize().defines.is_empty());
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(RawFlags::from_json(r#"{"compilationLevel": "EXTREME"}"#).is_err());
    }
}
