//! Shared option enums used across closurec.
//! Includes `CompilationLevel`, `WarningLevel`, `LanguageMode`, and `ColorMode`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompilationLevel {
    WhitespaceOnly,
    Simple,
    Advanced,
}

impl CompilationLevel {
    pub fn as_flag(self) -> &'static str {
        match self {
            CompilationLevel::WhitespaceOnly => "WHITESPACE_ONLY",
            CompilationLevel::Simple => "SIMPLE",
            CompilationLevel::Advanced => "ADVANCED",
        }
    }
}

impl std::fmt::Display for CompilationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningLevel {
    Quiet,
    Default,
    Verbose,
}

impl WarningLevel {
    pub fn as_flag(self) -> &'static str {
        match self {
            WarningLevel::Quiet => "QUIET",
            WarningLevel::Default => "DEFAULT",
            WarningLevel::Verbose => "VERBOSE",
        }
    }
}

impl std::fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

/// Input/output language level. Names follow the short `ES*` spelling;
/// the engine's long `ECMASCRIPT_*` names are accepted when deserializing.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum LanguageMode {
    #[value(name = "ES3")]
    #[serde(rename = "ES3", alias = "ECMASCRIPT3")]
    Es3,
    #[value(name = "ES5")]
    #[serde(rename = "ES5", alias = "ECMASCRIPT5")]
    Es5,
    #[value(name = "ES6", alias = "ES2015")]
    #[serde(rename = "ES6", alias = "ES2015", alias = "ECMASCRIPT6", alias = "ECMASCRIPT_2015")]
    Es6,
    #[value(name = "ES2016")]
    #[serde(rename = "ES2016", alias = "ECMASCRIPT_2016")]
    Es2016,
    #[value(name = "ES2017")]
    #[serde(rename = "ES2017", alias = "ECMASCRIPT_2017")]
    Es2017,
    #[value(name = "ES2018")]
    #[serde(rename = "ES2018", alias = "ECMASCRIPT_2018")]
    Es2018,
    #[value(name = "ES2019")]
    #[serde(rename = "ES2019", alias = "ECMASCRIPT_2019")]
    Es2019,
    #[value(name = "ES2020")]
    #[serde(rename = "ES2020", alias = "ECMASCRIPT_2020")]
    Es2020,
    #[value(name = "ES_NEXT")]
    #[serde(rename = "ES_NEXT", alias = "ECMASCRIPT_NEXT")]
    EsNext,
}

impl LanguageMode {
    /// Engine spelling of this language level.
    pub fn as_flag(self) -> &'static str {
        match self {
            LanguageMode::Es3 => "ECMASCRIPT3",
            LanguageMode::Es5 => "ECMASCRIPT5",
            LanguageMode::Es6 => "ECMASCRIPT_2015",
            LanguageMode::Es2016 => "ECMASCRIPT_2016",
            LanguageMode::Es2017 => "ECMASCRIPT_2017",
            LanguageMode::Es2018 => "ECMASCRIPT_2018",
            LanguageMode::Es2019 => "ECMASCRIPT_2019",
            LanguageMode::Es2020 => "ECMASCRIPT_2020",
            LanguageMode::EsNext => "ECMASCRIPT_NEXT",
        }
    }
}

impl std::fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LanguageMode::Es3 => "ES3",
            LanguageMode::Es5 => "ES5",
            LanguageMode::Es6 => "ES6",
            LanguageMode::Es2016 => "ES2016",
            LanguageMode::Es2017 => "ES2017",
            LanguageMode::Es2018 => "ES2018",
            LanguageMode::Es2019 => "ES2019",
            LanguageMode::Es2020 => "ES2020",
            LanguageMode::EsNext => "ES_NEXT",
        };
        write!(f, "{}", s)
    }
}

/// Whether diagnostic output carries ANSI color codes.
#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        matches!(self, ColorMode::Always)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_mode_accepts_engine_spelling() {
        let mode: LanguageMode = serde_json::from_str("\"ECMASCRIPT_2015\"").unwrap();
        assert_eq!(mode, LanguageMode::Es6);
        assert_eq!(mode.to_string(), "ES6");
        assert_eq!(mode.as_flag(), "ECMASCRIPT_2015");
    }

    #[test]
    fn levels_use_engine_names() {
        let level: CompilationLevel = serde_json::from_str("\"ADVANCED\"").unwrap();
        assert_eq!(level, CompilationLevel::Advanced);
        let warn: WarningLevel = serde_json::from_str("\"VERBOSE\"").unwrap();
        assert_eq!(warn.as_flag(), "VERBOSE");
        assert_eq!(CompilationLevel::WhitespaceOnly.to_string(), "WHITESPACE_ONLY");
    }

    #[test]
    fn clap_parses_screaming_case_values() {
        let level = CompilationLevel::from_str("SIMPLE", false).unwrap();
        assert_eq!(level, CompilationLevel::Simple);
        let mode = LanguageMode::from_str("ES2015", false).unwrap();
        assert_eq!(mode, LanguageMode::Es6);
    }
}
