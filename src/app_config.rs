use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Markup used for highlights tagged `#red`
    #[serde(default)]
    pub emphasis: EmphasisStyle,

    /// Optional markup wrapped around labelled notes; "none" and null both disable it
    #[serde(default, deserialize_with = "deserialize_note_style")]
    pub note_style: Option<NoteStyle>,

    /// Collect emphasised highlights into a separate section
    #[serde(default)]
    pub important_section: bool,

    /// How structural markers are matched against note text
    #[serde(default)]
    pub section_matching: SectionMatching,

    /// What to do with a continuation marker on the last highlight
    #[serde(default)]
    pub trailing_continuation: TailMergePolicy,

    /// LaTeX template file; the built-in template is used when absent
    #[serde(default)]
    pub template_path: Option<PathBuf>,

    /// Directory receiving the generated .tex files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum number of characters of the title used in file names
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Emphasis applied to highlights tagged `#red`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum EmphasisStyle {
    #[default]
    Bold,
    Italics,
    Underline,
    LargeFont,
    Red,
}

impl EmphasisStyle {
    // @returns: Opening and closing markup
    pub fn markup(&self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("\\textbf{", "}"),
            Self::Italics => ("\\textit{", "}"),
            Self::Underline => ("\\underline{", "}"),
            Self::LargeFont => ("\\begin{Large}\n", "\n\\end{Large}"),
            Self::Red => ("\\textcolor{red}{", "}"),
        }
    }

    // @returns: Configuration identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italics => "italics",
            Self::Underline => "underline",
            Self::LargeFont => "large_font",
            Self::Red => "red",
        }
    }
}

impl std::fmt::Display for EmphasisStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EmphasisStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(Self::Bold),
            "italics" => Ok(Self::Italics),
            "underline" => Ok(Self::Underline),
            "large_font" => Ok(Self::LargeFont),
            "red" => Ok(Self::Red),
            _ => Err(ConfigError::UnknownEmphasisStyle(s.to_string())),
        }
    }
}

impl TryFrom<String> for EmphasisStyle {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Markup that sets notes apart from highlight text
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum NoteStyle {
    Italics,
    Small,
    Footnotesize,
    Gray,
}

impl NoteStyle {
    // @returns: Opening and closing markup
    pub fn markup(&self) -> (&'static str, &'static str) {
        match self {
            Self::Italics => ("\\textit{", "}"),
            Self::Small => ("{\\small ", "}"),
            Self::Footnotesize => ("{\\footnotesize ", "}"),
            Self::Gray => ("\\textcolor{gray}{", "}"),
        }
    }

    // @returns: Configuration identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Italics => "italics",
            Self::Small => "small",
            Self::Footnotesize => "footnotesize",
            Self::Gray => "gray",
        }
    }

    /// Parse a note style where "none" selects no style at all
    pub fn parse_optional(s: &str) -> Result<Option<Self>, ConfigError> {
        if s == "none" {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl std::fmt::Display for NoteStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NoteStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "italics" => Ok(Self::Italics),
            "small" => Ok(Self::Small),
            "footnotesize" => Ok(Self::Footnotesize),
            "gray" => Ok(Self::Gray),
            _ => Err(ConfigError::UnknownNoteStyle(s.to_string())),
        }
    }
}

impl TryFrom<String> for NoteStyle {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Structural marker matching mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SectionMatching {
    /// Substring containment, so "#ch" also fires inside "#chapter"
    #[default]
    Containment,
    /// Whitespace-delimited token equality
    ExactToken,
}

impl std::str::FromStr for SectionMatching {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "containment" => Ok(Self::Containment),
            "exact_token" => Ok(Self::ExactToken),
            _ => Err(ConfigError::UnknownSectionMatching(s.to_string())),
        }
    }
}

impl TryFrom<String> for SectionMatching {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Handling of a continuation marker on the final highlight
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TailMergePolicy {
    /// Abort the whole run
    #[default]
    Fail,
    /// Drop the dangling record and carry on
    Drop,
}

impl std::str::FromStr for TailMergePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "drop" => Ok(Self::Drop),
            _ => Err(ConfigError::UnknownTailMergePolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for TailMergePolicy {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn deserialize_note_style<'de, D>(deserializer: D) -> Result<Option<NoteStyle>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(name) => NoteStyle::parse_optional(&name).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("tex")
}

fn default_max_title_chars() -> usize {
    50
}

impl Config {
    /// Load a configuration file
    ///
    /// Unknown style names are rejected here, before any note is processed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source: serde_json::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let value: serde_json::Value = serde_json::from_str(&content).map_err(parse_error)?;
        Self::check_style_names(&value)?;
        serde_json::from_value(value).map_err(parse_error)
    }

    // @checks: Style names in a raw configuration, reported as typed errors
    fn check_style_names(value: &serde_json::Value) -> Result<(), ConfigError> {
        let name = |key: &str| value.get(key).and_then(serde_json::Value::as_str);

        if let Some(emphasis) = name("emphasis") {
            emphasis.parse::<EmphasisStyle>()?;
        }
        if let Some(note_style) = name("note_style") {
            NoteStyle::parse_optional(note_style)?;
        }
        if let Some(matching) = name("section_matching") {
            matching.parse::<SectionMatching>()?;
        }
        if let Some(policy) = name("trailing_continuation") {
            policy.parse::<TailMergePolicy>()?;
        }

        Ok(())
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("cannot serialize configuration: {}", e)))?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_title_chars == 0 {
            return Err(ConfigError::Invalid("max_title_chars must be greater than zero".to_string()));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir must not be empty".to_string()));
        }

        if let Some(template) = &self.template_path {
            if !template.is_file() {
                return Err(ConfigError::Invalid(format!(
                    "template_path does not point to a file: {:?}",
                    template
                )));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            emphasis: EmphasisStyle::default(),
            note_style: None,
            important_section: false,
            section_matching: SectionMatching::default(),
            trailing_continuation: TailMergePolicy::default(),
            template_path: None,
            output_dir: default_output_dir(),
            max_title_chars: default_max_title_chars(),
            log_level: LogLevel::default(),
        }
    }
}
