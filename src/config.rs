use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const CONFIG_FILE_NAME: &str = ".vgettextrc.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub compile: CompileConfig,
}

/// Settings for scanning sources and writing the template catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractConfig {
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_template")]
    pub output: String,
    #[serde(default = "default_start_delim")]
    pub start_delim: String,
    #[serde(default = "default_end_delim")]
    pub end_delim: String,
    #[serde(default = "default_translate_tag")]
    pub translate_tag: String,
    #[serde(default = "default_directive_name")]
    pub directive_name: String,
    #[serde(default)]
    pub attributes: TranslateAttributes,
    #[serde(default = "default_comment_keyword")]
    pub comment_keyword: String,
    #[serde(default)]
    pub underscore_alias: bool,
    #[serde(default)]
    pub keyword_spec: KeywordSpecs,
    #[serde(default = "default_template_extensions")]
    pub allowed_template_file_extensions: Vec<String>,
    #[serde(default = "default_code_extensions")]
    pub allowed_code_file_extensions: Vec<String>,
}

/// Names of the attributes carrying translation metadata in templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslateAttributes {
    pub plural: String,
    pub n: String,
    pub context: String,
    pub comment: String,
}

impl Default for TranslateAttributes {
    fn default() -> Self {
        Self {
            plural: "t-plural".to_string(),
            n: "t-n".to_string(),
            context: "t-context".to_string(),
            comment: "t-comment".to_string(),
        }
    }
}

/// Argument positions and aliases for one call keyword.
///
/// Positions left out fall back to the keyword's standard signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_plural: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<usize>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeywordSpecs {
    pub gettext: KeywordSpec,
    pub pgettext: KeywordSpec,
    pub ngettext: KeywordSpec,
    pub npgettext: KeywordSpec,
}

impl Default for KeywordSpecs {
    fn default() -> Self {
        let spec = |text, text_plural, context| KeywordSpec {
            text: Some(text),
            text_plural,
            context,
            aliases: Vec::new(),
        };
        Self {
            gettext: spec(0, None, None),
            pgettext: spec(1, None, Some(0)),
            ngettext: spec(0, Some(1), None),
            npgettext: spec(1, Some(2), Some(0)),
        }
    }
}

/// Settings for merging translation catalogs and writing JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileConfig {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_locales_dir")]
    pub locales_dir: String,
    #[serde(default = "default_locales_dir")]
    pub json_dir: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_true")]
    pub join_existing: bool,
    #[serde(default = "default_true")]
    pub fuzzy_strings_in_json: bool,
    #[serde(default)]
    pub json_output_type: JsonOutputType,
}

/// Which JSON files the compile step writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonOutputType {
    /// One combined `translations.json`.
    #[default]
    Single,
    /// One `<lang>.json` per language.
    Multiple,
    Both,
    None,
}

impl JsonOutputType {
    /// Unknown values fall back to `Single`.
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "multiple" => Self::Multiple,
            "both" => Self::Both,
            "none" => Self::None,
            _ => Self::Single,
        }
    }

    pub fn writes_per_language(self) -> bool {
        matches!(self, Self::Multiple | Self::Both)
    }

    pub fn writes_combined(self) -> bool {
        matches!(self, Self::Single | Self::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Both => "both",
            Self::None => "none",
        }
    }
}

impl<'de> Deserialize<'de> for JsonOutputType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        std::result::Result::Ok(value.as_str().map(Self::parse_lossy).unwrap_or_default())
    }
}

fn default_input() -> String {
    "src".to_string()
}

fn default_template() -> String {
    "locales/messages.pot".to_string()
}

fn default_start_delim() -> String {
    "{{".to_string()
}

fn default_end_delim() -> String {
    "}}".to_string()
}

fn default_translate_tag() -> String {
    "translate".to_string()
}

fn default_directive_name() -> String {
    "v-translate".to_string()
}

fn default_comment_keyword() -> String {
    "t".to_string()
}

fn default_template_extensions() -> Vec<String> {
    vec![".vue".to_string()]
}

fn default_code_extensions() -> Vec<String> {
    vec![".js".to_string()]
}

fn default_locales_dir() -> String {
    "locales".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_template(),
            start_delim: default_start_delim(),
            end_delim: default_end_delim(),
            translate_tag: default_translate_tag(),
            directive_name: default_directive_name(),
            attributes: TranslateAttributes::default(),
            comment_keyword: default_comment_keyword(),
            underscore_alias: false,
            keyword_spec: KeywordSpecs::default(),
            allowed_template_file_extensions: default_template_extensions(),
            allowed_code_file_extensions: default_code_extensions(),
        }
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            locales_dir: default_locales_dir(),
            json_dir: default_locales_dir(),
            languages: Vec::new(),
            default_language: default_language(),
            join_existing: true,
            fuzzy_strings_in_json: true,
            json_output_type: JsonOutputType::default(),
        }
    }
}

impl ExtractConfig {
    /// Whether `path` has one of the template extensions.
    pub fn is_template_file(&self, path: &Path) -> bool {
        has_extension(path, &self.allowed_template_file_extensions)
    }

    /// Whether `path` has one of the code extensions.
    pub fn is_code_file(&self, path: &Path) -> bool {
        has_extension(path, &self.allowed_code_file_extensions)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_delim.is_empty() || self.end_delim.is_empty() {
            bail!("Interpolation delimiters in 'extract' must not be empty");
        }
        if self.translate_tag.is_empty() {
            bail!("'extract.translateTag' must not be empty");
        }
        if self.directive_name.is_empty() {
            bail!("'extract.directiveName' must not be empty");
        }
        if self.comment_keyword.is_empty() {
            bail!("'extract.commentKeyword' must not be empty");
        }
        if self.allowed_template_file_extensions.is_empty()
            && self.allowed_code_file_extensions.is_empty()
        {
            bail!("No file extensions configured for extraction");
        }
        Ok(())
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.') == ext)
        })
}

impl CompileConfig {
    /// Languages to compile; the default language when none are listed.
    pub fn effective_languages(&self) -> Vec<String> {
        if self.languages.is_empty() {
            vec![self.default_language.clone()]
        } else {
            self.languages.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() && self.default_language.is_empty() {
            bail!("No languages configured for compilation");
        }
        if let Some(language) = self.languages.iter().find(|l| l.trim().is_empty()) {
            bail!("Invalid language code: \"{}\"", language);
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        self.compile.validate()?;
        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
