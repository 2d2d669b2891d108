//! Emitter configuration types

use crate::naming::convert_kebab_to_camel;
use crate::{EmitterError, EmitterResult, LogLevel};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Per-language client generation options
///
/// Every field is optional; unset fields fall back to the emitter's
/// defaults when the generation request is built. Keys are accepted in
/// camelCase only, see [`EmitterOptions`] for kebab-case handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    /// Output path, relative to the root output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    /// Name of the generated root client class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_class_name: Option<String>,

    /// Namespace (or package) of the generated client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_namespace_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_cache: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_output: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_additional_data: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_backing_store: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_backward_compatible: Option<bool>,

    /// Description validation rules the generator should skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_validation_rules: Option<Vec<String>>,

    /// Glob patterns of paths to exclude from generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_patterns: Option<Vec<String>>,

    /// Glob patterns of paths to include in generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_patterns: Option<Vec<String>>,

    /// Deserializer modules to register in the generated client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deserializers: Option<Vec<String>>,

    /// Serializer modules to register in the generated client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serializers: Option<Vec<String>>,

    /// MIME types considered structured, in preference order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_mime_types: Option<Vec<String>>,
}

impl ClientOptions {
    /// Build options from a raw option map, normalizing kebab-case keys first
    pub fn from_raw(raw: Map<String, Value>) -> EmitterResult<Self> {
        let normalized = convert_kebab_to_camel(raw);
        serde_json::from_value(Value::Object(normalized)).map_err(EmitterError::from)
    }
}

/// Options supplied by the host for one emitter run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterOptions {
    /// Client generation options keyed by language identifier
    #[serde(default, deserialize_with = "deserialize_clients")]
    pub clients: BTreeMap<String, ClientOptions>,
}

impl EmitterOptions {
    /// Create options with no clients configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client for the given language
    pub fn with_client(mut self, language: impl Into<String>, options: ClientOptions) -> Self {
        self.clients.insert(language.into(), options);
        self
    }

    /// Parse options from a JSON value
    pub fn from_value(value: Value) -> EmitterResult<Self> {
        serde_json::from_value(value).map_err(EmitterError::from)
    }
}

fn deserialize_clients<'de, D>(deserializer: D) -> Result<BTreeMap<String, ClientOptions>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<Map<String, Value>>>> =
        Option::deserialize(deserializer)?;

    raw.unwrap_or_default()
        .into_iter()
        .map(|(language, options)| {
            ClientOptions::from_raw(options.unwrap_or_default())
                .map(|options| (language.clone(), options))
                .map_err(|e| D::Error::custom(format!("client '{language}': {e}")))
        })
        .collect()
}

/// Configuration file for an emitter run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Log level of the emitter itself
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Explicit generator executable, bypassing environment and `PATH` lookup
    #[serde(default)]
    pub generator_path: Option<PathBuf>,

    /// Deadline for one generation call in milliseconds (no deadline when unset)
    #[serde(default)]
    pub generation_timeout_ms: Option<u64>,

    /// Emitter options; `None` reproduces a host that supplied no options at all
    #[serde(default)]
    pub options: Option<EmitterOptions>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            generator_path: None,
            generation_timeout_ms: None,
            options: None,
        }
    }
}

impl EmitterConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> EmitterResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(EmitterError::from)
    }

    /// Create configuration from TOML text
    pub fn from_toml(text: &str) -> EmitterResult<Self> {
        toml::from_str(text).map_err(EmitterError::from)
    }

    /// Load configuration from a file, choosing the format by extension
    ///
    /// `.json` files are parsed as JSON; anything else as TOML.
    pub fn load(path: &Path) -> EmitterResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| EmitterError::ConfigError(format!("{}: {e}", path.display())))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&bytes)
        } else {
            let text = String::from_utf8(bytes).map_err(|e| {
                EmitterError::ConfigError(format!("{}: {e}", path.display()))
            })?;
            Self::from_toml(&text)
        }
    }

    /// Parsed log level
    pub fn log_level(&self) -> EmitterResult<LogLevel> {
        self.log_level.parse()
    }

    /// Generation deadline, if configured
    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_ms.map(Duration::from_millis)
    }
}
