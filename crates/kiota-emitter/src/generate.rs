//! Generation request and result protocol
//!
//! One generation is one `Generate` request on a fresh generator channel.
//! Enumerations travel as their numeric values.

use kiota_emitter_core::{ClientOptions, EmitterError};
use kiota_emitter_runtime::{BridgeResult, GeneratorBridge};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// RPC method that runs a generation
pub const GENERATE_METHOD: &str = "Generate";

/// Output path used when a client does not configure one
pub const DEFAULT_OUTPUT_PATH: &str = "kiota-client";

/// Root client class name used when a client does not configure one
pub const DEFAULT_CLIENT_CLASS_NAME: &str = "ApiClient";

/// Namespace used when a client does not configure one
pub const DEFAULT_CLIENT_NAMESPACE_NAME: &str = "ApiClientNamespace";

/// Description document handed to the generator, relative to the root
pub const OPENAPI_FILE_NAME: &str = "openapi.json";

/// Marker the generator logs after writing the client
const FILES_WRITTEN_MARKER: &str = " files written to ";

/// Declares a fieldless `repr(u8)` enum that travels as its numeric value
macro_rules! numeric_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident = $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($variant = $value,)+
        }

        impl $name {
            /// Convert from the wire value
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(*self as u8)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = u8::deserialize(deserializer)?;
                $name::from_u8(value).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "invalid {} value: {value}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

numeric_enum! {
    /// Target language of a generated client
    #[derive(Hash, PartialOrd, Ord)]
    pub enum GenerationLanguage {
        CSharp = 0,
        Java = 1,
        TypeScript = 2,
        Php = 3,
        Python = 4,
        Go = 5,
        Swift = 6,
        Ruby = 7,
        Cli = 8,
        Dart = 9,
        Http = 10,
    }
}

impl GenerationLanguage {
    /// Every language, in wire order
    pub const ALL: [GenerationLanguage; 11] = [
        GenerationLanguage::CSharp,
        GenerationLanguage::Java,
        GenerationLanguage::TypeScript,
        GenerationLanguage::Php,
        GenerationLanguage::Python,
        GenerationLanguage::Go,
        GenerationLanguage::Swift,
        GenerationLanguage::Ruby,
        GenerationLanguage::Cli,
        GenerationLanguage::Dart,
        GenerationLanguage::Http,
    ];

    /// Canonical identifier used in emitter options
    pub fn name(self) -> &'static str {
        match self {
            GenerationLanguage::CSharp => "csharp",
            GenerationLanguage::Java => "java",
            GenerationLanguage::TypeScript => "typescript",
            GenerationLanguage::Php => "php",
            GenerationLanguage::Python => "python",
            GenerationLanguage::Go => "go",
            GenerationLanguage::Swift => "swift",
            GenerationLanguage::Ruby => "ruby",
            GenerationLanguage::Cli => "cli",
            GenerationLanguage::Dart => "dart",
            GenerationLanguage::Http => "http",
        }
    }
}

impl FromStr for GenerationLanguage {
    type Err = EmitterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GenerationLanguage::ALL
            .into_iter()
            .find(|language| language.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EmitterError::UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for GenerationLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

numeric_enum! {
    /// What the generator should do with the client lock file
    pub enum ConsumerOperation {
        Add = 0,
        Edit = 1,
        Remove = 2,
        Generate = 3,
    }
}

numeric_enum! {
    /// Severity of a generator log entry
    #[derive(PartialOrd, Ord)]
    pub enum GeneratorLogLevel {
        Trace = 0,
        Debug = 1,
        Information = 2,
        Warning = 3,
        Error = 4,
        Critical = 5,
        None = 6,
    }
}

impl fmt::Display for GeneratorLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorLogLevel::Trace => "trace",
            GeneratorLogLevel::Debug => "debug",
            GeneratorLogLevel::Information => "information",
            GeneratorLogLevel::Warning => "warning",
            GeneratorLogLevel::Error => "error",
            GeneratorLogLevel::Critical => "critical",
            GeneratorLogLevel::None => "none",
        };
        f.write_str(name)
    }
}

/// One line of generator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: GeneratorLogLevel,
    pub message: String,
}

impl LogEntry {
    /// Create a log entry
    pub fn new(level: GeneratorLogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Parameters of a `Generate` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfiguration {
    #[serde(rename = "openAPIFilePath")]
    pub openapi_file_path: String,
    pub output_path: String,
    pub language: GenerationLanguage,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub client_class_name: String,
    pub client_namespace_name: String,
    pub uses_backing_store: bool,
    pub clean_output: bool,
    pub clear_cache: bool,
    pub deserializers: Vec<String>,
    pub serializers: Vec<String>,
    pub structured_mime_types: Vec<String>,
    pub include_additional_data: bool,
    pub exclude_backward_compatible: bool,
    pub disabled_validation_rules: Vec<String>,
    pub operation: ConsumerOperation,
    pub working_directory: PathBuf,
}

impl GenerationConfiguration {
    /// Build the request for one configured client
    ///
    /// Paths in the request are relative to `working_directory`, which is
    /// also where the generator runs.
    pub fn for_client(
        language: GenerationLanguage,
        options: &ClientOptions,
        working_directory: &Path,
    ) -> Self {
        let list = |value: &Option<Vec<String>>| value.clone().unwrap_or_default();
        let flag = |value: Option<bool>| value.unwrap_or(false);

        Self {
            openapi_file_path: OPENAPI_FILE_NAME.to_string(),
            output_path: options
                .output_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            language,
            include_patterns: list(&options.include_patterns),
            exclude_patterns: list(&options.exclude_patterns),
            client_class_name: options
                .client_class_name
                .clone()
                .unwrap_or_else(|| DEFAULT_CLIENT_CLASS_NAME.to_string()),
            client_namespace_name: options
                .client_namespace_name
                .clone()
                .unwrap_or_else(|| DEFAULT_CLIENT_NAMESPACE_NAME.to_string()),
            uses_backing_store: flag(options.uses_backing_store),
            clean_output: flag(options.clean_output),
            clear_cache: flag(options.clear_cache),
            deserializers: list(&options.deserializers),
            serializers: list(&options.serializers),
            structured_mime_types: list(&options.structured_mime_types),
            include_additional_data: flag(options.include_additional_data),
            exclude_backward_compatible: flag(options.exclude_backward_compatible),
            disabled_validation_rules: list(&options.disabled_validation_rules),
            operation: ConsumerOperation::Generate,
            working_directory: working_directory.to_path_buf(),
        }
    }
}

/// Outcome of one `Generate` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Whether the generator reported writing files
    pub is_success: bool,
    /// Log entries in the order the generator produced them
    pub logs: Vec<LogEntry>,
}

impl GenerationResult {
    /// Build a result from the generator's log entries
    pub fn from_logs(logs: Vec<LogEntry>) -> Self {
        let is_success = logs
            .iter()
            .any(|entry| entry.message.contains(FILES_WRITTEN_MARKER));
        Self { is_success, logs }
    }
}

/// Generate one client on a fresh generator subprocess
///
/// The generator runs in the request's working directory. Any channel or
/// subprocess failure comes back as the bridge's error value.
pub async fn generate_client(
    bridge: &GeneratorBridge,
    configuration: GenerationConfiguration,
) -> BridgeResult<GenerationResult> {
    let working_directory = configuration.working_directory.clone();
    tracing::debug!(
        language = %configuration.language,
        output_path = %configuration.output_path,
        "Requesting client generation"
    );

    bridge
        .run_with_generator_channel(
            move |connection| async move {
                let logs: Vec<LogEntry> = connection
                    .send_request(GENERATE_METHOD, &configuration)
                    .await?;
                Ok(GenerationResult::from_logs(logs))
            },
            Some(&working_directory),
        )
        .await
}
