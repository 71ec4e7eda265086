//! Effective generator configuration
//!
//! Resolves built-in defaults, an optional TOML file and CLI overrides into
//! one [`GeneratorConfig`], remembering which layers contributed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::Glob;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Settings consumed by the generator driver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    pub source_dir: PathBuf,
    pub template_dir: PathBuf,
    pub out_dir: PathBuf,

    /// Also print every rendered document to stdout
    pub stdout: bool,

    /// Emit merged documents without governance wrapping
    pub custom_resources: bool,

    /// Continue with the next template after a failure
    pub keep_going: bool,

    pub file_ext: String,
    pub template_glob: String,
    pub annotations: BTreeMap<String, String>,

    /// Contributing layers in precedence order
    #[serde(skip)]
    pub sources: Vec<ConfigSource>,
}

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub stdout: bool,
    pub custom_resources: bool,
    pub keep_going: bool,
}

impl ConfigOverrides {
    /// Convert to a JSON layer holding only the fields that were given
    pub fn to_value(&self) -> Value {
        let mut layer = serde_json::Map::new();
        let dirs = [
            ("source_dir", &self.source_dir),
            ("template_dir", &self.template_dir),
            ("out_dir", &self.out_dir),
        ];
        for (key, dir) in dirs {
            if let Some(dir) = dir {
                layer.insert(key.to_string(), Value::String(dir.to_string_lossy().into_owned()));
            }
        }
        let flags = [
            ("stdout", self.stdout),
            ("custom_resources", self.custom_resources),
            ("keep_going", self.keep_going),
        ];
        for (key, set) in flags {
            if set {
                layer.insert(key.to_string(), Value::Bool(true));
            }
        }
        Value::Object(layer)
    }

    fn is_empty(&self) -> bool {
        self.to_value().as_object().map_or(true, |m| m.is_empty())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            source_dir: defaults.source_dir,
            template_dir: defaults.template_dir,
            out_dir: defaults.out_dir,
            stdout: false,
            custom_resources: false,
            keep_going: false,
            file_ext: defaults.file_ext,
            template_glob: defaults.template_glob,
            annotations: defaults.annotations,
            sources: vec![ConfigSource {
                origin: ConfigOrigin::Builtin,
                path: None,
            }],
        }
    }
}

impl GeneratorConfig {
    /// Resolve the effective configuration from its layers
    pub fn resolve(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
        });

        // Layer 2: Config file
        if let Some(path) = config_file {
            layers.push(Self::load_toml_file(path)?);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_path_buf()),
            });
        }

        // Layer 3: CLI overrides
        if !overrides.is_empty() {
            layers.push(overrides.to_value());
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
            });
        }

        let merged = merge_layers(layers);
        let mut config: GeneratorConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        config.sources = sources;
        config.validate()?;

        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Load and parse a TOML file into a JSON layer
    fn load_toml_file(path: &Path) -> Result<Value, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let toml_value: toml::Value = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self::toml_to_json(toml_value))
    }

    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => Value::Array(arr.into_iter().map(Self::toml_to_json).collect()),
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.file_ext.starts_with('.') || self.file_ext.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "file_ext must look like \".yaml\", got {:?}",
                self.file_ext
            )));
        }

        Glob::new(&self.template_glob).map_err(|e| {
            ConfigError::Validation(format!("template_glob {:?}: {}", self.template_glob, e))
        })?;

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}
