//! Configuration Loader
//!
//! Layers an optional configuration file (any format the `config` crate
//! understands) under `STOREHOUSE__*` environment variable overrides, then
//! deserializes and validates the result.

use super::StorehouseConfig;
use crate::constants::{CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR};
use crate::error::Result;
use config::{Config, Environment, File, FileFormat, Map};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
enum FileSource {
    Path { path: PathBuf, required: bool },
    Inline { contents: String, format: FileFormat },
}

/// Builder for loading [`StorehouseConfig`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    sources: Vec<FileSource>,
    env_prefix: Option<String>,
    env_vars: Option<Map<String, String>>,
}

impl ConfigLoader {
    /// Loader reading only environment variables with the default prefix
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            env_prefix: Some(CONFIG_ENV_PREFIX.to_string()),
            env_vars: None,
        }
    }

    /// Add a configuration file that must exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(FileSource::Path {
            path: path.into(),
            required: true,
        });
        self
    }

    /// Add a configuration file that is skipped when missing
    pub fn with_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(FileSource::Path {
            path: path.into(),
            required: false,
        });
        self
    }

    /// Add inline configuration text
    pub fn with_str(mut self, contents: impl Into<String>, format: FileFormat) -> Self {
        self.sources.push(FileSource::Inline {
            contents: contents.into(),
            format,
        });
        self
    }

    /// Override the environment variable prefix (`<PREFIX>__EVENTS__CHANNEL_CAPACITY`)
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Read overrides from `vars` instead of the process environment
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Map::new();
        for (key, value) in vars {
            map.insert(key.into(), value.into());
        }
        self.env_vars = Some(map);
        self
    }

    /// Ignore environment variables entirely
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Load, deserialize and validate the configuration
    pub fn load(&self) -> Result<StorehouseConfig> {
        let mut builder = Config::builder()
            .set_default("environment", crate::logging::get_environment())?;

        for source in &self.sources {
            builder = match source {
                FileSource::Path { path, required } => {
                    debug!(path = %path.display(), required, "Adding configuration file");
                    builder.add_source(File::from(path.clone()).required(*required))
                }
                FileSource::Inline { contents, format } => {
                    builder.add_source(File::from_str(contents, *format))
                }
            };
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .separator(CONFIG_ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(self.env_vars.clone()),
            );
        }

        let config: StorehouseConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            environment = %config.environment,
            managers = config.managers.len(),
            default_manager = ?config.default_manager,
            "Configuration loaded successfully"
        );

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorehouseError;
    use std::io::Write;

    #[test]
    fn test_load_toml_file_preserves_manager_order() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
default_manager = "cache"

[events]
channel_capacity = 64

[managers.primary]
type = "memory"

[managers.cache]
type = "memory"
name = "hot-cache"
"#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .without_env()
            .with_file(file.path())
            .load()
            .unwrap();

        assert_eq!(config.events.channel_capacity, 64);
        assert_eq!(config.default_manager.as_deref(), Some("cache"));
        let names: Vec<&str> = config.managers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["primary", "cache"]);
        assert_eq!(config.managers["cache"].name.as_deref(), Some("hot-cache"));
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = ConfigLoader::new()
            .without_env()
            .with_file("/definitely/not/here/storehouse.toml")
            .load();
        assert!(matches!(result, Err(StorehouseError::ConfigurationError(_))));
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let config = ConfigLoader::new()
            .without_env()
            .with_optional_file("/definitely/not/here/storehouse.toml")
            .load()
            .unwrap();
        assert!(config.managers.is_empty());
    }

    #[test]
    fn test_environment_overrides_file() {
        let config = ConfigLoader::new()
            .with_env_vars([("STOREHOUSE__EVENTS__CHANNEL_CAPACITY", "32")])
            .with_str("[events]\nchannel_capacity = 8\n", FileFormat::Toml)
            .load()
            .unwrap();

        assert_eq!(config.events.channel_capacity, 32);
    }

    #[test]
    fn test_environment_prefix_is_respected() {
        let config = ConfigLoader::new()
            .with_env_prefix("STOREHOUSE_ALT")
            .with_env_vars([
                ("STOREHOUSE__EVENTS__CHANNEL_CAPACITY", "32"),
                ("STOREHOUSE_ALT__EVENTS__CHANNEL_CAPACITY", "48"),
            ])
            .load()
            .unwrap();

        assert_eq!(config.events.channel_capacity, 48);
    }

    #[test]
    fn test_manager_names_keep_their_case() {
        let config = ConfigLoader::new()
            .without_env()
            .with_str(
                r#"
default_manager = "MainDb"

[managers.MainDb]
type = "memory"

[managers.Cache]
type = "memory"
name = "HotCache"
"#,
                FileFormat::Toml,
            )
            .load()
            .unwrap();

        assert_eq!(config.default_manager.as_deref(), Some("MainDb"));
        let names: Vec<&str> = config.managers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["MainDb", "Cache"]);
        assert_eq!(config.managers["Cache"].name.as_deref(), Some("HotCache"));
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let result = ConfigLoader::new()
            .without_env()
            .with_str(
                "default_manager = \"ghost\"\n[managers.main]\ntype = \"memory\"\n",
                FileFormat::Toml,
            )
            .load();
        assert!(result.is_err());
    }
}
