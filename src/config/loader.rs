//! # Configuration Loader
//!
//! Environment-aware YAML loading for the bridge configuration. A base
//! document (`quartz-bridge.yaml`) is merged with an optional
//! environment-specific override (`quartz-bridge.{env}.yaml`), the result is
//! deserialized into [`BridgeConfig`] and validated before anything is handed
//! to the engine.

use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};

use crate::error::{BridgeError, Result};

use super::BridgeConfig;

const BASE_FILE_NAME: &str = "quartz-bridge.yaml";

/// Loads and merges bridge configuration documents.
pub struct BridgeConfigLoader {
    config_directory: PathBuf,
    environment: String,
}

impl BridgeConfigLoader {
    /// Loader rooted at a configuration directory, environment auto-detected.
    pub fn new(config_directory: impl Into<PathBuf>) -> Self {
        Self {
            config_directory: config_directory.into(),
            environment: detect_environment(),
        }
    }

    /// Loader with an explicit environment, useful for tests that should not
    /// touch process environment variables.
    pub fn with_environment(
        config_directory: impl Into<PathBuf>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            config_directory: config_directory.into(),
            environment: environment.into(),
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Load the base document, merge the environment override when present,
    /// deserialize and validate.
    pub fn load(&self) -> Result<BridgeConfig> {
        let base_path = self.config_directory.join(BASE_FILE_NAME);
        let mut document = read_yaml(&base_path)?;

        let override_path = self
            .config_directory
            .join(format!("quartz-bridge.{}.yaml", self.environment));
        if override_path.exists() {
            tracing::debug!(
                environment = %self.environment,
                path = %override_path.display(),
                "Merging environment override"
            );
            let overrides = read_yaml(&override_path)?;
            merge_yaml(&mut document, overrides);
        }

        let config: BridgeConfig = serde_yaml::from_value(document).map_err(|e| {
            BridgeError::configuration(
                "loader",
                format!("invalid configuration document: {e}"),
            )
        })?;

        config.validate()?;

        tracing::info!(
            environment = %self.environment,
            directory = %self.config_directory.display(),
            retain_completed_triggers = config.retain_completed_triggers,
            "Bridge configuration loaded"
        );

        Ok(config)
    }

    /// Load a single document directly, without environment merging.
    pub fn load_from_path(path: &Path) -> Result<BridgeConfig> {
        let document = read_yaml(path)?;
        let config: BridgeConfig = serde_yaml::from_value(document).map_err(|e| {
            BridgeError::configuration(
                "loader",
                format!("invalid configuration document: {e}"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn detect_environment() -> String {
    std::env::var("QUARTZ_BRIDGE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn read_yaml(path: &Path) -> Result<YamlValue> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        BridgeError::configuration("loader", format!("cannot read {}: {e}", path.display()))
    })?;
    serde_yaml::from_str(&contents).map_err(|e| {
        BridgeError::configuration("loader", format!("cannot parse {}: {e}", path.display()))
    })
}

/// Merge override values into the base document. Mappings merge key-wise,
/// everything else is replaced wholesale.
fn merge_yaml(base: &mut YamlValue, overrides: YamlValue) {
    match (base, overrides) {
        (YamlValue::Mapping(base_map), YamlValue::Mapping(override_map)) => {
            for (key, value) in override_map {
                match base_map.entry(key) {
                    serde_yaml::mapping::Entry::Occupied(mut entry) => {
                        merge_yaml(entry.get_mut(), value);
                    }
                    serde_yaml::mapping::Entry::Vacant(entry) => {
                        entry.insert(value);
                    }
                }
            }
        }
        (base_slot, value) => *base_slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn loads_base_document() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            BASE_FILE_NAME,
            "quartz:\n  scheduler:\n    instanceName: BaseScheduler\n",
        );

        let loader = BridgeConfigLoader::with_environment(dir.path(), "test");
        let config = loader.load().unwrap();
        assert_eq!(
            config
                .quartz
                .scheduler
                .unwrap()
                .instance_name
                .as_deref(),
            Some("BaseScheduler")
        );
        assert!(config.retain_completed_triggers);
    }

    #[test]
    fn environment_override_wins_field_wise() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            BASE_FILE_NAME,
            concat!(
                "quartz:\n",
                "  scheduler:\n",
                "    instanceName: BaseScheduler\n",
                "    idleWaitTime: 30000\n",
            ),
        );
        write_file(
            dir.path(),
            "quartz-bridge.production.yaml",
            "quartz:\n  scheduler:\n    instanceName: ProdScheduler\n",
        );

        let loader = BridgeConfigLoader::with_environment(dir.path(), "production");
        let config = loader.load().unwrap();
        let scheduler = config.quartz.scheduler.unwrap();
        assert_eq!(scheduler.instance_name.as_deref(), Some("ProdScheduler"));
        // Untouched base fields survive the merge.
        assert_eq!(scheduler.idle_wait_time, Some(30000));
    }

    #[test]
    fn missing_base_document_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = BridgeConfigLoader::with_environment(dir.path(), "test");
        let err = loader.load().unwrap_err();
        assert!(err.is_fatal_for_startup());
    }

    #[test]
    fn invalid_document_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            BASE_FILE_NAME,
            "quartz:\n  threadPool:\n    threadCount: 0\n",
        );
        let loader = BridgeConfigLoader::with_environment(dir.path(), "test");
        assert!(loader.load().is_err());
    }
}
