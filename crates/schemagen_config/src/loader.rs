//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::resolve::{configuration_names, resolve_configuration};
use crate::types::ProjectConfig;
use std::collections::BTreeMap;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "schemagen.toml";

/// Loads and validates a `schemagen.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `schemagen.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and checks that no two configurations write to
/// the same output, resource, or cache directory.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.configurations.keys().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "configuration names must not be empty".to_string(),
        ));
    }
    if config.generator.command.as_deref() == Some("") {
        return Err(ConfigError::ValidationError(
            "generator.command must not be empty".to_string(),
        ));
    }

    let mut seen: BTreeMap<std::path::PathBuf, String> = BTreeMap::new();
    for name in configuration_names(config) {
        let resolved = resolve_configuration(config, Path::new(""), &name)?;
        for (what, dir) in [
            ("output_dir", resolved.output_dir),
            ("resource_dir", resolved.resource_dir),
            ("cache directory", resolved.cache_dir),
        ] {
            if let Some(other) = seen.insert(dir.clone(), name.clone()) {
                if other != name {
                    return Err(ConfigError::ValidationError(format!(
                        "configurations '{other}' and '{name}' share {what} {}",
                        dir.display()
                    )));
                }
            }
        }
    }
    Ok(())
}
