//! Configuration resolution: merging shared and per-configuration settings.

use crate::error::ConfigError;
use crate::types::{CodegenConfig, ProjectConfig};
use std::path::{Path, PathBuf};

/// Build configurations every project has, even without a table of their own.
pub const BUILTIN_CONFIGURATIONS: &[&str] = &["main", "test"];

pub use schemagen_common::DEFAULT_SOURCE_EXTENSION;

/// Default root of generated files and caches, relative to the project.
const DEFAULT_TARGET_DIR: &str = "target/schemagen";

/// A fully resolved build configuration with all paths made absolute against
/// the project directory.
///
/// Per-configuration values override the shared `[codegen]` table, which in
/// turn overrides the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    /// The configuration name.
    pub name: String,
    /// Root scanned for interface-definition sources.
    pub input_dir: PathBuf,
    /// Destination for generated sources.
    pub output_dir: PathBuf,
    /// Destination for generated resources.
    pub resource_dir: PathBuf,
    /// Namespace allow-list, if any.
    pub allowed_namespaces: Option<Vec<String>>,
    /// Namespace exclude-list, if any.
    pub excluded_namespaces: Option<Vec<String>>,
    /// Whether raw specifications are packaged for reuse.
    pub specification_library: bool,
    /// Model transformers, in application order.
    pub transformers: Vec<String>,
    /// File extension of generated sources.
    pub source_extension: String,
    /// Local dependency archives.
    pub local_artifacts: Vec<PathBuf>,
    /// This configuration's cache store directory.
    pub cache_dir: PathBuf,
}

/// Returns every configuration name the project knows about: the built-in
/// ones first, then any additional declared ones in name order.
pub fn configuration_names(config: &ProjectConfig) -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_CONFIGURATIONS.iter().map(|s| s.to_string()).collect();
    for name in config.configurations.keys() {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

/// Resolves the named configuration against `project_dir`.
pub fn resolve_configuration(
    config: &ProjectConfig,
    project_dir: &Path,
    name: &str,
) -> Result<ResolvedConfiguration, ConfigError> {
    let overrides = match config.configurations.get(name) {
        Some(table) => table.clone(),
        None if BUILTIN_CONFIGURATIONS.contains(&name) => CodegenConfig::default(),
        None => return Err(ConfigError::UnknownConfiguration(name.to_string())),
    };
    let shared = &config.codegen;

    let target = project_dir.join(DEFAULT_TARGET_DIR);
    let dir = |own: Option<String>, common: &Option<String>, default: PathBuf| {
        own.or_else(|| common.clone())
            .map(|p| project_dir.join(p))
            .unwrap_or(default)
    };

    let cache_root = config
        .cache
        .dir
        .as_ref()
        .map(|d| project_dir.join(d))
        .unwrap_or_else(|| target.join("cache"));

    let local_artifacts = overrides
        .local_artifacts
        .or_else(|| shared.local_artifacts.clone())
        .unwrap_or_else(|| config.dependencies.project.clone())
        .into_iter()
        .map(|p| project_dir.join(p))
        .collect();

    Ok(ResolvedConfiguration {
        name: name.to_string(),
        input_dir: dir(
            overrides.input_dir,
            &shared.input_dir,
            project_dir.join("src").join(name).join("schemas"),
        ),
        output_dir: dir(
            overrides.output_dir,
            &shared.output_dir,
            target.join(name).join("src"),
        ),
        resource_dir: dir(
            overrides.resource_dir,
            &shared.resource_dir,
            target.join(name).join("resources"),
        ),
        allowed_namespaces: overrides
            .allowed_namespaces
            .or_else(|| shared.allowed_namespaces.clone()),
        excluded_namespaces: overrides
            .excluded_namespaces
            .or_else(|| shared.excluded_namespaces.clone()),
        specification_library: overrides
            .specification_library
            .or(shared.specification_library)
            .unwrap_or(true),
        transformers: overrides
            .transformers
            .or_else(|| shared.transformers.clone())
            .unwrap_or_default(),
        source_extension: overrides
            .source_extension
            .or_else(|| shared.source_extension.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE_EXTENSION.to_string()),
        local_artifacts,
        cache_dir: cache_root.join(name),
    })
}
