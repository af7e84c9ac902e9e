//! Shared pipeline helpers for CLI commands.
//!
//! Project root discovery, configuration selection, dependency report
//! loading, and assembly of the generation request for one configuration.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use schemagen_config::{
    configuration_names, resolve_configuration, ProjectConfig, RepositorySpec,
    ResolvedConfiguration, CONFIG_FILE,
};
use schemagen_request::{
    build_request, resolve_artifacts, DependencyReport, GenerationRequest, GenerationSettings,
    NamespaceFilter, Repository,
};

use crate::{ConfigurationArgs, GlobalArgs};

/// A configuration ready to hand to the generation task.
pub struct Prepared {
    /// The resolved settings.
    pub resolved: ResolvedConfiguration,
    /// The assembled request.
    pub request: GenerationRequest,
}

/// Walks up from `start` looking for the nearest directory containing `schemagen.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `schemagen.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Returns the configurations a command should act on, without duplicates.
pub fn selected_configurations(config: &ProjectConfig, args: &ConfigurationArgs) -> Vec<String> {
    if args.all {
        return configuration_names(config);
    }
    let mut seen = BTreeSet::new();
    args.configurations
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Loads the host build's dependency report, if one is configured and present.
///
/// A configured but missing report means nothing was resolved; a report that
/// exists but cannot be parsed is an error.
pub fn load_dependency_report(
    config: &ProjectConfig,
    project_dir: &Path,
) -> Result<Option<DependencyReport>, Box<dyn std::error::Error>> {
    let Some(ref report) = config.dependencies.report else {
        return Ok(None);
    };
    let path = project_dir.join(report);
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "dependency report not found");
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    let report = DependencyReport::from_json(&content)
        .map_err(|e| format!("invalid dependency report {}: {e}", path.display()))?;
    Ok(Some(report))
}

/// Converts the configured repositories into request repositories.
pub fn repositories(config: &ProjectConfig, project_dir: &Path) -> Vec<Repository> {
    config
        .repositories
        .iter()
        .map(|(name, spec)| match spec {
            RepositorySpec::Remote { url } => Repository::Remote {
                name: name.clone(),
                url: url.clone(),
            },
            RepositorySpec::Local { path } => Repository::Local {
                name: name.clone(),
                path: project_dir.join(path),
            },
        })
        .collect()
}

/// Builds the immutable generation settings for a resolved configuration.
pub fn generation_settings(
    resolved: &ResolvedConfiguration,
    repositories: Vec<Repository>,
) -> GenerationSettings {
    GenerationSettings {
        input_dir: resolved.input_dir.clone(),
        output_dir: resolved.output_dir.clone(),
        resource_dir: resolved.resource_dir.clone(),
        namespaces: NamespaceFilter::new(
            resolved.allowed_namespaces.clone(),
            resolved.excluded_namespaces.clone(),
        ),
        specification_library: resolved.specification_library,
        transformers: resolved.transformers.clone(),
        repositories,
    }
}

/// Resolves the named configuration and assembles its generation request.
pub fn prepare(
    project_dir: &Path,
    config: &ProjectConfig,
    report: Option<&DependencyReport>,
    name: &str,
) -> Result<Prepared, Box<dyn std::error::Error>> {
    let resolved = resolve_configuration(config, project_dir, name)?;
    let artifacts = resolve_artifacts(
        &resolved.local_artifacts,
        report,
        &config.dependencies.marker,
    );
    let settings = generation_settings(&resolved, repositories(config, project_dir));
    let request = build_request(&settings, artifacts);
    Ok(Prepared { resolved, request })
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen_config::load_config_from_str;
    use schemagen_request::OutputKind;
    use std::fs;
    use tempfile::TempDir;

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: config.map(|p| p.to_str().unwrap().to_string()),
        }
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[project]\nname=\"t\"").unwrap();
        let sub = tmp.path().join("src/main/schemas");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(find_project_root(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("could not find schemagen.toml"));
    }

    #[test]
    fn resolve_project_root_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[project]\nname=\"t\"").unwrap();
        let root = resolve_project_root(&global(Some(&config_path))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn resolve_project_root_from_config_dir() {
        let tmp = TempDir::new().unwrap();
        let root = resolve_project_root(&global(Some(tmp.path()))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn selection_deduplicates_and_expands_all() {
        let config = load_config_from_str("[project]\nname=\"t\"").unwrap();
        let args = ConfigurationArgs {
            configurations: vec!["test".to_string(), "main".to_string(), "test".to_string()],
            all: false,
        };
        assert_eq!(selected_configurations(&config, &args), vec!["test", "main"]);

        let all = ConfigurationArgs {
            configurations: vec![],
            all: true,
        };
        assert_eq!(selected_configurations(&config, &all), vec!["main", "test"]);
    }

    #[test]
    fn config_and_request_share_defaults() {
        let config = load_config_from_str("[project]\nname=\"t\"").unwrap();
        let resolved = resolve_configuration(&config, Path::new("/p"), "main").unwrap();
        assert_eq!(resolved.source_extension, schemagen_request::DEFAULT_SOURCE_EXTENSION);
        assert_eq!(config.dependencies.marker, schemagen_request::DEFAULT_MARKER);
    }

    #[test]
    fn missing_report_is_none() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_from_str(
            "[project]\nname=\"t\"\n[dependencies]\nreport = \"target/report.json\"",
        )
        .unwrap();
        assert!(load_dependency_report(&config, tmp.path()).unwrap().is_none());
    }

    #[test]
    fn malformed_report_errors() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("report.json"), "{ not json").unwrap();
        let config =
            load_config_from_str("[project]\nname=\"t\"\n[dependencies]\nreport = \"report.json\"")
                .unwrap();
        let err = load_dependency_report(&config, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("invalid dependency report"));
    }

    #[test]
    fn prepare_assembles_request() {
        let tmp = TempDir::new().unwrap();
        let schemas = tmp.path().join("src/main/schemas");
        fs::create_dir_all(&schemas).unwrap();
        fs::write(schemas.join("pets.smithy"), "namespace pets").unwrap();
        fs::write(
            tmp.path().join("report.json"),
            r#"{ "configurations": { "schemagen": { "modules": [
                { "organization": "o", "name": "shapes", "revision": "1",
                  "artifacts": ["/cache/shapes.jar"] } ] } } }"#,
        )
        .unwrap();

        let config = load_config_from_str(
            r#"
[project]
name = "petstore"

[codegen]
specification_library = false
allowed_namespaces = ["pets", "internal"]
excluded_namespaces = ["internal"]

[repositories.central]
url = "https://repo.example.com/maven2"

[repositories.local]
path = "local-repo"

[dependencies]
project = ["../core/target/core.jar"]
report = "report.json"
"#,
        )
        .unwrap();

        let report = load_dependency_report(&config, tmp.path()).unwrap();
        let prepared = prepare(tmp.path(), &config, report.as_ref(), "main").unwrap();
        let req = &prepared.request;

        assert_eq!(req.inputs.len(), 1);
        assert_eq!(req.repositories, vec!["https://repo.example.com/maven2"]);
        assert_eq!(req.dependencies.len(), 2);
        assert_eq!(req.dependencies[0].path, tmp.path().join("../core/target/core.jar"));
        assert!(req.skips(OutputKind::Resource));
        assert_eq!(
            req.namespaces.effective_allowed().unwrap().into_iter().collect::<Vec<_>>(),
            vec!["pets"]
        );
    }
}
